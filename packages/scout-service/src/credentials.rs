use scout_providers::ApiAuth;
use scout_storage::models::Platform;
use tracing::warn;

use crate::{Error, Result, ScoutService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthMode {
	Oauth,
	ServerKey,
}

/// A resolved search credential: either a user's decrypted OAuth token or
/// the shared server API key.
#[derive(Debug, Clone)]
pub struct SearchAuth {
	pub token: String,
	pub mode: AuthMode,
}
impl SearchAuth {
	/// OAuth tokens go into a bearer header; the server key goes into the
	/// `key` query parameter. Never both.
	pub fn api_auth(&self) -> ApiAuth<'_> {
		match self.mode {
			AuthMode::Oauth => ApiAuth::Bearer(&self.token),
			AuthMode::ServerKey => ApiAuth::Key(&self.token),
		}
	}
}

impl ScoutService {
	/// Looks up and decrypts the stored access token for (user, platform).
	/// Every failure path degrades to `None`: a missing record, a store
	/// error, or a ciphertext that no longer authenticates under the
	/// configured secret.
	pub async fn resolve(&self, user_id: &str, platform: Platform) -> Option<String> {
		let record = match self.store.get(user_id, platform).await {
			Ok(Some(record)) => record,
			Ok(None) => return None,
			Err(err) => {
				warn!(user_id, platform = platform.as_str(), "Credential lookup failed: {err}.");

				return None;
			},
		};

		match scout_crypto::decrypt(&record.access_token_enc, &self.cfg.security.encryption_secret)
		{
			Ok(token) => Some(token),
			Err(err) => {
				warn!(
					user_id,
					platform = platform.as_str(),
					"Stored token failed to decrypt, treating as absent: {err}.",
				);

				None
			},
		}
	}

	/// Picks the credential for a search request: the user's Google or
	/// YouTube token when one decrypts, otherwise the shared server key.
	pub async fn resolve_for_search(&self, user_id: &str) -> Result<SearchAuth> {
		for platform in [Platform::Google, Platform::Youtube] {
			if let Some(token) = self.resolve(user_id, platform).await {
				return Ok(SearchAuth { token, mode: AuthMode::Oauth });
			}
		}

		if let Some(key) = self.cfg.security.server_api_key.as_ref() {
			return Ok(SearchAuth { token: key.clone(), mode: AuthMode::ServerKey });
		}

		Err(Error::Credential)
	}
}

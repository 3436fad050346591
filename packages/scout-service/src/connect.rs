use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use scout_providers::oauth;
use scout_storage::models::{CredentialRecord, Platform};

use crate::{Error, Result, ScoutService};

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRequest {
	pub platform: String,
	pub redirect_uri: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct InitResponse {
	pub url: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequest {
	pub platform: String,
	pub code: String,
	pub redirect_uri: String,
}

/// One connected platform as shown to the caller. Token material, encrypted
/// or not, never appears here.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
	pub platform: Platform,
	pub scopes: Vec<String>,
	#[serde(with = "time::serde::rfc3339::option")]
	pub expires_at: Option<OffsetDateTime>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct StatusResponse {
	pub data: Vec<CredentialStatus>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct StateBlob<'a> {
	platform: &'a str,
	user_id: &'a str,
	nonce: Uuid,
}

impl ScoutService {
	/// Builds the authorization URL for a connect flow. Persists nothing;
	/// the pending exchange lives entirely in the provider's redirect.
	pub fn init_connect(&self, user_id: &str, req: &InitRequest) -> Result<InitResponse> {
		let platform = parse_platform(&req.platform)?;
		let blob = StateBlob { platform: platform.as_str(), user_id, nonce: Uuid::new_v4() };
		let state = BASE64.encode(serde_json::to_vec(&blob).map_err(|err| {
			Error::InvalidRequest { message: format!("Failed to encode state: {err}.") }
		})?);
		let url = oauth::authorize_url(&self.cfg.oauth, &req.redirect_uri, &state)?;

		Ok(InitResponse { url })
	}

	/// Swaps the authorization code for tokens, encrypts them, and upserts
	/// the credential record for (user, platform).
	pub async fn exchange(&self, user_id: &str, req: &ExchangeRequest) -> Result<()> {
		let platform = parse_platform(&req.platform)?;
		let tokens = self
			.providers
			.identity
			.exchange_code(&self.cfg.oauth, &req.code, &req.redirect_uri)
			.await
			.map_err(|err| Error::UpstreamAuth { message: err.to_string() })?;
		let Some(access_token) = tokens.access_token.filter(|token| !token.is_empty()) else {
			return Err(Error::UpstreamAuth {
				message: "Provider returned no access token.".to_string(),
			});
		};

		let secret = &self.cfg.security.encryption_secret;
		let access_token_enc = scout_crypto::encrypt(&access_token, secret)
			.map_err(|err| Error::UpstreamAuth { message: err.to_string() })?;
		let refresh_token_enc = tokens
			.refresh_token
			.as_deref()
			.map(|token| scout_crypto::encrypt(token, secret))
			.transpose()
			.map_err(|err| Error::UpstreamAuth { message: err.to_string() })?;
		let now = OffsetDateTime::now_utc();
		let record = CredentialRecord {
			user_id: user_id.to_string(),
			platform,
			access_token_enc,
			refresh_token_enc,
			expires_at: tokens.expires_in.map(|seconds| now + Duration::seconds(seconds)),
			scopes: tokens
				.scope
				.as_deref()
				.map(|scope| scope.split_whitespace().map(str::to_string).collect())
				.unwrap_or_default(),
			metadata: serde_json::json!({ "tokenType": tokens.token_type }),
			created_at: now,
			updated_at: now,
		};

		self.store.upsert(&record).await?;

		Ok(())
	}

	/// Lists the caller's connected platforms without decrypting anything.
	pub async fn status(&self, user_id: &str) -> Result<StatusResponse> {
		let records = self.store.list(user_id).await?;
		let data = records
			.into_iter()
			.map(|record| CredentialStatus {
				platform: record.platform,
				scopes: record.scopes,
				expires_at: record.expires_at,
				created_at: record.created_at,
				updated_at: record.updated_at,
			})
			.collect();

		Ok(StatusResponse { data })
	}

	pub async fn disconnect(&self, user_id: &str, platform: &str) -> Result<()> {
		let platform = parse_platform(platform)?;

		if self.store.delete(user_id, platform).await? {
			Ok(())
		} else {
			Err(Error::NotConnected)
		}
	}
}

fn parse_platform(raw: &str) -> Result<Platform> {
	Platform::parse(raw)
		.ok_or_else(|| Error::InvalidRequest { message: format!("Unsupported platform {raw:?}.") })
}

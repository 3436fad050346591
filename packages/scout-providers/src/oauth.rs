// std
use std::time::Duration as StdDuration;

// crates.io
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::Result;

/// Token endpoint response. Every field is optional; the caller decides
/// whether a missing access token is fatal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
	pub access_token: Option<String>,
	pub refresh_token: Option<String>,
	pub expires_in: Option<i64>,
	pub scope: Option<String>,
	pub token_type: Option<String>,
}

/// Builds the provider's authorization URL with an opaque `state` blob the
/// redirect carries back.
pub fn authorize_url(cfg: &scout_config::Oauth, redirect_uri: &str, state: &str) -> Result<String> {
	let url = Url::parse_with_params(
		&cfg.auth_base,
		[
			("client_id", cfg.client_id.as_str()),
			("redirect_uri", redirect_uri),
			("response_type", "code"),
			("scope", cfg.scopes.join(" ").as_str()),
			("access_type", "offline"),
			("prompt", "consent"),
			("state", state),
		],
	)
	.map_err(|err| crate::Error::Decode(format!("Invalid auth base URL: {err}.")))?;

	Ok(url.into())
}

/// Swaps an authorization code for access/refresh tokens.
pub async fn exchange_code(
	cfg: &scout_config::Oauth,
	code: &str,
	redirect_uri: &str,
) -> Result<TokenResponse> {
	let client = Client::builder().timeout(StdDuration::from_secs(10)).build()?;
	let response = client
		.post(&cfg.token_endpoint)
		.form(&[
			("client_id", cfg.client_id.as_str()),
			("client_secret", cfg.client_secret.as_str()),
			("code", code),
			("redirect_uri", redirect_uri),
			("grant_type", "authorization_code"),
		])
		.send()
		.await?
		.error_for_status()?;

	Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn oauth_cfg() -> scout_config::Oauth {
		toml::from_str(
			r#"
client_id = "id-123"
client_secret = "secret"
"#,
		)
		.expect("Failed to build oauth config.")
	}

	#[test]
	fn authorize_url_carries_client_and_state() {
		let url = authorize_url(&oauth_cfg(), "https://app.example/callback", "blob")
			.expect("URL construction failed.");

		assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
		assert!(url.contains("client_id=id-123"));
		assert!(url.contains("state=blob"));
		assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.example%2Fcallback"));
	}

	#[test]
	fn token_response_tolerates_partial_payloads() {
		let parsed: TokenResponse =
			serde_json::from_str(r#"{ "token_type": "Bearer" }"#).expect("Decode failed.");

		assert!(parsed.access_token.is_none());
		assert!(parsed.refresh_token.is_none());
	}
}

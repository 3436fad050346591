use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub security: Security,
	pub oauth: Oauth,
	pub platform: PlatformApi,
	pub storage: Storage,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Security {
	/// Key material for token encryption at rest. The derived key is a bare
	/// SHA-256 of this value; changing either breaks decryption of every
	/// previously stored record.
	pub encryption_secret: String,
	/// Shared server API key used when a caller has no connected account.
	pub server_api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Oauth {
	pub client_id: String,
	pub client_secret: String,
	#[serde(default = "default_auth_base")]
	pub auth_base: String,
	#[serde(default = "default_token_endpoint")]
	pub token_endpoint: String,
	#[serde(default = "default_scopes")]
	pub scopes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlatformApi {
	#[serde(default = "default_api_base")]
	pub api_base: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

fn default_auth_base() -> String {
	"https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_token_endpoint() -> String {
	"https://oauth2.googleapis.com/token".to_string()
}

fn default_scopes() -> Vec<String> {
	vec!["https://www.googleapis.com/auth/youtube.readonly".to_string()]
}

fn default_api_base() -> String {
	"https://www.googleapis.com/youtube/v3".to_string()
}

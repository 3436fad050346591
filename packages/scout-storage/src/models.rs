use serde_json::Value;
use time::OffsetDateTime;

/// Upstream platforms a user can connect. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
	Youtube,
	Gemini,
	Google,
}
impl Platform {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"youtube" => Some(Self::Youtube),
			"gemini" => Some(Self::Gemini),
			"google" => Some(Self::Google),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Youtube => "youtube",
			Self::Gemini => "gemini",
			Self::Google => "google",
		}
	}
}

/// One connected account. At most one row per (user_id, platform); the token
/// fields hold the cipher's hex wire format, never plaintext.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
	pub user_id: String,
	pub platform: Platform,
	pub access_token_enc: String,
	pub refresh_token_enc: Option<String>,
	pub expires_at: Option<OffsetDateTime>,
	pub scopes: Vec<String>,
	pub metadata: Value,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CredentialRow {
	pub user_id: String,
	pub platform: String,
	pub access_token_enc: String,
	pub refresh_token_enc: Option<String>,
	pub expires_at: Option<OffsetDateTime>,
	pub scopes: Vec<String>,
	pub metadata: Value,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl TryFrom<CredentialRow> for CredentialRecord {
	type Error = crate::Error;

	fn try_from(row: CredentialRow) -> crate::Result<Self> {
		let platform = Platform::parse(&row.platform).ok_or_else(|| {
			crate::Error::InvalidArgument(format!("Unknown platform {:?} in store.", row.platform))
		})?;

		Ok(Self {
			user_id: row.user_id,
			platform,
			access_token_enc: row.access_token_enc,
			refresh_token_enc: row.refresh_token_enc,
			expires_at: row.expires_at,
			scopes: row.scopes,
			metadata: row.metadata,
			created_at: row.created_at,
			updated_at: row.updated_at,
		})
	}
}

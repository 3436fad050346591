use sqlx::{PgPool, postgres::PgPoolOptions};
use time::OffsetDateTime;

use crate::{
	Result,
	models::{CredentialRecord, CredentialRow, Platform},
};

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS oauth_credentials (
	user_id TEXT NOT NULL,
	platform TEXT NOT NULL,
	access_token_enc TEXT NOT NULL,
	refresh_token_enc TEXT,
	expires_at TIMESTAMPTZ,
	scopes TEXT[] NOT NULL DEFAULT '{}',
	metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
	created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
	updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
	PRIMARY KEY (user_id, platform)
)";

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &scout_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		sqlx::query(SCHEMA).execute(&self.pool).await?;

		Ok(())
	}

	pub async fn get_credential(
		&self,
		user_id: &str,
		platform: Platform,
	) -> Result<Option<CredentialRecord>> {
		let row: Option<CredentialRow> = sqlx::query_as(
			"\
SELECT user_id, platform, access_token_enc, refresh_token_enc, expires_at, scopes, metadata, created_at, updated_at
FROM oauth_credentials
WHERE user_id = $1 AND platform = $2",
		)
		.bind(user_id)
		.bind(platform.as_str())
		.fetch_optional(&self.pool)
		.await?;

		row.map(CredentialRecord::try_from).transpose()
	}

	/// The ON CONFLICT upsert is what serializes concurrent re-connections
	/// for the same (user, platform) pair; callers add no locking of their
	/// own.
	pub async fn upsert_credential(&self, record: &CredentialRecord) -> Result<()> {
		sqlx::query(
			"\
INSERT INTO oauth_credentials (user_id, platform, access_token_enc, refresh_token_enc, expires_at, scopes, metadata, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
ON CONFLICT (user_id, platform) DO UPDATE SET
	access_token_enc = EXCLUDED.access_token_enc,
	refresh_token_enc = EXCLUDED.refresh_token_enc,
	expires_at = EXCLUDED.expires_at,
	scopes = EXCLUDED.scopes,
	metadata = EXCLUDED.metadata,
	updated_at = EXCLUDED.updated_at",
		)
		.bind(&record.user_id)
		.bind(record.platform.as_str())
		.bind(&record.access_token_enc)
		.bind(&record.refresh_token_enc)
		.bind(record.expires_at)
		.bind(&record.scopes)
		.bind(&record.metadata)
		.bind(OffsetDateTime::now_utc())
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	pub async fn list_credentials(&self, user_id: &str) -> Result<Vec<CredentialRecord>> {
		let rows: Vec<CredentialRow> = sqlx::query_as(
			"\
SELECT user_id, platform, access_token_enc, refresh_token_enc, expires_at, scopes, metadata, created_at, updated_at
FROM oauth_credentials
WHERE user_id = $1
ORDER BY platform",
		)
		.bind(user_id)
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter().map(CredentialRecord::try_from).collect()
	}

	pub async fn delete_credential(&self, user_id: &str, platform: Platform) -> Result<bool> {
		let result =
			sqlx::query("DELETE FROM oauth_credentials WHERE user_id = $1 AND platform = $2")
				.bind(user_id)
				.bind(platform.as_str())
				.execute(&self.pool)
				.await?;

		Ok(result.rows_affected() > 0)
	}
}

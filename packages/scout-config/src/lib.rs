mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Oauth, PlatformApi, Postgres, Security, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.security.encryption_secret.trim().is_empty() {
		return Err(Error::Validation {
			message: "security.encryption_secret must be non-empty.".to_string(),
		});
	}
	if cfg.oauth.client_id.trim().is_empty() {
		return Err(Error::Validation {
			message: "oauth.client_id must be non-empty.".to_string(),
		});
	}
	if cfg.oauth.client_secret.trim().is_empty() {
		return Err(Error::Validation {
			message: "oauth.client_secret must be non-empty.".to_string(),
		});
	}
	if cfg.oauth.scopes.is_empty() {
		return Err(Error::Validation { message: "oauth.scopes must be non-empty.".to_string() });
	}
	if cfg.platform.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "platform.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.platform.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "platform.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.security.server_api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.security.server_api_key = None;
	}
}

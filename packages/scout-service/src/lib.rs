pub mod connect;
pub mod credentials;
pub mod search;

mod error;

pub use error::{Error, Result};

pub use connect::{CredentialStatus, ExchangeRequest, InitRequest, InitResponse, StatusResponse};
pub use credentials::{AuthMode, SearchAuth};
pub use search::{SearchRequest, SearchResponse};

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use time::OffsetDateTime;

use scout_config::Config;
use scout_domain::SearchOrder;
use scout_providers::{oauth::TokenResponse, youtube, youtube::VideoItem};
use scout_storage::{
	db::Db,
	models::{CredentialRecord, Platform},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read side of the external credential store, narrowed to what the service
/// needs so tests can swap in an in-memory implementation.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	fn get<'a>(
		&'a self,
		user_id: &'a str,
		platform: Platform,
	) -> BoxFuture<'a, scout_storage::Result<Option<CredentialRecord>>>;
	fn upsert<'a>(
		&'a self,
		record: &'a CredentialRecord,
	) -> BoxFuture<'a, scout_storage::Result<()>>;
	fn list<'a>(
		&'a self,
		user_id: &'a str,
	) -> BoxFuture<'a, scout_storage::Result<Vec<CredentialRecord>>>;
	fn delete<'a>(
		&'a self,
		user_id: &'a str,
		platform: Platform,
	) -> BoxFuture<'a, scout_storage::Result<bool>>;
}
impl CredentialStore for Db {
	fn get<'a>(
		&'a self,
		user_id: &'a str,
		platform: Platform,
	) -> BoxFuture<'a, scout_storage::Result<Option<CredentialRecord>>> {
		Box::pin(self.get_credential(user_id, platform))
	}

	fn upsert<'a>(
		&'a self,
		record: &'a CredentialRecord,
	) -> BoxFuture<'a, scout_storage::Result<()>> {
		Box::pin(self.upsert_credential(record))
	}

	fn list<'a>(
		&'a self,
		user_id: &'a str,
	) -> BoxFuture<'a, scout_storage::Result<Vec<CredentialRecord>>> {
		Box::pin(self.list_credentials(user_id))
	}

	fn delete<'a>(
		&'a self,
		user_id: &'a str,
		platform: Platform,
	) -> BoxFuture<'a, scout_storage::Result<bool>> {
		Box::pin(self.delete_credential(user_id, platform))
	}
}

/// The video platform's search/statistics surface.
pub trait VideoPlatform
where
	Self: Send + Sync,
{
	fn search_videos<'a>(
		&'a self,
		cfg: &'a scout_config::PlatformApi,
		auth: &'a SearchAuth,
		query: &'a str,
		order: SearchOrder,
		published_after: Option<OffsetDateTime>,
	) -> BoxFuture<'a, scout_providers::Result<Vec<String>>>;
	fn list_videos<'a>(
		&'a self,
		cfg: &'a scout_config::PlatformApi,
		auth: &'a SearchAuth,
		ids: &'a [String],
	) -> BoxFuture<'a, scout_providers::Result<Vec<VideoItem>>>;
	fn list_channels<'a>(
		&'a self,
		cfg: &'a scout_config::PlatformApi,
		auth: &'a SearchAuth,
		ids: &'a [String],
	) -> BoxFuture<'a, scout_providers::Result<HashMap<String, u64>>>;
}

/// The identity provider's code-for-token exchange.
pub trait IdentityProvider
where
	Self: Send + Sync,
{
	fn exchange_code<'a>(
		&'a self,
		cfg: &'a scout_config::Oauth,
		code: &'a str,
		redirect_uri: &'a str,
	) -> BoxFuture<'a, scout_providers::Result<TokenResponse>>;
}

struct HttpVideoPlatform;
impl VideoPlatform for HttpVideoPlatform {
	fn search_videos<'a>(
		&'a self,
		cfg: &'a scout_config::PlatformApi,
		auth: &'a SearchAuth,
		query: &'a str,
		order: SearchOrder,
		published_after: Option<OffsetDateTime>,
	) -> BoxFuture<'a, scout_providers::Result<Vec<String>>> {
		Box::pin(youtube::search_videos(cfg, auth.api_auth(), query, order.as_str(), published_after))
	}

	fn list_videos<'a>(
		&'a self,
		cfg: &'a scout_config::PlatformApi,
		auth: &'a SearchAuth,
		ids: &'a [String],
	) -> BoxFuture<'a, scout_providers::Result<Vec<VideoItem>>> {
		Box::pin(youtube::list_videos(cfg, auth.api_auth(), ids))
	}

	fn list_channels<'a>(
		&'a self,
		cfg: &'a scout_config::PlatformApi,
		auth: &'a SearchAuth,
		ids: &'a [String],
	) -> BoxFuture<'a, scout_providers::Result<HashMap<String, u64>>> {
		Box::pin(youtube::list_channels(cfg, auth.api_auth(), ids))
	}
}

struct HttpIdentityProvider;
impl IdentityProvider for HttpIdentityProvider {
	fn exchange_code<'a>(
		&'a self,
		cfg: &'a scout_config::Oauth,
		code: &'a str,
		redirect_uri: &'a str,
	) -> BoxFuture<'a, scout_providers::Result<TokenResponse>> {
		Box::pin(scout_providers::oauth::exchange_code(cfg, code, redirect_uri))
	}
}

#[derive(Clone)]
pub struct Providers {
	pub platform: Arc<dyn VideoPlatform>,
	pub identity: Arc<dyn IdentityProvider>,
}
impl Providers {
	pub fn http() -> Self {
		Self { platform: Arc::new(HttpVideoPlatform), identity: Arc::new(HttpIdentityProvider) }
	}
}

pub struct ScoutService {
	pub cfg: Config,
	pub store: Arc<dyn CredentialStore>,
	pub providers: Providers,
}
impl ScoutService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_parts(cfg, Arc::new(db), Providers::http())
	}

	pub fn with_parts(cfg: Config, store: Arc<dyn CredentialStore>, providers: Providers) -> Self {
		Self { cfg, store, providers }
	}
}

use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use axum::{
	body::{self, Body},
	http::{Request, StatusCode, header},
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::util::ServiceExt;

use scout_api::{routes, state::AppState};
use scout_config::Config;
use scout_domain::SearchOrder;
use scout_providers::{oauth::TokenResponse, youtube::VideoItem};
use scout_service::{
	BoxFuture, CredentialStore, IdentityProvider, Providers, ScoutService, VideoPlatform,
};
use scout_storage::models::{CredentialRecord, Platform};

fn test_config(server_api_key: Option<&str>) -> Config {
	let key_line = server_api_key
		.map(|key| format!("server_api_key = \"{key}\"\n"))
		.unwrap_or_default();
	let raw = format!(
		r#"
[service]
http_bind = "127.0.0.1:0"
log_level = "info"

[security]
encryption_secret = "http-test-secret"
{key_line}

[oauth]
client_id = "client-id"
client_secret = "client-secret"

[platform]
timeout_ms = 1000

[storage.postgres]
dsn = "postgres://unused"
pool_max_conns = 1
"#
	);

	toml::from_str(&raw).expect("Failed to build test config.")
}

#[derive(Default)]
struct MemStore {
	rows: Mutex<HashMap<(String, Platform), CredentialRecord>>,
}
impl CredentialStore for MemStore {
	fn get<'a>(
		&'a self,
		user_id: &'a str,
		platform: Platform,
	) -> BoxFuture<'a, scout_storage::Result<Option<CredentialRecord>>> {
		Box::pin(async move {
			Ok(self
				.rows
				.lock()
				.expect("store poisoned")
				.get(&(user_id.to_string(), platform))
				.cloned())
		})
	}

	fn upsert<'a>(
		&'a self,
		record: &'a CredentialRecord,
	) -> BoxFuture<'a, scout_storage::Result<()>> {
		Box::pin(async move {
			self.rows
				.lock()
				.expect("store poisoned")
				.insert((record.user_id.clone(), record.platform), record.clone());

			Ok(())
		})
	}

	fn list<'a>(
		&'a self,
		user_id: &'a str,
	) -> BoxFuture<'a, scout_storage::Result<Vec<CredentialRecord>>> {
		Box::pin(async move {
			Ok(self
				.rows
				.lock()
				.expect("store poisoned")
				.values()
				.filter(|record| record.user_id == user_id)
				.cloned()
				.collect())
		})
	}

	fn delete<'a>(
		&'a self,
		user_id: &'a str,
		platform: Platform,
	) -> BoxFuture<'a, scout_storage::Result<bool>> {
		Box::pin(async move {
			Ok(self
				.rows
				.lock()
				.expect("store poisoned")
				.remove(&(user_id.to_string(), platform))
				.is_some())
		})
	}
}

/// Serves the same candidate set for every phase; enough for envelope tests.
struct FixedPlatform {
	videos: Vec<VideoItem>,
	subscribers: HashMap<String, u64>,
}
impl VideoPlatform for FixedPlatform {
	fn search_videos<'a>(
		&'a self,
		_cfg: &'a scout_config::PlatformApi,
		_auth: &'a scout_service::SearchAuth,
		_query: &'a str,
		_order: SearchOrder,
		_published_after: Option<OffsetDateTime>,
	) -> BoxFuture<'a, scout_providers::Result<Vec<String>>> {
		Box::pin(async move { Ok(self.videos.iter().map(|video| video.id.clone()).collect()) })
	}

	fn list_videos<'a>(
		&'a self,
		_cfg: &'a scout_config::PlatformApi,
		_auth: &'a scout_service::SearchAuth,
		ids: &'a [String],
	) -> BoxFuture<'a, scout_providers::Result<Vec<VideoItem>>> {
		Box::pin(async move {
			Ok(self.videos.iter().filter(|video| ids.contains(&video.id)).cloned().collect())
		})
	}

	fn list_channels<'a>(
		&'a self,
		_cfg: &'a scout_config::PlatformApi,
		_auth: &'a scout_service::SearchAuth,
		_ids: &'a [String],
	) -> BoxFuture<'a, scout_providers::Result<HashMap<String, u64>>> {
		Box::pin(async move { Ok(self.subscribers.clone()) })
	}
}

struct StubIdentity;
impl IdentityProvider for StubIdentity {
	fn exchange_code<'a>(
		&'a self,
		_cfg: &'a scout_config::Oauth,
		_code: &'a str,
		_redirect_uri: &'a str,
	) -> BoxFuture<'a, scout_providers::Result<TokenResponse>> {
		Box::pin(async move {
			Ok(TokenResponse {
				access_token: Some("stub-access".to_string()),
				..TokenResponse::default()
			})
		})
	}
}

fn app(server_api_key: Option<&str>, videos: Vec<VideoItem>) -> axum::Router {
	let subscribers: HashMap<String, u64> =
		videos.iter().map(|video| (video.channel_id.clone(), 500u64)).collect();
	let service = ScoutService::with_parts(
		test_config(server_api_key),
		Arc::new(MemStore::default()),
		Providers {
			platform: Arc::new(FixedPlatform { videos, subscribers }),
			identity: Arc::new(StubIdentity),
		},
	);

	routes::router(AppState::from_service(service))
}

fn shorts(count: usize) -> Vec<VideoItem> {
	(0..count)
		.map(|i| VideoItem {
			id: format!("v{i}"),
			title: format!("video {i}"),
			channel_id: "c1".to_string(),
			channel_title: "channel".to_string(),
			views: 50_000 + i as u64,
			published_at: OffsetDateTime::UNIX_EPOCH,
			duration: "PT30S".to_string(),
			thumbnail_url: format!("https://i.ytimg.com/vi/v{i}/hqdefault.jpg"),
		})
		.collect()
}

async fn json_body(response: axum::response::Response) -> Value {
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");

	serde_json::from_slice(&bytes).expect("Body must be JSON.")
}

#[tokio::test]
async fn health_is_ok() {
	let response = app(Some("key"), Vec::new())
		.oneshot(Request::get("/health").body(Body::empty()).expect("request"))
		.await
		.expect("router failed");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn preflight_gets_an_empty_ok_with_cors_headers() {
	let request = Request::builder()
		.method("OPTIONS")
		.uri("/search")
		.header(header::ORIGIN, "https://dashboard.example")
		.header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
		.body(Body::empty())
		.expect("request");
	let response =
		app(Some("key"), Vec::new()).oneshot(request).await.expect("router failed");

	assert_eq!(response.status(), StatusCode::OK);
	assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read body.");

	assert!(bytes.is_empty());
}

#[tokio::test]
async fn search_requires_a_caller_id() {
	let request = Request::post("/search")
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(r#"{ "query": "cats" }"#))
		.expect("request");
	let response =
		app(Some("key"), Vec::new()).oneshot(request).await.expect("router failed");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let body = json_body(response).await;

	assert_eq!(body["success"], Value::Bool(false));
	assert!(body["error"].as_str().expect("error must be a string").contains("x-user-id"));
}

#[tokio::test]
async fn search_without_any_credential_is_unauthorized() {
	let request = Request::post("/search")
		.header(header::CONTENT_TYPE, "application/json")
		.header("x-user-id", "user-1")
		.body(Body::from(r#"{ "query": "cats" }"#))
		.expect("request");
	let response = app(None, Vec::new()).oneshot(request).await.expect("router failed");

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let body = json_body(response).await;

	assert_eq!(body["success"], Value::Bool(false));
}

#[tokio::test]
async fn search_returns_the_success_envelope() {
	let request = Request::post("/search")
		.header(header::CONTENT_TYPE, "application/json")
		.header("x-user-id", "user-1")
		.body(Body::from(r#"{ "query": "cats", "filters": { "minViews": 0 } }"#))
		.expect("request");
	let response = app(Some("key"), shorts(6)).oneshot(request).await.expect("router failed");

	assert_eq!(response.status(), StatusCode::OK);

	let body = json_body(response).await;

	assert_eq!(body["success"], Value::Bool(true));

	let data = body["data"].as_array().expect("data must be an array");

	assert_eq!(data.len(), 6);

	for item in data {
		assert!(item["durationSeconds"].as_u64().expect("durationSeconds") <= 60);
		assert!(item["growthRatio"].as_f64().expect("growthRatio") >= 0.0);
		assert!(item.get("channelId").is_none(), "internal fields must not leak");
	}
}

#[tokio::test]
async fn init_rejects_unsupported_platforms() {
	let request = Request::post("/v1/credentials/init")
		.header(header::CONTENT_TYPE, "application/json")
		.header("x-user-id", "user-1")
		.body(Body::from(r#"{ "platform": "twitch", "redirectUri": "https://app/cb" }"#))
		.expect("request");
	let response =
		app(Some("key"), Vec::new()).oneshot(request).await.expect("router failed");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn credential_flow_round_trips_through_the_router() {
	let app = app(Some("key"), Vec::new());

	let exchange = Request::post("/v1/credentials/exchange")
		.header(header::CONTENT_TYPE, "application/json")
		.header("x-user-id", "user-1")
		.body(Body::from(
			r#"{ "platform": "google", "code": "code", "redirectUri": "https://app/cb" }"#,
		))
		.expect("request");
	let response = app.clone().oneshot(exchange).await.expect("router failed");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["success"], Value::Bool(true));

	let status = Request::get("/v1/credentials/status")
		.header("x-user-id", "user-1")
		.body(Body::empty())
		.expect("request");
	let response = app.clone().oneshot(status).await.expect("router failed");
	let body = json_body(response).await;
	let data = body["data"].as_array().expect("data must be an array");

	assert_eq!(data.len(), 1);
	assert_eq!(data[0]["platform"], Value::String("google".to_string()));
	assert!(data[0].get("accessTokenEnc").is_none(), "tokens must not leak");

	let disconnect = Request::post("/v1/credentials/disconnect")
		.header(header::CONTENT_TYPE, "application/json")
		.header("x-user-id", "user-1")
		.body(Body::from(r#"{ "platform": "google" }"#))
		.expect("request");
	let response = app.clone().oneshot(disconnect).await.expect("router failed");

	assert_eq!(response.status(), StatusCode::OK);

	// Disconnecting again is a 404: nothing is connected any more.
	let disconnect = Request::post("/v1/credentials/disconnect")
		.header(header::CONTENT_TYPE, "application/json")
		.header("x-user-id", "user-1")
		.body(Body::from(r#"{ "platform": "google" }"#))
		.expect("request");
	let response = app.oneshot(disconnect).await.expect("router failed");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(json_body(response).await["success"], Value::Bool(false));
}

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use scout_service::{Error as ServiceError, ExchangeRequest, InitRequest, SearchRequest};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	// Fixed permissive CORS on every response; preflight OPTIONS gets an
	// empty 200 from the layer itself.
	let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

	Router::new()
		.route("/health", get(health))
		.route("/search", post(search))
		.route("/v1/credentials/init", post(credentials_init))
		.route("/v1/credentials/exchange", post(credentials_exchange))
		.route("/v1/credentials/status", get(credentials_status))
		.route("/v1/credentials/disconnect", post(credentials_disconnect))
		.layer(cors)
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
	let user_id = caller_id(&headers)?;
	let response = state.service.search(user_id, payload).await?;

	Ok(Json(json!({ "success": true, "data": response.items })))
}

async fn credentials_init(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<InitRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
	let user_id = caller_id(&headers)?;
	let response = state.service.init_connect(user_id, &payload)?;

	Ok(Json(json!({ "url": response.url })))
}

async fn credentials_exchange(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<ExchangeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
	let user_id = caller_id(&headers)?;

	state.service.exchange(user_id, &payload).await?;

	Ok(Json(json!({ "success": true })))
}

async fn credentials_status(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
	let user_id = caller_id(&headers)?;
	let response = state.service.status(user_id).await?;

	Ok(Json(json!({ "data": response.data })))
}

#[derive(Debug, serde::Deserialize)]
struct DisconnectRequest {
	platform: String,
}

async fn credentials_disconnect(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<DisconnectRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
	let user_id = caller_id(&headers)?;

	state.service.disconnect(user_id, &payload.platform).await?;

	Ok(Json(json!({ "success": true })))
}

// Session issuance is the identity provider's job; the API only consumes the
// authenticated user id it forwards.
fn caller_id(headers: &HeaderMap) -> Result<&str, ApiError> {
	headers
		.get("x-user-id")
		.and_then(|value| value.to_str().ok())
		.filter(|value| !value.trim().is_empty())
		.ok_or_else(|| {
			ApiError::new(StatusCode::BAD_REQUEST, "Missing x-user-id header.".to_string())
		})
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	success: bool,
	error: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, message: String) -> Self {
		Self { status, message }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let status = match &err {
			ServiceError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
			ServiceError::Credential => StatusCode::UNAUTHORIZED,
			ServiceError::NotConnected => StatusCode::NOT_FOUND,
			ServiceError::UpstreamAuth { .. } | ServiceError::Upstream { .. } =>
				StatusCode::BAD_GATEWAY,
			ServiceError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		};
		// Internal failure details stay in the logs, not in the envelope.
		let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
			tracing::error!("Request failed: {err}.");

			"Internal error.".to_string()
		} else {
			err.to_string()
		};

		Self::new(status, message)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { success: false, error: self.message };

		(self.status, Json(body)).into_response()
	}
}

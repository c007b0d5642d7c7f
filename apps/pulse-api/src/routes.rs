use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::{HeaderMap, StatusCode, header},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;

use pulse_service::{FeedQuery, ServiceError, Session};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/feed", get(feed))
		.route("/v1/posts/{id}", get(individual_post))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn feed(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<FeedQuery>,
) -> Result<Response, ApiError> {
	let session = authenticate(&state, &headers).await?;
	let response = state.service.feed(&session, query).await?;

	Ok(Json(response).into_response())
}

async fn individual_post(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<i64>,
) -> Result<Response, ApiError> {
	let session = authenticate(&state, &headers).await?;
	let item = state.service.individual_post(&session, id).await?;

	Ok(Json(item).into_response())
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Session, ApiError> {
	let token = headers
		.get(header::AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.strip_prefix("Bearer "))
		.ok_or_else(|| {
			json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "Not authenticated.", None)
		})?;

	Ok(state.service.authenticate(token).await?)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Unauthenticated => json_error(
				StatusCode::UNAUTHORIZED,
				"unauthenticated",
				"Not authenticated.",
				None,
			),
			ServiceError::NotFound(what) =>
				json_error(StatusCode::NOT_FOUND, "not_found", format!("No such {what}."), None),
			ServiceError::Storage(err) => {
				tracing::error!(%err, "Feed request failed on an upstream store.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"upstream_unavailable",
					"A required upstream store is unavailable.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code,
			message: self.message,
			fields: self.fields,
		};

		(self.status, Json(body)).into_response()
	}
}

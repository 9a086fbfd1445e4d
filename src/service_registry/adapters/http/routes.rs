//! Axum routes for target registration, deregistration, ping and health.

use super::ApiResponse;
use crate::service_registry::{
    domain::{HealthReport, ServiceCategory, ServiceTarget, TargetId},
    ports::{ServiceRegistry, ServiceRegistryError},
    services::{TargetRegistryService, TargetRegistryServiceError},
};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Path prefix of the registration API.
pub const TARGETS_PATH: &str = "/api/v1/management/targets";

type SharedService<R, C> = Arc<TargetRegistryService<R, C>>;

/// Error rendered as an [`ApiResponse`] with a matching status code.
#[derive(Debug)]
struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<TargetRegistryServiceError> for ApiFailure {
    fn from(err: TargetRegistryServiceError) -> Self {
        let status = match &err {
            TargetRegistryServiceError::Registry(
                ServiceRegistryError::NotFound { .. } | ServiceRegistryError::UnknownTarget(_),
            ) => StatusCode::NOT_FOUND,
            TargetRegistryServiceError::Registry(ServiceRegistryError::Persistence(_)) => {
                warn!(error = %err, "registry failure while serving registration API");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::failure(self.message))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiFailure>;

fn respond<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

fn parse_id(raw: &str) -> Result<TargetId, ApiFailure> {
    TargetId::new(raw).map_err(|err| ApiFailure::bad_request(err.to_string()))
}

/// Builds the registration API router, nested under [`TARGETS_PATH`].
pub fn registration_routes<R, C>(service: SharedService<R, C>) -> Router
where
    R: ServiceRegistry + 'static,
    C: Clock + Send + Sync + 'static,
{
    // The router requires one parameter name per segment position, so the
    // id and category segments share `:key`.
    let targets = Router::new()
        .route("/register", post(register::<R, C>))
        .route("/deregister", post(deregister::<R, C>))
        .route("/:key/ping", post(ping::<R, C>))
        .route("/:key/state", put(update_state::<R, C>))
        .route("/:key", get(list::<R, C>))
        .with_state(service);
    Router::new().nest(TARGETS_PATH, targets)
}

async fn register<R, C>(
    State(service): State<SharedService<R, C>>,
    body: Result<Json<ServiceTarget>, JsonRejection>,
) -> ApiResult<ServiceTarget>
where
    R: ServiceRegistry + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(target) = body?;
    respond(service.register(target).await?)
}

async fn deregister<R, C>(
    State(service): State<SharedService<R, C>>,
    body: Result<Json<ServiceTarget>, JsonRejection>,
) -> ApiResult<bool>
where
    R: ServiceRegistry + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(target) = body?;
    respond(service.deregister(&target).await?)
}

async fn ping<R, C>(
    State(service): State<SharedService<R, C>>,
    Path(raw_id): Path<String>,
) -> ApiResult<bool>
where
    R: ServiceRegistry + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    service.ping(&id).await?;
    respond(true)
}

async fn update_state<R, C>(
    State(service): State<SharedService<R, C>>,
    Path(raw_id): Path<String>,
    body: Result<Json<HealthReport>, JsonRejection>,
) -> ApiResult<bool>
where
    R: ServiceRegistry + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    let Json(report) = body?;
    service.update_state(&id, report).await?;
    respond(true)
}

async fn list<R, C>(
    State(service): State<SharedService<R, C>>,
    Path(raw_category): Path<String>,
) -> ApiResult<Vec<ServiceTarget>>
where
    R: ServiceRegistry + 'static,
    C: Clock + Send + Sync + 'static,
{
    let category = ServiceCategory::try_from(raw_category.as_str())
        .map_err(|err| ApiFailure::bad_request(err.to_string()))?;
    respond(service.list(category).await?)
}

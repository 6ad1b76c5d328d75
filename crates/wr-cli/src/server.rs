//! HTTP API over the reward store.
//!
//! - `GET   /users/{id}/rewards?at=<timestamp>`   generate or fetch a week
//! - `PATCH /users/{id}/rewards/{date}/redeem`    redeem one day
//!
//! Success bodies are `{"data": ...}`; failures are `{"error": {"message": ...}}`
//! with 400 / 409 / 500 chosen from the error kind.

use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use wr_core::{ErrorKind, RewardError, WireSlot};
use wr_store::RewardStore;

const MSG_DATE_REQUIRED: &str = "Date is required.";

#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Serialize)]
struct ErrorMessage {
    message: String,
}

/// A [`RewardError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(RewardError);

impl From<RewardError> for ApiError {
    fn from(e: RewardError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidState => StatusCode::CONFLICT,
            ErrorKind::InternalError => {
                tracing::error!("internal error: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: ErrorMessage {
                message: self.0.message().to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct WeekQuery {
    at: Option<String>,
}

pub fn router(store: Arc<RewardStore>) -> Router {
    Router::new()
        .route("/users/{id}/rewards", get(get_rewards))
        .route("/users/{id}/rewards/{date}/redeem", patch(redeem_reward))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve(
    listener: TcpListener,
    store: Arc<RewardStore>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn get_rewards(
    State(store): State<Arc<RewardStore>>,
    Path(user_id): Path<String>,
    query: Result<Query<WeekQuery>, QueryRejection>,
) -> Result<Json<Data<Vec<WireSlot>>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::warn!("rejected query for user {user_id}: {rejection}");
        RewardError::invalid_argument(rejection.body_text())
    })?;
    let at = query
        .at
        .filter(|at| !at.is_empty())
        .ok_or_else(|| RewardError::invalid_argument(MSG_DATE_REQUIRED))?;

    tracing::info!("generating rewards for user {user_id} at {at}");
    let week = store.generate_week(&user_id, &at)?;

    Ok(Json(Data {
        data: week.snapshot().iter().map(WireSlot::from).collect(),
    }))
}

async fn redeem_reward(
    State(store): State<Arc<RewardStore>>,
    Path((user_id, date)): Path<(String, String)>,
) -> Result<Json<Data<WireSlot>>, ApiError> {
    tracing::info!("redeeming reward for user {user_id} at {date}");
    let slot = store.redeem(&user_id, &date)?;
    Ok(Json(Data {
        data: WireSlot::from(slot),
    }))
}

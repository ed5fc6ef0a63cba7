use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;

use crate::azdo::PushWebhook;
use crate::buildkite::BuildkiteClient;
use crate::relay::{handle_push, PushOutcome, RelayError};

/// Shared server state for all axum handlers.
pub struct ServerState {
    buildkite: BuildkiteClient,
}

impl ServerState {
    pub fn new(buildkite: BuildkiteClient) -> Self {
        Self { buildkite }
    }
}

pub type ServerStateRef = Arc<ServerState>;

pub fn create_app(state: ServerState) -> Router {
    Router::new()
        .route("/", post(push_webhook_handler))
        .route("/health", get(health_handler))
        .layer(ConcurrencyLimitLayer::new(100))
        .with_state(Arc::new(state))
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "")
}

/// Axum handler that receives an Azure DevOps push webhook and relays it to
/// Buildkite.
async fn push_webhook_handler(
    State(state): State<ServerStateRef>,
    PushWebhook { event, raw_body }: PushWebhook,
) -> Response {
    match handle_push(&state.buildkite, &event, &raw_body).await {
        Ok(PushOutcome::BuildTriggered(_)) => (StatusCode::OK, "").into_response(),
        Ok(PushOutcome::Ignored(reason)) => {
            tracing::debug!("Push event ignored: {reason:?}");
            (StatusCode::OK, "").into_response()
        }
        Err(error) => {
            let status = match error {
                RelayError::MissingRefUpdates | RelayError::MalformedRef(_) => {
                    StatusCode::BAD_REQUEST
                }
                RelayError::MissingJobs | RelayError::Buildkite(_) => StatusCode::BAD_GATEWAY,
            };
            tracing::error!("Cannot handle push event: {error:?}");
            (status, error.to_string()).into_response()
        }
    }
}

use axum::async_trait;
use axum::body::{to_bytes, Bytes};
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;

use crate::azdo::{PushEventPayload, PUSH_EVENT_TYPE};

/// Maximum size of a webhook body that we're willing to parse.
const WEBHOOK_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// axum extractor for Azure DevOps push webhook events.
///
/// The raw body is kept around so that pushes without commit data can be
/// logged verbatim when the author fallback kicks in.
#[derive(Debug)]
pub struct PushWebhook {
    pub event: PushEventPayload,
    pub raw_body: Bytes,
}

/// Extracts a push event from a HTTP request.
#[async_trait]
impl<S> FromRequest<S> for PushWebhook
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request(request: Request, _state: &S) -> Result<Self, Self::Rejection> {
        // Eagerly load body
        let raw_body = to_bytes(request.into_body(), WEBHOOK_BODY_LIMIT)
            .await
            .map_err(|error| {
                tracing::error!("Parsing webhook body failed: {error:?}");
                (
                    StatusCode::BAD_REQUEST,
                    "Cannot read request body".to_string(),
                )
            })?;

        let event: PushEventPayload = serde_json::from_slice(&raw_body).map_err(|error| {
            tracing::error!("Cannot parse webhook event: {error:?}");
            (
                StatusCode::BAD_REQUEST,
                "Cannot parse webhook event".to_string(),
            )
        })?;

        if event.event_type != PUSH_EVENT_TYPE {
            tracing::warn!("Unsupported event type: {}", event.event_type);
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Event not supported: {}", event.event_type),
            ));
        }

        Ok(PushWebhook { event, raw_body })
    }
}

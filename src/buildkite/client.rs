use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::buildkite::{TriggerBuildRequest, TriggerBuildResponse};

/// The upstream service gives us no deadline, so bound the outbound call
/// ourselves instead of stalling a webhook request forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum BuildkiteError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected response ({status}): {text}")]
    Unexpected { status: StatusCode, text: String },
    #[error("Cannot parse build response: {error:?} (body: {text})")]
    InvalidResponse {
        error: serde_json::Error,
        text: String,
    },
}

/// Client for triggering builds on a single Buildkite pipeline.
pub struct BuildkiteClient {
    client: reqwest::Client,
    build_url: Url,
    auth_token: SecretString,
}

impl BuildkiteClient {
    pub fn new(build_url: Url, auth_token: SecretString) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Cannot create Buildkite HTTP client")?;
        Ok(Self {
            client,
            build_url,
            auth_token,
        })
    }

    /// Creates a new build on the configured pipeline.
    pub async fn trigger_build(
        &self,
        request: &TriggerBuildRequest,
    ) -> Result<TriggerBuildResponse, BuildkiteError> {
        let response = self
            .client
            .post(self.build_url.clone())
            .bearer_auth(self.auth_token.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        tracing::trace!(
            "Response from creating a build for `{}` on `{}`: {status} ({text})",
            request.commit,
            request.branch,
        );

        if !status.is_success() {
            return Err(BuildkiteError::Unexpected { status, text });
        }

        let build: TriggerBuildResponse = serde_json::from_str(&text)
            .map_err(|error| BuildkiteError::InvalidResponse { error, text })?;
        Ok(build)
    }
}

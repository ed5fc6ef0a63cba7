//! Contains the client and wire types for the Buildkite REST API.
use crate::azdo::CommitSha;

mod client;

pub use client::{BuildkiteClient, BuildkiteError};

/// Body of the Buildkite "create a build" call.
///
/// Documentation: https://buildkite.com/docs/apis/rest-api/builds#create-a-build
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TriggerBuildRequest {
    pub commit: CommitSha,
    pub branch: String,
    pub message: String,
    pub author: BuildAuthor,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BuildAuthor {
    pub name: String,
    pub email: String,
}

/// Subset of the Buildkite create-build response that the relay reads.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct TriggerBuildResponse {
    pub id: String,
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub state: String,
    pub web_url: String,
    #[serde(default)]
    pub jobs: Vec<BuildJob>,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct BuildJob {
    pub id: String,
    pub web_url: String,
}

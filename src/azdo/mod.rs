//! Contains definitions of the Azure DevOps service hook payloads received
//! by the relay, along with common git types.
use std::fmt::{Display, Formatter};

mod webhook;

pub use webhook::PushWebhook;

/// Event type tag of push notifications. All other event types are rejected.
pub const PUSH_EVENT_TYPE: &str = "git.push";

/// Unique identifier of a git object.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CommitSha(pub String);

impl CommitSha {
    /// Sentinel object id that Azure DevOps reports for a deleted ref.
    const ZERO: &'static str = "0000000000000000000000000000000000000000";

    pub fn is_zero(&self) -> bool {
        self.0 == Self::ZERO
    }
}

impl From<String> for CommitSha {
    fn from(value: String) -> Self {
        Self(value)
    }
}
impl AsRef<str> for CommitSha {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
impl Display for CommitSha {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Payload of a `git.push` service hook notification.
///
/// Only the fields the relay reads are modeled; everything else in the
/// notification is ignored during deserialization.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushEventPayload {
    pub event_type: String,
    #[serde(default)]
    pub message: EventMessage,
    #[serde(default)]
    pub detailed_message: EventMessage,
    pub resource: PushResource,
}

/// Human-readable description of the event in several renderings.
#[derive(Debug, Default, serde::Deserialize)]
pub struct EventMessage {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub markdown: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResource {
    /// Commits contained in the push. Can be empty, e.g. when an existing
    /// branch pointer is pushed without any new commits.
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub ref_updates: Vec<RefUpdate>,
    #[serde(default)]
    pub repository: Repository,
    #[serde(default)]
    pub pushed_by: PushedBy,
    #[serde(default)]
    pub push_id: u64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub commit_id: CommitSha,
    pub author: CommitIdentity,
    #[serde(default)]
    pub committer: CommitIdentity,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub date: String,
}

/// A change of a named ref from an old object id to a new one.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefUpdate {
    pub name: String,
    pub old_object_id: CommitSha,
    pub new_object_id: CommitSha,
}

/// Identity that performed the push, reported separately from the commit
/// authors.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushedBy {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub unique_name: String,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub remote_url: String,
}

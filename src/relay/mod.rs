//! Translates Azure DevOps push events into Buildkite build triggers.
//!
//! The whole pipeline is a linear filter-then-dispatch sequence: classify the
//! pushed ref, drop anything that should not start a build, extract the build
//! author and message, and fire a single create-build call downstream.
use thiserror::Error;

use crate::azdo::PushEventPayload;
use crate::buildkite::{
    BuildAuthor, BuildkiteClient, BuildkiteError, TriggerBuildRequest, TriggerBuildResponse,
};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("No ref updates present in push event")]
    MissingRefUpdates,
    #[error("Unexpected ref name format: {0}")]
    MalformedRef(String),
    #[error("No jobs in build response")]
    MissingJobs,
    #[error("Buildkite request failed: {0}")]
    Buildkite(#[from] BuildkiteError),
}

/// Result of handling a push event.
#[derive(Debug)]
pub enum PushOutcome {
    /// A build was created downstream.
    BuildTriggered(TriggerBuildResponse),
    /// The push does not concern a live branch and was dropped without
    /// contacting Buildkite.
    Ignored(IgnoreReason),
}

#[derive(Debug)]
pub enum IgnoreReason {
    TagPush,
    NonBranchRef,
    BranchDeletion,
}

enum RefTarget {
    Branch(String),
    Tag(String),
    Other(String),
}

/// Ref names have the form `refs/heads/<branch>` for branch pushes and
/// `refs/tags/<tag>` for tag pushes; the segment after `refs` decides how the
/// push is treated.
fn classify_ref(name: &str) -> Result<RefTarget, RelayError> {
    let segments: Vec<&str> = name.split('/').collect();
    let (kind, short_name) = match segments.as_slice() {
        [_, kind, short_name, ..] => (*kind, *short_name),
        _ => return Err(RelayError::MalformedRef(name.to_string())),
    };
    Ok(match kind {
        "heads" => RefTarget::Branch(short_name.to_string()),
        "tags" => RefTarget::Tag(short_name.to_string()),
        _ => RefTarget::Other(kind.to_string()),
    })
}

/// Handles a single push event: applies the ref and deletion filters, builds
/// the trigger request and dispatches it to Buildkite.
///
/// Only the first ref update of the push is considered; Azure DevOps sends
/// one ref update per push notification in practice.
pub async fn handle_push(
    buildkite: &BuildkiteClient,
    event: &PushEventPayload,
    raw_body: &[u8],
) -> Result<PushOutcome, RelayError> {
    let Some(ref_update) = event.resource.ref_updates.first() else {
        return Err(RelayError::MissingRefUpdates);
    };

    let branch = match classify_ref(&ref_update.name)? {
        RefTarget::Branch(branch) => branch,
        RefTarget::Tag(tag) => {
            tracing::info!("Tag `{tag}` pushed, ignoring");
            return Ok(PushOutcome::Ignored(IgnoreReason::TagPush));
        }
        RefTarget::Other(kind) => {
            tracing::info!("Ref of kind `{kind}` pushed, ignoring");
            return Ok(PushOutcome::Ignored(IgnoreReason::NonBranchRef));
        }
    };

    if ref_update.new_object_id.is_zero() {
        tracing::info!("Branch `{branch}` was deleted, ignoring");
        return Ok(PushOutcome::Ignored(IgnoreReason::BranchDeletion));
    }

    let (author, message) = match event.resource.commits.first() {
        Some(commit) => (
            BuildAuthor {
                name: commit.author.name.clone(),
                email: commit.author.email.clone(),
            },
            commit.comment.clone(),
        ),
        None => {
            // Happens when a branch pointer is pushed without any new
            // commits. There is no commit to take the author from, so use
            // the identity that performed the push.
            let pushed_by = &event.resource.pushed_by;
            tracing::warn!(
                "No commit data in push to `{branch}`, using pushedBy data for build author"
            );
            tracing::debug!("Raw push payload: {}", String::from_utf8_lossy(raw_body));
            (
                BuildAuthor {
                    name: pushed_by.display_name.clone(),
                    email: pushed_by.unique_name.clone(),
                },
                event.detailed_message.markdown.clone(),
            )
        }
    };

    let request = TriggerBuildRequest {
        commit: ref_update.new_object_id.clone(),
        branch,
        message,
        author,
    };

    tracing::info!(
        "Firing off a build to Buildkite: {} {} {}",
        request.author.name,
        request.branch,
        request.commit
    );

    let build = buildkite.trigger_build(&request).await?;
    let Some(job) = build.jobs.first() else {
        return Err(RelayError::MissingJobs);
    };
    tracing::info!("Build created: {}", job.web_url);

    Ok(PushOutcome::BuildTriggered(build))
}

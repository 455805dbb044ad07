//! Prompt composition
//!
//! [`compose`] gathers every fact the prompt needs through the
//! [`VcsReader`] trait (head state, default-branch and upstream
//! divergence, change records) and hands them to the pure renderer.

pub mod palette;
pub mod renderer;

use crate::areas::vcs::{HeadState, VcsReader};
use crate::artifacts::divergence::Divergence;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::prompt::renderer::{BranchLabel, PromptData, RepoBody, UpstreamTracking};
use crate::artifacts::status::RepoState;

const HEADS_PREFIX: &str = "refs/heads/";

/// Build the prompt line for a located repository
///
/// The returned string carries no leading space; the caller owns the
/// line's final shape.
pub fn compose(vcs: &impl VcsReader, bare: bool) -> anyhow::Result<String> {
    let data = match vcs.head()? {
        HeadState::Unborn { .. } => PromptData {
            label: BranchLabel::Unborn,
            default_divergence: None,
            upstream: UpstreamTracking::NotApplicable,
            body: RepoBody::Skipped,
        },
        HeadState::Detached { .. } => PromptData {
            label: BranchLabel::Detached,
            default_divergence: None,
            upstream: UpstreamTracking::NotApplicable,
            body: body(vcs, bare)?,
        },
        HeadState::OnBranch { branch, oid } => PromptData {
            default_divergence: default_divergence(vcs, &branch, &oid)?,
            upstream: upstream_tracking(vcs, &oid)?,
            label: BranchLabel::Named(branch),
            body: body(vcs, bare)?,
        },
    };

    Ok(renderer::render(&data))
}

fn body(vcs: &impl VcsReader, bare: bool) -> anyhow::Result<RepoBody> {
    if bare {
        return Ok(RepoBody::Bare);
    }
    let records = vcs.change_records()?;
    Ok(RepoBody::State(RepoState::classify(&records)))
}

/// Divergence of HEAD from the local default branch
///
/// Skipped silently when no default branch exists or HEAD is the
/// default branch itself.
fn default_divergence(
    vcs: &impl VcsReader,
    branch: &str,
    head_oid: &ObjectId,
) -> anyhow::Result<Option<Divergence>> {
    let Some(default_ref) = vcs.default_branch()? else {
        return Ok(None);
    };

    let default_short = default_ref
        .strip_prefix(HEADS_PREFIX)
        .unwrap_or(&default_ref);
    if default_short == branch {
        return Ok(None);
    }

    let Some(default_oid) = vcs.resolve_reference(&default_ref)? else {
        return Ok(None);
    };

    Ok(Some(Divergence::between(vcs, head_oid, &default_oid)?))
}

/// Tracking state against the configured upstream
///
/// An upstream that is configured but whose reference does not exist
/// locally (never fetched) reads as missing.
fn upstream_tracking(
    vcs: &impl VcsReader,
    head_oid: &ObjectId,
) -> anyhow::Result<UpstreamTracking> {
    let Some(upstream_ref) = vcs.upstream_reference()? else {
        return Ok(UpstreamTracking::Missing);
    };

    match vcs.resolve_reference(&upstream_ref)? {
        Some(upstream_oid) => Ok(UpstreamTracking::Configured(Divergence::between(
            vcs,
            head_oid,
            &upstream_oid,
        )?)),
        None => Ok(UpstreamTracking::Missing),
    }
}

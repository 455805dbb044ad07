//! Prompt line rendering
//!
//! A pure transform from the gathered repository facts to the final
//! markup string. Segment order inside the frame is fixed: divergence
//! prefix, branch label, upstream, conflicts, staged, unstaged,
//! untracked. A segment with nothing to say is omitted entirely, never
//! rendered empty.

use crate::artifacts::divergence::Divergence;
use crate::artifacts::prompt::palette::{Color, paint};
use crate::artifacts::status::{ChangeStatus, ConflictKind, RepoState};

/// What to print where a branch name would go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchLabel {
    Named(String),
    /// HEAD names a branch with no commits yet
    Unborn,
    /// HEAD points at a commit directly
    Detached,
}

impl BranchLabel {
    fn text(&self) -> &str {
        match self {
            BranchLabel::Named(name) => name,
            BranchLabel::Unborn => "unborn",
            BranchLabel::Detached => "detached",
        }
    }
}

/// Relationship to the configured upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamTracking {
    /// Not a branch head, so no upstream applies
    NotApplicable,
    /// No upstream configured, or its reference does not exist yet
    Missing,
    Configured(Divergence),
}

/// The working-tree portion of the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoBody {
    /// Bare repository, nothing to scan
    Bare,
    /// Status intentionally not computed (unborn branch)
    Skipped,
    State(RepoState),
}

/// Everything the renderer needs, gathered by [`super::compose`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptData {
    pub label: BranchLabel,
    /// Divergence of HEAD from the default branch, when both exist
    pub default_divergence: Option<Divergence>,
    pub upstream: UpstreamTracking,
    pub body: RepoBody,
}

pub fn render(data: &PromptData) -> String {
    let mut segments = Vec::new();

    // a branch that merely contains the default branch's history carries
    // no marker; only being behind is worth flagging
    if let Some(divergence) = &data.default_divergence
        && divergence.behind > 0
    {
        segments.push(divergence_marker(divergence));
    }

    segments.push(data.label.text().to_string());

    match &data.body {
        RepoBody::Bare => segments.push(paint(Color::Magenta, "#bare")),
        RepoBody::Skipped => {}
        RepoBody::State(state) => {
            if let Some(segment) = upstream_segment(&data.upstream) {
                segments.push(segment);
            }
            if let Some(segment) = conflict_segment(state) {
                segments.push(segment);
            }
            if let Some(segment) = staged_segment(state) {
                segments.push(segment);
            }
            if let Some(segment) = unstaged_segment(state) {
                segments.push(segment);
            }
            if state.untracked > 0 {
                let untracked: &str = (&ChangeStatus::Untracked).into();
                segments.push(format!(
                    "{}{}",
                    state.untracked,
                    paint(Color::Blue, untracked)
                ));
            }
        }
    }

    format!(
        "{}{}{}",
        paint(Color::Black, "git:("),
        segments.join(" "),
        paint(Color::Black, ")")
    )
}

fn divergence_marker(divergence: &Divergence) -> String {
    if divergence.ahead == 0 {
        format!("{}{}", divergence.behind, paint(Color::Magenta, "↓"))
    } else {
        format!(
            "{}{}/{}",
            paint(Color::Magenta, "⇅"),
            divergence.ahead,
            divergence.behind
        )
    }
}

fn upstream_segment(upstream: &UpstreamTracking) -> Option<String> {
    match upstream {
        UpstreamTracking::NotApplicable => None,
        UpstreamTracking::Missing => Some(paint(Color::Magenta, "⚡")),
        UpstreamTracking::Configured(divergence) => match (divergence.ahead, divergence.behind) {
            (0, 0) => None,
            (ahead, 0) => Some(format!("{}{}", paint(Color::Magenta, "↑"), ahead)),
            (0, behind) => Some(format!("{}{}", behind, paint(Color::Magenta, "↓"))),
            (ahead, behind) => Some(format!(
                "{}{}/{}",
                paint(Color::Magenta, "⇅"),
                ahead,
                behind
            )),
        },
    }
}

fn conflict_segment(state: &RepoState) -> Option<String> {
    let (kind, count) = state.conflict()?;
    let glyph = match kind {
        ConflictKind::Both => "U",
        ConflictKind::Ours => "U<",
        ConflictKind::Theirs => "U>",
    };
    Some(format!("{}{}", count, paint(Color::Yellow, glyph)))
}

fn staged_segment(state: &RepoState) -> Option<String> {
    counted_letters(
        Color::Green,
        &[
            (state.staged_added, ChangeStatus::Added),
            (state.staged_modified, ChangeStatus::Modified),
            (state.staged_deleted, ChangeStatus::Deleted),
            (state.staged_renamed, ChangeStatus::Renamed),
        ],
    )
}

fn unstaged_segment(state: &RepoState) -> Option<String> {
    counted_letters(
        Color::Red,
        &[
            (state.unstaged_modified, ChangeStatus::Modified),
            (state.unstaged_deleted, ChangeStatus::Deleted),
            (state.unstaged_renamed, ChangeStatus::Renamed),
        ],
    )
}

fn counted_letters(color: Color, counts: &[(usize, ChangeStatus)]) -> Option<String> {
    let segment = counts
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, status)| {
            let letter: &str = status.into();
            format!("{}{}", count, paint(color, letter))
        })
        .collect::<String>();

    (!segment.is_empty()).then_some(segment)
}

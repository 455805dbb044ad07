//! Git commit object, reduced to what the prompt needs
//!
//! The prompt only ever walks ancestry in chronological order, so commits
//! are parsed into a slim projection: object ID, parent IDs and committer
//! timestamp. Tree, author and message lines are skipped.
//!
//! ## Format
//!
//! On disk (after the `commit <size>\0` header):
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;

/// Slim representation of a commit
///
/// Contains only what ancestry traversal needs: identity, parents and the
/// committer timestamp used for chronological ordering.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    /// The commit's object ID
    pub oid: ObjectId,
    /// The commit's parent object IDs (empty for a root commit)
    pub parents: Vec<ObjectId>,
    /// Committer timestamp, used for walk ordering
    pub timestamp: chrono::DateTime<chrono::FixedOffset>,
    /// Tree object ID for the snapshot this commit records
    pub tree_oid: ObjectId,
}

impl SlimCommit {
    /// Parse a commit body (header already stripped)
    pub fn parse(oid: ObjectId, body: &str) -> anyhow::Result<Self> {
        let mut lines = body.lines();

        let tree_line = lines
            .next()
            .context("Invalid commit object: missing tree line")?;
        let tree_oid = tree_line
            .strip_prefix("tree ")
            .context("Invalid commit object: invalid tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        // Parse all parent lines (there can be 0, 1, or multiple parents)
        let mut parents = Vec::new();
        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing author line")?;

        while let Some(parent_oid) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent_oid.to_string())?);

            next_line = lines
                .next()
                .context("Invalid commit object: missing author line")?;
        }

        // next_line is the author line; the committer line follows and
        // carries the timestamp we order walks by
        anyhow::ensure!(
            next_line.starts_with("author "),
            "Invalid commit object: invalid author line"
        );
        let committer_line = lines
            .next()
            .context("Invalid commit object: missing committer line")?;
        let committer = committer_line
            .strip_prefix("committer ")
            .context("Invalid commit object: invalid committer line")?;
        let timestamp = parse_timestamp(committer)?;

        Ok(SlimCommit {
            oid,
            parents,
            timestamp,
            tree_oid,
        })
    }
}

/// Extract the timestamp from an author/committer line body
/// (`name <email> <unix-seconds> <zone>`)
fn parse_timestamp(value: &str) -> anyhow::Result<chrono::DateTime<chrono::FixedOffset>> {
    let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
    if parts.len() < 3 {
        return Err(anyhow::anyhow!("Invalid committer format"));
    }

    let timezone = parts[0];
    let timestamp = parts[1]
        .parse::<i64>()
        .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;

    let offset = parse_timezone(timezone)?;
    let datetime = chrono::DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?;

    Ok(datetime.with_timezone(&offset))
}

/// Parse a `+HHMM`/`-HHMM` timezone field
fn parse_timezone(value: &str) -> anyhow::Result<chrono::FixedOffset> {
    if value.len() != 5 {
        return Err(anyhow::anyhow!("Invalid timezone: {}", value));
    }

    let sign = match &value[..1] {
        "+" => 1,
        "-" => -1,
        _ => return Err(anyhow::anyhow!("Invalid timezone sign: {}", value)),
    };
    let hours = value[1..3]
        .parse::<i32>()
        .map_err(|_| anyhow::anyhow!("Invalid timezone hours: {}", value))?;
    let minutes = value[3..5]
        .parse::<i32>()
        .map_err(|_| anyhow::anyhow!("Invalid timezone minutes: {}", value))?;

    chrono::FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| anyhow::anyhow!("Timezone out of range: {}", value))
}

//! Minimal `.git/config` reader
//!
//! The prompt only needs one thing from the config file: the upstream
//! tracking reference of the current branch, derived from the `remote`
//! and `merge` keys of the matching `[branch "<name>"]` section. Absence
//! of any piece means "no upstream configured", a normal state.

use anyhow::Context;
use derive_new::new;
use std::path::Path;

const SECTION_REGEX: &str = r#"^\s*\[branch\s+"(.+)"\]\s*$"#;
const ANY_SECTION_REGEX: &str = r"^\s*\[.+\]\s*$";
const KEY_REGEX: &str = r"^\s*(remote|merge)\s*=\s*(.+?)\s*$";

const HEADS_PREFIX: &str = "refs/heads/";

#[derive(Debug, new)]
pub struct Config {
    /// Path to the config file (typically `.git/config`)
    path: Box<Path>,
}

impl Config {
    /// The tracking reference name configured for `branch`, if any
    ///
    /// `remote = origin` + `merge = refs/heads/topic` yields
    /// `refs/remotes/origin/topic`; `remote = .` tracks the local
    /// `merge` ref directly.
    pub fn upstream_of(&self, branch: &str) -> anyhow::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;

        let section_regex = regex::Regex::new(SECTION_REGEX)?;
        let any_section_regex = regex::Regex::new(ANY_SECTION_REGEX)?;
        let key_regex = regex::Regex::new(KEY_REGEX)?;

        let mut in_branch_section = false;
        let mut remote: Option<String> = None;
        let mut merge: Option<String> = None;

        for line in content.lines() {
            if let Some(section) = section_regex.captures(line) {
                in_branch_section = &section[1] == branch;
                continue;
            }
            if any_section_regex.is_match(line) {
                in_branch_section = false;
                continue;
            }

            if in_branch_section
                && let Some(key) = key_regex.captures(line)
            {
                match &key[1] {
                    "remote" => remote = Some(key[2].to_string()),
                    "merge" => merge = Some(key[2].to_string()),
                    _ => {}
                }
            }
        }

        match (remote, merge) {
            (Some(remote), Some(merge)) if remote == "." => Ok(Some(merge)),
            (Some(remote), Some(merge)) => {
                let short = merge.strip_prefix(HEADS_PREFIX).unwrap_or(&merge);
                Ok(Some(format!("refs/remotes/{}/{}", remote, short)))
            }
            _ => Ok(None),
        }
    }
}

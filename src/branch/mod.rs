//! Compiler branches.
//!
//! A branch is an alternative compile service (e.g. a feature branch of the
//! compiler) that the user can select instead of the default one. The raw
//! list comes from an external branch listing and is normalized exactly once:
//!
//! ```text
//! RawBranch { name: "features/patterns" }  ->  Branch { id: "features~patterns" }
//! ```

mod registry;

pub use registry::{BranchRegistry, BranchSource};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::date::DateTimeUtc;

/// Characters escaped inside a branch name segment.
///
/// Alphanumerics and `-_.` stay readable; `~` and `%` are escaped so the
/// segment separator and escape prefix can never come from the name itself.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Derive the URL-safe id of a branch name.
///
/// Segments are percent-encoded and joined with `~`, which makes the mapping
/// injective: `a/b` -> `a~b`, `a~b` -> `a%7Eb`, `a-b` -> `a-b`.
pub fn branch_id(name: &str) -> String {
    name.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("~")
}

// ============================================================================
// Raw input
// ============================================================================

/// Branch as delivered by the branch listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBranch {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub commits: Vec<RawCommit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommit {
    #[serde(default, deserialize_with = "string_or_number")]
    pub date: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

/// Dates arrive either as ISO strings or as bare epoch numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

// ============================================================================
// Normalized branch
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// `None` when the listing carried an unparsable date.
    pub date: Option<DateTimeUtc>,
    pub message: Option<String>,
    pub author: Option<String>,
    pub hash: Option<String>,
}

impl From<RawCommit> for Commit {
    fn from(raw: RawCommit) -> Self {
        let date = DateTimeUtc::parse(&raw.date);
        if date.is_none() {
            crate::debug!("branch"; "unparsable commit date `{}`", raw.date);
        }
        Self {
            date,
            message: raw.message,
            author: raw.author,
            hash: raw.hash,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub name: String,
    /// Derived from `name` by [`branch_id`].
    pub id: String,
    /// Base URL of this branch's compile service.
    pub url: String,
    /// Newest first.
    pub commits: Vec<Commit>,
}

impl Branch {
    pub fn from_raw(raw: RawBranch) -> Self {
        Self {
            id: branch_id(&raw.name),
            name: raw.name,
            url: raw.url,
            commits: raw.commits.into_iter().map(Commit::from).collect(),
        }
    }

    /// The commit the branch currently points at.
    pub fn current_commit(&self) -> Option<&Commit> {
        self.commits.first()
    }

    /// Label for branch pickers: `name (d MMM)` of the current commit.
    pub fn display_name(&self) -> String {
        match self.current_commit().and_then(|c| c.date) {
            Some(date) => format!("{} ({})", self.name, date.to_day_month()),
            None => self.name.clone(),
        }
    }
}

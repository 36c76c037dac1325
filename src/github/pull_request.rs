//! Pull request records and liferaft file parsing

use serde::{Deserialize, Serialize};

/// A pull request on the target repository, trimmed to what Liferaft shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub title: String,
    /// Login of the author
    pub user: String,
    /// HTML URL of the pull request
    pub url: String,
    pub from_branch: String,
    pub to_branch: String,
}

/// Title and body of a pull request, taken from a liferaft file.
///
/// The title is the first non-empty line; the body is everything after it,
/// trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestText {
    pub title: String,
    pub body: String,
}

impl PullRequestText {
    pub fn parse(contents: &str) -> Self {
        let mut lines = contents.split('\n');

        let title = lines
            .by_ref()
            .map(|line| line.trim_end_matches('\r'))
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string();

        let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

        Self { title, body }
    }

    /// Title as sent to GitHub
    pub fn prefixed_title(&self) -> String {
        format!("[Liferaft] {}", self.title)
    }
}

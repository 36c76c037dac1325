//! GitHub gateway - the GitHub operations Liferaft depends on
//!
//! The [`Github`] trait is what the rest of the crate consumes.
//! [`GithubClient`] talks to the REST API over HTTP and [`FakeGithub`]
//! answers from memory for tests.

mod client;
mod fake;
mod pagination;
mod pull_request;

pub use client::GithubClient;
pub use fake::{FakeGithub, GithubCall};
pub use pull_request::{PullRequest, PullRequestText};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::Result;

/// OAuth scope requested for a Liferaft authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    PublicRepo,
    User,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::PublicRepo => "public_repo",
            Scope::User => "user",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The upstream repository that pull requests are sent to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRepository {
    pub owner: String,
    pub name: String,
}

impl TargetRepository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl From<&crate::config::TargetConfig> for TargetRepository {
    fn from(target: &crate::config::TargetConfig) -> Self {
        Self::new(target.owner.clone(), target.repository.clone())
    }
}

impl std::fmt::Display for TargetRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// GitHub operations used by Liferaft
#[async_trait]
pub trait Github: Send + Sync {
    /// Use basic credentials for the following calls. No request is made.
    fn authenticate_with_password(&self, username: &str, password: &str) -> Result<()>;

    /// Token of the first authorization whose app name starts with `name`
    async fn find_authorization(&self, name: &str, code: Option<&str>) -> Result<Option<String>>;

    /// Create an authorization labelled `name`, returning its token
    async fn create_authorization(
        &self,
        name: &str,
        scopes: &[Scope],
        code: Option<&str>,
    ) -> Result<String>;

    /// Login of the authenticated user
    async fn username(&self) -> Result<String>;

    async fn fork(&self, owner: &str, repository: &str) -> Result<()>;

    async fn rename(&self, owner: &str, repository: &str, name: &str) -> Result<()>;

    /// Open a pull request against the target repository from `owner:branch`.
    ///
    /// Title and body come from the liferaft file contents. Returns the
    /// pull request's HTML URL.
    async fn send_pull_request(
        &self,
        owner: &str,
        branch: &str,
        to_branch: &str,
        liferaft_file: &str,
    ) -> Result<String>;

    async fn delete_repository(&self, owner: &str, repository: &str) -> Result<()>;

    /// Number of a random open Liferaft pull request, if any
    async fn random_pull_request_id(&self) -> Result<Option<u64>>;

    async fn pull_request(&self, id: u64) -> Result<PullRequest>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_names() {
        assert_eq!(Scope::PublicRepo.as_str(), "public_repo");
        assert_eq!(Scope::User.to_string(), "user");
        assert_eq!(
            serde_json::to_string(&[Scope::PublicRepo, Scope::User]).unwrap(),
            r#"["public_repo","user"]"#
        );
    }

    #[test]
    fn test_target_from_config() {
        let target = TargetRepository::from(&crate::config::TargetConfig::default());
        assert_eq!(target.to_string(), "laravel/laravel");
    }
}

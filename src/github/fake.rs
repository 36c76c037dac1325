//! In-memory GitHub for testing

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use crate::Result;
use crate::error::Error;
use super::pull_request::PullRequest;
use super::{Github, Scope};

/// A call recorded by [`FakeGithub`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GithubCall {
    Authenticate { username: String },
    FindAuthorization { name: String, code: Option<String> },
    CreateAuthorization { name: String, scopes: Vec<Scope>, code: Option<String> },
    Username,
    Fork { owner: String, repository: String },
    Rename { owner: String, repository: String, name: String },
    SendPullRequest { owner: String, branch: String, to_branch: String },
    DeleteRepository { owner: String, repository: String },
    RandomPullRequestId,
    PullRequest { id: u64 },
}

/// Fake GitHub that records calls and answers from canned state
pub struct FakeGithub {
    calls: Mutex<Vec<GithubCall>>,
    existing_token: Option<String>,
    created_tokens: Mutex<VecDeque<String>>,
    two_factor_code: Option<String>,
    password: Option<String>,
    login: String,
    pull_requests: Vec<PullRequest>,
}

impl Default for FakeGithub {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGithub {
    /// No existing authorization, no two-factor, any password accepted
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            existing_token: None,
            created_tokens: Mutex::new(VecDeque::new()),
            two_factor_code: None,
            password: None,
            login: "octocat".to_string(),
            pull_requests: Vec::new(),
        }
    }

    /// Pretend a Liferaft authorization already exists
    pub fn with_existing_token(mut self, token: &str) -> Self {
        self.existing_token = Some(token.to_string());
        self
    }

    /// Tokens handed out by successive create calls
    pub fn with_created_tokens(self, tokens: &[&str]) -> Self {
        *self.created_tokens.lock().unwrap() = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Require this one-time code on authorization calls
    pub fn with_two_factor_code(mut self, code: &str) -> Self {
        self.two_factor_code = Some(code.to_string());
        self
    }

    /// Only accept this password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn with_pull_request(mut self, pull: PullRequest) -> Self {
        self.pull_requests.push(pull);
        self
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<GithubCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, GithubCall::CreateAuthorization { .. }))
            .count()
    }

    fn record(&self, call: GithubCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_code(&self, code: Option<&str>) -> Result<()> {
        match &self.two_factor_code {
            Some(expected) if code != Some(expected.as_str()) => Err(Error::TwoFactorRequired),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Github for FakeGithub {
    fn authenticate_with_password(&self, username: &str, password: &str) -> Result<()> {
        self.record(GithubCall::Authenticate {
            username: username.to_string(),
        });
        match &self.password {
            Some(expected) if expected != password => Err(Error::Auth("Bad credentials".to_string())),
            _ => Ok(()),
        }
    }

    async fn find_authorization(&self, name: &str, code: Option<&str>) -> Result<Option<String>> {
        self.record(GithubCall::FindAuthorization {
            name: name.to_string(),
            code: code.map(str::to_string),
        });
        self.check_code(code)?;
        Ok(self.existing_token.clone())
    }

    async fn create_authorization(
        &self,
        name: &str,
        scopes: &[Scope],
        code: Option<&str>,
    ) -> Result<String> {
        self.record(GithubCall::CreateAuthorization {
            name: name.to_string(),
            scopes: scopes.to_vec(),
            code: code.map(str::to_string),
        });
        self.check_code(code)?;
        self.created_tokens
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Other("No more fake tokens".to_string()))
    }

    async fn username(&self) -> Result<String> {
        self.record(GithubCall::Username);
        Ok(self.login.clone())
    }

    async fn fork(&self, owner: &str, repository: &str) -> Result<()> {
        self.record(GithubCall::Fork {
            owner: owner.to_string(),
            repository: repository.to_string(),
        });
        Ok(())
    }

    async fn rename(&self, owner: &str, repository: &str, name: &str) -> Result<()> {
        self.record(GithubCall::Rename {
            owner: owner.to_string(),
            repository: repository.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    async fn send_pull_request(
        &self,
        owner: &str,
        branch: &str,
        to_branch: &str,
        _liferaft_file: &str,
    ) -> Result<String> {
        self.record(GithubCall::SendPullRequest {
            owner: owner.to_string(),
            branch: branch.to_string(),
            to_branch: to_branch.to_string(),
        });
        Ok(format!("https://github.com/fake/pull/{}", self.pull_requests.len() + 1))
    }

    async fn delete_repository(&self, owner: &str, repository: &str) -> Result<()> {
        self.record(GithubCall::DeleteRepository {
            owner: owner.to_string(),
            repository: repository.to_string(),
        });
        Ok(())
    }

    async fn random_pull_request_id(&self) -> Result<Option<u64>> {
        self.record(GithubCall::RandomPullRequestId);
        Ok(self.pull_requests.first().map(|p| p.id))
    }

    async fn pull_request(&self, id: u64) -> Result<PullRequest> {
        self.record(GithubCall::PullRequest { id });
        if id == 0 {
            return Err(Error::InvalidArgument("Invalid ID.".to_string()));
        }
        self.pull_requests
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Pull request #{}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_two_factor() {
        let github = FakeGithub::new()
            .with_existing_token("tok")
            .with_two_factor_code("123456");

        assert!(matches!(
            github.find_authorization("Laravel Liferaft", None).await,
            Err(Error::TwoFactorRequired)
        ));
        assert!(matches!(
            github.find_authorization("Laravel Liferaft", Some("000000")).await,
            Err(Error::TwoFactorRequired)
        ));
        assert_eq!(
            github.find_authorization("Laravel Liferaft", Some("123456")).await.unwrap().as_deref(),
            Some("tok")
        );
        assert_eq!(github.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_fake_pull_requests() {
        let pull = PullRequest {
            id: 5,
            title: "[Liferaft] Bug".to_string(),
            user: "alice".to_string(),
            url: "https://github.com/laravel/laravel/pull/5".to_string(),
            from_branch: "bug".to_string(),
            to_branch: "master".to_string(),
        };
        let github = FakeGithub::new().with_pull_request(pull.clone());

        assert_eq!(github.random_pull_request_id().await.unwrap(), Some(5));
        assert_eq!(github.pull_request(5).await.unwrap(), pull);
        assert!(matches!(github.pull_request(6).await, Err(Error::NotFound(_))));
    }
}

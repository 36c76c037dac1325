//! Token acquisition
//!
//! [`AuthAction`] turns whatever the user supplied into a GitHub token and
//! stores it. A personal access token is stored as-is; a username and
//! password are exchanged for the "Laravel Liferaft" authorization, reusing
//! an existing one before creating a new one.

use crate::Result;
use crate::error::Error;
use crate::github::{Github, Scope};
use crate::ui;
use super::store::TokenStore;

/// Name of the GitHub authorization Liferaft looks up and creates
pub const APPLICATION_NAME: &str = "Laravel Liferaft";

/// Scopes requested for a new authorization
pub const AUTH_SCOPES: [Scope; 2] = [Scope::PublicRepo, Scope::User];

/// What the user handed us
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenInput {
    /// An existing personal access token
    Direct(String),

    /// Credentials to exchange for a token
    Credentials {
        username: String,
        password: String,
        code: Option<String>,
    },
}

impl TokenInput {
    pub fn credentials(
        username: impl Into<String>,
        password: impl Into<String>,
        code: Option<String>,
    ) -> Self {
        TokenInput::Credentials {
            username: username.into(),
            password: password.into(),
            code,
        }
    }
}

/// Acquires a GitHub token and stores it
pub struct AuthAction<G: Github, S: TokenStore> {
    github: G,
    store: S,
}

impl<G: Github, S: TokenStore> AuthAction<G, S> {
    pub fn new(github: G, store: S) -> Self {
        Self { github, store }
    }

    pub fn github(&self) -> &G {
        &self.github
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Obtain a token from `input` and store it, returning the stored token.
    ///
    /// GitHub errors, including [`Error::TwoFactorRequired`], are returned
    /// unchanged.
    pub async fn execute(&self, input: TokenInput) -> Result<String> {
        let token = match input {
            TokenInput::Direct(token) => {
                if token.is_empty() {
                    return Err(Error::InvalidArgument("Token must not be empty".to_string()));
                }
                tracing::debug!("Using supplied personal access token");
                token
            }
            TokenInput::Credentials { username, password, code } => {
                self.create_token(&username, &password, code.as_deref()).await?
            }
        };

        self.store_token(&token)?;
        Ok(token)
    }

    fn store_token(&self, token: &str) -> Result<()> {
        ui::task("Storing GitHub Token...", || self.store.save(token))
    }

    async fn create_token(&self, username: &str, password: &str, code: Option<&str>) -> Result<String> {
        self.github.authenticate_with_password(username, password)?;

        if let Some(token) = self.github.find_authorization(APPLICATION_NAME, code).await? {
            tracing::info!("Reusing existing {} authorization", APPLICATION_NAME);
            return Ok(token);
        }

        tracing::info!("Creating {} authorization", APPLICATION_NAME);
        self.github
            .create_authorization(APPLICATION_NAME, &AUTH_SCOPES, code)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::{JsonTokenStore, MemoryTokenStore};
    use crate::github::{FakeGithub, GithubCall};
    use tempfile::TempDir;

    fn action(github: FakeGithub) -> AuthAction<FakeGithub, MemoryTokenStore> {
        AuthAction::new(github, MemoryTokenStore::new())
    }

    #[tokio::test]
    async fn test_direct_token_skips_github() {
        let action = action(FakeGithub::new());

        let token = action.execute(TokenInput::Direct("abc123".to_string())).await.unwrap();

        assert_eq!(token, "abc123");
        assert_eq!(action.store().load().unwrap().as_deref(), Some("abc123"));
        assert!(action.github().calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_direct_token_is_rejected() {
        let action = action(FakeGithub::new());

        let result = action.execute(TokenInput::Direct(String::new())).await;

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(action.store().saves(), 0);
    }

    #[tokio::test]
    async fn test_creates_authorization_when_none_exists() {
        let action = action(FakeGithub::new().with_created_tokens(&["created-token"]));

        let token = action
            .execute(TokenInput::credentials("alice", "secret", None))
            .await
            .unwrap();

        assert_eq!(token, "created-token");
        assert_eq!(action.store().load().unwrap().as_deref(), Some("created-token"));
        assert_eq!(
            action.github().calls(),
            vec![
                GithubCall::Authenticate { username: "alice".to_string() },
                GithubCall::FindAuthorization {
                    name: APPLICATION_NAME.to_string(),
                    code: None,
                },
                GithubCall::CreateAuthorization {
                    name: APPLICATION_NAME.to_string(),
                    scopes: vec![Scope::PublicRepo, Scope::User],
                    code: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_reuses_existing_authorization() {
        let action = action(
            FakeGithub::new()
                .with_existing_token("existing-token")
                .with_created_tokens(&["should-not-be-used"]),
        );

        let token = action
            .execute(TokenInput::credentials("alice", "secret", None))
            .await
            .unwrap();

        assert_eq!(token, "existing-token");
        assert_eq!(action.store().load().unwrap().as_deref(), Some("existing-token"));
        assert_eq!(action.github().create_calls(), 0);
    }

    #[tokio::test]
    async fn test_two_factor_error_propagates_without_storing() {
        let action = action(FakeGithub::new().with_two_factor_code("123456"));

        let result = action.execute(TokenInput::credentials("alice", "secret", None)).await;

        assert!(matches!(result, Err(Error::TwoFactorRequired)));
        assert_eq!(action.store().saves(), 0);
    }

    #[tokio::test]
    async fn test_code_is_passed_to_lookup_and_create() {
        let action = action(
            FakeGithub::new()
                .with_two_factor_code("123456")
                .with_created_tokens(&["otp-token"]),
        );

        let token = action
            .execute(TokenInput::credentials("alice", "secret", Some("123456".to_string())))
            .await
            .unwrap();

        assert_eq!(token, "otp-token");
        let calls = action.github().calls();
        assert!(calls.contains(&GithubCall::FindAuthorization {
            name: APPLICATION_NAME.to_string(),
            code: Some("123456".to_string()),
        }));
        assert!(calls.contains(&GithubCall::CreateAuthorization {
            name: APPLICATION_NAME.to_string(),
            scopes: AUTH_SCOPES.to_vec(),
            code: Some("123456".to_string()),
        }));
    }

    #[tokio::test]
    async fn test_bad_password_propagates() {
        let action = action(FakeGithub::new().with_password("right"));

        let result = action.execute(TokenInput::credentials("alice", "wrong", None)).await;

        assert!(matches!(result, Err(Error::Auth(_))));
        assert_eq!(action.github().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_runs_overwrite_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("liferaft.json");
        let action = AuthAction::new(
            FakeGithub::new().with_existing_token("existing-token"),
            JsonTokenStore::new(&path),
        );

        for _ in 0..2 {
            let token = action
                .execute(TokenInput::credentials("alice", "secret", None))
                .await
                .unwrap();
            assert_eq!(token, "existing-token");
        }

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"token": "existing-token"}));
        assert_eq!(action.github().create_calls(), 0);
    }
}

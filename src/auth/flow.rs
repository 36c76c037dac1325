//! Interactive username/password login with two-factor re-prompting
//!
//! The login runs as a small state machine:
//!
//! ```text
//! Attempting --TwoFactorRequired--> AwaitingCode --code--> Attempting
//!     |                                                        |
//!     +--> Done / Failed <-------------------------------------+
//! ```
//!
//! Each trip through `AwaitingCode` uses up one retry. Once the retries are
//! gone, a two-factor failure is final.

use crate::Result;
use crate::error::Error;
use crate::github::Github;
use super::action::{AuthAction, TokenInput};
use super::prompt::Prompter;
use super::store::TokenStore;

/// Where the login currently is
#[derive(Debug)]
pub enum AuthState {
    Attempting { code: Option<String>, retries_left: u32 },
    AwaitingCode { retries_left: u32 },
    Done(String),
    Failed(Error),
}

/// Drives [`AuthAction`] for a username and password, asking for a
/// two-factor code when GitHub wants one
pub struct TwoFactorFlow<'a, G: Github, S: TokenStore, P: Prompter> {
    action: &'a AuthAction<G, S>,
    prompter: &'a P,
    max_retries: u32,
}

impl<'a, G: Github, S: TokenStore, P: Prompter> TwoFactorFlow<'a, G, S, P> {
    pub fn new(action: &'a AuthAction<G, S>, prompter: &'a P, max_retries: u32) -> Self {
        Self {
            action,
            prompter,
            max_retries,
        }
    }

    /// Prompt for username and password, then log in
    pub async fn prompt_and_run(&self) -> Result<String> {
        let username = self.prompter.username()?;
        let password = self.prompter.password()?;
        self.run(&username, &password).await
    }

    /// Log in with the given credentials, returning the stored token
    pub async fn run(&self, username: &str, password: &str) -> Result<String> {
        let mut state = AuthState::Attempting {
            code: None,
            retries_left: self.max_retries,
        };

        loop {
            state = match state {
                AuthState::Attempting { code, retries_left } => {
                    self.attempt(username, password, code, retries_left).await
                }
                AuthState::AwaitingCode { retries_left } => match self.prompter.two_factor_code() {
                    Ok(code) => AuthState::Attempting {
                        code: Some(code),
                        retries_left,
                    },
                    Err(e) => AuthState::Failed(e),
                },
                AuthState::Done(token) => return Ok(token),
                AuthState::Failed(e) => return Err(e),
            };
        }
    }

    async fn attempt(
        &self,
        username: &str,
        password: &str,
        code: Option<String>,
        retries_left: u32,
    ) -> AuthState {
        let input = TokenInput::credentials(username, password, code);

        match self.action.execute(input).await {
            Ok(token) => AuthState::Done(token),
            Err(Error::TwoFactorRequired) if retries_left > 0 => {
                tracing::debug!(retries_left, "Two-factor code required");
                AuthState::AwaitingCode {
                    retries_left: retries_left - 1,
                }
            }
            Err(e) => AuthState::Failed(e),
        }
    }
}

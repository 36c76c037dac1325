//! Authentication module for GitHub token acquisition and storage
//!
//! This module provides:
//! - Token acquisition from a personal access token or username/password
//! - Two-factor re-prompting for interactive logins
//! - Token storage in ~/.liferaft/liferaft.json
//! - Terminal prompts

mod action;
mod flow;
mod prompt;
mod store;

pub use action::{AuthAction, TokenInput, APPLICATION_NAME, AUTH_SCOPES};
pub use flow::{AuthState, TwoFactorFlow};
pub use prompt::{InquirePrompter, Prompter};
pub use store::{JsonTokenStore, MemoryTokenStore, StoredToken, TokenStore};

//! Liferaft - send Liferaft pull requests to GitHub
//!
//! This library provides GitHub authentication, token storage and the
//! GitHub operations behind the `liferaft` command.

pub mod auth;
pub mod config;
pub mod error;
pub mod github;
pub mod ui;

pub use error::{Error, Result};

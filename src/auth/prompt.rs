//! Terminal prompts for the login flow

use inquire::{Password, PasswordDisplayMode, Text};
use crate::Result;
use crate::error::Error;
use crate::ui;

/// Source of the answers the login flow needs
pub trait Prompter {
    fn username(&self) -> Result<String>;

    /// Read without echoing
    fn password(&self) -> Result<String>;

    /// Called only after GitHub has asked for a second factor
    fn two_factor_code(&self) -> Result<String>;
}

/// Prompts on the terminal via `inquire`
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn username(&self) -> Result<String> {
        Text::new("GitHub Username:")
            .prompt()
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn password(&self) -> Result<String> {
        Password::new("GitHub Password:")
            .with_display_mode(PasswordDisplayMode::Hidden)
            .without_confirmation()
            .prompt()
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn two_factor_code(&self) -> Result<String> {
        ui::print_comment("You have Two-Factor Authentication enabled.");
        ui::print_comment("Please enter the code provided to you via SMS or your GitHub mobile app.");

        Text::new("GitHub Two-Factor Auth Code:")
            .prompt()
            .map(|code| code.trim().to_string())
            .map_err(|e| Error::Prompt(e.to_string()))
    }
}

//! Command handlers.
//!
//! Each handler takes the calendar, an output sink and a [`Painter`]
//! explicitly so it can run against an in-memory calendar in tests.
//!
//! [`Painter`]: calme_core::Painter

pub mod create;
pub mod delete;
pub mod list;

use dialoguer::Input;

use crate::error::{ClientError, ClientResult};

/// Source of a free-text answer to a yes/no question.
pub trait Prompt {
    fn ask(&mut self, question: &str) -> ClientResult<String>;
}

/// Reads the answer from the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&mut self, question: &str) -> ClientResult<String> {
        Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ClientError::Prompt(e.to_string()))
    }
}

//! CLI, configuration and command handlers for `calme`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::{Cli, Mode};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};

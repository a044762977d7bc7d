//! Command-line interface definition.

use std::path::PathBuf;

use calme_core::{DEFAULT_NOTE, DEFAULT_OFFSET_MINUTES, DEFAULT_REMIND_MINUTES};
use clap::Parser;

/// calme - create, list and delete Google Calendar events
///
/// Without --list or --delete, creates an event.
#[derive(Debug, Parser)]
#[command(name = "calme")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Start time of the new event, e.g. 2025-12-31T14:30:45
    #[arg(long, short = 't', value_name = "YYYY-MM-DDTHH:MM:SS")]
    pub time: Option<String>,

    /// Start the new event this many minutes from now
    // An explicit 0 means "now", not the 30 minute default.
    #[arg(long = "min", short = 'm', default_value_t = DEFAULT_OFFSET_MINUTES, allow_negative_numbers = true)]
    pub minutes: i64,

    /// Email reminder lead time in minutes; the popup fires at half of it
    #[arg(long, short = 'r', default_value_t = DEFAULT_REMIND_MINUTES)]
    pub remind: u32,

    /// Event description; the title is its first 20 characters
    #[arg(long, short = 'n', default_value = DEFAULT_NOTE)]
    pub note: String,

    /// List this many upcoming events
    #[arg(long, short = 'l', value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub list: Option<u32>,

    /// Delete the event with this ID after confirmation
    #[arg(
        long,
        short = 'd',
        value_name = "EVENT_ID",
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    pub delete: Option<String>,

    /// Path to configuration file
    #[arg(long, short = 'c', env = "CALME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List {
        count: u32,
    },
    Delete {
        event_id: String,
    },
    Create {
        time: Option<String>,
        minutes: i64,
        remind: u32,
        note: String,
    },
}

impl Cli {
    /// Picks the mode: `--list` wins over `--delete`, which wins over create.
    pub fn mode(&self) -> Mode {
        if let Some(count) = self.list {
            Mode::List { count }
        } else if let Some(event_id) = &self.delete {
            Mode::Delete {
                event_id: event_id.clone(),
            }
        } else {
            Mode::Create {
                time: self.time.clone(),
                minutes: self.minutes,
                remind: self.remind,
                note: self.note.clone(),
            }
        }
    }
}

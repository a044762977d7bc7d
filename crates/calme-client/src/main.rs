//! calme CLI entry point.

use std::io::{self, Write};
use std::process::ExitCode;

use calme_core::{Painter, Style, TracingConfig, init_tracing};
use calme_providers::google::CredentialStore;
use clap::Parser;
use tracing::debug;

use calme_client::commands::create::{self, CreateRequest};
use calme_client::commands::{TerminalPrompt, delete, list};
use calme_client::{Cli, ClientConfig, ClientError, ClientResult, Mode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return report(&e, &Painter::new(!cli.no_color)),
    };

    let tracing = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing) {
        eprintln!("warning: {}", e);
    }

    let painter = Painter::new(config.display.color && !cli.no_color);
    match run(cli.mode(), &config, &painter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e, &painter),
    }
}

fn report(err: &ClientError, painter: &Painter) -> ExitCode {
    eprintln!("{}", error_line(err, painter));
    ExitCode::FAILURE
}

fn error_line(err: &ClientError, painter: &Painter) -> String {
    painter.paint(Style::Error, &format!("An error occurred: {}", err))
}

async fn run(mode: Mode, config: &ClientConfig, painter: &Painter) -> ClientResult<()> {
    debug!("running {:?}", mode);
    let mut out = io::stdout().lock();

    match mode {
        Mode::List { count } => {
            let calendar = connect(config).await?;
            list::run(&calendar, count, &mut out, painter).await?;
        }
        Mode::Delete { event_id } => {
            let calendar = connect(config).await?;
            let outcome =
                delete::run(&calendar, &event_id, &mut TerminalPrompt, &mut out, painter).await?;
            debug!("delete finished: {:?}", outcome);
        }
        Mode::Create {
            time,
            minutes,
            remind,
            note,
        } => {
            let time_zone = config.time_zone()?;
            let request = CreateRequest {
                time,
                offset_minutes: Some(minutes),
                remind_minutes: remind,
                note,
            };
            create::run_request(&request, time_zone, || connect(config), &mut out, painter)
                .await?;
        }
    }

    out.flush()?;
    Ok(())
}

async fn connect(config: &ClientConfig) -> ClientResult<calme_providers::google::GoogleCalendar> {
    let store = CredentialStore::new(config.google_config()?).map_err(ClientError::from_auth)?;
    store.connect().await.map_err(ClientError::from_auth)
}

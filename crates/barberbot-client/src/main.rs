//! barberbot CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use barberbot_client::cli::{Cli, Command, ConfigAction, UsersAction};
use barberbot_client::commands::{self, booking::BookArgs};
use barberbot_client::{App, ClientConfig, ClientError, ClientResult};
use barberbot_core::init_tracing;

/// Exit status for failures that may go away on their own (sysexits `EX_TEMPFAIL`).
const EXIT_TEMPFAIL: u8 = 75;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.tracing_config()) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, retryable = e.is_retryable(), "command failed");
            eprintln!("error: {}", e.user_message());
            if e.is_retryable() {
                ExitCode::from(EXIT_TEMPFAIL)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().map_err(ClientError::Config)?
    };

    // Config commands never need the network.
    if let Command::Config { action } = &cli.command {
        return match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        };
    }

    let app = App::new(&config, cli.json).await?;

    match &cli.command {
        Command::Businesses {
            category,
            min_rating,
        } => commands::catalog::businesses(&app, *category, *min_rating).await,
        Command::Info { business } => commands::catalog::info(&app, business).await,
        Command::Services { business } => commands::catalog::services(&app, business).await,
        Command::Resources { business, location } => {
            commands::catalog::resources(&app, business, location.as_deref()).await
        }
        Command::Locations { business } => commands::catalog::locations(&app, business).await,
        Command::Availability {
            business,
            service,
            date,
            time,
            resource,
        } => {
            commands::booking::availability(
                &app,
                business,
                service,
                date,
                *time,
                resource.as_deref(),
            )
            .await
        }
        Command::Book {
            business,
            service,
            start,
            name,
            phone,
            email,
            resource,
            note,
        } => {
            let args = BookArgs {
                business,
                service,
                start,
                name,
                phone: phone.as_deref(),
                email: email.as_deref(),
                resource: resource.as_deref(),
                note: note.as_deref(),
            };
            commands::booking::book(&app, args).await
        }
        Command::Cancel {
            business,
            booking_id,
        } => commands::booking::cancel(&app, business, booking_id).await,
        Command::Users { action } => match action {
            UsersAction::List => commands::users::list(&app).await,
            UsersAction::Register { phone } => commands::users::register(&app, phone).await,
        },
        Command::Config { .. } => Ok(()),
    }
}

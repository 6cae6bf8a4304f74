//! Command-line interface definition.

use std::path::PathBuf;

use barberbot_core::{Category, TimePreference, TracingConfig};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use clap::{ArgAction, Parser, Subcommand};

/// barberbot - book barbers and physiotherapists from the terminal
#[derive(Debug, Parser)]
#[command(name = "barberbot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "BARBERBOT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List businesses with their services
    Businesses {
        /// Category to list
        #[arg(long, default_value = "barbershop", value_parser = parse_category)]
        category: Category,

        /// Only businesses rated at least this much
        #[arg(long)]
        min_rating: Option<f32>,
    },

    /// Show business details (address, contact)
    Info {
        /// Business id or name
        business: String,
    },

    /// List the services a business offers
    Services {
        /// Business id or name
        business: String,
    },

    /// List staff members
    Resources {
        /// Business id or name
        business: String,

        /// Only staff at this location
        #[arg(long)]
        location: Option<String>,
    },

    /// List locations
    Locations {
        /// Business id or name
        business: String,
    },

    /// Find free slots, falling back to other businesses of the same kind
    Availability {
        /// Business id or name
        business: String,

        /// Service id or name
        service: String,

        /// Date as YYYY-MM-DD
        date: String,

        /// morning, afternoon, evening, "after 15:00" or "before 11:00"
        #[arg(long, short, default_value = "any", value_parser = parse_preference)]
        time: TimePreference,

        /// Staff member id
        #[arg(long)]
        resource: Option<String>,
    },

    /// Book a slot
    Book {
        /// Business id or name
        business: String,

        /// Service id or name
        service: String,

        /// Start as RFC 3339 or local "YYYY-MM-DD HH:MM"
        start: String,

        /// Customer name, "First Last"
        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Staff member id
        #[arg(long)]
        resource: Option<String>,

        /// Note passed to the business
        #[arg(long)]
        note: Option<String>,
    },

    /// Cancel a booking
    Cancel {
        /// Business id or name
        business: String,

        booking_id: String,
    },

    /// Registered end users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// User registry actions.
#[derive(Debug, Subcommand)]
pub enum UsersAction {
    /// List registered users
    List,

    /// Register a phone number (idempotent)
    Register {
        phone: String,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

impl Cli {
    /// Logging setup for this invocation; `--debug` wins over `-v`.
    pub fn tracing_config(&self) -> TracingConfig {
        if self.debug {
            TracingConfig::cli_debug()
        } else {
            TracingConfig::from_verbosity(self.verbose)
        }
    }
}

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse().map_err(|e: barberbot_core::ValidationError| e.to_string())
}

fn parse_preference(raw: &str) -> Result<TimePreference, String> {
    raw.parse().map_err(|e: barberbot_core::ValidationError| e.to_string())
}

/// Parses a booking start, either with an explicit offset or as local
/// wall-clock time in `offset`.
pub fn parse_start(raw: &str, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = barberbot_core::parse_instant(raw) {
        return Some(instant);
    }
    ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .and_then(|local| offset.from_local_datetime(&local).single())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use barberbot_core::default_offset;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_availability_with_preference() {
        let cli = Cli::try_parse_from([
            "barberbot",
            "availability",
            "Rico Studio",
            "Haircut",
            "2025-10-07",
            "--time",
            "after 15:00",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Availability { business, time, .. } => {
                assert_eq!(business, "Rico Studio");
                assert!(matches!(time, TimePreference::After(_)));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verbosity_selects_log_level() {
        use tracing::Level;

        let quiet = Cli::try_parse_from(["barberbot", "config", "path"]).unwrap();
        assert_eq!(quiet.tracing_config().default_level, Level::WARN);

        let chatty = Cli::try_parse_from(["barberbot", "-vv", "config", "path"]).unwrap();
        assert_eq!(chatty.verbose, 2);
        assert_eq!(chatty.tracing_config().default_level, Level::DEBUG);

        let debug = Cli::try_parse_from(["barberbot", "-v", "--debug", "config", "path"]).unwrap();
        assert_eq!(debug.tracing_config().default_level, Level::DEBUG);
        assert!(!debug.tracing_config().include_timestamp);
    }

    #[test]
    fn rejects_unknown_category() {
        let result = Cli::try_parse_from(["barberbot", "businesses", "--category", "dentist"]);
        assert!(result.is_err());
    }

    #[test]
    fn start_accepts_local_and_offset_forms() {
        let offset = default_offset();
        let expected = Utc.with_ymd_and_hms(2025, 10, 7, 13, 0, 0).unwrap();
        assert_eq!(parse_start("2025-10-07 14:00", &offset), Some(expected));
        assert_eq!(parse_start("2025-10-07T14:00", &offset), Some(expected));
        assert_eq!(parse_start("2025-10-07T14:00:00+01:00", &offset), Some(expected));
        assert_eq!(parse_start("tomorrow at two", &offset), None);
    }
}

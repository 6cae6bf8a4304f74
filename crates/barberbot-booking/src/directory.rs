//! Loading the business directory.
//!
//! Businesses listed in the configuration file win. Otherwise the record
//! store is asked, and the built-in directory is used whenever the store is
//! unconfigured, unreachable or empty.

use std::fmt;

use barberbot_core::{Business, Directory};
use tracing::{info, warn};

use crate::store::RecordStore;

/// Where the directory in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorySource {
    Config,
    Store,
    Builtin,
}

impl fmt::Display for DirectorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Config => "config",
            Self::Store => "store",
            Self::Builtin => "builtin",
        })
    }
}

pub async fn load_directory(
    configured: Vec<Business>,
    store: Option<&RecordStore>,
) -> (Directory, DirectorySource) {
    if !configured.is_empty() {
        info!(count = configured.len(), "using businesses from config");
        return (Directory::new(configured), DirectorySource::Config);
    }

    let Some(store) = store else {
        return (Directory::builtin(), DirectorySource::Builtin);
    };

    match store.businesses().await {
        Ok(businesses) if !businesses.is_empty() => {
            info!(count = businesses.len(), "using businesses from record store");
            (Directory::new(businesses), DirectorySource::Store)
        }
        Ok(_) => {
            warn!("record store has no businesses, using built-in directory");
            (Directory::builtin(), DirectorySource::Builtin)
        }
        Err(e) => {
            warn!(error = %e, "record store unavailable, using built-in directory");
            (Directory::builtin(), DirectorySource::Builtin)
        }
    }
}

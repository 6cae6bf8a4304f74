//! Wiring of the booking engine from the client configuration.

use std::sync::Arc;

use barberbot_booking::{
    AvailabilityResolver, BookingConfig, BookingService, Catalog, DirectorySource,
    PlatformRegistry, RecordStore, TurnRunner, load_directory,
};
use barberbot_core::Directory;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Everything a command needs.
pub struct App {
    pub booking: BookingConfig,
    pub catalog: Catalog,
    pub resolver: AvailabilityResolver,
    pub bookings: BookingService,
    pub runner: TurnRunner,
    pub store: Option<RecordStore>,
    pub source: DirectorySource,
    json: bool,
}

impl App {
    /// Builds adapters and loads the business directory.
    pub async fn new(config: &ClientConfig, json: bool) -> ClientResult<Self> {
        let booking = config.booking_config().map_err(ClientError::Config)?;
        let registry = PlatformRegistry::from_configs(
            config.reservio_config().map_err(ClientError::Config)?,
            config.reservanto_config().map_err(ClientError::Config)?,
        );
        let store = RecordStore::from_config(&config.store_config())?;
        let (directory, source) = load_directory(config.businesses.clone(), store.as_ref()).await;
        debug!(%source, businesses = directory.len(), "directory loaded");

        Ok(Self::from_parts(
            Arc::new(registry),
            Arc::new(directory),
            booking,
            store,
            source,
            json,
        ))
    }

    pub fn from_parts(
        registry: Arc<PlatformRegistry>,
        directory: Arc<Directory>,
        booking: BookingConfig,
        store: Option<RecordStore>,
        source: DirectorySource,
        json: bool,
    ) -> Self {
        Self {
            catalog: Catalog::new(registry.clone(), directory.clone()),
            resolver: AvailabilityResolver::new(registry.clone(), directory, booking.clone()),
            bookings: BookingService::new(registry, booking.clone()),
            runner: TurnRunner::new(booking.clone()),
            booking,
            store,
            source,
            json,
        }
    }

    pub fn store(&self) -> ClientResult<&RecordStore> {
        self.store.as_ref().ok_or(ClientError::StoreMissing)
    }

    /// Prints `value` as JSON or through its text rendering.
    pub fn emit<T>(&self, value: &T, text: impl FnOnce(&T) -> String) -> ClientResult<()>
    where
        T: Serialize + ?Sized,
    {
        println!("{}", self.render(value, text)?);
        Ok(())
    }

    fn render<T>(&self, value: &T, text: impl FnOnce(&T) -> String) -> ClientResult<String>
    where
        T: Serialize + ?Sized,
    {
        if self.json {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(text(value))
        }
    }
}

//! Dispatch from a business's platform discriminator to its adapter.

use std::collections::HashMap;
use std::sync::Arc;

use barberbot_core::{Business, Platform};
use barberbot_providers::{
    BookingPlatform, ProviderError, ReservantoConfig, ReservantoPlatform, ReservioConfig,
    ReservioPlatform, UnavailablePlatform,
};
use tracing::{debug, warn};

/// One adapter per platform, shared by every business hosted on it.
#[derive(Default, Clone)]
pub struct PlatformRegistry {
    platforms: HashMap<Platform, Arc<dyn BookingPlatform>>,
}

impl std::fmt::Debug for PlatformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformRegistry")
            .field("platforms", &self.platforms.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds both adapters. A platform whose adapter cannot be built is
    /// registered as unavailable so only its businesses fail.
    pub fn from_configs(reservio: ReservioConfig, reservanto: ReservantoConfig) -> Self {
        let mut registry = Self::new();
        match ReservioPlatform::new(reservio) {
            Ok(platform) => registry.register(Arc::new(platform)),
            Err(e) => {
                warn!(error = %e, "reservio adapter unavailable");
                registry.register(Arc::new(UnavailablePlatform::new(Platform::Reservio, e)));
            }
        }
        match ReservantoPlatform::new(reservanto) {
            Ok(platform) => registry.register(Arc::new(platform)),
            Err(e) => {
                warn!(error = %e, "reservanto adapter unavailable");
                registry.register(Arc::new(UnavailablePlatform::new(Platform::Reservanto, e)));
            }
        }
        registry
    }

    /// Builder: add an adapter, replacing any for the same platform.
    pub fn with_platform(mut self, platform: Arc<dyn BookingPlatform>) -> Self {
        self.register(platform);
        self
    }

    pub fn register(&mut self, platform: Arc<dyn BookingPlatform>) {
        debug!(platform = %platform.platform(), "platform registered");
        self.platforms.insert(platform.platform(), platform);
    }

    pub fn get(&self, platform: Platform) -> Arc<dyn BookingPlatform> {
        match self.platforms.get(&platform) {
            Some(adapter) => Arc::clone(adapter),
            None => Arc::new(UnavailablePlatform::new(
                platform,
                ProviderError::configuration(format!("no adapter registered for {platform}"))
                    .with_provider(platform.as_str()),
            )),
        }
    }

    /// The adapter serving `business`.
    pub fn for_business(&self, business: &Business) -> Arc<dyn BookingPlatform> {
        self.get(business.platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barberbot_core::Category;
    use barberbot_providers::ProviderErrorCode;

    #[test]
    fn both_platforms_registered_from_configs() {
        let registry = PlatformRegistry::from_configs(ReservioConfig::new(), ReservantoConfig::new());
        assert_eq!(registry.get(Platform::Reservio).platform(), Platform::Reservio);
        assert_eq!(registry.get(Platform::Reservanto).platform(), Platform::Reservanto);
    }

    #[tokio::test]
    async fn unregistered_platform_fails_with_configuration_error() {
        let registry = PlatformRegistry::new();
        let business = Business::new(
            "physio-1",
            "Anatomic Fitness",
            Category::Physiotherapy,
            Platform::Reservanto,
            "ltt",
        );
        let adapter = registry.for_business(&business);
        assert_eq!(adapter.platform(), Platform::Reservanto);

        let err = adapter.list_services(&business).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
    }
}

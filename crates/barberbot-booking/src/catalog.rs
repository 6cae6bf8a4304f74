//! Read-only views over the directory: businesses, their details and
//! services.

use std::sync::Arc;

use barberbot_core::{Business, BusinessInfo, Category, Directory, Location, Resource, Service};
use futures_util::future::join_all;
use serde::Serialize;
use tracing::warn;

use crate::error::{BookingError, BookingResult};
use crate::registry::PlatformRegistry;

/// A business with the services it offers.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessServices {
    pub business: Business,
    pub services: Vec<Service>,
}

/// Directory metadata merged with what the platform reports.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessDetails {
    pub business: Business,
    pub info: BusinessInfo,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    registry: Arc<PlatformRegistry>,
    directory: Arc<Directory>,
}

impl Catalog {
    pub fn new(registry: Arc<PlatformRegistry>, directory: Arc<Directory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Looks a business up by id or name.
    pub fn business(&self, key: &str) -> BookingResult<&Business> {
        self.directory
            .find(key.trim())
            .ok_or_else(|| BookingError::not_found(format!("a business called '{}'", key.trim())))
    }

    /// The business to use when the person did not name one.
    pub fn default_business(&self, category: Category) -> BookingResult<&Business> {
        self.directory
            .default_for(category)
            .ok_or_else(|| BookingError::not_found(format!("a {}", category.display_name())))
    }

    /// Businesses of `category` with their services, fetched concurrently.
    ///
    /// A business whose services cannot be fetched is listed with none.
    pub async fn overview(
        &self,
        category: Category,
        min_rating: Option<f32>,
    ) -> Vec<BusinessServices> {
        let businesses: Vec<&Business> = self
            .directory
            .in_category(category)
            .filter(|b| match min_rating {
                Some(min) => b.rating.is_some_and(|r| r >= min),
                None => true,
            })
            .collect();

        let fetches = businesses.iter().map(|business| async move {
            let services = match self.registry.for_business(business).list_services(business).await {
                Ok(services) => services,
                Err(e) => {
                    warn!(business = %business.name, error = %e, "services unavailable");
                    Vec::new()
                }
            };
            BusinessServices {
                business: (*business).clone(),
                services,
            }
        });
        join_all(fetches).await
    }

    pub async fn details(&self, business: &Business) -> BookingResult<BusinessDetails> {
        let mut info = self
            .registry
            .for_business(business)
            .business_info(business)
            .await?;
        if info.name.trim().is_empty() {
            info.name = business.name.clone();
        }
        if info.website.is_none() {
            info.website = business.website.clone();
        }
        let address = info.address();
        Ok(BusinessDetails {
            business: business.clone(),
            info,
            address,
        })
    }

    pub async fn services(&self, business: &Business) -> BookingResult<Vec<Service>> {
        Ok(self
            .registry
            .for_business(business)
            .list_services(business)
            .await?)
    }

    /// Finds a service by id or, failing that, by name.
    pub async fn service(&self, business: &Business, key: &str) -> BookingResult<Service> {
        let key = key.trim();
        let services = self.services(business).await?;
        services
            .iter()
            .find(|s| s.id == key)
            .or_else(|| services.iter().find(|s| s.same_name_as(key)))
            .cloned()
            .ok_or_else(|| {
                BookingError::not_found(format!("a service called '{key}' at {}", business.name))
            })
    }

    pub async fn resources(
        &self,
        business: &Business,
        location_id: Option<&str>,
    ) -> BookingResult<Vec<Resource>> {
        Ok(self
            .registry
            .for_business(business)
            .list_resources(business, location_id)
            .await?)
    }

    pub async fn locations(&self, business: &Business) -> BookingResult<Vec<Location>> {
        Ok(self
            .registry
            .for_business(business)
            .list_locations(business)
            .await?)
    }
}

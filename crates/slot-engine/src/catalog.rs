//! Bookable services and their fixed durations.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Catalog key referenced by appointments.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Length of one appointment, and the stride between offered slots.
    pub duration_minutes: i64,
}

/// Services keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: BTreeMap<u32, Service>,
}

impl ServiceCatalog {
    /// Build a catalog, rejecting any service whose duration is not positive
    /// or does not fit a `chrono::Duration`.
    /// A later service with a repeated id replaces the earlier one.
    pub fn new(services: impl IntoIterator<Item = Service>) -> Result<Self> {
        let mut catalog = Self::default();
        for service in services {
            if service.duration_minutes <= 0
                || Duration::try_minutes(service.duration_minutes).is_none()
            {
                return Err(SlotError::InvalidDuration(service.duration_minutes));
            }
            catalog.services.insert(service.id, service);
        }
        Ok(catalog)
    }

    /// Look up a service; fails with `UnknownService` when missing.
    pub fn get(&self, id: u32) -> Result<&Service> {
        self.services.get(&id).ok_or(SlotError::UnknownService(id))
    }

    /// Duration in minutes of the service `id`.
    pub fn duration_of(&self, id: u32) -> Result<i64> {
        self.get(id).map(|s| s.duration_minutes)
    }

    /// Services in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

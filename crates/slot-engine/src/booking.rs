//! Appointments and the booking store contract.
//!
//! A start instant holds at most one confirmed appointment. The occupancy
//! check and the insert happen in one step inside the store, so a caller that
//! read availability earlier cannot double-book a slot taken in between.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::availability;
use crate::catalog::{Service, ServiceCatalog};
use crate::error::{Result, SlotError};
use crate::schedule::Schedule;
use crate::window::ScanWindow;

/// Who an appointment is booked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Booker {
    /// A registered client.
    Client { client_id: u32 },
    /// A walk-in booking without an account.
    Guest { name: String, phone: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// The booked service.
    pub service_id: u32,
    /// Slot start; the ledger key.
    pub start: DateTime<Utc>,
    /// `start` plus the service duration.
    pub end: DateTime<Utc>,
    /// Defaults to `Confirmed` when absent from stored data.
    #[serde(default)]
    pub status: AppointmentStatus,
    /// Who the slot is held for.
    pub booker: Booker,
}

impl Appointment {
    /// A confirmed appointment lasting the service's duration. The end
    /// saturates at the latest representable instant.
    pub fn confirmed(service: &Service, start: DateTime<Utc>, booker: Booker) -> Self {
        Self {
            service_id: service.id,
            start,
            end: Duration::try_minutes(service.duration_minutes)
                .and_then(|d| start.checked_add_signed(d))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            status: AppointmentStatus::Confirmed,
            booker,
        }
    }

    /// Only confirmed appointments occupy their start.
    pub fn is_confirmed(&self) -> bool {
        self.status == AppointmentStatus::Confirmed
    }
}

/// Storage boundary for appointments.
pub trait BookingStore {
    /// Starts of confirmed appointments inside `window`.
    fn booked_starts(&self, window: &ScanWindow) -> HashSet<DateTime<Utc>>;

    /// Insert `appointment`, failing with [`SlotError::SlotTaken`] when a
    /// confirmed appointment already starts at the same instant.
    fn try_insert(&mut self, appointment: Appointment) -> Result<()>;
}

/// In-memory [`BookingStore`] keyed by start instant.
///
/// Cancelled appointments are kept in a separate history and never occupy a
/// start.
#[derive(Debug, Clone, Default)]
pub struct BookingLedger {
    confirmed: BTreeMap<DateTime<Utc>, Appointment>,
    cancelled: Vec<Appointment>,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load existing appointments. Confirmed appointments that collide on a
    /// start are rejected like any other insert.
    pub fn from_appointments(appointments: impl IntoIterator<Item = Appointment>) -> Result<Self> {
        let mut ledger = Self::new();
        for appointment in appointments {
            ledger.try_insert(appointment)?;
        }
        Ok(ledger)
    }

    /// The confirmed appointment starting at `start`, if any.
    pub fn get(&self, start: DateTime<Utc>) -> Option<&Appointment> {
        self.confirmed.get(&start)
    }

    /// All appointments, confirmed ones first in start order.
    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> {
        self.confirmed.values().chain(self.cancelled.iter())
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }
}

impl BookingStore for BookingLedger {
    fn booked_starts(&self, window: &ScanWindow) -> HashSet<DateTime<Utc>> {
        if window.now > window.end {
            return HashSet::new();
        }
        self.confirmed
            .range(window.now..window.end)
            .map(|(start, _)| *start)
            .collect()
    }

    fn try_insert(&mut self, appointment: Appointment) -> Result<()> {
        if !appointment.is_confirmed() {
            self.cancelled.push(appointment);
            return Ok(());
        }
        match self.confirmed.entry(appointment.start) {
            Entry::Occupied(_) => Err(SlotError::SlotTaken(appointment.start)),
            Entry::Vacant(slot) => {
                slot.insert(appointment);
                Ok(())
            }
        }
    }
}

/// A request to reserve one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Service to book; resolved through the catalog.
    pub service_id: u32,
    /// Requested slot start; must be one the engine offers.
    pub start: DateTime<Utc>,
    /// Who the slot is for.
    pub booker: Booker,
}

/// Reserve `request.start` for `request.service_id`.
///
/// The start must be one of the slots the engine currently offers for that
/// service within `window`; otherwise the request fails with
/// [`SlotError::SlotUnavailable`]. A slot offered but taken by a concurrent
/// insert surfaces as [`SlotError::SlotTaken`] from the store.
pub fn book<S: BookingStore>(
    store: &mut S,
    catalog: &ServiceCatalog,
    schedule: &Schedule,
    zone: Tz,
    window: &ScanWindow,
    request: BookingRequest,
) -> Result<Appointment> {
    let service = catalog.get(request.service_id)?;
    let booked = store.booked_starts(window);
    if booked.contains(&request.start) {
        return Err(SlotError::SlotTaken(request.start));
    }

    let open = availability::available_slots(
        service.duration_minutes,
        window,
        zone,
        schedule,
        &booked,
    )?;
    if !open.contains(&request.start) {
        return Err(SlotError::SlotUnavailable(request.start));
    }

    let appointment = Appointment::confirmed(service, request.start, request.booker);
    store.try_insert(appointment.clone())?;
    Ok(appointment)
}

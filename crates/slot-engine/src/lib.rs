//! # slot-engine
//!
//! Deterministic appointment-slot availability with per-day DST handling.
//!
//! Given a service duration, a weekly table of local work hours, UTC override
//! blocks (blackouts and special openings) and the starts already booked, the
//! engine returns the ordered set of bookable start instants over a scan
//! window. It reads no clock and performs no I/O: callers pass `now`, the
//! reference timezone and a snapshot of their stored data.
//!
//! ## Modules
//!
//! - [`availability`] — slot generation and the recurring/override merge
//! - [`zone`] — local clock time → UTC, offset resolved per calendar day
//! - [`schedule`] — work-hour rules and override blocks
//! - [`window`] — the scan window and the rolling 14-day policy
//! - [`catalog`] — services and their durations
//! - [`booking`] — appointments, the store contract and the booking flow
//! - [`error`] — Error types

pub mod availability;
pub mod booking;
pub mod catalog;
pub mod error;
pub mod schedule;
pub mod window;
pub mod zone;

pub use availability::{available_slots, compute_availability};
pub use booking::{book, Appointment, Booker, BookingLedger, BookingRequest, BookingStore};
pub use catalog::{Service, ServiceCatalog};
pub use error::SlotError;
pub use schedule::{OverrideBlock, Schedule, WorkHourRule};
pub use window::ScanWindow;

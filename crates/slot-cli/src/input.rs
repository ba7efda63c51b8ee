//! Schedule file loading and saving.

use std::io::{self, Read};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slot_engine::{Appointment, BookingLedger, Schedule, Service, ServiceCatalog};

/// Everything the CLI knows about one business, as stored on disk.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScheduleFile {
    /// IANA reference timezone the work hours are authored in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl ScheduleFile {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse schedule JSON")
    }

    pub fn catalog(&self) -> Result<ServiceCatalog> {
        ServiceCatalog::new(self.services.iter().cloned()).context("Invalid service catalog")
    }

    pub fn ledger(&self) -> Result<BookingLedger> {
        BookingLedger::from_appointments(self.appointments.iter().cloned())
            .context("Schedule contains conflicting appointments")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize schedule")
    }
}

pub fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

pub fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

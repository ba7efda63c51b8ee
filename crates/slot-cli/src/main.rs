//! `slots` CLI — list services, query open slots and book appointments.
//!
//! ## Usage
//!
//! ```sh
//! # List services
//! slots services -i schedule.json
//!
//! # Open slots for service 1 over the next 14 days
//! slots availability -i schedule.json --service 1
//!
//! # Pin the clock and the reference timezone
//! slots --now 2026-03-16T06:00:00Z --timezone Asia/Jerusalem availability -i schedule.json --service 1
//!
//! # Book as a guest and save the updated schedule
//! slots book -i schedule.json -o schedule.json --service 1 \
//!   --start 2026-03-16T07:00:00Z --guest-name Dana --guest-phone 050-0000000
//! ```

mod input;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use slot_engine::booking::{book, Booker, BookingRequest, BookingStore};
use slot_engine::schedule::duplicate_weekdays;
use slot_engine::window::{ScanWindow, DEFAULT_HORIZON_DAYS};
use slot_engine::{available_slots, zone};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::input::{read_input, write_output, ScheduleFile};

#[derive(Parser)]
#[command(name = "slots", version, about = "Appointment slot availability and booking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// IANA reference timezone (overrides the schedule file's `timezone`)
    #[arg(long, global = true, env = "SLOTS_TIMEZONE")]
    timezone: Option<String>,

    /// Number of days scanned from today (UTC)
    #[arg(long, global = true, env = "SLOTS_HORIZON_DAYS", default_value_t = DEFAULT_HORIZON_DAYS)]
    horizon_days: u32,

    /// Current instant as RFC 3339 (defaults to the system clock)
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    /// Log debug output to stderr (otherwise RUST_LOG, default "warn")
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the bookable services
    Services {
        /// Schedule file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List open slot starts for a service as a JSON array
    Availability {
        /// Schedule file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Service id
        #[arg(long)]
        service: u32,
    },
    /// Book one slot and print the appointment
    Book {
        /// Schedule file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Write the updated schedule to this file
        #[arg(short, long)]
        output: Option<String>,
        /// Service id
        #[arg(long)]
        service: u32,
        /// Slot start as RFC 3339
        #[arg(long)]
        start: DateTime<Utc>,
        /// Registered client id
        #[arg(long, conflicts_with = "guest_name", required_unless_present = "guest_name")]
        client: Option<u32>,
        /// Guest name (requires --guest-phone)
        #[arg(long, requires = "guest_phone")]
        guest_name: Option<String>,
        /// Guest phone number
        #[arg(long, requires = "guest_name")]
        guest_phone: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let now = cli.now.unwrap_or_else(Utc::now);
    let window = ScanWindow::rolling(now, cli.horizon_days).context("Invalid --horizon-days")?;

    match cli.command {
        Commands::Services { input } => {
            let file = load(input.as_deref())?;
            let catalog = file.catalog()?;
            let services: Vec<_> = catalog.iter().collect();
            write_output(None, &serde_json::to_string_pretty(&services)?)?;
        }
        Commands::Availability {
            input,
            output,
            service,
        } => {
            let file = load(input.as_deref())?;
            let zone = reference_zone(cli.timezone.as_deref(), &file)?;
            let duration = file.catalog()?.duration_of(service)?;
            let booked = file.ledger()?.booked_starts(&window);

            let slots = available_slots(duration, &window, zone, &file.schedule, &booked)
                .context("Failed to compute availability")?;
            info!(
                service,
                slots = slots.len(),
                window_end = %window.end,
                "computed availability"
            );

            let rendered: Vec<String> = slots
                .iter()
                .map(|s| s.to_rfc3339_opts(SecondsFormat::Secs, true))
                .collect();
            write_output(output.as_deref(), &serde_json::to_string_pretty(&rendered)?)?;
        }
        Commands::Book {
            input,
            output,
            service,
            start,
            client,
            guest_name,
            guest_phone,
        } => {
            let mut file = load(input.as_deref())?;
            let zone = reference_zone(cli.timezone.as_deref(), &file)?;
            let catalog = file.catalog()?;
            let mut ledger = file.ledger()?;

            let booker = match (client, guest_name, guest_phone) {
                (Some(client_id), _, _) => Booker::Client { client_id },
                (None, Some(name), Some(phone)) => Booker::Guest { name, phone },
                _ => anyhow::bail!("Either --client or --guest-name with --guest-phone is required"),
            };
            let request = BookingRequest {
                service_id: service,
                start,
                booker,
            };

            let appointment = match book(&mut ledger, &catalog, &file.schedule, zone, &window, request) {
                Ok(appointment) => appointment,
                Err(err) => {
                    warn!(service, %start, error = %err, "booking rejected");
                    return Err(err).context("Failed to book appointment");
                }
            };
            info!(service, %start, "booking accepted");

            write_output(None, &serde_json::to_string_pretty(&appointment)?)?;
            if let Some(path) = output.as_deref() {
                file.appointments = ledger.appointments().cloned().collect();
                write_output(Some(path), &file.to_json()?)?;
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(path: Option<&str>) -> Result<ScheduleFile> {
    let file = ScheduleFile::parse(&read_input(path)?)?;
    debug!(
        services = file.services.len(),
        work_hours = file.schedule.work_hours.len(),
        overrides = file.schedule.overrides.len(),
        appointments = file.appointments.len(),
        "loaded schedule"
    );
    for day in duplicate_weekdays(&file.schedule.work_hours) {
        warn!(?day, "multiple work-hour rules for one weekday; only the first is used");
    }
    Ok(file)
}

/// The `--timezone`/`SLOTS_TIMEZONE` value wins over the file's own zone.
fn reference_zone(flag: Option<&str>, file: &ScheduleFile) -> Result<Tz> {
    let name = flag.or(file.timezone.as_deref()).context(
        "No reference timezone: pass --timezone, set SLOTS_TIMEZONE, or add \"timezone\" to the schedule",
    )?;
    zone::parse_zone(name).context("Invalid reference timezone")
}

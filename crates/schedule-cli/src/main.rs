//! `schedule` CLI — expand, lay out and reschedule calendar items from JSON.
//!
//! ## Usage
//!
//! ```sh
//! # All occurrences of every recurring item (stdin → stdout)
//! cat items.json | schedule expand
//!
//! # Items plus occurrences visible in one week
//! schedule expand -i items.json --window-start 2024-01-01T00:00:00Z --window-end 2024-01-08T00:00:00Z
//!
//! # Column layout per day on a 15-minute grid
//! schedule layout -i items.json --slot-minutes 15 --grouping transitive
//!
//! # Where an item lands when dropped at 16:07
//! echo '{"id":"a","start":"2024-06-03T14:00:00Z","end":"2024-06-03T14:30:00Z"}' \
//!   | schedule reschedule --drop 2024-06-03T16:07:00Z
//! ```
//!
//! Input is either a bare array of item records or an object with `items`,
//! `calendars` and `categories`. Diagnostics go to stderr; set `RUST_LOG` or
//! `--log-level` to see which items were skipped and why.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use schedule_engine::config::{Grouping, LayoutConfig};
use schedule_engine::input::{items_from_json, parse_datetime, ItemInput};
use schedule_engine::item::Schedulable;
use schedule_engine::slot::SlotGranularity;
use schedule_engine::{expand, expand_for_window, layout_by_day, reschedule};
use serde::Serialize;
use std::io::{self, Read, Write};

#[derive(Parser)]
#[command(
    name = "schedule",
    version,
    about = "Calendar recurrence expansion, overlap layout and drag rescheduling"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level for diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupingArg {
    FirstFit,
    Transitive,
}

impl From<GroupingArg> for Grouping {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::FirstFit => Grouping::FirstFit,
            GroupingArg::Transitive => Grouping::Transitive,
        }
    }
}

#[derive(clap::Args)]
struct Io {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

impl Io {
    fn source(&self) -> &str {
        self.input.as_deref().unwrap_or("stdin")
    }

    fn read_raw(&self) -> Result<String> {
        match &self.input {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path)),
            None => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read from stdin")?;
                Ok(buf)
            }
        }
    }

    /// A bare array of records or a bundle with calendars and categories.
    fn read_items(&self) -> Result<Vec<Schedulable>> {
        let json = self.read_raw()?;
        items_from_json(&json)
            .with_context(|| format!("Failed to parse items from {}", self.source()))
    }

    fn read_record(&self) -> Result<ItemInput> {
        let json = self.read_raw()?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse item from {}", self.source()))
    }

    /// Pretty JSON to the output file, or to stdout.
    fn write_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        match &self.output {
            Some(path) => std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write file: {}", path)),
            None => writeln!(io::stdout().lock(), "{}", json)
                .context("Failed to write to stdout"),
        }
    }
}

#[derive(clap::Args)]
struct Window {
    /// Start of the visible window (RFC 3339 or YYYY-MM-DDTHH:MM:SS)
    #[arg(long, requires = "window_end")]
    window_start: Option<String>,
    /// End of the visible window, exclusive
    #[arg(long, requires = "window_start")]
    window_end: Option<String>,
}

impl Window {
    fn bounds(&self) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
        match (&self.window_start, &self.window_end) {
            (Some(start), Some(end)) => {
                let start = parse_datetime(start).context("Invalid --window-start")?;
                let end = parse_datetime(end).context("Invalid --window-end")?;
                if end <= start {
                    anyhow::bail!("--window-end must be after --window-start");
                }
                Ok(Some((start, end)))
            }
            _ => Ok(None),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Expand recurring items into occurrences
    Expand {
        #[command(flatten)]
        io: Io,
        #[command(flatten)]
        window: Window,
    },
    /// Lay out timed items in overlap columns, grouped by day
    Layout {
        #[command(flatten)]
        io: Io,
        #[command(flatten)]
        window: Window,
        /// Minutes per grid row
        #[arg(long, default_value_t = 30)]
        slot_minutes: u32,
        /// Height of one grid row in render units
        #[arg(long, default_value_t = 24.0)]
        unit_height: f64,
        /// Minimum item height in render units
        #[arg(long, default_value_t = 20.0)]
        min_height: f64,
        /// Gap subtracted from each column's width, in percent
        #[arg(long, default_value_t = 1.0)]
        gap: f64,
        /// How overlapping items are grouped into columns
        #[arg(long, value_enum, default_value = "first-fit")]
        grouping: GroupingArg,
    },
    /// Compute the new time range for an item dropped at a given instant
    Reschedule {
        #[command(flatten)]
        io: Io,
        /// Drop instant (RFC 3339 or YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        drop: String,
        /// Slot granularity the drop snaps to, in minutes
        #[arg(long, default_value_t = 30)]
        slot_minutes: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = flexi_logger::Logger::try_with_env_or_str(&cli.log_level)
        .context("Invalid log level")?
        .start()
        .context("Failed to start logger")?;

    match cli.command {
        Commands::Expand { io, window } => {
            let items = io.read_items()?;
            match window.bounds()? {
                Some((start, end)) => {
                    let visible = expand_for_window(&items, start, end);
                    info!("{} items visible between {} and {}", visible.len(), start, end);
                    io.write_json(&visible)?;
                }
                None => {
                    let occurrences: Vec<_> = items.iter().flat_map(expand).collect();
                    info!("{} occurrences from {} items", occurrences.len(), items.len());
                    io.write_json(&occurrences)?;
                }
            }
        }
        Commands::Layout {
            io,
            window,
            slot_minutes,
            unit_height,
            min_height,
            gap,
            grouping,
        } => {
            let slot = SlotGranularity::new(slot_minutes)?;
            let config = LayoutConfig::new(slot, unit_height, min_height, gap, grouping.into())?;

            let mut items = io.read_items()?;
            if let Some((start, end)) = window.bounds()? {
                items = expand_for_window(&items, start, end);
            }

            io.write_json(&layout_by_day(&items, &config))?;
        }
        Commands::Reschedule {
            io,
            drop,
            slot_minutes,
        } => {
            let slot = SlotGranularity::new(slot_minutes)?;
            let drop = parse_datetime(&drop).context("Invalid --drop")?;

            let record = io.read_record()?;
            let item: Schedulable = record.resolve(&[], &[]);

            let proposed = reschedule(&item, drop, slot).with_context(|| {
                format!("Item '{}' has no usable start or its span overflows", record.id)
            })?;
            io.write_json(&proposed)?;
        }
    }

    Ok(())
}

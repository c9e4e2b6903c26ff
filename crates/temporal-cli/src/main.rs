//! `temporal` CLI: calendar arithmetic, rounding and time zone resolution
//! from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Difference between two dates, in months
//! temporal until 2024-01-31 2024-03-01 --largest-unit months
//!
//! # Add a duration (JSON fields) to a zoned value
//! temporal add '2024-03-09T12:00:00[America/New_York]' --duration '{"days": 1}'
//!
//! # Round an instant to 15 minutes
//! temporal round 2024-03-10T07:38:00Z --smallest-unit minute --increment 15
//!
//! # Resolve a wall-clock time that falls in a DST gap
//! temporal resolve 2024-03-10T02:30:00 --tz America/New_York --disambiguation earlier
//!
//! # Next three offset changes
//! temporal transitions --tz Europe/London --from 2024-01-01T00:00:00Z --count 3
//! ```
//!
//! Value strings: `2024-03-10` (date), `02:30:00` (time),
//! `2024-03-10T02:30:00` (date-time), `2024-03-10T07:30:00Z` (instant),
//! `2024-03-10T02:30:00[America/New_York]` or
//! `2024-03-10T03:30:00-04:00[America/New_York]` (zoned).

use std::fmt;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use clap::{Parser, Subcommand};
use log::debug;
use serde_json::json;
use temporal_engine::{
    DifferenceSettings, Disambiguation, Duration, Instant, Overflow, PlainDate, PlainDateTime,
    PlainTime, RoundingMode, RoundingOptions, TimeZone, Unit, ZonedDateTime,
};

#[derive(Parser)]
#[command(
    name = "temporal",
    version,
    about = "Calendar arithmetic, rounding and DST-aware time zone resolution"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Duration from <FROM> to <TO>
    Until(DifferenceArgs),
    /// Duration from <TO> back to <FROM>
    Since(DifferenceArgs),
    /// Add a duration to a value
    Add(ArithmeticArgs),
    /// Subtract a duration from a value
    Subtract(ArithmeticArgs),
    /// Round a value to a unit
    Round {
        value: String,
        #[arg(long)]
        smallest_unit: Unit,
        #[arg(long, default_value_t = 1)]
        increment: u32,
        /// Rounding mode (default: halfExpand)
        #[arg(long)]
        mode: Option<RoundingMode>,
        #[arg(long, default_value = "compatible")]
        disambiguation: Disambiguation,
    },
    /// Resolve a wall-clock date-time in a time zone
    Resolve {
        datetime: String,
        #[arg(long)]
        tz: String,
        #[arg(long, default_value = "compatible")]
        disambiguation: Disambiguation,
    },
    /// List offset transitions of a time zone
    Transitions {
        #[arg(long)]
        tz: String,
        /// Starting instant (e.g. 2024-01-01T00:00:00Z)
        #[arg(long)]
        from: String,
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Search backwards from the starting instant
        #[arg(long)]
        backward: bool,
    },
}

#[derive(clap::Args)]
struct DifferenceArgs {
    from: String,
    to: String,
    #[arg(long)]
    largest_unit: Option<Unit>,
    #[arg(long)]
    smallest_unit: Option<Unit>,
    #[arg(long, default_value_t = 1)]
    increment: u32,
    /// Rounding mode (default: trunc)
    #[arg(long)]
    mode: Option<RoundingMode>,
    #[arg(long, default_value = "compatible")]
    disambiguation: Disambiguation,
}

#[derive(clap::Args)]
struct ArithmeticArgs {
    value: String,
    /// Duration as a JSON object, e.g. '{"months": 1, "days": 2}'
    #[arg(long)]
    duration: String,
    #[arg(long, default_value = "constrain")]
    overflow: Overflow,
    #[arg(long, default_value = "compatible")]
    disambiguation: Disambiguation,
}

/// A parsed command-line value.
#[derive(Debug)]
enum Value {
    Date(PlainDate),
    Time(PlainTime),
    DateTime(PlainDateTime),
    Instant(Instant),
    Zoned(ZonedDateTime),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "date-time",
            Value::Instant(_) => "instant",
            Value::Zoned(_) => "zoned date-time",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Date(v) => fmt::Display::fmt(v, f),
            Value::Time(v) => fmt::Display::fmt(v, f),
            Value::DateTime(v) => fmt::Display::fmt(v, f),
            Value::Instant(v) => fmt::Display::fmt(v, f),
            Value::Zoned(v) => fmt::Display::fmt(v, f),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Until(args) => {
            let duration = difference(&args, false)?;
            print_duration(&duration, cli.json)?;
        }
        Commands::Since(args) => {
            let duration = difference(&args, true)?;
            print_duration(&duration, cli.json)?;
        }
        Commands::Add(args) => {
            let result = arithmetic(&args, false)?;
            print_value(&result, cli.json);
        }
        Commands::Subtract(args) => {
            let result = arithmetic(&args, true)?;
            print_value(&result, cli.json);
        }
        Commands::Round {
            value,
            smallest_unit,
            increment,
            mode,
            disambiguation,
        } => {
            let mut options = RoundingOptions::new(smallest_unit).increment(increment);
            if let Some(mode) = mode {
                options = options.mode(mode);
            }
            let rounded = match parse_value(&value, disambiguation)? {
                Value::Time(v) => Value::Time(v.round(options)?),
                Value::DateTime(v) => Value::DateTime(v.round(options)?),
                Value::Instant(v) => Value::Instant(v.round(options)?),
                Value::Zoned(v) => Value::Zoned(v.round(options)?),
                Value::Date(_) => bail!("a date cannot be rounded"),
            };
            print_value(&rounded, cli.json);
        }
        Commands::Resolve {
            datetime,
            tz,
            disambiguation,
        } => {
            let time_zone = time_zone(&tz)?;
            let date_time = match parse_value(&datetime, disambiguation)? {
                Value::DateTime(v) => v,
                Value::Date(v) => v.to_plain_date_time(None)?,
                other => bail!("resolve takes a local date-time, got a {}", other.kind()),
            };
            let candidates = time_zone.possible_instants_for(&date_time)?;
            let chosen = ZonedDateTime::from_plain_date_time(&date_time, &time_zone, disambiguation)
                .with_context(|| format!("Failed to resolve {} in {}", date_time, tz))?;
            if cli.json {
                let out = json!({
                    "candidates": candidates,
                    "instant": chosen.to_instant(),
                    "zoned": chosen,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                let listed: Vec<String> = candidates.iter().map(ToString::to_string).collect();
                println!("candidates: [{}]", listed.join(", "));
                println!("instant:    {}", chosen.to_instant());
                println!("zoned:      {}", chosen);
            }
        }
        Commands::Transitions {
            tz,
            from,
            count,
            backward,
        } => {
            let time_zone = time_zone(&tz)?;
            let start = match parse_value(&from, Disambiguation::Compatible)? {
                Value::Instant(v) => v,
                Value::Zoned(v) => v.to_instant(),
                other => bail!("--from must be an exact instant, got a {}", other.kind()),
            };
            let mut found = Vec::new();
            let mut cursor = start;
            while found.len() < count {
                let next = if backward {
                    time_zone.previous_transition(&cursor)
                } else {
                    time_zone.next_transition(&cursor)
                };
                let Some(instant) = next else { break };
                found.push(instant.to_zoned_date_time_iso(time_zone.clone()));
                cursor = instant;
            }
            debug!("found {} of {} requested transitions in {}", found.len(), count, tz);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                for zdt in &found {
                    println!("{}", zdt);
                }
            }
        }
    }

    Ok(())
}

fn difference(args: &DifferenceArgs, since: bool) -> Result<Duration> {
    let mut settings = DifferenceSettings::default().increment(args.increment);
    settings.largest_unit = args.largest_unit;
    settings.smallest_unit = args.smallest_unit;
    if let Some(mode) = args.mode {
        settings = settings.mode(mode);
    }

    let from = parse_value(&args.from, args.disambiguation)?;
    let to = parse_value(&args.to, args.disambiguation)?;
    let duration = match (&from, &to) {
        (Value::Date(a), Value::Date(b)) if since => a.since(b, settings)?,
        (Value::Date(a), Value::Date(b)) => a.until(b, settings)?,
        (Value::Time(a), Value::Time(b)) if since => a.since(b, settings)?,
        (Value::Time(a), Value::Time(b)) => a.until(b, settings)?,
        (Value::DateTime(a), Value::DateTime(b)) if since => a.since(b, settings)?,
        (Value::DateTime(a), Value::DateTime(b)) => a.until(b, settings)?,
        (Value::Instant(a), Value::Instant(b)) if since => a.since(b, settings)?,
        (Value::Instant(a), Value::Instant(b)) => a.until(b, settings)?,
        (Value::Zoned(a), Value::Zoned(b)) if since => a.since(b, settings)?,
        (Value::Zoned(a), Value::Zoned(b)) => a.until(b, settings)?,
        _ => bail!(
            "cannot take the difference between a {} and a {}",
            from.kind(),
            to.kind()
        ),
    };
    Ok(duration)
}

fn arithmetic(args: &ArithmeticArgs, subtract: bool) -> Result<Value> {
    let duration: Duration = serde_json::from_str(&args.duration)
        .with_context(|| format!("Invalid duration JSON: {}", args.duration))?;
    let duration = if subtract { duration.negated() } else { duration };
    let overflow = args.overflow;

    let result = match parse_value(&args.value, args.disambiguation)? {
        Value::Date(v) => Value::Date(v.add(&duration, overflow)?),
        Value::Time(v) => Value::Time(v.add(&duration)),
        Value::DateTime(v) => Value::DateTime(v.add(&duration, overflow)?),
        Value::Instant(v) => Value::Instant(v.add(&duration)?),
        Value::Zoned(v) => Value::Zoned(v.add(&duration, overflow)?),
    };
    Ok(result)
}

fn print_duration(duration: &Duration, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(duration)?);
    } else {
        println!("{}", duration);
    }
    Ok(())
}

fn print_value(value: &Value, as_json: bool) {
    if as_json {
        println!("{}", json!({ "kind": value.kind(), "value": value.to_string() }));
    } else {
        println!("{}", value);
    }
}

fn time_zone(id: &str) -> Result<TimeZone> {
    TimeZone::new(id).with_context(|| format!("Unknown time zone: {}", id))
}

// ── Value parsing ───────────────────────────────────────────────────────────

/// Parses any of the supported value strings. `disambiguation` applies to
/// zoned values given without an offset.
fn parse_value(raw: &str, disambiguation: Disambiguation) -> Result<Value> {
    let raw = raw.trim();
    let value = if let Some((body, rest)) = raw.split_once('[') {
        let Some(zone_id) = rest.strip_suffix(']') else {
            bail!("unterminated time zone annotation in '{}'", raw);
        };
        Value::Zoned(parse_zoned(body, &time_zone(zone_id)?, disambiguation)?)
    } else if let Ok(exact) = DateTime::parse_from_rfc3339(raw) {
        Value::Instant(instant_from_chrono(&exact)?)
    } else if let Some(date_time) = parse_naive_date_time(raw) {
        Value::DateTime(plain_date_time_from_chrono(&date_time)?)
    } else if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Value::Date(plain_date_from_chrono(&date)?)
    } else if let Some(time) = parse_naive_time(raw) {
        Value::Time(plain_time_from_chrono(&time)?)
    } else {
        bail!("unrecognized value '{}'", raw);
    };
    debug!("parsed '{}' as {}", raw, value.kind());
    Ok(value)
}

/// A zoned value: with an offset the instant is exact and the offset must
/// match the zone; without one the wall clock is resolved.
fn parse_zoned(body: &str, time_zone: &TimeZone, disambiguation: Disambiguation) -> Result<ZonedDateTime> {
    if let Ok(exact) = DateTime::parse_from_rfc3339(body) {
        let instant = instant_from_chrono(&exact)?;
        let expected = i64::from(exact.offset().local_minus_utc()) * 1_000_000_000;
        let actual = time_zone.offset_nanoseconds_for(&instant);
        if expected != actual {
            bail!(
                "offset {} does not match {} at that instant",
                exact.offset(),
                time_zone
            );
        }
        return Ok(ZonedDateTime::new(instant, time_zone.clone()));
    }
    let date_time = match parse_naive_date_time(body) {
        Some(date_time) => plain_date_time_from_chrono(&date_time)?,
        None => bail!("unrecognized date-time '{}'", body),
    };
    Ok(ZonedDateTime::from_plain_date_time(&date_time, time_zone, disambiguation)?)
}

fn parse_naive_date_time(raw: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

fn parse_naive_time(raw: &str) -> Option<NaiveTime> {
    ["%H:%M:%S%.f", "%H:%M"]
        .into_iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
}

fn instant_from_chrono(exact: &DateTime<chrono::FixedOffset>) -> Result<Instant> {
    let nanoseconds =
        i128::from(exact.timestamp()) * 1_000_000_000 + i128::from(exact.timestamp_subsec_nanos());
    Ok(Instant::from_epoch_nanoseconds(nanoseconds)?)
}

fn plain_date_from_chrono(date: &NaiveDate) -> Result<PlainDate> {
    Ok(PlainDate::new(date.year(), date.month() as u8, date.day() as u8)?)
}

fn plain_time_from_chrono(time: &NaiveTime) -> Result<PlainTime> {
    let nanos = time.nanosecond();
    if nanos >= 1_000_000_000 {
        bail!("leap seconds are not supported");
    }
    Ok(PlainTime::new(
        time.hour() as u8,
        time.minute() as u8,
        time.second() as u8,
        (nanos / 1_000_000) as u16,
        (nanos / 1_000 % 1_000) as u16,
        (nanos % 1_000) as u16,
    )?)
}

fn plain_date_time_from_chrono(date_time: &NaiveDateTime) -> Result<PlainDateTime> {
    Ok(PlainDateTime::new(
        plain_date_from_chrono(&date_time.date())?,
        plain_time_from_chrono(&date_time.time())?,
    )?)
}

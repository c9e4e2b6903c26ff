//! # temporal-engine
//!
//! Exact, calendar- and timezone-aware date/time arithmetic on the ISO-8601
//! proleptic Gregorian calendar.
//!
//! Values are immutable: an absolute [`Instant`], a calendar [`PlainDate`], a
//! wall-clock [`PlainTime`], a [`PlainDateTime`] pair and a [`ZonedDateTime`]
//! anchored to a [`TimeZone`]. A [`Duration`] measures the distance between
//! them. Every result is computed with integer nanoseconds and explicit
//! calendar math, including wall-clock times that fall in a DST gap or
//! overlap.
//!
//! ## Modules
//!
//! - [`duration`]: sign-consistent durations, balancing, rounding and totals
//! - [`calendar`]: leap years, month lengths, date add/subtract
//! - [`rounding`]: round-to-increment over nine rounding modes
//! - [`tz`]: offset lookup, transitions, wall-clock disambiguation
//! - [`options`]: typed units, rounding modes and overflow policies
//! - [`now`]: the system clock
//! - [`error`]: error types

pub mod calendar;
mod difference;
pub mod duration;
pub mod error;
mod fmt;
pub mod instant;
pub mod now;
pub mod options;
pub mod plain_date;
pub mod plain_date_time;
pub mod plain_time;
pub mod rounding;
pub mod traits;
pub mod tz;
pub mod zoned_date_time;

pub use duration::{DateDuration, Duration, PartialDuration};
pub use error::{Result, TemporalError};
pub use instant::Instant;
pub use now::Now;
pub use options::{
    DifferenceSettings, Disambiguation, Overflow, RelativeTo, RoundingMode, RoundingOptions, Unit,
};
pub use plain_date::{PartialDate, PlainDate};
pub use plain_date_time::PlainDateTime;
pub use plain_time::{PartialTime, PlainTime};
pub use rounding::round_to_increment;
pub use traits::{HasDate, HasInstant, HasTime};
pub use tz::provider::{TableProvider, TimeZoneProvider, TzdbProvider};
pub use tz::{TimeZone, Transition, TransitionTable};
pub use zoned_date_time::ZonedDateTime;

pub const NS_PER_MICROSECOND: i128 = 1_000;
pub const NS_PER_MILLISECOND: i128 = 1_000_000;
pub const NS_PER_SECOND: i128 = 1_000_000_000;
pub const NS_PER_MINUTE: i128 = 60 * NS_PER_SECOND;
pub const NS_PER_HOUR: i128 = 60 * NS_PER_MINUTE;
pub const NS_PER_DAY: i128 = 24 * NS_PER_HOUR;

/// Largest supported distance from the epoch, in nanoseconds (10^8 days).
pub const NS_MAX_INSTANT: i128 = NS_PER_DAY * 100_000_000;

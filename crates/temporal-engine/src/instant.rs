//! Exact points on the UTC timeline.

use crate::difference::{self, Operation, UnitGroup};
use crate::duration::{Duration, InternalDuration};
use crate::error::{Result, TemporalError};
use crate::options::{DifferenceSettings, RoundingOptions, Unit};
use crate::rounding;
use crate::tz::TimeZone;
use crate::zoned_date_time::ZonedDateTime;
use crate::{NS_MAX_INSTANT, NS_PER_DAY, NS_PER_MICROSECOND, NS_PER_MILLISECOND, NS_PER_SECOND};

/// Nanoseconds since 1970-01-01T00:00:00Z, within ±10^8 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(i128);

impl Instant {
    /// # Errors
    ///
    /// Returns [`TemporalError::Range`] outside ±8.64e21 nanoseconds.
    pub fn from_epoch_nanoseconds(epoch_nanoseconds: i128) -> Result<Self> {
        if epoch_nanoseconds.abs() > NS_MAX_INSTANT {
            return Err(TemporalError::range(format!(
                "instant {}ns is outside the supported range",
                epoch_nanoseconds
            )));
        }
        Ok(Instant(epoch_nanoseconds))
    }

    pub fn from_epoch_microseconds(epoch_microseconds: i128) -> Result<Self> {
        let nanoseconds = epoch_microseconds
            .checked_mul(NS_PER_MICROSECOND)
            .ok_or_else(|| TemporalError::range("instant out of range"))?;
        Instant::from_epoch_nanoseconds(nanoseconds)
    }

    pub fn from_epoch_milliseconds(epoch_milliseconds: i64) -> Result<Self> {
        Instant::from_epoch_nanoseconds(i128::from(epoch_milliseconds) * NS_PER_MILLISECOND)
    }

    pub fn from_epoch_seconds(epoch_seconds: i64) -> Result<Self> {
        Instant::from_epoch_nanoseconds(i128::from(epoch_seconds) * NS_PER_SECOND)
    }

    pub fn epoch_nanoseconds(&self) -> i128 {
        self.0
    }

    /// Rounded toward negative infinity, like the other coarser accessors.
    pub fn epoch_microseconds(&self) -> i128 {
        self.0.div_euclid(NS_PER_MICROSECOND)
    }

    pub fn epoch_milliseconds(&self) -> i64 {
        // |ns| <= 8.64e21, so milliseconds fit in an i64.
        self.0.div_euclid(NS_PER_MILLISECOND) as i64
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.0.div_euclid(NS_PER_SECOND) as i64
    }

    /// Adds hours and smaller units.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Range`] if the duration has days or calendar
    /// units, or the result is out of range.
    pub fn add(&self, duration: &Duration) -> Result<Instant> {
        if duration.date_duration().sign() != 0 {
            return Err(TemporalError::range(
                "an instant can only be moved by hours or smaller units",
            ));
        }
        Instant::from_epoch_nanoseconds(self.0 + duration.time_nanoseconds())
    }

    pub fn subtract(&self, duration: &Duration) -> Result<Instant> {
        self.add(&duration.negated())
    }

    /// The exact time from `self` to `other`, in nanoseconds unless a larger
    /// unit (at most hours) is requested.
    ///
    /// # Examples
    ///
    /// ```
    /// use temporal_engine::{DifferenceSettings, Instant, Unit};
    ///
    /// let a = Instant::from_epoch_seconds(0).unwrap();
    /// let b = Instant::from_epoch_seconds(5_400).unwrap();
    /// let d = a.until(&b, DifferenceSettings::default().largest(Unit::Hour)).unwrap();
    /// assert_eq!((d.hours(), d.minutes()), (1, 30));
    /// ```
    pub fn until(&self, other: &Instant, settings: DifferenceSettings) -> Result<Duration> {
        self.difference(Operation::Until, other, &settings)
    }

    pub fn since(&self, other: &Instant, settings: DifferenceSettings) -> Result<Duration> {
        self.difference(Operation::Since, other, &settings)
    }

    fn difference(
        &self,
        operation: Operation,
        other: &Instant,
        settings: &DifferenceSettings,
    ) -> Result<Duration> {
        let resolved = difference::resolve_settings(operation, settings, UnitGroup::INSTANT)?;
        let time = difference::round_time(other.0 - self.0, &resolved)?;
        let duration = Duration::from_internal(
            InternalDuration::new(Default::default(), time),
            resolved.largest_unit,
        )?;
        Ok(operation.apply(duration))
    }

    /// Rounds to `smallest_unit` (hour or smaller). The increment must
    /// divide a 24-hour day evenly.
    pub fn round(&self, options: RoundingOptions) -> Result<Instant> {
        let smallest_unit = options.required_smallest_unit()?;
        let unit_ns = match smallest_unit.nanoseconds() {
            Some(unit_ns) if smallest_unit <= Unit::Hour => unit_ns,
            _ => {
                return Err(TemporalError::range(format!(
                    "cannot round an instant to {}",
                    smallest_unit
                )))
            }
        };
        let per_day = (NS_PER_DAY / unit_ns) as u64;
        let increment = rounding::validate_increment(options.increment, per_day, true)?;
        Instant::from_epoch_nanoseconds(rounding::round_unchecked(self.0, unit_ns * increment, options.mode))
    }

    /// This instant read in `time_zone`.
    pub fn to_zoned_date_time_iso(&self, time_zone: TimeZone) -> ZonedDateTime {
        ZonedDateTime::new(*self, time_zone)
    }
}

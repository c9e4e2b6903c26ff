//! A calendar date paired with a wall-clock time, with no time zone.

use crate::calendar::add_date_duration;
use crate::difference::{self, Operation, UnitGroup};
use crate::duration::{DateDuration, Duration, InternalDuration};
use crate::error::{Result, TemporalError};
use crate::options::{DifferenceSettings, Disambiguation, Overflow, RoundingOptions, Unit};
use crate::plain_date::{PartialDate, PlainDate};
use crate::plain_time::{PartialTime, PlainTime};
use crate::rounding;
use crate::tz::TimeZone;
use crate::zoned_date_time::ZonedDateTime;
use crate::{NS_MAX_INSTANT, NS_PER_DAY};

/// A date and a time of day, ordered chronologically.
///
/// The supported range extends one day past the instant range on both
/// sides, so every instant has a wall-clock reading in every time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainDateTime {
    date: PlainDate,
    time: PlainTime,
}

impl PlainDateTime {
    /// # Errors
    ///
    /// Returns [`TemporalError::Range`] if the combination lies outside the
    /// supported range.
    pub fn new(date: PlainDate, time: PlainTime) -> Result<Self> {
        let date_time = PlainDateTime { date, time };
        let local = date_time.local_epoch_ns();
        if local <= -NS_MAX_INSTANT - NS_PER_DAY || local >= NS_MAX_INSTANT + NS_PER_DAY {
            return Err(TemporalError::range("date-time is outside the supported range"));
        }
        Ok(date_time)
    }

    /// Builds a date-time from ISO fields, rejecting invalid ones.
    #[allow(clippy::too_many_arguments)]
    pub fn new_iso(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
    ) -> Result<Self> {
        let date = PlainDate::new(year, month, day)?;
        let time = PlainTime::new(hour, minute, second, millisecond, microsecond, nanosecond)?;
        PlainDateTime::new(date, time)
    }

    /// The wall clock read as if it were UTC.
    pub(crate) fn local_epoch_ns(&self) -> i128 {
        i128::from(self.date.epoch_days()) * NS_PER_DAY + self.time.nanosecond_of_day_exact()
    }

    /// For readings derived from an in-range instant and an offset below
    /// one day, which always lie inside the supported range.
    pub(crate) fn from_local_epoch_ns_unchecked(local: i128) -> Self {
        let (days, time) = PlainTime::balance(local);
        PlainDateTime {
            date: PlainDate::from_epoch_days_unchecked(days as i64),
            time,
        }
    }

    pub fn date(&self) -> PlainDate {
        self.date
    }

    pub fn time(&self) -> PlainTime {
        self.time
    }

    /// Replaces the date and time fields that are set.
    pub fn with(&self, date: PartialDate, time: PartialTime, overflow: Overflow) -> Result<Self> {
        if date.is_empty() && time.is_empty() {
            return Err(TemporalError::invalid_argument("no fields to replace"));
        }
        let new_date = if date.is_empty() {
            self.date
        } else {
            self.date.with(date, overflow)?
        };
        let new_time = if time.is_empty() {
            self.time
        } else {
            self.time.with(time, overflow)?
        };
        PlainDateTime::new(new_date, new_time)
    }

    /// Same date at `time`, or at midnight.
    pub fn with_plain_time(&self, time: Option<PlainTime>) -> Result<Self> {
        PlainDateTime::new(self.date, time.unwrap_or_default())
    }

    pub fn with_plain_date(&self, date: PlainDate) -> Result<Self> {
        PlainDateTime::new(date, self.time)
    }

    /// Adds a duration. The time fields are added first; whole days they
    /// carry are added to the date together with the duration's days.
    ///
    /// # Examples
    ///
    /// ```
    /// use temporal_engine::{Duration, Overflow, PartialDuration, PlainDateTime};
    ///
    /// let dt = PlainDateTime::new_iso(2024, 1, 31, 22, 0, 0, 0, 0, 0).unwrap();
    /// let d = Duration::from_partial(PartialDuration::empty().with_months(1).with_hours(3)).unwrap();
    /// assert_eq!(dt.add(&d, Overflow::Constrain).unwrap().to_string(), "2024-03-01T01:00:00");
    /// ```
    pub fn add(&self, duration: &Duration, overflow: Overflow) -> Result<Self> {
        self.add_internal(duration.to_internal(), overflow)
    }

    pub fn subtract(&self, duration: &Duration, overflow: Overflow) -> Result<Self> {
        self.add(&duration.negated(), overflow)
    }

    pub(crate) fn add_internal(&self, duration: InternalDuration, overflow: Overflow) -> Result<Self> {
        let (carry, time) = PlainTime::balance(self.time.nanosecond_of_day_exact() + duration.time);
        let carry = i64::try_from(carry).map_err(|_| TemporalError::range("day count overflow"))?;
        let date_duration = DateDuration {
            days: duration
                .date
                .days
                .checked_add(carry)
                .ok_or_else(|| TemporalError::range("day count overflow"))?,
            ..duration.date
        };
        let date = add_date_duration(&self.date, &date_duration, overflow)?;
        PlainDateTime::new(date, time)
    }

    /// The duration from `self` to `other`, in days and smaller units by
    /// default.
    pub fn until(&self, other: &PlainDateTime, settings: DifferenceSettings) -> Result<Duration> {
        self.difference(Operation::Until, other, &settings)
    }

    pub fn since(&self, other: &PlainDateTime, settings: DifferenceSettings) -> Result<Duration> {
        self.difference(Operation::Since, other, &settings)
    }

    fn difference(
        &self,
        operation: Operation,
        other: &PlainDateTime,
        settings: &DifferenceSettings,
    ) -> Result<Duration> {
        let resolved = difference::resolve_settings(operation, settings, UnitGroup::DATE_TIME)?;
        let internal = difference::difference_plain_date_time_with_rounding(self, other, &resolved)?;
        let duration = Duration::from_internal(internal, resolved.largest_unit)?;
        Ok(operation.apply(duration))
    }

    /// Rounds to `smallest_unit` (day or smaller). Rounding to days only
    /// accepts an increment of 1.
    pub fn round(&self, options: RoundingOptions) -> Result<Self> {
        let smallest_unit = options.required_smallest_unit()?;
        let increment = match smallest_unit {
            Unit::Day => rounding::validate_increment(options.increment, 1, true)?,
            unit if unit < Unit::Day => rounding::validate_increment_for_unit(unit, options.increment)?,
            unit => {
                return Err(TemporalError::range(format!(
                    "cannot round a date-time to {}",
                    unit
                )))
            }
        };
        let step = smallest_unit.nanoseconds().unwrap_or(NS_PER_DAY) * increment;
        let rounded = rounding::round_unchecked(self.time.nanosecond_of_day_exact(), step, options.mode);
        let (carry, time) = PlainTime::balance(rounded);
        let carry = DateDuration {
            days: carry as i64,
            ..DateDuration::default()
        };
        let date = add_date_duration(&self.date, &carry, Overflow::Constrain)?;
        PlainDateTime::new(date, time)
    }

    pub fn to_plain_date(&self) -> PlainDate {
        self.date
    }

    pub fn to_plain_time(&self) -> PlainTime {
        self.time
    }

    pub fn to_zoned_date_time(
        &self,
        time_zone: &TimeZone,
        disambiguation: Disambiguation,
    ) -> Result<ZonedDateTime> {
        ZonedDateTime::from_plain_date_time(self, time_zone, disambiguation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_epoch_ns_roundtrips() {
        let dt = PlainDateTime::new_iso(1969, 12, 31, 23, 59, 59, 999, 999, 999).unwrap();
        assert_eq!(dt.local_epoch_ns(), -1);
        assert_eq!(PlainDateTime::from_local_epoch_ns_unchecked(-1), dt);
    }

    #[test]
    fn range_extends_one_day_past_instants() {
        assert!(PlainDateTime::new_iso(-271_821, 4, 19, 0, 0, 0, 0, 0, 1).is_ok());
        assert!(PlainDateTime::new_iso(-271_821, 4, 19, 0, 0, 0, 0, 0, 0).is_err());
        assert!(PlainDateTime::new_iso(275_760, 9, 13, 23, 59, 59, 999, 999, 999).is_ok());
        assert!(PlainDateTime::new_iso(275_760, 9, 14, 0, 0, 0, 0, 0, 0).is_err());
    }
}

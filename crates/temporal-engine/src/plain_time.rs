//! Wall-clock times of day.

use crate::difference::{self, Operation, UnitGroup};
use crate::duration::{Duration, InternalDuration};
use crate::error::{Result, TemporalError};
use crate::options::{DifferenceSettings, Disambiguation, Overflow, RoundingOptions, Unit};
use crate::plain_date::PlainDate;
use crate::plain_date_time::PlainDateTime;
use crate::rounding;
use crate::tz::TimeZone;
use crate::zoned_date_time::ZonedDateTime;
use crate::{NS_PER_DAY, NS_PER_HOUR, NS_PER_MICROSECOND, NS_PER_MILLISECOND, NS_PER_MINUTE, NS_PER_SECOND};

/// Time fields that may be left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartialTime {
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub millisecond: Option<u16>,
    pub microsecond: Option<u16>,
    pub nanosecond: Option<u16>,
}

impl PartialTime {
    pub fn is_empty(&self) -> bool {
        *self == PartialTime::default()
    }
}

/// A time of day with nanosecond precision. The default is midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PlainTime {
    hour: u8,
    minute: u8,
    second: u8,
    millisecond: u16,
    microsecond: u16,
    nanosecond: u16,
}

impl PlainTime {
    /// Builds a time, rejecting out-of-range fields.
    pub fn new(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
    ) -> Result<Self> {
        PlainTime::new_with_overflow(
            hour,
            minute,
            second,
            millisecond,
            microsecond,
            nanosecond,
            Overflow::Reject,
        )
    }

    /// Builds a time; `Constrain` clamps each field to its maximum.
    pub fn new_with_overflow(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
        overflow: Overflow,
    ) -> Result<Self> {
        let fields = [
            ("hour", u16::from(hour), 23),
            ("minute", u16::from(minute), 59),
            ("second", u16::from(second), 59),
            ("millisecond", millisecond, 999),
            ("microsecond", microsecond, 999),
            ("nanosecond", nanosecond, 999),
        ];
        let mut regulated = [0u16; 6];
        for (slot, (name, value, max)) in regulated.iter_mut().zip(fields) {
            *slot = match overflow {
                Overflow::Constrain => value.min(max),
                Overflow::Reject if value > max => {
                    return Err(TemporalError::range(format!(
                        "{} {} out of range 0..={}",
                        name, value, max
                    )));
                }
                Overflow::Reject => value,
            };
        }
        Ok(PlainTime {
            hour: regulated[0] as u8,
            minute: regulated[1] as u8,
            second: regulated[2] as u8,
            millisecond: regulated[3],
            microsecond: regulated[4],
            nanosecond: regulated[5],
        })
    }

    /// # Errors
    ///
    /// Returns [`TemporalError::Range`] unless `0 <= nanoseconds < 86_400e9`.
    pub fn from_nanosecond_of_day(nanoseconds: i64) -> Result<Self> {
        let nanoseconds = i128::from(nanoseconds);
        if !(0..NS_PER_DAY).contains(&nanoseconds) {
            return Err(TemporalError::range(format!(
                "nanosecond of day {} out of range",
                nanoseconds
            )));
        }
        Ok(PlainTime::balance(nanoseconds).1)
    }

    /// Splits any nanosecond count into whole days and a time of day.
    pub(crate) fn balance(nanoseconds: i128) -> (i128, PlainTime) {
        let days = nanoseconds.div_euclid(NS_PER_DAY);
        let mut rest = nanoseconds.rem_euclid(NS_PER_DAY);
        let hour = rest / NS_PER_HOUR;
        rest %= NS_PER_HOUR;
        let minute = rest / NS_PER_MINUTE;
        rest %= NS_PER_MINUTE;
        let second = rest / NS_PER_SECOND;
        rest %= NS_PER_SECOND;
        let millisecond = rest / NS_PER_MILLISECOND;
        rest %= NS_PER_MILLISECOND;
        let microsecond = rest / NS_PER_MICROSECOND;
        let nanosecond = rest % NS_PER_MICROSECOND;
        (
            days,
            PlainTime {
                hour: hour as u8,
                minute: minute as u8,
                second: second as u8,
                millisecond: millisecond as u16,
                microsecond: microsecond as u16,
                nanosecond: nanosecond as u16,
            },
        )
    }

    /// Replaces the fields that are set.
    pub fn with(&self, partial: PartialTime, overflow: Overflow) -> Result<Self> {
        if partial.is_empty() {
            return Err(TemporalError::invalid_argument("no time fields to replace"));
        }
        PlainTime::new_with_overflow(
            partial.hour.unwrap_or(self.hour),
            partial.minute.unwrap_or(self.minute),
            partial.second.unwrap_or(self.second),
            partial.millisecond.unwrap_or(self.millisecond),
            partial.microsecond.unwrap_or(self.microsecond),
            partial.nanosecond.unwrap_or(self.nanosecond),
            overflow,
        )
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn millisecond(&self) -> u16 {
        self.millisecond
    }

    pub fn microsecond(&self) -> u16 {
        self.microsecond
    }

    pub fn nanosecond(&self) -> u16 {
        self.nanosecond
    }

    /// Nanoseconds since midnight.
    pub fn nanosecond_of_day(&self) -> i64 {
        // Always below 8.64e13.
        self.nanosecond_of_day_exact() as i64
    }

    pub(crate) fn nanosecond_of_day_exact(&self) -> i128 {
        i128::from(self.hour) * NS_PER_HOUR
            + i128::from(self.minute) * NS_PER_MINUTE
            + i128::from(self.second) * NS_PER_SECOND
            + i128::from(self.millisecond) * NS_PER_MILLISECOND
            + i128::from(self.microsecond) * NS_PER_MICROSECOND
            + i128::from(self.nanosecond)
    }

    /// Adds the time portion of `duration` (days and larger are ignored),
    /// wrapping around midnight.
    pub fn add(&self, duration: &Duration) -> PlainTime {
        self.add_nanoseconds(duration.time_nanoseconds())
    }

    pub fn subtract(&self, duration: &Duration) -> PlainTime {
        self.add_nanoseconds(-duration.time_nanoseconds())
    }

    fn add_nanoseconds(&self, nanoseconds: i128) -> PlainTime {
        PlainTime::balance(self.nanosecond_of_day_exact() + nanoseconds).1
    }

    /// The duration from `self` to `other`, in hours and smaller units.
    ///
    /// # Examples
    ///
    /// ```
    /// use temporal_engine::{DifferenceSettings, PlainTime};
    ///
    /// let a = PlainTime::new(9, 15, 0, 0, 0, 0).unwrap();
    /// let b = PlainTime::new(17, 45, 0, 0, 0, 0).unwrap();
    /// let d = a.until(&b, DifferenceSettings::default()).unwrap();
    /// assert_eq!((d.hours(), d.minutes()), (8, 30));
    /// ```
    pub fn until(&self, other: &PlainTime, settings: DifferenceSettings) -> Result<Duration> {
        self.difference(Operation::Until, other, &settings)
    }

    pub fn since(&self, other: &PlainTime, settings: DifferenceSettings) -> Result<Duration> {
        self.difference(Operation::Since, other, &settings)
    }

    fn difference(
        &self,
        operation: Operation,
        other: &PlainTime,
        settings: &DifferenceSettings,
    ) -> Result<Duration> {
        let resolved = difference::resolve_settings(operation, settings, UnitGroup::TIME)?;
        let time = other.nanosecond_of_day_exact() - self.nanosecond_of_day_exact();
        let time = difference::round_time(time, &resolved)?;
        let duration = Duration::from_internal(
            InternalDuration::new(Default::default(), time),
            resolved.largest_unit,
        )?;
        Ok(operation.apply(duration))
    }

    /// Rounds to `smallest_unit` (hour or smaller), wrapping at midnight.
    pub fn round(&self, options: RoundingOptions) -> Result<PlainTime> {
        let smallest_unit = options.required_smallest_unit()?;
        if smallest_unit > Unit::Hour {
            return Err(TemporalError::range(format!(
                "cannot round a time to {}",
                smallest_unit
            )));
        }
        let increment = rounding::validate_increment_for_unit(smallest_unit, options.increment)?;
        let step = smallest_unit.nanoseconds().unwrap_or(1) * increment;
        let rounded = rounding::round_unchecked(self.nanosecond_of_day_exact(), step, options.mode);
        Ok(PlainTime::balance(rounded).1)
    }

    pub fn to_plain_date_time(&self, date: PlainDate) -> Result<PlainDateTime> {
        PlainDateTime::new(date, *self)
    }

    pub fn to_zoned_date_time(
        &self,
        date: PlainDate,
        time_zone: &TimeZone,
        disambiguation: Disambiguation,
    ) -> Result<ZonedDateTime> {
        let date_time = PlainDateTime::new(date, *self)?;
        ZonedDateTime::from_plain_date_time(&date_time, time_zone, disambiguation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_wraps_negative_counts() {
        let (days, time) = PlainTime::balance(-NS_PER_HOUR);
        assert_eq!(days, -1);
        assert_eq!(time, PlainTime::new(23, 0, 0, 0, 0, 0).unwrap());
    }

    #[test]
    fn constrain_clamps_each_field() {
        let time = PlainTime::new_with_overflow(25, 61, 60, 1000, 0, 5, Overflow::Constrain).unwrap();
        assert_eq!(time, PlainTime::new(23, 59, 59, 999, 0, 5).unwrap());
        assert!(PlainTime::new(24, 0, 0, 0, 0, 0).is_err());
    }
}

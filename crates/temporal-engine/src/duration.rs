//! The `Duration` value: ten integer fields sharing one sign.
//!
//! Sub-day fields balance exactly with fixed factors (1000, 1000, 1000, 60,
//! 60, 24). Years, months and weeks have no fixed length, so any operation
//! that must convert them into smaller units needs a [`RelativeTo`] anchor.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::difference::{self, ResolvedSettings};
use crate::error::{Result, TemporalError};
use crate::options::{RelativeTo, RoundingOptions, Unit};
use crate::rounding;
use crate::{NS_PER_DAY, NS_PER_HOUR, NS_PER_MICROSECOND, NS_PER_MILLISECOND, NS_PER_MINUTE, NS_PER_SECOND};

/// Largest magnitude for years, months and weeks.
const MAX_CALENDAR_FIELD: i64 = (1 << 32) - 1;
/// Largest magnitude of the time portion, in nanoseconds (2^53 seconds).
const MAX_TIME_NANOSECONDS: i128 = (1i128 << 53) * NS_PER_SECOND - 1;

/// A duration whose fields may be left unset.
///
/// This is the input form for [`Duration::from_partial`] and for
/// deserialization: unset fields count as zero, but at least one field must
/// be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialDuration {
    pub years: Option<i64>,
    pub months: Option<i64>,
    pub weeks: Option<i64>,
    pub days: Option<i64>,
    pub hours: Option<i64>,
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
    pub milliseconds: Option<i64>,
    pub microseconds: Option<i128>,
    pub nanoseconds: Option<i128>,
}

impl PartialDuration {
    pub const fn empty() -> Self {
        PartialDuration {
            years: None,
            months: None,
            weeks: None,
            days: None,
            hours: None,
            minutes: None,
            seconds: None,
            milliseconds: None,
            microseconds: None,
            nanoseconds: None,
        }
    }

    pub const fn with_years(mut self, years: i64) -> Self {
        self.years = Some(years);
        self
    }

    pub const fn with_months(mut self, months: i64) -> Self {
        self.months = Some(months);
        self
    }

    pub const fn with_weeks(mut self, weeks: i64) -> Self {
        self.weeks = Some(weeks);
        self
    }

    pub const fn with_days(mut self, days: i64) -> Self {
        self.days = Some(days);
        self
    }

    pub const fn with_hours(mut self, hours: i64) -> Self {
        self.hours = Some(hours);
        self
    }

    pub const fn with_minutes(mut self, minutes: i64) -> Self {
        self.minutes = Some(minutes);
        self
    }

    pub const fn with_seconds(mut self, seconds: i64) -> Self {
        self.seconds = Some(seconds);
        self
    }

    pub const fn with_milliseconds(mut self, milliseconds: i64) -> Self {
        self.milliseconds = Some(milliseconds);
        self
    }

    pub const fn with_microseconds(mut self, microseconds: i128) -> Self {
        self.microseconds = Some(microseconds);
        self
    }

    pub const fn with_nanoseconds(mut self, nanoseconds: i128) -> Self {
        self.nanoseconds = Some(nanoseconds);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == PartialDuration::empty()
    }
}

/// The calendar portion of a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateDuration {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
}

impl DateDuration {
    pub fn sign(&self) -> i8 {
        [self.years, self.months, self.weeks, self.days]
            .into_iter()
            .find(|field| *field != 0)
            .map_or(0, |field| field.signum() as i8)
    }
}

/// A date duration plus an exact time portion in nanoseconds.
///
/// This is the working form of the difference engine: the time portion is
/// kept as one integer until the final balancing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct InternalDuration {
    pub date: DateDuration,
    pub time: i128,
}

impl InternalDuration {
    pub(crate) fn new(date: DateDuration, time: i128) -> Self {
        InternalDuration { date, time }
    }

    pub(crate) fn sign(&self) -> i8 {
        match self.date.sign() {
            0 => self.time.signum() as i8,
            sign => sign,
        }
    }
}

/// A signed amount of time, from years down to nanoseconds.
///
/// Every nonzero field has the same sign. Construction fails with a range
/// error otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "PartialDuration")]
pub struct Duration {
    years: i64,
    months: i64,
    weeks: i64,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    milliseconds: i64,
    microseconds: i128,
    nanoseconds: i128,
}

impl TryFrom<PartialDuration> for Duration {
    type Error = TemporalError;

    fn try_from(partial: PartialDuration) -> Result<Self> {
        Duration::from_partial(partial)
    }
}

impl Duration {
    /// Builds a duration from all ten fields.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Range`] if the fields have mixed signs, if
    /// years, months or weeks exceed 2^32 - 1 in magnitude, or if the time
    /// portion (days counted as 24 hours) reaches 2^53 seconds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        years: i64,
        months: i64,
        weeks: i64,
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
        milliseconds: i64,
        microseconds: i128,
        nanoseconds: i128,
    ) -> Result<Self> {
        let duration = Duration {
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds,
            milliseconds,
            microseconds,
            nanoseconds,
        };
        duration.validate()?;
        Ok(duration)
    }

    /// Builds a duration from the fields that are set.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgument`] if no field is set, and the
    /// range errors of [`Duration::new`].
    pub fn from_partial(partial: PartialDuration) -> Result<Self> {
        if partial.is_empty() {
            return Err(TemporalError::invalid_argument(
                "duration requires at least one field",
            ));
        }
        Duration::new(
            partial.years.unwrap_or_default(),
            partial.months.unwrap_or_default(),
            partial.weeks.unwrap_or_default(),
            partial.days.unwrap_or_default(),
            partial.hours.unwrap_or_default(),
            partial.minutes.unwrap_or_default(),
            partial.seconds.unwrap_or_default(),
            partial.milliseconds.unwrap_or_default(),
            partial.microseconds.unwrap_or_default(),
            partial.nanoseconds.unwrap_or_default(),
        )
    }

    /// A duration with a single nonzero field.
    pub fn from_unit(unit: Unit, amount: i64) -> Result<Self> {
        let partial = PartialDuration::empty();
        let partial = match unit {
            Unit::Year => partial.with_years(amount),
            Unit::Month => partial.with_months(amount),
            Unit::Week => partial.with_weeks(amount),
            Unit::Day => partial.with_days(amount),
            Unit::Hour => partial.with_hours(amount),
            Unit::Minute => partial.with_minutes(amount),
            Unit::Second => partial.with_seconds(amount),
            Unit::Millisecond => partial.with_milliseconds(amount),
            Unit::Microsecond => partial.with_microseconds(i128::from(amount)),
            Unit::Nanosecond => partial.with_nanoseconds(i128::from(amount)),
        };
        Duration::from_partial(partial)
    }

    /// Balances an exact nanosecond count into fields no larger than
    /// `largest_unit`.
    ///
    /// Carries stop at hours unless `largest_unit` is a day or larger, in
    /// which case whole 24-hour days are split off as well.
    pub fn from_nanoseconds(nanoseconds: i128, largest_unit: Unit) -> Result<Self> {
        Duration::from_internal(
            InternalDuration::new(DateDuration::default(), nanoseconds),
            largest_unit,
        )
    }

    pub(crate) fn from_internal(internal: InternalDuration, largest_unit: Unit) -> Result<Self> {
        let [nanoseconds, microseconds, milliseconds, seconds, minutes, hours, days] =
            balance_time(internal.time, largest_unit);
        let narrow = |value: i128| {
            i64::try_from(value).map_err(|_| TemporalError::range("duration field out of range"))
        };
        let days = internal
            .date
            .days
            .checked_add(narrow(days)?)
            .ok_or_else(|| TemporalError::range("duration field out of range"))?;
        Duration::new(
            internal.date.years,
            internal.date.months,
            internal.date.weeks,
            days,
            narrow(hours)?,
            narrow(minutes)?,
            narrow(seconds)?,
            narrow(milliseconds)?,
            microseconds,
            nanoseconds,
        )
    }

    fn validate(&self) -> Result<()> {
        let signs = self.fields().map(i128::signum);
        let positive = signs.iter().any(|sign| *sign > 0);
        let negative = signs.iter().any(|sign| *sign < 0);
        if positive && negative {
            return Err(TemporalError::range("duration fields must all have the same sign"));
        }
        for (name, value) in [
            ("years", self.years),
            ("months", self.months),
            ("weeks", self.weeks),
        ] {
            if value.abs() > MAX_CALENDAR_FIELD {
                return Err(TemporalError::range(format!("{} {} out of range", name, value)));
            }
        }
        let total = self
            .checked_time_nanoseconds()
            .and_then(|time| time.checked_add(i128::from(self.days) * NS_PER_DAY))
            .ok_or_else(|| TemporalError::range("duration time out of range"))?;
        if total.unsigned_abs() > MAX_TIME_NANOSECONDS.unsigned_abs() {
            return Err(TemporalError::range("duration time out of range"));
        }
        Ok(())
    }

    fn fields(&self) -> [i128; 10] {
        [
            i128::from(self.years),
            i128::from(self.months),
            i128::from(self.weeks),
            i128::from(self.days),
            i128::from(self.hours),
            i128::from(self.minutes),
            i128::from(self.seconds),
            i128::from(self.milliseconds),
            self.microseconds,
            self.nanoseconds,
        ]
    }

    pub fn years(&self) -> i64 {
        self.years
    }

    pub fn months(&self) -> i64 {
        self.months
    }

    pub fn weeks(&self) -> i64 {
        self.weeks
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    pub fn hours(&self) -> i64 {
        self.hours
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn milliseconds(&self) -> i64 {
        self.milliseconds
    }

    pub fn microseconds(&self) -> i128 {
        self.microseconds
    }

    pub fn nanoseconds(&self) -> i128 {
        self.nanoseconds
    }

    /// -1, 0 or 1.
    pub fn sign(&self) -> i8 {
        self.fields()
            .into_iter()
            .find(|field| *field != 0)
            .map_or(0, |field| field.signum() as i8)
    }

    pub fn is_zero(&self) -> bool {
        self.sign() == 0
    }

    pub fn negated(&self) -> Duration {
        Duration {
            years: -self.years,
            months: -self.months,
            weeks: -self.weeks,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
            milliseconds: -self.milliseconds,
            microseconds: -self.microseconds,
            nanoseconds: -self.nanoseconds,
        }
    }

    pub fn abs(&self) -> Duration {
        if self.sign() < 0 {
            self.negated()
        } else {
            *self
        }
    }

    /// The largest unit with a nonzero field, or nanoseconds for a zero
    /// duration.
    pub fn largest_nonzero_unit(&self) -> Unit {
        let units = [
            Unit::Year,
            Unit::Month,
            Unit::Week,
            Unit::Day,
            Unit::Hour,
            Unit::Minute,
            Unit::Second,
            Unit::Millisecond,
            Unit::Microsecond,
            Unit::Nanosecond,
        ];
        units
            .into_iter()
            .zip(self.fields())
            .find(|(_, value)| *value != 0)
            .map_or(Unit::Nanosecond, |(unit, _)| unit)
    }

    /// True when years, months or weeks are nonzero.
    pub fn has_calendar_units(&self) -> bool {
        self.years != 0 || self.months != 0 || self.weeks != 0
    }

    pub fn date_duration(&self) -> DateDuration {
        DateDuration {
            years: self.years,
            months: self.months,
            weeks: self.weeks,
            days: self.days,
        }
    }

    /// Hours through nanoseconds summed into one exact count, or `None` if
    /// the sum does not fit in an `i128`.
    fn checked_time_nanoseconds(&self) -> Option<i128> {
        [
            (i128::from(self.hours), NS_PER_HOUR),
            (i128::from(self.minutes), NS_PER_MINUTE),
            (i128::from(self.seconds), NS_PER_SECOND),
            (i128::from(self.milliseconds), NS_PER_MILLISECOND),
            (self.microseconds, NS_PER_MICROSECOND),
            (self.nanoseconds, 1),
        ]
        .into_iter()
        .try_fold(0i128, |sum, (value, factor)| {
            value.checked_mul(factor)?.checked_add(sum)
        })
    }

    /// Hours through nanoseconds summed into one exact count.
    ///
    /// Construction has already checked this sum, so it cannot overflow.
    pub(crate) fn time_nanoseconds(&self) -> i128 {
        i128::from(self.hours) * NS_PER_HOUR
            + i128::from(self.minutes) * NS_PER_MINUTE
            + i128::from(self.seconds) * NS_PER_SECOND
            + i128::from(self.milliseconds) * NS_PER_MILLISECOND
            + self.microseconds * NS_PER_MICROSECOND
            + self.nanoseconds
    }

    pub(crate) fn to_internal(self) -> InternalDuration {
        InternalDuration::new(self.date_duration(), self.time_nanoseconds())
    }

    /// Days and the time portion combined, treating every day as 24 hours.
    pub(crate) fn to_internal_with_24_hour_days(self) -> InternalDuration {
        let date = DateDuration {
            years: self.years,
            months: self.months,
            weeks: self.weeks,
            days: 0,
        };
        InternalDuration::new(date, self.time_nanoseconds() + i128::from(self.days) * NS_PER_DAY)
    }

    /// The date portion with whole 24-hour days of the time portion folded
    /// into `days`. The sub-day remainder is dropped.
    pub(crate) fn to_date_duration_balanced(self) -> DateDuration {
        let mut date = self.date_duration();
        // The quotient is bounded by the 2^53-second limit, so it fits.
        date.days += (self.time_nanoseconds() / NS_PER_DAY) as i64;
        date
    }

    /// Rounds this duration, optionally relative to an anchor.
    ///
    /// At least one of `smallest_unit` and `largest_unit` must be given.
    /// Without an anchor, days count as 24 hours and years, months and weeks
    /// are not allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use temporal_engine::{Duration, PartialDuration, RoundingOptions, Unit};
    ///
    /// let d = Duration::from_partial(PartialDuration::empty().with_minutes(100)).unwrap();
    /// let rounded = d.round(RoundingOptions::new(Unit::Hour), None).unwrap();
    /// assert_eq!(rounded.hours(), 2);
    /// ```
    pub fn round(&self, options: RoundingOptions, relative_to: Option<&RelativeTo>) -> Result<Duration> {
        if options.smallest_unit.is_none() && options.largest_unit.is_none() {
            return Err(TemporalError::range(
                "rounding a duration requires a smallest or largest unit",
            ));
        }
        let smallest_unit = options.smallest_unit.unwrap_or(Unit::Nanosecond);
        let existing_largest = self.largest_nonzero_unit();
        let largest_unit = options
            .largest_unit
            .unwrap_or_else(|| existing_largest.max(smallest_unit));
        if largest_unit < smallest_unit {
            return Err(TemporalError::range(format!(
                "largest unit {} is smaller than smallest unit {}",
                largest_unit, smallest_unit
            )));
        }
        let increment = rounding::validate_increment_for_unit(smallest_unit, options.increment)?;
        if increment > 1 && largest_unit != smallest_unit && smallest_unit.is_date_unit() {
            return Err(TemporalError::range(
                "a rounding increment above 1 needs largest unit equal to a date smallest unit",
            ));
        }
        let settings = ResolvedSettings {
            largest_unit,
            smallest_unit,
            increment,
            mode: options.mode,
        };

        match relative_to {
            Some(RelativeTo::Zoned(zdt)) => {
                let target = zdt.add_internal(self.to_internal(), crate::Overflow::Constrain)?;
                let internal = difference::difference_zoned_with_rounding(
                    zdt.epoch_nanoseconds(),
                    target,
                    zdt.time_zone(),
                    &settings,
                )?;
                let balance_unit = if largest_unit.is_date_unit() {
                    Unit::Hour
                } else {
                    largest_unit
                };
                Duration::from_internal(internal, balance_unit)
            }
            Some(RelativeTo::Date(date)) => {
                let anchor = date.to_plain_date_time(None)?;
                let target = anchor.add_internal(self.to_internal(), crate::Overflow::Constrain)?;
                let internal =
                    difference::difference_plain_date_time_with_rounding(&anchor, &target, &settings)?;
                Duration::from_internal(internal, largest_unit)
            }
            None => {
                if existing_largest.is_calendar_unit() || largest_unit.is_calendar_unit() {
                    return Err(TemporalError::range(
                        "rounding years, months or weeks requires a relative-to anchor",
                    ));
                }
                let internal = self.to_internal_with_24_hour_days();
                let time = difference::round_time(internal.time, &settings)?;
                Duration::from_nanoseconds(time, largest_unit)
            }
        }
    }

    /// This duration expressed as a (possibly fractional) number of `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Range`] if the duration has years, months or
    /// weeks, or `unit` is a calendar unit, and no anchor is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use temporal_engine::{Duration, PartialDuration, PlainDate, RelativeTo, Unit};
    ///
    /// let d = Duration::from_partial(PartialDuration::empty().with_hours(36)).unwrap();
    /// assert_eq!(d.total(Unit::Day, None).unwrap(), 1.5);
    ///
    /// let month = Duration::from_unit(Unit::Month, 1).unwrap();
    /// let feb = RelativeTo::Date(PlainDate::new(2024, 2, 1).unwrap());
    /// assert_eq!(month.total(Unit::Day, Some(&feb)).unwrap(), 29.0);
    /// assert!(month.total(Unit::Day, None).is_err());
    /// ```
    pub fn total(&self, unit: Unit, relative_to: Option<&RelativeTo>) -> Result<f64> {
        match relative_to {
            Some(RelativeTo::Zoned(zdt)) => {
                let target = zdt.add_internal(self.to_internal(), crate::Overflow::Constrain)?;
                difference::difference_zoned_with_total(
                    zdt.epoch_nanoseconds(),
                    target,
                    zdt.time_zone(),
                    unit,
                )
            }
            Some(RelativeTo::Date(date)) => {
                let anchor = date.to_plain_date_time(None)?;
                let target = anchor.add_internal(self.to_internal(), crate::Overflow::Constrain)?;
                difference::difference_plain_date_time_with_total(&anchor, &target, unit)
            }
            None => {
                if self.has_calendar_units() || unit.is_calendar_unit() {
                    return Err(TemporalError::range(
                        "totaling years, months or weeks requires a relative-to anchor",
                    ));
                }
                difference::total_time(self.to_internal_with_24_hour_days().time, unit)
            }
        }
    }

    /// Adds two durations.
    ///
    /// Without an anchor both operands must be free of years, months and
    /// weeks, and days count as 24 hours. With an anchor, both are applied in
    /// turn and the result is the difference from the anchor, with the larger
    /// of the two operands' largest units.
    pub fn add(&self, other: &Duration, relative_to: Option<&RelativeTo>) -> Result<Duration> {
        let largest_unit = self.largest_nonzero_unit().max(other.largest_nonzero_unit());
        match relative_to {
            Some(RelativeTo::Zoned(zdt)) => {
                let intermediate = zdt.add_internal(self.to_internal(), crate::Overflow::Constrain)?;
                let intermediate = zdt.with_epoch_nanoseconds(intermediate)?;
                let target = intermediate.add_internal(other.to_internal(), crate::Overflow::Constrain)?;
                let settings = ResolvedSettings::unrounded(largest_unit);
                let internal = difference::difference_zoned_with_rounding(
                    zdt.epoch_nanoseconds(),
                    target,
                    zdt.time_zone(),
                    &settings,
                )?;
                let balance_unit = if largest_unit.is_date_unit() {
                    Unit::Hour
                } else {
                    largest_unit
                };
                Duration::from_internal(internal, balance_unit)
            }
            Some(RelativeTo::Date(date)) => {
                let anchor = date.to_plain_date_time(None)?;
                let intermediate = anchor.add_internal(self.to_internal(), crate::Overflow::Constrain)?;
                let target = intermediate.add_internal(other.to_internal(), crate::Overflow::Constrain)?;
                let settings = ResolvedSettings::unrounded(largest_unit);
                let internal =
                    difference::difference_plain_date_time_with_rounding(&anchor, &target, &settings)?;
                Duration::from_internal(internal, largest_unit)
            }
            None => {
                if largest_unit.is_calendar_unit() {
                    return Err(TemporalError::range(
                        "adding years, months or weeks requires a relative-to anchor",
                    ));
                }
                let sum = self.to_internal_with_24_hour_days().time
                    + other.to_internal_with_24_hour_days().time;
                Duration::from_nanoseconds(sum, largest_unit)
            }
        }
    }

    pub fn subtract(&self, other: &Duration, relative_to: Option<&RelativeTo>) -> Result<Duration> {
        self.add(&other.negated(), relative_to)
    }

    /// Orders two durations by their length from an anchor (or by exact
    /// length when neither has calendar units).
    pub fn compare(&self, other: &Duration, relative_to: Option<&RelativeTo>) -> Result<Ordering> {
        if !self.has_calendar_units() && !other.has_calendar_units() {
            if let Some(RelativeTo::Zoned(zdt)) = relative_to {
                if self.days != 0 || other.days != 0 {
                    let one = zdt.add_internal(self.to_internal(), crate::Overflow::Constrain)?;
                    let two = zdt.add_internal(other.to_internal(), crate::Overflow::Constrain)?;
                    return Ok(one.cmp(&two));
                }
            }
            let one = self.to_internal_with_24_hour_days().time;
            let two = other.to_internal_with_24_hour_days().time;
            return Ok(one.cmp(&two));
        }
        let anchor = relative_to.ok_or_else(|| {
            TemporalError::range("comparing years, months or weeks requires a relative-to anchor")
        })?;
        let (one, two) = match anchor {
            RelativeTo::Zoned(zdt) => (
                zdt.add_internal(self.to_internal(), crate::Overflow::Constrain)?,
                zdt.add_internal(other.to_internal(), crate::Overflow::Constrain)?,
            ),
            RelativeTo::Date(date) => {
                let start = date.to_plain_date_time(None)?;
                (
                    start
                        .add_internal(self.to_internal(), crate::Overflow::Constrain)?
                        .local_epoch_ns(),
                    start
                        .add_internal(other.to_internal(), crate::Overflow::Constrain)?
                        .local_epoch_ns(),
                )
            }
        };
        Ok(one.cmp(&two))
    }
}

/// Splits a nanosecond count into `[ns, us, ms, s, min, h, days]`, carrying
/// no further than `largest_unit`.
fn balance_time(nanoseconds: i128, largest_unit: Unit) -> [i128; 7] {
    const FACTORS: [i128; 6] = [1_000, 1_000, 1_000, 60, 60, 24];
    let top = match largest_unit {
        Unit::Nanosecond => 0,
        Unit::Microsecond => 1,
        Unit::Millisecond => 2,
        Unit::Second => 3,
        Unit::Minute => 4,
        Unit::Hour => 5,
        Unit::Day | Unit::Week | Unit::Month | Unit::Year => 6,
    };
    let sign = nanoseconds.signum();
    let mut carry = nanoseconds.abs();
    let mut fields = [0i128; 7];
    for (field, factor) in fields.iter_mut().zip(FACTORS).take(top) {
        *field = sign * (carry % factor);
        carry /= factor;
    }
    fields[top] = sign * carry;
    fields
}

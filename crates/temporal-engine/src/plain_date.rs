//! Calendar dates without a time of day or time zone.

use crate::calendar::{self, epoch_days_from_iso, iso_from_epoch_days, regulate_iso_date};
use crate::difference::{self, Operation, UnitGroup};
use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::options::{DifferenceSettings, Disambiguation, Overflow, Unit};
use crate::plain_date_time::PlainDateTime;
use crate::plain_time::PlainTime;
use crate::tz::TimeZone;
use crate::zoned_date_time::ZonedDateTime;

/// Earliest supported date, -271821-04-19.
const MIN_EPOCH_DAYS: i64 = -100_000_001;
/// Latest supported date, +275760-09-13.
const MAX_EPOCH_DAYS: i64 = 100_000_000;

/// Date fields that may be left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartialDate {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

impl PartialDate {
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }
}

/// A date on the proleptic Gregorian calendar.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainDate {
    year: i32,
    month: u8,
    day: u8,
}

impl PlainDate {
    /// Builds a date, rejecting fields that do not form a valid date.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Range`] for an invalid month or day, or a
    /// date outside -271821-04-19 ..= +275760-09-13.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self> {
        PlainDate::new_with_overflow(year, month, day, Overflow::Reject)
    }

    /// Builds a date, clamping or rejecting out-of-range fields.
    pub fn new_with_overflow(year: i32, month: u8, day: u8, overflow: Overflow) -> Result<Self> {
        let (year, month, day) =
            regulate_iso_date(i64::from(year), i64::from(month), i64::from(day), overflow)?;
        PlainDate::from_epoch_days(epoch_days_from_iso(year, month, day))
    }

    /// Builds a date from a full set of fields.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgument`] when any field is missing.
    pub fn from_partial(partial: PartialDate, overflow: Overflow) -> Result<Self> {
        match (partial.year, partial.month, partial.day) {
            (Some(year), Some(month), Some(day)) => {
                PlainDate::new_with_overflow(year, month, day, overflow)
            }
            _ => Err(TemporalError::invalid_argument(
                "a date requires year, month and day",
            )),
        }
    }

    /// Replaces the fields that are set.
    pub fn with(&self, partial: PartialDate, overflow: Overflow) -> Result<Self> {
        if partial.is_empty() {
            return Err(TemporalError::invalid_argument("no date fields to replace"));
        }
        PlainDate::new_with_overflow(
            partial.year.unwrap_or(self.year),
            partial.month.unwrap_or(self.month),
            partial.day.unwrap_or(self.day),
            overflow,
        )
    }

    pub(crate) fn from_epoch_days(epoch_days: i64) -> Result<Self> {
        if !(MIN_EPOCH_DAYS..=MAX_EPOCH_DAYS).contains(&epoch_days) {
            return Err(TemporalError::range(format!(
                "date {} days from the epoch is out of range",
                epoch_days
            )));
        }
        Ok(PlainDate::from_epoch_days_unchecked(epoch_days))
    }

    /// For epoch days already known to be in range.
    pub(crate) fn from_epoch_days_unchecked(epoch_days: i64) -> Self {
        let (year, month, day) = iso_from_epoch_days(epoch_days);
        PlainDate {
            year: year as i32,
            month,
            day,
        }
    }

    /// Days since 1970-01-01.
    pub fn epoch_days(&self) -> i64 {
        epoch_days_from_iso(i64::from(self.year), self.month, self.day)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// `M01` through `M12`.
    pub fn month_code(&self) -> String {
        format!("M{:02}", self.month)
    }

    pub fn calendar_id(&self) -> &'static str {
        "iso8601"
    }

    /// 1 = Monday through 7 = Sunday.
    pub fn day_of_week(&self) -> u8 {
        calendar::day_of_week(self.epoch_days())
    }

    /// 1-based ordinal day within the year.
    pub fn day_of_year(&self) -> u16 {
        let first = epoch_days_from_iso(i64::from(self.year), 1, 1);
        (self.epoch_days() - first + 1) as u16
    }

    /// ISO week number (1..=53).
    pub fn week_of_year(&self) -> u8 {
        self.iso_week().1
    }

    /// The year that owns this date's ISO week, which differs from
    /// [`year`](Self::year) for some days around January 1.
    pub fn year_of_week(&self) -> i32 {
        self.iso_week().0
    }

    fn iso_week(&self) -> (i32, u8) {
        let week = (i32::from(self.day_of_year()) - i32::from(self.day_of_week()) + 10) / 7;
        if week < 1 {
            let previous = self.year - 1;
            (previous, weeks_in_iso_year(previous))
        } else if week > i32::from(weeks_in_iso_year(self.year)) {
            (self.year + 1, 1)
        } else {
            (self.year, week as u8)
        }
    }

    pub fn days_in_week(&self) -> u8 {
        7
    }

    pub fn days_in_month(&self) -> u8 {
        calendar::days_in_month(i64::from(self.year), self.month)
    }

    pub fn days_in_year(&self) -> u16 {
        calendar::days_in_year(i64::from(self.year))
    }

    pub fn months_in_year(&self) -> u8 {
        12
    }

    pub fn in_leap_year(&self) -> bool {
        calendar::is_leap_year(i64::from(self.year))
    }

    /// Adds a duration: years, then months, then the day is clamped or
    /// rejected, then weeks and days.
    ///
    /// # Examples
    ///
    /// ```
    /// use temporal_engine::{Duration, Overflow, PlainDate, Unit};
    ///
    /// let date = PlainDate::new(2024, 1, 31).unwrap();
    /// let later = date.add(&Duration::from_unit(Unit::Month, 1).unwrap(), Overflow::Constrain).unwrap();
    /// assert_eq!(later.to_string(), "2024-02-29");
    /// ```
    pub fn add(&self, duration: &Duration, overflow: Overflow) -> Result<PlainDate> {
        calendar::add_to_date(self, duration, overflow)
    }

    pub fn subtract(&self, duration: &Duration, overflow: Overflow) -> Result<PlainDate> {
        calendar::subtract_from_date(self, duration, overflow)
    }

    /// The duration from `self` to `other`, in days unless the settings ask
    /// for weeks, months or years.
    pub fn until(&self, other: &PlainDate, settings: DifferenceSettings) -> Result<Duration> {
        self.difference(Operation::Until, other, &settings)
    }

    /// The duration from `other` to `self`.
    pub fn since(&self, other: &PlainDate, settings: DifferenceSettings) -> Result<Duration> {
        self.difference(Operation::Since, other, &settings)
    }

    fn difference(
        &self,
        operation: Operation,
        other: &PlainDate,
        settings: &DifferenceSettings,
    ) -> Result<Duration> {
        let resolved = difference::resolve_settings(operation, settings, UnitGroup::DATE)?;
        let internal = difference::difference_date_with_rounding(self, other, &resolved)?;
        let duration = Duration::from_internal(internal, Unit::Day)?;
        Ok(operation.apply(duration))
    }

    /// Combines this date with a time (midnight when `None`).
    pub fn to_plain_date_time(&self, time: Option<PlainTime>) -> Result<PlainDateTime> {
        PlainDateTime::new(*self, time.unwrap_or_default())
    }

    /// This date in `time_zone`, at `time` or at the start of the day.
    pub fn to_zoned_date_time(
        &self,
        time: Option<PlainTime>,
        time_zone: &TimeZone,
        disambiguation: Disambiguation,
    ) -> Result<ZonedDateTime> {
        match time {
            Some(time) => {
                let date_time = PlainDateTime::new(*self, time)?;
                ZonedDateTime::from_plain_date_time(&date_time, time_zone, disambiguation)
            }
            None => {
                let epoch_ns = time_zone.start_of_day(self)?;
                ZonedDateTime::from_epoch_nanoseconds(epoch_ns, time_zone.clone())
            }
        }
    }
}

/// 53 when the year starts on a Thursday, or on a Wednesday in a leap year.
fn weeks_in_iso_year(year: i32) -> u8 {
    let jan1 = calendar::day_of_week(epoch_days_from_iso(i64::from(year), 1, 1));
    if jan1 == 4 || (jan1 == 3 && calendar::is_leap_year(i64::from(year))) {
        53
    } else {
        52
    }
}

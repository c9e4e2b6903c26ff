//! Proleptic Gregorian (ISO-8601) calendar arithmetic.
//!
//! All date math is done on plain integers: a date is converted to a count of
//! days since 1970-01-01 and back with closed-form expressions, so no host
//! calendar object is involved and every leap-year edge case is explicit.
//!
//! Adding a duration to a date happens in a fixed order: years, then months
//! (carrying into years), then clamping or rejecting the day of month, then
//! weeks and days as a flat day count. The difference between two dates walks
//! the same steps in reverse.

use std::cmp::Ordering;

use crate::duration::{DateDuration, Duration};
use crate::error::{Result, TemporalError};
use crate::options::{Overflow, Unit};
use crate::plain_date::PlainDate;

/// Days between 0000-03-01 and 1970-01-01.
const DAYS_FROM_CIVIL_EPOCH: i64 = 719_468;
const DAYS_PER_ERA: i64 = 146_097;

/// Proleptic Gregorian leap-year rule.
pub fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` (1-based) of `year`.
pub fn days_in_month(year: i64, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}

pub fn days_in_year(year: i64) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Days since 1970-01-01 for a valid ISO date.
pub(crate) fn epoch_days_from_iso(year: i64, month: u8, day: u8) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    // Months counted from March so the leap day is the last day of the year.
    let shifted_month = (i64::from(month) + 9) % 12;
    let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_PER_ERA + day_of_era - DAYS_FROM_CIVIL_EPOCH
}

/// Inverse of [`epoch_days_from_iso`].
pub(crate) fn iso_from_epoch_days(epoch_days: i64) -> (i64, u8, u8) {
    let days = epoch_days + DAYS_FROM_CIVIL_EPOCH;
    let era = days.div_euclid(DAYS_PER_ERA);
    let day_of_era = days - era * DAYS_PER_ERA;
    let year_of_era =
        (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    };
    let year = year_of_era + era * 400 + i64::from(month <= 2);
    (year, month as u8, day as u8)
}

/// ISO weekday of an epoch day, 1 = Monday through 7 = Sunday.
pub(crate) fn day_of_week(epoch_days: i64) -> u8 {
    // 1970-01-01 was a Thursday.
    ((epoch_days + 3).rem_euclid(7) + 1) as u8
}

/// Normalizes a year and a possibly out-of-range 1-based month.
pub(crate) fn balance_year_month(year: i64, month: i64) -> (i64, u8) {
    let zero_based = month - 1;
    (
        year + zero_based.div_euclid(12),
        (zero_based.rem_euclid(12) + 1) as u8,
    )
}

/// Applies the overflow policy to raw year/month/day fields.
pub(crate) fn regulate_iso_date(
    year: i64,
    month: i64,
    day: i64,
    overflow: Overflow,
) -> Result<(i64, u8, u8)> {
    match overflow {
        Overflow::Constrain => {
            let month = month.clamp(1, 12) as u8;
            let day = day.clamp(1, i64::from(days_in_month(year, month))) as u8;
            Ok((year, month, day))
        }
        Overflow::Reject => {
            if !(1..=12).contains(&month) {
                return Err(TemporalError::range(format!("month {} out of range 1..=12", month)));
            }
            let max_day = days_in_month(year, month as u8);
            if !(1..=i64::from(max_day)).contains(&day) {
                return Err(TemporalError::range(format!(
                    "day {} out of range 1..={} for {}-{:02}",
                    day, max_day, year, month
                )));
            }
            Ok((year, month as u8, day as u8))
        }
    }
}

/// Adds a duration to a date, calendar fields first.
///
/// Time fields of `duration` are balanced into whole days (24 hours each)
/// before the day step; any remainder below a day is ignored.
///
/// # Errors
///
/// Returns [`TemporalError::Range`] if `overflow` is `Reject` and the
/// intermediate month lacks the date's day, or if the result is outside the
/// supported range.
///
/// # Examples
///
/// ```
/// use temporal_engine::{calendar, Duration, Overflow, PlainDate, Unit};
///
/// let jan31 = PlainDate::new(2024, 1, 31).unwrap();
/// let month = Duration::from_unit(Unit::Month, 1).unwrap();
/// let feb = calendar::add_to_date(&jan31, &month, Overflow::Constrain).unwrap();
/// assert_eq!(feb, PlainDate::new(2024, 2, 29).unwrap());
/// assert!(calendar::add_to_date(&jan31, &month, Overflow::Reject).is_err());
/// ```
pub fn add_to_date(date: &PlainDate, duration: &Duration, overflow: Overflow) -> Result<PlainDate> {
    add_date_duration(date, &duration.to_date_duration_balanced(), overflow)
}

/// [`add_to_date`] with the duration negated.
pub fn subtract_from_date(
    date: &PlainDate,
    duration: &Duration,
    overflow: Overflow,
) -> Result<PlainDate> {
    add_to_date(date, &duration.negated(), overflow)
}

pub(crate) fn add_date_duration(
    date: &PlainDate,
    duration: &DateDuration,
    overflow: Overflow,
) -> Result<PlainDate> {
    let (year, month) = balance_year_month(
        i64::from(date.year()) + duration.years,
        i64::from(date.month()) + duration.months,
    );
    let (year, month, day) = regulate_iso_date(year, i64::from(month), i64::from(date.day()), overflow)?;
    check_year(year)?;
    let flat_days = duration
        .weeks
        .checked_mul(7)
        .and_then(|weeks| weeks.checked_add(duration.days))
        .ok_or_else(|| TemporalError::range("day count overflow"))?;
    let epoch_days = epoch_days_from_iso(year, month, day)
        .checked_add(flat_days)
        .ok_or_else(|| TemporalError::range("day count overflow"))?;
    PlainDate::from_epoch_days(epoch_days)
}

/// Rejects years so large that the epoch-day arithmetic could overflow.
/// The precise range check happens when the result date is built.
fn check_year(year: i64) -> Result<()> {
    if year.abs() > 1_000_000 {
        return Err(TemporalError::range(format!("year {} out of range", year)));
    }
    Ok(())
}

/// Compares `(year, month, day)` against `other` using the unconstrained
/// day, reporting whether it lies beyond `other` in the direction of `sign`.
fn surpasses(sign: i64, year: i64, month: u8, day: u8, other: &PlainDate) -> bool {
    let ordering = (year, month, day).cmp(&(i64::from(other.year()), other.month(), other.day()));
    match ordering {
        Ordering::Equal => false,
        Ordering::Greater => sign > 0,
        Ordering::Less => sign < 0,
    }
}

/// Calendar difference from `one` to `two`, expressed with units no larger
/// than `largest_unit` (which must be a date unit).
///
/// Whole years are taken first, then whole months, each only while adding
/// them to `one` does not pass `two`; what is left is counted in days (and
/// weeks, when `largest_unit` is a week).
pub(crate) fn date_until(one: &PlainDate, two: &PlainDate, largest_unit: Unit) -> DateDuration {
    let sign: i64 = match two.cmp(one) {
        Ordering::Equal => return DateDuration::default(),
        Ordering::Greater => 1,
        Ordering::Less => -1,
    };

    let one_year = i64::from(one.year());
    let one_month = i64::from(one.month());
    let mut years = 0;
    let mut months = 0;

    if largest_unit == Unit::Year || largest_unit == Unit::Month {
        let mut candidate_years = i64::from(two.year()) - one_year;
        if candidate_years != 0 {
            candidate_years -= sign;
        }
        while !surpasses(sign, one_year + candidate_years, one.month(), one.day(), two) {
            years = candidate_years;
            candidate_years += sign;
        }

        let mut candidate_months = sign;
        loop {
            let (year, month) = balance_year_month(one_year + years, one_month + candidate_months);
            if surpasses(sign, year, month, one.day(), two) {
                break;
            }
            months = candidate_months;
            candidate_months += sign;
        }

        if largest_unit == Unit::Month {
            months += years * 12;
            years = 0;
        }
    }

    let (year, month) = balance_year_month(one_year + years, one_month + months);
    let day = one.day().min(days_in_month(year, month));
    let mut days = two.epoch_days() - epoch_days_from_iso(year, month, day);
    let mut weeks = 0;
    if largest_unit == Unit::Week {
        weeks = days / 7;
        days %= 7;
    }

    DateDuration {
        years,
        months,
        weeks,
        days,
    }
}

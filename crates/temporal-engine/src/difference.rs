//! The `until` / `since` engine.
//!
//! A difference is computed in two phases. The first phase peels whole units
//! off from the largest unit down: calendar years and months with
//! [`date_until`](crate::calendar), then days, then an exact nanosecond
//! remainder. The second phase rounds that result to the smallest unit.
//!
//! Rounding time units is plain integer rounding. Rounding a calendar unit (or
//! a day in a time zone, where days may be 23 or 25 hours long) has to measure
//! the unit in place. The duration is "nudged": the two candidate results on
//! either side of the destination are anchored to the timeline, and the
//! rounding mode picks one by how far the destination lies between them. If
//! the nudge spills into a larger unit, the carry is "bubbled" up one unit at
//! a time.
//!
//! `a.since(b)` runs the same algorithm as `a.until(b)` with the rounding
//! mode negated, then negates the result.

use crate::calendar::{add_date_duration, date_until};
use crate::duration::{DateDuration, Duration, InternalDuration};
use crate::error::{Result, TemporalError};
use crate::options::{DifferenceSettings, Disambiguation, Overflow, RoundingMode, Unit};
use crate::plain_date::PlainDate;
use crate::plain_date_time::PlainDateTime;
use crate::rounding::{self, round_unchecked};
use crate::tz::TimeZone;
use crate::NS_PER_DAY;

/// Which direction the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Until,
    Since,
}

impl Operation {
    /// Final sign adjustment for a result computed as `until`.
    pub(crate) fn apply(self, duration: Duration) -> Duration {
        match self {
            Operation::Until => duration,
            Operation::Since => duration.negated(),
        }
    }
}

/// The units a value type can express in a difference.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UnitGroup {
    /// Smallest unit the type carries.
    pub min: Unit,
    /// Largest unit a difference may use.
    pub max: Unit,
    /// The largest unit chosen by "auto".
    pub natural_largest: Unit,
}

impl UnitGroup {
    pub(crate) const INSTANT: UnitGroup = UnitGroup {
        min: Unit::Nanosecond,
        max: Unit::Hour,
        natural_largest: Unit::Nanosecond,
    };
    pub(crate) const TIME: UnitGroup = UnitGroup {
        min: Unit::Nanosecond,
        max: Unit::Hour,
        natural_largest: Unit::Hour,
    };
    pub(crate) const DATE: UnitGroup = UnitGroup {
        min: Unit::Day,
        max: Unit::Year,
        natural_largest: Unit::Day,
    };
    pub(crate) const DATE_TIME: UnitGroup = UnitGroup {
        min: Unit::Nanosecond,
        max: Unit::Year,
        natural_largest: Unit::Day,
    };
    pub(crate) const ZONED: UnitGroup = UnitGroup {
        min: Unit::Nanosecond,
        max: Unit::Year,
        natural_largest: Unit::Hour,
    };
}

/// Difference settings with defaults filled in and every option validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedSettings {
    pub largest_unit: Unit,
    pub smallest_unit: Unit,
    pub increment: i128,
    pub mode: RoundingMode,
}

impl ResolvedSettings {
    /// Settings that balance into `largest_unit` without rounding.
    pub(crate) fn unrounded(largest_unit: Unit) -> Self {
        ResolvedSettings {
            largest_unit,
            smallest_unit: Unit::Nanosecond,
            increment: 1,
            mode: RoundingMode::Trunc,
        }
    }

    fn rounds(&self, finest: Unit) -> bool {
        self.smallest_unit != finest || self.increment != 1
    }
}

pub(crate) fn resolve_settings(
    operation: Operation,
    settings: &DifferenceSettings,
    group: UnitGroup,
) -> Result<ResolvedSettings> {
    let allowed = |unit: Unit| unit >= group.min && unit <= group.max;

    let smallest_unit = settings.smallest_unit.unwrap_or(group.min);
    if !allowed(smallest_unit) {
        return Err(TemporalError::range(format!(
            "smallest unit {} is not allowed here",
            smallest_unit
        )));
    }
    let largest_unit = settings
        .largest_unit
        .unwrap_or_else(|| group.natural_largest.max(smallest_unit));
    if !allowed(largest_unit) {
        return Err(TemporalError::range(format!(
            "largest unit {} is not allowed here",
            largest_unit
        )));
    }
    if largest_unit < smallest_unit {
        return Err(TemporalError::range(format!(
            "largest unit {} is smaller than smallest unit {}",
            largest_unit, smallest_unit
        )));
    }

    let increment = rounding::validate_increment_for_unit(smallest_unit, settings.rounding_increment)?;
    if increment > 1 && largest_unit != smallest_unit && smallest_unit.is_date_unit() {
        return Err(TemporalError::range(
            "a rounding increment above 1 needs largest unit equal to a date smallest unit",
        ));
    }

    let mode = match operation {
        Operation::Until => settings.rounding_mode,
        Operation::Since => settings.rounding_mode.negate(),
    };
    Ok(ResolvedSettings {
        largest_unit,
        smallest_unit,
        increment,
        mode,
    })
}

/// Rounds an exact nanosecond count to the smallest unit of `settings`.
pub(crate) fn round_time(nanoseconds: i128, settings: &ResolvedSettings) -> Result<i128> {
    let unit_ns = settings.smallest_unit.nanoseconds().ok_or_else(|| {
        TemporalError::range(format!(
            "{} has no fixed length",
            settings.smallest_unit
        ))
    })?;
    Ok(round_unchecked(nanoseconds, unit_ns * settings.increment, settings.mode))
}

/// A nanosecond count expressed in `unit`, with the fraction kept.
pub(crate) fn total_time(nanoseconds: i128, unit: Unit) -> Result<f64> {
    let unit_ns = unit
        .nanoseconds()
        .ok_or_else(|| TemporalError::range(format!("{} has no fixed length", unit)))?;
    let whole = nanoseconds / unit_ns;
    let remainder = nanoseconds % unit_ns;
    Ok(whole as f64 + remainder as f64 / unit_ns as f64)
}

// ── Anchors ─────────────────────────────────────────────────────────────────

/// The starting point a relative duration is measured from.
///
/// Plain anchors measure on a uniform timeline of 24-hour days (their
/// "epoch nanoseconds" are the wall clock read as UTC). Zoned anchors
/// resolve every intermediate wall-clock reading through the time zone.
#[derive(Debug, Clone)]
pub(crate) enum Anchor {
    Plain(PlainDateTime),
    Zoned {
        wall: PlainDateTime,
        time_zone: TimeZone,
    },
}

impl Anchor {
    pub(crate) fn zoned(epoch_ns: i128, time_zone: &TimeZone) -> Anchor {
        Anchor::Zoned {
            wall: time_zone.wall_for_ns(epoch_ns),
            time_zone: time_zone.clone(),
        }
    }

    fn wall(&self) -> &PlainDateTime {
        match self {
            Anchor::Plain(wall) | Anchor::Zoned { wall, .. } => wall,
        }
    }

    fn is_zoned(&self) -> bool {
        matches!(self, Anchor::Zoned { .. })
    }

    /// The anchor's time of day on `date`, as epoch nanoseconds.
    fn epoch_ns_on(&self, date: PlainDate) -> Result<i128> {
        let date_time = PlainDateTime::new(date, self.wall().time())?;
        match self {
            Anchor::Plain(_) => Ok(date_time.local_epoch_ns()),
            Anchor::Zoned { time_zone, .. } => {
                time_zone.epoch_ns_for(&date_time, Disambiguation::Compatible)
            }
        }
    }

    /// The anchor moved by a date duration (clamping the day of month).
    fn epoch_ns_after(&self, duration: &DateDuration) -> Result<i128> {
        let date = add_date_duration(&self.wall().date(), duration, Overflow::Constrain)?;
        self.epoch_ns_on(date)
    }
}

// ── Unrounded differences ───────────────────────────────────────────────────

/// Difference between two wall-clock readings.
///
/// When the time of day runs against the direction of the dates, one day is
/// borrowed from the date part so both parts share a sign.
pub(crate) fn difference_iso_date_time(
    one: &PlainDateTime,
    two: &PlainDateTime,
    largest_unit: Unit,
) -> Result<InternalDuration> {
    let mut time = two.time().nanosecond_of_day_exact() - one.time().nanosecond_of_day_exact();
    let time_sign = time.signum();
    let date_sign: i128 = match one.date().cmp(&two.date()) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    };

    let mut adjusted = two.date();
    if time_sign != 0 && time_sign == date_sign {
        let borrow = DateDuration {
            days: time_sign as i64,
            ..DateDuration::default()
        };
        adjusted = add_date_duration(&adjusted, &borrow, Overflow::Constrain)?;
        time -= time_sign * NS_PER_DAY;
    }

    let date_largest = largest_unit.max(Unit::Day);
    let mut date = date_until(&one.date(), &adjusted, date_largest);
    if largest_unit != date_largest {
        time += i128::from(date.days) * NS_PER_DAY;
        date.days = 0;
    }
    Ok(InternalDuration::new(date, time))
}

/// Difference between two instants read in `time_zone`, with date units.
///
/// The date part is counted on the wall clock. The time part is the exact
/// elapsed time from the last whole day to `two`, so a 23-hour day still
/// counts as one day. If the end's time of day lies before the start's, the
/// intermediate day is stepped back (up to twice across a transition).
pub(crate) fn difference_zoned(
    one: i128,
    two: i128,
    time_zone: &TimeZone,
    largest_unit: Unit,
) -> Result<InternalDuration> {
    if one == two {
        return Ok(InternalDuration::default());
    }
    let start = time_zone.wall_for_ns(one);
    let end = time_zone.wall_for_ns(two);
    if start.date() == end.date() {
        return Ok(InternalDuration::new(DateDuration::default(), two - one));
    }

    let sign: i64 = if two < one { -1 } else { 1 };
    let max_correction = if sign == 1 { 2 } else { 1 };
    let mut correction = 0;
    let wall_time = end.time().nanosecond_of_day_exact() - start.time().nanosecond_of_day_exact();
    if wall_time.signum() == -i128::from(sign) {
        correction += 1;
    }

    while correction <= max_correction {
        let step = DateDuration {
            days: -correction * sign,
            ..DateDuration::default()
        };
        let intermediate_date = add_date_duration(&end.date(), &step, Overflow::Constrain)?;
        let intermediate = PlainDateTime::new(intermediate_date, start.time())?;
        let intermediate_ns = time_zone.epoch_ns_for(&intermediate, Disambiguation::Compatible)?;
        let time = two - intermediate_ns;
        if time.signum() != -i128::from(sign) {
            let date = date_until(&start.date(), &intermediate_date, largest_unit.max(Unit::Day));
            return Ok(InternalDuration::new(date, time));
        }
        correction += 1;
    }
    Err(TemporalError::range(format!(
        "no consistent day boundary between the two instants in {}",
        time_zone.id()
    )))
}

// ── Rounded differences ─────────────────────────────────────────────────────

pub(crate) fn difference_plain_date_time_with_rounding(
    one: &PlainDateTime,
    two: &PlainDateTime,
    settings: &ResolvedSettings,
) -> Result<InternalDuration> {
    if one == two {
        return Ok(InternalDuration::default());
    }
    let internal = difference_iso_date_time(one, two, settings.largest_unit)?;
    if !settings.rounds(Unit::Nanosecond) {
        return Ok(internal);
    }
    round_relative(internal, two.local_epoch_ns(), &Anchor::Plain(*one), settings)
}

/// Difference between two dates, rounded when the settings ask for more than
/// whole days.
pub(crate) fn difference_date_with_rounding(
    one: &PlainDate,
    two: &PlainDate,
    settings: &ResolvedSettings,
) -> Result<InternalDuration> {
    if one == two {
        return Ok(InternalDuration::default());
    }
    let internal = InternalDuration::new(date_until(one, two, settings.largest_unit), 0);
    if !settings.rounds(Unit::Day) {
        return Ok(internal);
    }
    let start = one.to_plain_date_time(None)?;
    let end = two.to_plain_date_time(None)?;
    round_relative(internal, end.local_epoch_ns(), &Anchor::Plain(start), settings)
}

pub(crate) fn difference_zoned_with_rounding(
    one: i128,
    two: i128,
    time_zone: &TimeZone,
    settings: &ResolvedSettings,
) -> Result<InternalDuration> {
    if !settings.largest_unit.is_date_unit() {
        let time = round_time(two - one, settings)?;
        return Ok(InternalDuration::new(DateDuration::default(), time));
    }
    let internal = difference_zoned(one, two, time_zone, settings.largest_unit)?;
    if !settings.rounds(Unit::Nanosecond) {
        return Ok(internal);
    }
    round_relative(internal, two, &Anchor::zoned(one, time_zone), settings)
}

// ── Totals ──────────────────────────────────────────────────────────────────

pub(crate) fn difference_plain_date_time_with_total(
    one: &PlainDateTime,
    two: &PlainDateTime,
    unit: Unit,
) -> Result<f64> {
    if one == two {
        return Ok(0.0);
    }
    let internal = difference_iso_date_time(one, two, unit)?;
    if unit == Unit::Nanosecond {
        return Ok(internal.time as f64);
    }
    total_relative(&internal, two.local_epoch_ns(), &Anchor::Plain(*one), unit)
}

pub(crate) fn difference_zoned_with_total(
    one: i128,
    two: i128,
    time_zone: &TimeZone,
    unit: Unit,
) -> Result<f64> {
    if !unit.is_date_unit() {
        return total_time(two - one, unit);
    }
    let internal = difference_zoned(one, two, time_zone, unit)?;
    total_relative(&internal, two, &Anchor::zoned(one, time_zone), unit)
}

fn total_relative(duration: &InternalDuration, dest_ns: i128, anchor: &Anchor, unit: Unit) -> Result<f64> {
    if unit.is_calendar_unit() || (anchor.is_zoned() && unit == Unit::Day) {
        let sign = if duration.sign() < 0 { -1 } else { 1 };
        let (_, total) =
            nudge_to_calendar_unit(sign, duration, dest_ns, anchor, unit, 1, RoundingMode::Trunc)?;
        return Ok(total);
    }
    total_time(duration.time + i128::from(duration.date.days) * NS_PER_DAY, unit)
}

// ── Relative rounding ───────────────────────────────────────────────────────

/// Outcome of moving a duration onto a rounding boundary.
struct Nudge {
    duration: InternalDuration,
    /// Where the rounded duration lands on the anchor's timeline.
    epoch_ns: i128,
    /// The rounded unit reached the next multiple, so larger units may need
    /// to absorb a carry.
    expanded: bool,
}

fn round_relative(
    duration: InternalDuration,
    dest_ns: i128,
    anchor: &Anchor,
    settings: &ResolvedSettings,
) -> Result<InternalDuration> {
    let smallest_unit = settings.smallest_unit;
    let irregular = smallest_unit.is_calendar_unit() || (anchor.is_zoned() && smallest_unit == Unit::Day);
    let sign = if duration.sign() < 0 { -1 } else { 1 };

    let nudge = if irregular {
        nudge_to_calendar_unit(
            sign,
            &duration,
            dest_ns,
            anchor,
            smallest_unit,
            settings.increment,
            settings.mode,
        )?
        .0
    } else if anchor.is_zoned() {
        nudge_to_zoned_time(sign, &duration, anchor, settings)?
    } else {
        nudge_to_day_or_time(&duration, dest_ns, settings)?
    };

    if nudge.expanded && smallest_unit != Unit::Week {
        let start_unit = smallest_unit.max(Unit::Day);
        return bubble_relative(
            sign,
            nudge.duration,
            nudge.epoch_ns,
            anchor,
            settings.largest_unit,
            start_unit,
        );
    }
    Ok(nudge.duration)
}

/// Rounds the calendar unit `unit` by anchoring both candidate values and
/// measuring where `dest_ns` falls between them. Also returns the exact
/// fractional count of `unit`.
fn nudge_to_calendar_unit(
    sign: i64,
    duration: &InternalDuration,
    dest_ns: i128,
    anchor: &Anchor,
    unit: Unit,
    increment: i128,
    mode: RoundingMode,
) -> Result<(Nudge, f64)> {
    // Bounded by the 1e9 increment limit.
    let increment = increment as i64;
    let date = duration.date;
    let truncate = |value: i64| value / increment * increment;
    let zero = DateDuration::default();

    let (r1, r2, start, end) = match unit {
        Unit::Year => {
            let r1 = truncate(date.years);
            let r2 = r1 + increment * sign;
            (
                r1,
                r2,
                DateDuration { years: r1, ..zero },
                DateDuration { years: r2, ..zero },
            )
        }
        Unit::Month => {
            let r1 = truncate(date.months);
            let r2 = r1 + increment * sign;
            let base = DateDuration {
                years: date.years,
                ..zero
            };
            (
                r1,
                r2,
                DateDuration { months: r1, ..base },
                DateDuration { months: r2, ..base },
            )
        }
        Unit::Week => {
            let years_months = DateDuration {
                years: date.years,
                months: date.months,
                ..zero
            };
            let weeks_start =
                add_date_duration(&anchor.wall().date(), &years_months, Overflow::Constrain)?;
            let weeks_end = add_date_duration(
                &weeks_start,
                &DateDuration {
                    days: date.days,
                    ..zero
                },
                Overflow::Constrain,
            )?;
            let extra = date_until(&weeks_start, &weeks_end, Unit::Week);
            let r1 = truncate(date.weeks + extra.weeks);
            let r2 = r1 + increment * sign;
            (
                r1,
                r2,
                DateDuration { weeks: r1, ..years_months },
                DateDuration { weeks: r2, ..years_months },
            )
        }
        _ => {
            let r1 = truncate(date.days);
            let r2 = r1 + increment * sign;
            let base = DateDuration { days: 0, ..date };
            (
                r1,
                r2,
                DateDuration { days: r1, ..base },
                DateDuration { days: r2, ..base },
            )
        }
    };

    let start_ns = anchor.epoch_ns_after(&start)?;
    let end_ns = anchor.epoch_ns_after(&end)?;
    if start_ns == end_ns {
        return Err(TemporalError::range(format!(
            "{} has zero length at this anchor",
            unit
        )));
    }
    let numerator = dest_ns - start_ns;
    let denominator = end_ns - start_ns;
    debug_assert!(numerator.signum() * denominator.signum() >= 0);

    let progress = numerator as f64 / denominator as f64;
    let total = r1 as f64 + progress * (increment * sign) as f64;

    let lower_is_even = (r1.abs() / increment) % 2 == 0;
    let rounds_up = numerator == denominator
        || mode.unsigned(sign < 0).rounds_up(
            numerator.unsigned_abs(),
            denominator.unsigned_abs(),
            lower_is_even,
        );

    let nudge = if rounds_up {
        Nudge {
            duration: InternalDuration::new(end, 0),
            epoch_ns: end_ns,
            expanded: true,
        }
    } else {
        Nudge {
            duration: InternalDuration::new(start, 0),
            epoch_ns: start_ns,
            expanded: false,
        }
    };
    Ok((nudge, total))
}

/// Rounds the time portion against the real length of the day it lies in.
fn nudge_to_zoned_time(
    sign: i64,
    duration: &InternalDuration,
    anchor: &Anchor,
    settings: &ResolvedSettings,
) -> Result<Nudge> {
    let start_date = add_date_duration(&anchor.wall().date(), &duration.date, Overflow::Constrain)?;
    let one_day = DateDuration {
        days: sign,
        ..DateDuration::default()
    };
    let end_date = add_date_duration(&start_date, &one_day, Overflow::Constrain)?;
    let start_ns = anchor.epoch_ns_on(start_date)?;
    let end_ns = anchor.epoch_ns_on(end_date)?;
    let day_span = end_ns - start_ns;

    let rounded = round_time(duration.time, settings)?;
    let beyond_day = rounded - day_span;
    let (day_delta, rounded, epoch_ns, expanded) = if beyond_day.signum() != -i128::from(sign) {
        let rounded = round_time(beyond_day, settings)?;
        (sign, rounded, end_ns + rounded, true)
    } else {
        (0, rounded, start_ns + rounded, false)
    };

    let date = DateDuration {
        days: duration.date.days + day_delta,
        ..duration.date
    };
    Ok(Nudge {
        duration: InternalDuration::new(date, rounded),
        epoch_ns,
        expanded,
    })
}

/// Rounds days and time together on a uniform 24-hour-day timeline.
fn nudge_to_day_or_time(
    duration: &InternalDuration,
    dest_ns: i128,
    settings: &ResolvedSettings,
) -> Result<Nudge> {
    let time = duration.time + i128::from(duration.date.days) * NS_PER_DAY;
    let rounded = round_time(time, settings)?;
    let whole_days = time / NS_PER_DAY;
    let rounded_whole_days = rounded / NS_PER_DAY;
    let day_delta = rounded_whole_days - whole_days;
    let expanded = day_delta.signum() == time.signum();

    let (days, remainder) = if settings.largest_unit.is_date_unit() {
        (rounded_whole_days, rounded - rounded_whole_days * NS_PER_DAY)
    } else {
        (0, rounded)
    };
    let days = i64::try_from(days).map_err(|_| TemporalError::range("day count out of range"))?;
    let date = DateDuration {
        days,
        ..duration.date
    };
    Ok(Nudge {
        duration: InternalDuration::new(date, remainder),
        epoch_ns: dest_ns + (rounded - time),
        expanded,
    })
}

/// Carries a rounded unit into larger units while the anchored result does
/// not fall short of the next larger boundary.
///
/// Weeks only take part when they are the largest unit.
fn bubble_relative(
    sign: i64,
    mut duration: InternalDuration,
    nudged_ns: i128,
    anchor: &Anchor,
    largest_unit: Unit,
    smallest_unit: Unit,
) -> Result<InternalDuration> {
    if smallest_unit == largest_unit {
        return Ok(duration);
    }
    let zero = DateDuration::default();
    for unit in Unit::ALL {
        if unit <= smallest_unit || unit > largest_unit {
            continue;
        }
        if unit == Unit::Week && largest_unit != Unit::Week {
            continue;
        }
        let date = duration.date;
        let end = match unit {
            Unit::Year => DateDuration {
                years: date.years + sign,
                ..zero
            },
            Unit::Month => DateDuration {
                years: date.years,
                months: date.months + sign,
                ..zero
            },
            Unit::Week => DateDuration {
                weeks: date.weeks + sign,
                days: 0,
                ..date
            },
            Unit::Day => DateDuration {
                days: date.days + sign,
                ..date
            },
            _ => continue,
        };
        let end_ns = anchor.epoch_ns_after(&end)?;
        let beyond = nudged_ns - end_ns;
        if beyond.signum() == -i128::from(sign) {
            break;
        }
        duration = InternalDuration::new(end, 0);
    }
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plain_time::PlainTime;

    fn date_time(y: i32, m: u8, d: u8, h: u8, mi: u8) -> PlainDateTime {
        PlainDateTime::new(
            PlainDate::new(y, m, d).unwrap(),
            PlainTime::new(h, mi, 0, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn date_time_difference_borrows_a_day() {
        let one = date_time(2024, 1, 1, 12, 0);
        let two = date_time(2024, 1, 3, 6, 0);
        let internal = difference_iso_date_time(&one, &two, Unit::Day).unwrap();
        assert_eq!(internal.date.days, 1);
        assert_eq!(internal.time, 18 * crate::NS_PER_HOUR);
    }

    #[test]
    fn date_time_difference_folds_days_below_day_unit() {
        let one = date_time(2024, 1, 1, 0, 0);
        let two = date_time(2024, 1, 3, 1, 0);
        let internal = difference_iso_date_time(&one, &two, Unit::Hour).unwrap();
        assert_eq!(internal.date, DateDuration::default());
        assert_eq!(internal.time, 49 * crate::NS_PER_HOUR);
    }

    #[test]
    fn since_negates_the_rounding_mode() {
        let settings = DifferenceSettings::default().mode(RoundingMode::Floor);
        let resolved = resolve_settings(Operation::Since, &settings, UnitGroup::TIME).unwrap();
        assert_eq!(resolved.mode, RoundingMode::Ceil);
        assert_eq!(resolved.largest_unit, Unit::Hour);
    }

    #[test]
    fn auto_largest_unit_is_raised_to_smallest() {
        let settings = DifferenceSettings::default().smallest(Unit::Month);
        let resolved = resolve_settings(Operation::Until, &settings, UnitGroup::DATE).unwrap();
        assert_eq!(resolved.largest_unit, Unit::Month);
    }

    #[test]
    fn settings_reject_units_outside_the_group() {
        let settings = DifferenceSettings::default().largest(Unit::Day);
        assert!(resolve_settings(Operation::Until, &settings, UnitGroup::TIME).is_err());
        let settings = DifferenceSettings::default().smallest(Unit::Hour);
        assert!(resolve_settings(Operation::Until, &settings, UnitGroup::DATE).is_err());
        let settings = DifferenceSettings::default()
            .largest(Unit::Minute)
            .smallest(Unit::Hour);
        assert!(resolve_settings(Operation::Until, &settings, UnitGroup::DATE_TIME).is_err());
    }

    #[test]
    fn total_time_keeps_fraction() {
        assert_eq!(total_time(36 * crate::NS_PER_HOUR, Unit::Day).unwrap(), 1.5);
        assert_eq!(total_time(-90 * crate::NS_PER_SECOND, Unit::Minute).unwrap(), -1.5);
        assert!(total_time(1, Unit::Month).is_err());
    }
}

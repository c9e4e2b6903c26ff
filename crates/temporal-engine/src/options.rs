//! Typed options accepted by arithmetic, difference and rounding operations.
//!
//! Every policy is an enumeration rather than a free-form string. The
//! `FromStr` and serde representations use the camelCase names of the
//! Temporal model (`halfExpand`, `constrain`, ...), so option values coming
//! from configuration files or command lines are validated in one place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TemporalError;
use crate::plain_date::PlainDate;
use crate::zoned_date_time::ZonedDateTime;
use crate::{NS_PER_DAY, NS_PER_HOUR, NS_PER_MICROSECOND, NS_PER_MILLISECOND, NS_PER_MINUTE, NS_PER_SECOND};

// ── Unit ────────────────────────────────────────────────────────────────────

/// A unit of time, ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Unit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    /// Years, months and weeks: units whose length depends on where they are
    /// applied.
    pub fn is_calendar_unit(self) -> bool {
        self >= Unit::Week
    }

    /// Units of a day or larger.
    pub fn is_date_unit(self) -> bool {
        self >= Unit::Day
    }

    /// Length of the unit in nanoseconds, treating a day as 24 hours.
    ///
    /// Calendar units have no fixed length and return `None`.
    pub fn nanoseconds(self) -> Option<i128> {
        match self {
            Unit::Nanosecond => Some(1),
            Unit::Microsecond => Some(NS_PER_MICROSECOND),
            Unit::Millisecond => Some(NS_PER_MILLISECOND),
            Unit::Second => Some(NS_PER_SECOND),
            Unit::Minute => Some(NS_PER_MINUTE),
            Unit::Hour => Some(NS_PER_HOUR),
            Unit::Day => Some(NS_PER_DAY),
            Unit::Week | Unit::Month | Unit::Year => None,
        }
    }

    /// How many of this unit make up one of the next larger unit, for the
    /// sub-day units that wrap (60 seconds in a minute, 24 hours in a day).
    pub fn modulus(self) -> Option<u32> {
        match self {
            Unit::Nanosecond | Unit::Microsecond | Unit::Millisecond => Some(1_000),
            Unit::Second | Unit::Minute => Some(60),
            Unit::Hour => Some(24),
            Unit::Day | Unit::Week | Unit::Month | Unit::Year => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Nanosecond => "nanosecond",
            Unit::Microsecond => "microsecond",
            Unit::Millisecond => "millisecond",
            Unit::Second => "second",
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
            Unit::Week => "week",
            Unit::Month => "month",
            Unit::Year => "year",
        }
    }

    pub(crate) const ALL: [Unit; 10] = [
        Unit::Nanosecond,
        Unit::Microsecond,
        Unit::Millisecond,
        Unit::Second,
        Unit::Minute,
        Unit::Hour,
        Unit::Day,
        Unit::Week,
        Unit::Month,
        Unit::Year,
    ];
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = TemporalError;

    /// Accepts singular and plural names (`"day"`, `"days"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let singular = s.strip_suffix('s').unwrap_or(s);
        Unit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == singular)
            .ok_or_else(|| TemporalError::invalid_argument(format!("unknown unit '{}'", s)))
    }
}

// ── RoundingMode ────────────────────────────────────────────────────────────

/// How a remainder is resolved when rounding to an increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundingMode {
    /// Toward positive infinity.
    Ceil,
    /// Toward negative infinity.
    Floor,
    /// Away from zero.
    Expand,
    /// Toward zero.
    Trunc,
    /// Nearest; ties toward positive infinity.
    HalfCeil,
    /// Nearest; ties toward negative infinity.
    HalfFloor,
    /// Nearest; ties away from zero.
    HalfExpand,
    /// Nearest; ties toward zero.
    HalfTrunc,
    /// Nearest; ties toward the even multiple of the increment.
    HalfEven,
}

impl RoundingMode {
    /// The mode that gives mirrored results on negated input.
    ///
    /// `since` rounds with the negated mode and then negates its result.
    pub fn negate(self) -> RoundingMode {
        match self {
            RoundingMode::Ceil => RoundingMode::Floor,
            RoundingMode::Floor => RoundingMode::Ceil,
            RoundingMode::HalfCeil => RoundingMode::HalfFloor,
            RoundingMode::HalfFloor => RoundingMode::HalfCeil,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoundingMode::Ceil => "ceil",
            RoundingMode::Floor => "floor",
            RoundingMode::Expand => "expand",
            RoundingMode::Trunc => "trunc",
            RoundingMode::HalfCeil => "halfCeil",
            RoundingMode::HalfFloor => "halfFloor",
            RoundingMode::HalfExpand => "halfExpand",
            RoundingMode::HalfTrunc => "halfTrunc",
            RoundingMode::HalfEven => "halfEven",
        }
    }

    pub(crate) const ALL: [RoundingMode; 9] = [
        RoundingMode::Ceil,
        RoundingMode::Floor,
        RoundingMode::Expand,
        RoundingMode::Trunc,
        RoundingMode::HalfCeil,
        RoundingMode::HalfFloor,
        RoundingMode::HalfExpand,
        RoundingMode::HalfTrunc,
        RoundingMode::HalfEven,
    ];
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoundingMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                TemporalError::invalid_argument(format!("unknown rounding mode '{}'", s))
            })
    }
}

// ── Overflow / Disambiguation ───────────────────────────────────────────────

/// What to do when a calendar computation lands on a day the month lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Overflow {
    /// Clamp to the nearest valid value (e.g. the last day of the month).
    #[default]
    Constrain,
    /// Fail with a range error.
    Reject,
}

impl FromStr for Overflow {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constrain" => Ok(Overflow::Constrain),
            "reject" => Ok(Overflow::Reject),
            other => Err(TemporalError::invalid_argument(format!(
                "unknown overflow policy '{}'",
                other
            ))),
        }
    }
}

/// Policy for wall-clock times that fall in a gap or an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Disambiguation {
    /// Gap: shift forward by the gap's width. Overlap: the earlier instant.
    #[default]
    Compatible,
    /// Gap: shift backward by the gap's width. Overlap: the earlier instant.
    Earlier,
    /// Gap: shift forward by the gap's width. Overlap: the later instant.
    Later,
    /// Fail with a range error on a gap or an overlap.
    Reject,
}

impl FromStr for Disambiguation {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compatible" => Ok(Disambiguation::Compatible),
            "earlier" => Ok(Disambiguation::Earlier),
            "later" => Ok(Disambiguation::Later),
            "reject" => Ok(Disambiguation::Reject),
            other => Err(TemporalError::invalid_argument(format!(
                "unknown disambiguation policy '{}'",
                other
            ))),
        }
    }
}

// ── Settings ────────────────────────────────────────────────────────────────

/// Options for `until` and `since`.
///
/// `largest_unit: None` means "auto": the natural unit of the value type,
/// raised to the smallest unit when that is larger. `smallest_unit: None`
/// means the finest unit the value type carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifferenceSettings {
    pub largest_unit: Option<Unit>,
    pub smallest_unit: Option<Unit>,
    pub rounding_increment: u32,
    pub rounding_mode: RoundingMode,
}

impl Default for DifferenceSettings {
    fn default() -> Self {
        DifferenceSettings {
            largest_unit: None,
            smallest_unit: None,
            rounding_increment: 1,
            rounding_mode: RoundingMode::Trunc,
        }
    }
}

impl DifferenceSettings {
    pub fn largest(mut self, unit: Unit) -> Self {
        self.largest_unit = Some(unit);
        self
    }

    pub fn smallest(mut self, unit: Unit) -> Self {
        self.smallest_unit = Some(unit);
        self
    }

    pub fn increment(mut self, increment: u32) -> Self {
        self.rounding_increment = increment;
        self
    }

    pub fn mode(mut self, mode: RoundingMode) -> Self {
        self.rounding_mode = mode;
        self
    }
}

/// Options for `round` on values and durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundingOptions {
    pub smallest_unit: Option<Unit>,
    /// Only meaningful when rounding a [`Duration`](crate::Duration).
    pub largest_unit: Option<Unit>,
    pub increment: u32,
    pub mode: RoundingMode,
}

impl Default for RoundingOptions {
    fn default() -> Self {
        RoundingOptions {
            smallest_unit: None,
            largest_unit: None,
            increment: 1,
            mode: RoundingMode::HalfExpand,
        }
    }
}

impl RoundingOptions {
    /// Round to whole `smallest_unit`s with `halfExpand`.
    pub fn new(smallest_unit: Unit) -> Self {
        RoundingOptions {
            smallest_unit: Some(smallest_unit),
            ..RoundingOptions::default()
        }
    }

    pub fn largest(mut self, unit: Unit) -> Self {
        self.largest_unit = Some(unit);
        self
    }

    pub fn increment(mut self, increment: u32) -> Self {
        self.increment = increment;
        self
    }

    pub fn mode(mut self, mode: RoundingMode) -> Self {
        self.mode = mode;
        self
    }

    pub(crate) fn required_smallest_unit(&self) -> Result<Unit, TemporalError> {
        self.smallest_unit
            .ok_or_else(|| TemporalError::invalid_argument("smallest unit is required"))
    }
}

/// Anchor that gives calendar units a concrete length.
#[derive(Debug, Clone, PartialEq)]
pub enum RelativeTo {
    /// Days are 24 hours; months and years follow the ISO calendar.
    Date(PlainDate),
    /// Days follow the zone's wall clock and may be 23 or 25 hours long.
    Zoned(ZonedDateTime),
}

impl From<PlainDate> for RelativeTo {
    fn from(date: PlainDate) -> Self {
        RelativeTo::Date(date)
    }
}

impl From<ZonedDateTime> for RelativeTo {
    fn from(zdt: ZonedDateTime) -> Self {
        RelativeTo::Zoned(zdt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_parse_singular_and_plural() {
        assert_eq!("day".parse::<Unit>().unwrap(), Unit::Day);
        assert_eq!("days".parse::<Unit>().unwrap(), Unit::Day);
        assert_eq!("microseconds".parse::<Unit>().unwrap(), Unit::Microsecond);
        assert!("fortnight".parse::<Unit>().is_err());
    }

    #[test]
    fn units_are_ordered_by_size() {
        assert!(Unit::Year > Unit::Month);
        assert!(Unit::Day > Unit::Hour);
        assert!(Unit::Nanosecond < Unit::Microsecond);
    }

    #[test]
    fn rounding_modes_roundtrip_names() {
        for mode in RoundingMode::ALL {
            assert_eq!(mode.as_str().parse::<RoundingMode>().unwrap(), mode);
        }
    }

    #[test]
    fn negate_swaps_directional_modes_only() {
        assert_eq!(RoundingMode::Ceil.negate(), RoundingMode::Floor);
        assert_eq!(RoundingMode::HalfFloor.negate(), RoundingMode::HalfCeil);
        assert_eq!(RoundingMode::HalfEven.negate(), RoundingMode::HalfEven);
        assert_eq!(RoundingMode::Expand.negate(), RoundingMode::Expand);
    }
}

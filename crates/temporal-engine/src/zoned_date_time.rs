//! Instants read through a time zone.
//!
//! A [`ZonedDateTime`] stores only the instant and the zone. Its wall-clock
//! fields are derived on demand from the zone's offset at that instant, so
//! the fields and the instant can never disagree.
//!
//! Arithmetic follows the wall clock for days and larger units and the
//! timeline for hours and smaller: adding one day across a spring-forward
//! transition keeps the time of day (23 real hours), adding 24 hours does
//! not.

use crate::calendar::add_date_duration;
use crate::difference::{self, Operation, UnitGroup};
use crate::duration::{DateDuration, Duration, InternalDuration};
use crate::error::{Result, TemporalError};
use crate::instant::Instant;
use crate::options::{DifferenceSettings, Disambiguation, Overflow, RoundingOptions, Unit};
use crate::plain_date::PlainDate;
use crate::plain_date_time::PlainDateTime;
use crate::plain_time::PlainTime;
use crate::rounding;
use crate::tz::{self, TimeZone};

/// An exact instant together with the zone it is read in.
///
/// Equal when both the instant and the time zone are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonedDateTime {
    instant: Instant,
    time_zone: TimeZone,
}

impl ZonedDateTime {
    /// Pairs an instant with a zone. The instant is already validated, so
    /// this cannot fail.
    pub fn new(instant: Instant, time_zone: TimeZone) -> Self {
        ZonedDateTime { instant, time_zone }
    }

    pub fn from_epoch_nanoseconds(epoch_nanoseconds: i128, time_zone: TimeZone) -> Result<Self> {
        Ok(ZonedDateTime::new(
            Instant::from_epoch_nanoseconds(epoch_nanoseconds)?,
            time_zone,
        ))
    }

    /// Resolves a wall-clock reading in `time_zone`.
    ///
    /// # Examples
    ///
    /// ```
    /// use temporal_engine::{Disambiguation, PlainDateTime, TimeZone, ZonedDateTime};
    ///
    /// let tz = TimeZone::new("America/New_York").unwrap();
    /// let gap = PlainDateTime::new_iso(2024, 3, 10, 2, 30, 0, 0, 0, 0).unwrap();
    /// let zdt = ZonedDateTime::from_plain_date_time(&gap, &tz, Disambiguation::Compatible).unwrap();
    /// assert_eq!(zdt.to_string(), "2024-03-10T03:30:00-04:00[America/New_York]");
    /// ```
    pub fn from_plain_date_time(
        date_time: &PlainDateTime,
        time_zone: &TimeZone,
        disambiguation: Disambiguation,
    ) -> Result<Self> {
        let instant = time_zone.instant_for(date_time, disambiguation)?;
        Ok(ZonedDateTime::new(instant, time_zone.clone()))
    }

    pub(crate) fn with_epoch_nanoseconds(&self, epoch_nanoseconds: i128) -> Result<Self> {
        ZonedDateTime::from_epoch_nanoseconds(epoch_nanoseconds, self.time_zone.clone())
    }

    pub fn epoch_nanoseconds(&self) -> i128 {
        self.instant.epoch_nanoseconds()
    }

    pub fn to_instant(&self) -> Instant {
        self.instant
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    pub fn time_zone_id(&self) -> &str {
        self.time_zone.id()
    }

    pub fn offset_nanoseconds(&self) -> i64 {
        self.time_zone.offset_nanoseconds_for(&self.instant)
    }

    /// The UTC offset as `±HH:MM`.
    pub fn offset(&self) -> String {
        tz::format_offset(self.offset_nanoseconds())
    }

    pub fn to_plain_date_time(&self) -> PlainDateTime {
        self.time_zone.plain_date_time_for(&self.instant)
    }

    pub fn to_plain_date(&self) -> PlainDate {
        self.to_plain_date_time().date()
    }

    pub fn to_plain_time(&self) -> PlainTime {
        self.to_plain_date_time().time()
    }

    /// Real length of this value's calendar day, in hours (23, 24, 25 or
    /// anything a zone's history produced).
    pub fn hours_in_day(&self) -> Result<f64> {
        let today = self.to_plain_date();
        let tomorrow = add_date_duration(&today, &ONE_DAY, Overflow::Constrain)?;
        let start = self.time_zone.start_of_day(&today)?;
        let end = self.time_zone.start_of_day(&tomorrow)?;
        difference::total_time(end - start, Unit::Hour)
    }

    /// The first instant of this value's calendar day.
    pub fn start_of_day(&self) -> Result<Self> {
        let start = self.time_zone.start_of_day(&self.to_plain_date())?;
        self.with_epoch_nanoseconds(start)
    }

    /// Adds a duration: the date part on the wall clock (resolved with
    /// `compatible`), then the time part on the timeline.
    pub fn add(&self, duration: &Duration, overflow: Overflow) -> Result<Self> {
        let epoch_ns = self.add_internal(duration.to_internal(), overflow)?;
        self.with_epoch_nanoseconds(epoch_ns)
    }

    pub fn subtract(&self, duration: &Duration, overflow: Overflow) -> Result<Self> {
        self.add(&duration.negated(), overflow)
    }

    pub(crate) fn add_internal(&self, duration: InternalDuration, overflow: Overflow) -> Result<i128> {
        let start = if duration.date.sign() == 0 {
            self.epoch_nanoseconds()
        } else {
            let wall = self.to_plain_date_time();
            let date = add_date_duration(&wall.date(), &duration.date, overflow)?;
            let intermediate = PlainDateTime::new(date, wall.time())?;
            self.time_zone
                .epoch_ns_for(&intermediate, Disambiguation::Compatible)?
        };
        Ok(Instant::from_epoch_nanoseconds(start + duration.time)?.epoch_nanoseconds())
    }

    /// The duration from `self` to `other`, in hours and smaller units by
    /// default.
    ///
    /// With days or larger units both values must share a time zone. Days
    /// are counted on the wall clock, so a difference spanning a DST change
    /// can be "1 day" yet 23 or 25 hours long.
    pub fn until(&self, other: &ZonedDateTime, settings: DifferenceSettings) -> Result<Duration> {
        self.difference(Operation::Until, other, &settings)
    }

    pub fn since(&self, other: &ZonedDateTime, settings: DifferenceSettings) -> Result<Duration> {
        self.difference(Operation::Since, other, &settings)
    }

    fn difference(
        &self,
        operation: Operation,
        other: &ZonedDateTime,
        settings: &DifferenceSettings,
    ) -> Result<Duration> {
        let resolved = difference::resolve_settings(operation, settings, UnitGroup::ZONED)?;
        let one = self.epoch_nanoseconds();
        let two = other.epoch_nanoseconds();

        let balance_unit = if resolved.largest_unit.is_date_unit() {
            if self.time_zone != other.time_zone {
                return Err(TemporalError::range(format!(
                    "differences in days or larger units need one time zone, got {} and {}",
                    self.time_zone_id(),
                    other.time_zone_id()
                )));
            }
            if one == two {
                return Ok(Duration::default());
            }
            Unit::Hour
        } else {
            resolved.largest_unit
        };

        let internal = difference::difference_zoned_with_rounding(one, two, &self.time_zone, &resolved)?;
        let duration = Duration::from_internal(internal, balance_unit)?;
        Ok(operation.apply(duration))
    }

    /// Rounds to `smallest_unit` (day or smaller).
    ///
    /// Day rounding measures the actual day, so noon is not necessarily the
    /// halfway point. Other units round the wall clock and keep the current
    /// offset when the rounded reading is ambiguous.
    pub fn round(&self, options: RoundingOptions) -> Result<Self> {
        let smallest_unit = options.required_smallest_unit()?;
        let increment = match smallest_unit {
            Unit::Day => rounding::validate_increment(options.increment, 1, true)?,
            unit if unit < Unit::Day => rounding::validate_increment_for_unit(unit, options.increment)?,
            unit => {
                return Err(TemporalError::range(format!(
                    "cannot round a zoned date-time to {}",
                    unit
                )))
            }
        };
        if smallest_unit == Unit::Nanosecond && increment == 1 {
            return Ok(self.clone());
        }

        let epoch_ns = self.epoch_nanoseconds();
        let wall = self.to_plain_date_time();
        let rounded = if smallest_unit == Unit::Day {
            let start = self.time_zone.start_of_day(&wall.date())?;
            let next = add_date_duration(&wall.date(), &ONE_DAY, Overflow::Constrain)?;
            let end = self.time_zone.start_of_day(&next)?;
            start + rounding::round_unchecked(epoch_ns - start, end - start, options.mode)
        } else {
            let rounded_wall = wall.round(options)?;
            let offset = self.offset_nanoseconds();
            let preferred = self
                .time_zone
                .possible_instants_for(&rounded_wall)?
                .into_iter()
                .find(|candidate| self.time_zone.offset_nanoseconds_for(candidate) == offset);
            match preferred {
                Some(instant) => instant.epoch_nanoseconds(),
                None => self
                    .time_zone
                    .epoch_ns_for(&rounded_wall, Disambiguation::Compatible)?,
            }
        };
        self.with_epoch_nanoseconds(rounded)
    }

    /// Same date at `time`, or at the start of the day when `None`.
    pub fn with_plain_time(&self, time: Option<PlainTime>) -> Result<Self> {
        match time {
            Some(time) => {
                let date_time = PlainDateTime::new(self.to_plain_date(), time)?;
                ZonedDateTime::from_plain_date_time(&date_time, &self.time_zone, Disambiguation::Compatible)
            }
            None => self.start_of_day(),
        }
    }

    /// Same wall-clock time on `date`.
    pub fn with_plain_date(&self, date: PlainDate) -> Result<Self> {
        let date_time = PlainDateTime::new(date, self.to_plain_time())?;
        ZonedDateTime::from_plain_date_time(&date_time, &self.time_zone, Disambiguation::Compatible)
    }

    /// Same instant in another zone.
    pub fn with_time_zone(&self, time_zone: TimeZone) -> Self {
        ZonedDateTime::new(self.instant, time_zone)
    }

    pub fn next_transition(&self) -> Option<Self> {
        self.time_zone
            .next_transition(&self.instant)
            .map(|instant| ZonedDateTime::new(instant, self.time_zone.clone()))
    }

    pub fn previous_transition(&self) -> Option<Self> {
        self.time_zone
            .previous_transition(&self.instant)
            .map(|instant| ZonedDateTime::new(instant, self.time_zone.clone()))
    }
}

const ONE_DAY: DateDuration = DateDuration {
    years: 0,
    months: 0,
    weeks: 0,
    days: 1,
};

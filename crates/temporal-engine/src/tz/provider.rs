//! Sources of transition tables.
//!
//! [`TzdbProvider`] compiles tables from the IANA database bundled with
//! `chrono-tz`. [`TableProvider`] serves tables supplied by the caller.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use chrono::{DateTime, Offset, TimeZone as _};
use chrono_tz::Tz;
use log::{debug, trace};

use super::{Transition, TransitionTable};
use crate::error::{Result, TemporalError};
use crate::NS_PER_SECOND;

/// Resolves time zone identifiers to transition tables.
pub trait TimeZoneProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TemporalError::UnknownTimeZone`] for identifiers the
    /// provider does not know.
    fn lookup(&self, identifier: &str) -> Result<Arc<TransitionTable>>;
}

/// First instant scanned for offset changes: 1850-01-01T00:00:00Z.
const SCAN_START_SECONDS: i64 = -3_786_825_600;
/// Last instant scanned: 2101-01-01T00:00:00Z, so every change during 2100 is
/// kept. Offsets after it stay at the last observed value.
const SCAN_END_SECONDS: i64 = 4_133_980_800;
const SECONDS_PER_DAY: i64 = 86_400;

/// Tables compiled from the `chrono-tz` database, cached per identifier.
///
/// Transitions are recorded from 1850-01-01 up to 2101-01-01 UTC. Instants
/// before that window use the 1850 offset, and instants after it use the
/// offset in force at the start of 2101.
#[derive(Debug, Default)]
pub struct TzdbProvider {
    cache: RwLock<BTreeMap<String, Arc<TransitionTable>>>,
}

impl TzdbProvider {
    pub fn new() -> Self {
        TzdbProvider::default()
    }

    /// The process-wide provider used by [`TimeZone::new`](super::TimeZone::new).
    pub fn global() -> &'static TzdbProvider {
        static GLOBAL: OnceLock<TzdbProvider> = OnceLock::new();
        GLOBAL.get_or_init(TzdbProvider::new)
    }

    /// Builds a table by sampling the zone's offset once a day and
    /// bisecting every change down to the second.
    fn compile(zone: Tz) -> Result<TransitionTable> {
        let initial_offset = offset_seconds(zone, SCAN_START_SECONDS);
        let mut transitions = Vec::new();
        let mut previous_time = SCAN_START_SECONDS;
        let mut previous_offset = initial_offset;
        let mut time = SCAN_START_SECONDS + SECONDS_PER_DAY;
        while time <= SCAN_END_SECONDS {
            let offset = offset_seconds(zone, time);
            if offset != previous_offset {
                let at = bisect(zone, previous_time, time, previous_offset);
                transitions.push(Transition {
                    epoch_nanoseconds: i128::from(at) * NS_PER_SECOND,
                    offset_nanoseconds: seconds_to_ns(offset),
                });
                previous_offset = offset;
            }
            previous_time = time;
            time += SECONDS_PER_DAY;
        }
        TransitionTable::new(seconds_to_ns(initial_offset), transitions)
    }
}

impl TimeZoneProvider for TzdbProvider {
    fn lookup(&self, identifier: &str) -> Result<Arc<TransitionTable>> {
        let zone: Tz = identifier
            .parse()
            .map_err(|_| TemporalError::UnknownTimeZone(identifier.to_string()))?;
        let key = zone.name();

        if let Some(table) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            trace!("time zone cache hit for {}", key);
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(TzdbProvider::compile(zone)?);
        debug!(
            "compiled {} transitions for time zone {}",
            table.transitions().len(),
            key
        );
        Ok(Arc::clone(
            self.cache
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(key.to_string())
                .or_insert(table),
        ))
    }
}

/// Finds the first second in `(low, high]` whose offset differs from
/// `low_offset`.
fn bisect(zone: Tz, mut low: i64, mut high: i64, low_offset: i32) -> i64 {
    while high - low > 1 {
        let middle = low + (high - low) / 2;
        if offset_seconds(zone, middle) == low_offset {
            low = middle;
        } else {
            high = middle;
        }
    }
    high
}

fn offset_seconds(zone: Tz, unix_seconds: i64) -> i32 {
    match DateTime::from_timestamp(unix_seconds, 0) {
        Some(utc) => zone
            .offset_from_utc_datetime(&utc.naive_utc())
            .fix()
            .local_minus_utc(),
        None => 0,
    }
}

fn seconds_to_ns(seconds: i32) -> i64 {
    i64::from(seconds) * 1_000_000_000
}

/// Tables registered by the caller, for custom or synthetic zones.
///
/// ```
/// use temporal_engine::{TableProvider, TimeZone, TransitionTable};
///
/// let provider = TableProvider::new()
///     .with_table("Test/Fixed", TransitionTable::fixed(3_600_000_000_000).unwrap());
/// let zone = TimeZone::with_provider("Test/Fixed", &provider).unwrap();
/// assert_eq!(zone.id(), "Test/Fixed");
/// assert!(TimeZone::with_provider("Test/Missing", &provider).is_err());
/// ```
#[derive(Debug, Default)]
pub struct TableProvider {
    tables: RwLock<BTreeMap<String, Arc<TransitionTable>>>,
}

impl TableProvider {
    pub fn new() -> Self {
        TableProvider::default()
    }

    pub fn with_table(self, identifier: &str, table: TransitionTable) -> Self {
        self.insert(identifier, table);
        self
    }

    /// Registers or replaces a table.
    pub fn insert(&self, identifier: &str, table: TransitionTable) {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identifier.to_string(), Arc::new(table));
    }
}

impl TimeZoneProvider for TableProvider {
    fn lookup(&self, identifier: &str) -> Result<Arc<TransitionTable>> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .cloned()
            .ok_or_else(|| TemporalError::UnknownTimeZone(identifier.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_bounds_are_the_expected_dates() {
        let start = DateTime::from_timestamp(SCAN_START_SECONDS, 0).unwrap();
        let end = DateTime::from_timestamp(SCAN_END_SECONDS, 0).unwrap();
        assert_eq!(start.to_rfc3339(), "1850-01-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2101-01-01T00:00:00+00:00");
    }

    #[test]
    fn bisect_finds_new_york_spring_forward() {
        // 2024-03-10T07:00:00Z
        let transition = 1_710_054_000;
        let found = bisect(
            chrono_tz::America::New_York,
            transition - SECONDS_PER_DAY,
            transition + 3_600,
            -5 * 3_600,
        );
        assert_eq!(found, transition);
    }

    #[test]
    fn utc_compiles_to_an_empty_table() {
        let table = TzdbProvider::compile(chrono_tz::UTC).unwrap();
        assert_eq!(table.initial_offset(), 0);
        assert!(table.transitions().is_empty());
    }
}

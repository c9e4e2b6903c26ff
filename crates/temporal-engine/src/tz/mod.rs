//! Time zones: UTC offset lookup, transition search and wall-clock
//! disambiguation.
//!
//! A zone is an identifier plus a [`TransitionTable`]: the offset in effect
//! before the first transition, then every instant at which the offset
//! changes. Tables come from a [`provider::TimeZoneProvider`] and are shared
//! read-only behind `Arc`.
//!
//! Converting an instant to a wall-clock reading is a binary search. The
//! reverse is ambiguous around transitions: a wall-clock time skipped by a
//! forward transition (a gap) has no instant, and one repeated by a backward
//! transition (an overlap) has two. [`Disambiguation`] picks the answer.

pub mod provider;

use std::fmt;
use std::sync::Arc;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TemporalError};
use crate::instant::Instant;
use crate::options::Disambiguation;
use crate::plain_date::PlainDate;
use crate::plain_date_time::PlainDateTime;
use crate::plain_time::PlainTime;
use crate::{NS_MAX_INSTANT, NS_PER_DAY, NS_PER_MINUTE, NS_PER_SECOND};

use self::provider::{TimeZoneProvider, TzdbProvider};

/// One change of UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// The first instant the new offset applies to.
    pub epoch_nanoseconds: i128,
    /// Offset from UTC in effect from this instant on.
    pub offset_nanoseconds: i64,
}

/// The full offset history of one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionTable {
    initial_offset: i64,
    transitions: Vec<Transition>,
}

impl TransitionTable {
    /// Builds a table from the offset before the first transition and the
    /// transitions in order.
    ///
    /// Transitions that do not change the offset are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Range`] if the instants are not strictly
    /// increasing or an offset is a day or more in magnitude.
    pub fn new(initial_offset: i64, transitions: Vec<Transition>) -> Result<Self> {
        check_offset(initial_offset)?;
        let mut kept: Vec<Transition> = Vec::with_capacity(transitions.len());
        let mut previous_instant: Option<i128> = None;
        let mut current_offset = initial_offset;
        for transition in transitions {
            check_offset(transition.offset_nanoseconds)?;
            if previous_instant.is_some_and(|previous| transition.epoch_nanoseconds <= previous) {
                return Err(TemporalError::range(
                    "transition instants must be strictly increasing",
                ));
            }
            previous_instant = Some(transition.epoch_nanoseconds);
            if transition.offset_nanoseconds != current_offset {
                current_offset = transition.offset_nanoseconds;
                kept.push(transition);
            }
        }
        Ok(TransitionTable {
            initial_offset,
            transitions: kept,
        })
    }

    /// A table with one offset and no transitions.
    pub fn fixed(offset_nanoseconds: i64) -> Result<Self> {
        TransitionTable::new(offset_nanoseconds, Vec::new())
    }

    pub fn initial_offset(&self) -> i64 {
        self.initial_offset
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The offset in effect at `epoch_ns`.
    pub fn offset_at(&self, epoch_ns: i128) -> i64 {
        let index = self
            .transitions
            .partition_point(|transition| transition.epoch_nanoseconds <= epoch_ns);
        match index {
            0 => self.initial_offset,
            _ => self.transitions[index - 1].offset_nanoseconds,
        }
    }

    /// First transition strictly after `epoch_ns`.
    pub fn next_after(&self, epoch_ns: i128) -> Option<&Transition> {
        let index = self
            .transitions
            .partition_point(|transition| transition.epoch_nanoseconds <= epoch_ns);
        self.transitions.get(index)
    }

    /// Last transition strictly before `epoch_ns`.
    pub fn previous_before(&self, epoch_ns: i128) -> Option<&Transition> {
        let index = self
            .transitions
            .partition_point(|transition| transition.epoch_nanoseconds < epoch_ns);
        index.checked_sub(1).map(|index| &self.transitions[index])
    }

    /// Every offset that could apply within two days of `local`.
    fn candidate_offsets(&self, local: i128) -> Vec<i64> {
        let low = local - 2 * NS_PER_DAY;
        let high = local + 2 * NS_PER_DAY;
        let mut offsets = vec![self.offset_at(low)];
        let start = self
            .transitions
            .partition_point(|transition| transition.epoch_nanoseconds <= low);
        offsets.extend(
            self.transitions[start..]
                .iter()
                .take_while(|transition| transition.epoch_nanoseconds <= high)
                .map(|transition| transition.offset_nanoseconds),
        );
        offsets.sort_unstable();
        offsets.dedup();
        offsets
    }
}

fn check_offset(offset: i64) -> Result<()> {
    if i128::from(offset).abs() >= NS_PER_DAY {
        return Err(TemporalError::range(format!(
            "UTC offset {}ns must be less than a day in magnitude",
            offset
        )));
    }
    Ok(())
}

/// A named time zone with its transition data.
///
/// Two zones are equal when both the identifier and the transition data
/// match, so the same name served by different providers can differ.
#[derive(Debug, Clone)]
pub struct TimeZone {
    id: Arc<str>,
    table: Arc<TransitionTable>,
}

impl PartialEq for TimeZone {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && (Arc::ptr_eq(&self.table, &other.table) || self.table == other.table)
    }
}

impl Eq for TimeZone {}

impl TimeZone {
    /// Looks up an IANA identifier (or a `±HH:MM` offset) in the bundled
    /// time zone database.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::UnknownTimeZone`] for identifiers the
    /// database does not know.
    pub fn new(id: &str) -> Result<Self> {
        TimeZone::with_provider(id, TzdbProvider::global())
    }

    /// Looks up `id` through `provider`. Offset identifiers never reach the
    /// provider.
    pub fn with_provider(id: &str, provider: &dyn TimeZoneProvider) -> Result<Self> {
        if let Some(offset) = parse_offset_id(id) {
            return TimeZone::fixed(offset);
        }
        let table = provider.lookup(id)?;
        Ok(TimeZone {
            id: Arc::from(id),
            table,
        })
    }

    /// A zone built directly from a table.
    pub fn from_table(id: &str, table: TransitionTable) -> Self {
        TimeZone {
            id: Arc::from(id),
            table: Arc::new(table),
        }
    }

    pub fn utc() -> Self {
        TimeZone {
            id: Arc::from("UTC"),
            table: Arc::new(TransitionTable {
                initial_offset: 0,
                transitions: Vec::new(),
            }),
        }
    }

    /// A zone with a constant offset, identified as `±HH:MM`.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Range`] unless the offset is a whole number
    /// of minutes less than a day in magnitude.
    pub fn fixed(offset_nanoseconds: i64) -> Result<Self> {
        if i128::from(offset_nanoseconds) % NS_PER_MINUTE != 0 {
            return Err(TemporalError::range(
                "fixed offsets must be a whole number of minutes",
            ));
        }
        let table = TransitionTable::fixed(offset_nanoseconds)?;
        Ok(TimeZone {
            id: Arc::from(format_offset(offset_nanoseconds).as_str()),
            table: Arc::new(table),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transition_table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn offset_nanoseconds_for(&self, instant: &Instant) -> i64 {
        self.offset_for_ns(instant.epoch_nanoseconds())
    }

    pub(crate) fn offset_for_ns(&self, epoch_ns: i128) -> i64 {
        self.table.offset_at(epoch_ns)
    }

    /// The wall-clock reading of `instant` in this zone.
    pub fn plain_date_time_for(&self, instant: &Instant) -> PlainDateTime {
        self.wall_for_ns(instant.epoch_nanoseconds())
    }

    pub(crate) fn wall_for_ns(&self, epoch_ns: i128) -> PlainDateTime {
        PlainDateTime::from_local_epoch_ns_unchecked(epoch_ns + i128::from(self.offset_for_ns(epoch_ns)))
    }

    /// Every instant whose wall-clock reading is `date_time`: one normally,
    /// none in a gap, two in an overlap. Sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Range`] if a candidate lies outside the
    /// supported instant range.
    pub fn possible_instants_for(&self, date_time: &PlainDateTime) -> Result<Vec<Instant>> {
        self.possible_epoch_ns(date_time.local_epoch_ns())?
            .into_iter()
            .map(Instant::from_epoch_nanoseconds)
            .collect()
    }

    fn possible_epoch_ns(&self, local: i128) -> Result<Vec<i128>> {
        let mut found: Vec<i128> = self
            .table
            .candidate_offsets(local)
            .into_iter()
            .filter_map(|offset| {
                let candidate = local - i128::from(offset);
                (self.offset_for_ns(candidate) == offset).then_some(candidate)
            })
            .collect();
        found.sort_unstable();
        found.dedup();
        if let Some(out_of_range) = found.iter().find(|ns| ns.abs() > NS_MAX_INSTANT) {
            return Err(TemporalError::range(format!(
                "instant {} is outside the supported range",
                out_of_range
            )));
        }
        Ok(found)
    }

    /// The instant for a wall-clock reading, resolving gaps and overlaps
    /// with `disambiguation`.
    ///
    /// In a gap, `Earlier` moves the reading back by the gap's width (02:30
    /// in a one-hour spring-forward gap becomes 01:30 on the old offset),
    /// while `Compatible` and `Later` move it forward (03:30 on the new one).
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Range`] under `Reject` when the reading is in
    /// a gap or an overlap.
    pub fn instant_for(&self, date_time: &PlainDateTime, disambiguation: Disambiguation) -> Result<Instant> {
        Instant::from_epoch_nanoseconds(self.epoch_ns_for(date_time, disambiguation)?)
    }

    pub(crate) fn epoch_ns_for(&self, date_time: &PlainDateTime, disambiguation: Disambiguation) -> Result<i128> {
        let local = date_time.local_epoch_ns();
        let possible = self.possible_epoch_ns(local)?;
        match (possible.as_slice(), disambiguation) {
            ([only], _) => Ok(*only),
            ([first, .., last], _) => {
                trace!(
                    "{}: {} is ambiguous ({} candidates), resolving {:?}",
                    self.id,
                    local,
                    possible.len(),
                    disambiguation
                );
                match disambiguation {
                    Disambiguation::Compatible | Disambiguation::Earlier => Ok(*first),
                    Disambiguation::Later => Ok(*last),
                    Disambiguation::Reject => Err(TemporalError::range(format!(
                        "wall-clock time is ambiguous in {}",
                        self.id
                    ))),
                }
            }
            ([], Disambiguation::Reject) => Err(TemporalError::range(format!(
                "wall-clock time does not exist in {}",
                self.id
            ))),
            ([], _) => {
                let before = self.offset_for_ns(local - NS_PER_DAY);
                let after = self.offset_for_ns(local + NS_PER_DAY);
                let gap = i128::from(after) - i128::from(before);
                trace!(
                    "{}: {} falls in a {}ns gap, resolving {:?}",
                    self.id,
                    local,
                    gap,
                    disambiguation
                );
                let shifted = match disambiguation {
                    Disambiguation::Earlier => self.possible_epoch_ns(local - gap)?.first().copied(),
                    _ => self.possible_epoch_ns(local + gap)?.last().copied(),
                };
                shifted.ok_or_else(|| {
                    TemporalError::range(format!(
                        "could not resolve a skipped wall-clock time in {}",
                        self.id
                    ))
                })
            }
        }
    }

    /// The first instant of `date` in this zone: midnight, or the end of the
    /// gap when midnight is skipped.
    pub(crate) fn start_of_day(&self, date: &PlainDate) -> Result<i128> {
        let midnight = PlainDateTime::new(*date, PlainTime::default())?;
        let local = midnight.local_epoch_ns();
        if let Some(first) = self.possible_epoch_ns(local)?.first() {
            return Ok(*first);
        }
        self.table
            .next_after(local - NS_PER_DAY)
            .map(|transition| transition.epoch_nanoseconds)
            .ok_or_else(|| TemporalError::range(format!("no start of day found in {}", self.id)))
    }

    /// The first offset change strictly after `instant`.
    pub fn next_transition(&self, instant: &Instant) -> Option<Instant> {
        self.table
            .next_after(instant.epoch_nanoseconds())
            .and_then(|transition| Instant::from_epoch_nanoseconds(transition.epoch_nanoseconds).ok())
    }

    /// The last offset change strictly before `instant`.
    pub fn previous_transition(&self, instant: &Instant) -> Option<Instant> {
        self.table
            .previous_before(instant.epoch_nanoseconds())
            .and_then(|transition| Instant::from_epoch_nanoseconds(transition.epoch_nanoseconds).ok())
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// `+HH:MM`, with `:SS` and a fraction only when needed.
pub(crate) fn format_offset(offset_nanoseconds: i64) -> String {
    let sign = if offset_nanoseconds < 0 { '-' } else { '+' };
    let total = i128::from(offset_nanoseconds).abs();
    let hours = total / (60 * NS_PER_MINUTE);
    let minutes = total / NS_PER_MINUTE % 60;
    let seconds = total / NS_PER_SECOND % 60;
    let fraction = total % NS_PER_SECOND;
    let mut out = format!("{}{:02}:{:02}", sign, hours, minutes);
    if seconds != 0 || fraction != 0 {
        out.push_str(&format!(":{:02}", seconds));
    }
    if fraction != 0 {
        let digits = format!("{:09}", fraction);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Parses `±HH:MM` or `±HHMM` into nanoseconds.
fn parse_offset_id(id: &str) -> Option<i64> {
    let (sign, rest) = match id.as_bytes().first()? {
        b'+' => (1, &id[1..]),
        b'-' => (-1, &id[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i64 = digits[..2].parse().ok()?;
    let minutes: i64 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 60 + minutes) * NS_PER_MINUTE as i64)
}

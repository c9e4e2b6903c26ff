use temporal_engine::{
    DifferenceSettings, Disambiguation, Duration, HasInstant, HasTime, Overflow, PlainDate,
    PlainDateTime, PlainTime, RoundingMode, RoundingOptions, TimeZone, Unit, ZonedDateTime,
};

const NY_FALL_BACK: i128 = 1_730_613_600_000_000_000;
const SECOND: i128 = 1_000_000_000;

fn new_york() -> TimeZone {
    TimeZone::new("America/New_York").expect("New York should be in the database")
}

fn ny(y: i32, mo: u8, d: u8, h: u8, mi: u8) -> ZonedDateTime {
    let wall = PlainDateTime::new_iso(y, mo, d, h, mi, 0, 0, 0, 0).expect("valid date-time");
    ZonedDateTime::from_plain_date_time(&wall, &new_york(), Disambiguation::Compatible)
        .expect("should resolve")
}

fn unit(unit: Unit, amount: i64) -> Duration {
    Duration::from_unit(unit, amount).expect("should build duration")
}

// ---------------------------------------------------------------------------
// Day length
// ---------------------------------------------------------------------------

#[test]
fn hours_in_day_across_dst() {
    assert_eq!(ny(2024, 3, 10, 12, 0).hours_in_day().expect("should measure"), 23.0);
    assert_eq!(ny(2024, 11, 3, 12, 0).hours_in_day().expect("should measure"), 25.0);
    assert_eq!(ny(2024, 7, 4, 12, 0).hours_in_day().expect("should measure"), 24.0);
}

#[test]
fn start_of_day_is_local_midnight() {
    let start = ny(2024, 3, 10, 15, 45).start_of_day().expect("should find start");
    assert_eq!(start.to_string(), "2024-03-10T00:00:00-05:00[America/New_York]");
    let same = ny(2024, 3, 10, 15, 45).with_plain_time(None).expect("should find start");
    assert_eq!(start, same);
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

#[test]
fn adding_a_day_keeps_wall_clock_time() {
    let saturday = ny(2024, 3, 9, 12, 0);
    let sunday = saturday.add(&unit(Unit::Day, 1), Overflow::Constrain).expect("should add");
    assert_eq!(sunday.to_string(), "2024-03-10T12:00:00-04:00[America/New_York]");
    assert_eq!(sunday.epoch_nanoseconds() - saturday.epoch_nanoseconds(), 23 * 3_600 * SECOND);
}

#[test]
fn adding_24_hours_follows_the_timeline() {
    let saturday = ny(2024, 3, 9, 12, 0);
    let later = saturday.add(&unit(Unit::Hour, 24), Overflow::Constrain).expect("should add");
    assert_eq!(later.to_string(), "2024-03-10T13:00:00-04:00[America/New_York]");
}

#[test]
fn adding_into_a_gap_resolves_compatibly() {
    let before = ny(2024, 3, 9, 2, 30);
    let after = before.add(&unit(Unit::Day, 1), Overflow::Constrain).expect("should add");
    assert_eq!(after.to_string(), "2024-03-10T03:30:00-04:00[America/New_York]");
}

#[test]
fn subtract_month_constrains_day() {
    let end_of_march = ny(2024, 3, 31, 9, 0);
    let earlier = end_of_march
        .subtract(&unit(Unit::Month, 1), Overflow::Constrain)
        .expect("should subtract");
    assert_eq!(earlier.to_string(), "2024-02-29T09:00:00-05:00[America/New_York]");
    assert!(end_of_march.subtract(&unit(Unit::Month, 1), Overflow::Reject).is_err());
}

// ---------------------------------------------------------------------------
// Differences
// ---------------------------------------------------------------------------

#[test]
fn until_defaults_to_hours() {
    let a = ny(2024, 3, 9, 12, 0);
    let b = ny(2024, 3, 10, 12, 0);
    let d = a.until(&b, DifferenceSettings::default()).expect("should diff");
    assert_eq!((d.days(), d.hours()), (0, 23));
}

#[test]
fn until_in_days_counts_wall_clock_days() {
    let a = ny(2024, 3, 9, 12, 0);
    let b = ny(2024, 3, 10, 12, 0);
    let d = a.until(&b, DifferenceSettings::default().largest(Unit::Day)).expect("should diff");
    assert_eq!((d.days(), d.hours()), (1, 0));

    let c = ny(2024, 3, 10, 13, 30);
    let d = a.until(&c, DifferenceSettings::default().largest(Unit::Day)).expect("should diff");
    assert_eq!((d.days(), d.hours(), d.minutes()), (1, 1, 30));
}

#[test]
fn until_in_months_and_back() {
    let a = ny(2024, 1, 31, 8, 0);
    let b = ny(2024, 3, 1, 8, 0);
    let settings = DifferenceSettings::default().largest(Unit::Month);
    let d = a.until(&b, settings).expect("should diff");
    assert_eq!((d.months(), d.days()), (1, 1));
    let back = a.since(&b, settings).expect("should diff");
    assert!(back.sign() < 0);
}

#[test]
fn day_units_need_one_time_zone() {
    let a = ny(2024, 3, 9, 12, 0);
    let b = a.with_time_zone(TimeZone::utc());
    let err = a
        .until(&b, DifferenceSettings::default().largest(Unit::Day))
        .expect_err("zones differ");
    assert!(err.is_range());
    // Exact units are fine across zones.
    let d = a.until(&b, DifferenceSettings::default()).expect("should diff");
    assert!(d.is_zero());
}

#[test]
fn until_rounds_with_increment() {
    let a = ny(2024, 3, 9, 12, 0);
    let b = ny(2024, 3, 9, 12, 52);
    let settings = DifferenceSettings::default()
        .smallest(Unit::Minute)
        .increment(15)
        .mode(RoundingMode::HalfExpand);
    let d = a.until(&b, settings).expect("should diff");
    assert_eq!((d.hours(), d.minutes()), (0, 45));
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

#[test]
fn rounding_to_day_uses_real_day_length() {
    // On a 23-hour day, 12:00 is 11 hours in, which is less than half.
    let noon = ny(2024, 3, 10, 12, 0);
    let rounded = noon.round(RoundingOptions::new(Unit::Day)).expect("should round");
    assert_eq!(rounded.to_string(), "2024-03-10T00:00:00-05:00[America/New_York]");

    let afternoon = ny(2024, 3, 10, 13, 0);
    let rounded = afternoon.round(RoundingOptions::new(Unit::Day)).expect("should round");
    assert_eq!(rounded.to_string(), "2024-03-11T00:00:00-04:00[America/New_York]");
}

#[test]
fn rounding_in_overlap_keeps_current_offset() {
    // 01:20-05:00, the second reading of 01:20 that night.
    let second_pass = ZonedDateTime::from_epoch_nanoseconds(NY_FALL_BACK + 20 * 60 * SECOND, new_york())
        .expect("in range");
    assert_eq!(second_pass.offset(), "-05:00");
    let rounded = second_pass.round(RoundingOptions::new(Unit::Hour)).expect("should round");
    assert_eq!(rounded.to_string(), "2024-11-03T01:00:00-05:00[America/New_York]");
    assert_eq!(rounded.epoch_nanoseconds(), NY_FALL_BACK);
}

#[test]
fn rounding_to_calendar_units_fails() {
    let zdt = ny(2024, 3, 10, 12, 0);
    assert!(zdt.round(RoundingOptions::new(Unit::Month)).is_err());
    assert!(zdt.round(RoundingOptions::default()).is_err());
    assert!(zdt.round(RoundingOptions::new(Unit::Day).increment(2)).is_err());
}

#[test]
fn rounding_minutes_with_increment() {
    let zdt = ny(2024, 7, 4, 9, 8);
    let rounded = zdt
        .round(RoundingOptions::new(Unit::Minute).increment(15).mode(RoundingMode::Ceil))
        .expect("should round");
    assert_eq!(rounded.to_plain_time(), PlainTime::new(9, 15, 0, 0, 0, 0).expect("valid time"));
    assert!(zdt.round(RoundingOptions::new(Unit::Minute).increment(7)).is_err());
}

// ---------------------------------------------------------------------------
// Field replacement and conversions
// ---------------------------------------------------------------------------

#[test]
fn with_plain_date_keeps_time() {
    let zdt = ny(2024, 7, 4, 9, 30);
    let moved = zdt
        .with_plain_date(PlainDate::new(2024, 12, 25).expect("valid date"))
        .expect("should move");
    assert_eq!(moved.to_string(), "2024-12-25T09:30:00-05:00[America/New_York]");
    assert_eq!(HasTime::minute(&moved), 30);
}

#[test]
fn with_time_zone_keeps_instant() {
    let zdt = ny(2024, 7, 4, 9, 30);
    let utc = zdt.with_time_zone(TimeZone::utc());
    assert_eq!(utc.epoch_nanoseconds(), zdt.epoch_nanoseconds());
    assert_eq!(utc.to_string(), "2024-07-04T13:30:00+00:00[UTC]");
    assert_eq!(zdt.to_instant().to_string(), "2024-07-04T13:30:00Z");
    assert_eq!(zdt.epoch_milliseconds(), 1_720_099_800_000);
}

#[test]
fn transitions_from_a_zoned_value() {
    let zdt = ny(2024, 7, 4, 9, 30);
    let next = zdt.next_transition().expect("fall back");
    assert_eq!(next.epoch_nanoseconds(), NY_FALL_BACK);
    assert_eq!(next.to_string(), "2024-11-03T01:00:00-05:00[America/New_York]");
    let previous = zdt.previous_transition().expect("spring forward");
    assert_eq!(previous.to_string(), "2024-03-10T03:00:00-04:00[America/New_York]");
}

use std::cmp::Ordering;

use temporal_engine::{
    Disambiguation, Duration, PartialDuration, PlainDate, PlainDateTime, RelativeTo, RoundingMode,
    RoundingOptions, TimeZone, Unit, ZonedDateTime,
};

fn partial() -> PartialDuration {
    PartialDuration::empty()
}

fn duration(partial: PartialDuration) -> Duration {
    Duration::from_partial(partial).expect("should build duration")
}

fn relative_date(y: i32, m: u8, d: u8) -> RelativeTo {
    RelativeTo::Date(PlainDate::new(y, m, d).expect("valid date"))
}

fn relative_ny(y: i32, m: u8, d: u8) -> RelativeTo {
    let tz = TimeZone::new("America/New_York").expect("New York should be in the database");
    let wall = PlainDateTime::new_iso(y, m, d, 0, 0, 0, 0, 0, 0).expect("valid date-time");
    RelativeTo::Zoned(
        ZonedDateTime::from_plain_date_time(&wall, &tz, Disambiguation::Compatible)
            .expect("should resolve"),
    )
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn mixed_signs_are_rejected() {
    let err = Duration::from_partial(partial().with_hours(1).with_minutes(-1))
        .expect_err("mixed signs");
    assert!(err.is_range());
}

#[test]
fn field_magnitude_limits() {
    assert!(Duration::from_unit(Unit::Year, 4_294_967_295).is_ok());
    assert!(Duration::from_unit(Unit::Year, 4_294_967_296).is_err());
    assert!(Duration::from_unit(Unit::Month, -4_294_967_296).is_err());
    // 2^53 seconds is one past the limit.
    assert!(Duration::from_unit(Unit::Second, 9_007_199_254_740_991).is_ok());
    assert!(Duration::from_unit(Unit::Second, 9_007_199_254_740_992).is_err());
}

#[test]
fn huge_sub_second_fields_are_range_errors() {
    let err = Duration::new(0, 0, 0, 0, 0, 0, 0, 0, 0, i128::MIN).expect_err("i128::MIN nanoseconds");
    assert!(err.is_range());
    let err = Duration::new(0, 0, 0, 0, 0, 0, 0, 0, i128::MAX / 10, 0)
        .expect_err("microseconds overflow when scaled");
    assert!(err.is_range());
    let err = Duration::new(0, 0, 0, 0, 0, 0, 0, 0, -(i128::MAX / 1_000), -(i128::MAX / 1_000))
        .expect_err("sum overflows");
    assert!(err.is_range());
    assert!(Duration::from_partial(partial().with_nanoseconds(i128::MAX)).is_err());
}

#[test]
fn oversized_json_field_is_an_error() {
    let err = serde_json::from_str::<Duration>(
        r#"{"microseconds": 100000000000000000000000000000000000000}"#,
    )
    .expect_err("should not fit");
    assert!(err.to_string().contains("out of range"), "{}", err);
}

#[test]
fn empty_partial_is_invalid_argument() {
    let err = Duration::from_partial(partial()).expect_err("no fields");
    assert!(!err.is_range());
}

#[test]
fn sign_negation_and_abs() {
    let d = duration(partial().with_days(-2).with_hours(-3));
    assert_eq!(d.sign(), -1);
    assert_eq!(d.negated().sign(), 1);
    assert_eq!(d.abs(), d.negated());
    assert_eq!(d.largest_nonzero_unit(), Unit::Day);
    assert!(Duration::default().is_zero());
    assert_eq!(Duration::default().sign(), 0);
}

#[test]
fn balance_from_nanoseconds() {
    let d = Duration::from_nanoseconds(93_784_005_006_007, Unit::Day).expect("should balance");
    assert_eq!(
        (d.days(), d.hours(), d.minutes(), d.seconds()),
        (1, 2, 3, 4)
    );
    assert_eq!((d.milliseconds(), d.microseconds(), d.nanoseconds()), (5, 6, 7));

    let d = Duration::from_nanoseconds(93_784_005_006_007, Unit::Hour).expect("should balance");
    assert_eq!((d.days(), d.hours()), (0, 26));

    let d = Duration::from_nanoseconds(-1_500_000_000, Unit::Second).expect("should balance");
    assert_eq!((d.seconds(), d.milliseconds()), (-1, -500));
}

#[test]
fn json_round_trip_uses_partial_form() {
    let d: Duration = serde_json::from_str(r#"{"hours": 1, "minutes": 30}"#).expect("should parse");
    assert_eq!((d.hours(), d.minutes()), (1, 30));
    assert!(serde_json::from_str::<Duration>(r#"{"hours": 1, "minutes": -30}"#).is_err());
    assert!(serde_json::from_str::<Duration>(r#"{"fortnights": 1}"#).is_err());
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

#[test]
fn round_balances_up_to_largest_unit() {
    let d = duration(partial().with_seconds(3_600));
    let rounded = d
        .round(RoundingOptions::default().largest(Unit::Hour), None)
        .expect("should round");
    assert_eq!((rounded.hours(), rounded.seconds()), (1, 0));
}

#[test]
fn round_days_without_anchor_uses_24_hours() {
    let d = duration(partial().with_days(1).with_hours(12));
    let rounded = d.round(RoundingOptions::new(Unit::Day), None).expect("should round");
    assert_eq!((rounded.days(), rounded.hours()), (2, 0));
    let truncated = d
        .round(RoundingOptions::new(Unit::Day).mode(RoundingMode::Trunc), None)
        .expect("should round");
    assert_eq!(truncated.days(), 1);
}

#[test]
fn round_calendar_units_need_anchor() {
    let d = duration(partial().with_months(1).with_days(15));
    let err = d.round(RoundingOptions::new(Unit::Month), None).expect_err("no anchor");
    assert!(err.is_range());
}

#[test]
fn round_months_depends_on_anchor_month_length() {
    let d = duration(partial().with_months(1).with_days(15));
    // 15 days of a 31-day March is under half.
    let from_feb = d
        .round(RoundingOptions::new(Unit::Month), Some(&relative_date(2024, 2, 1)))
        .expect("should round");
    assert_eq!((from_feb.months(), from_feb.days()), (1, 0));
    // 15 days of a 29-day February is over half.
    let from_jan = d
        .round(RoundingOptions::new(Unit::Month), Some(&relative_date(2024, 1, 1)))
        .expect("should round");
    assert_eq!((from_jan.months(), from_jan.days()), (2, 0));
}

#[test]
fn round_hours_into_days_across_dst() {
    // The first day starting 2024-03-10 is 23 hours long in New York.
    let d = duration(partial().with_hours(23));
    let rounded = d
        .round(
            RoundingOptions::default().largest(Unit::Day),
            Some(&relative_ny(2024, 3, 10)),
        )
        .expect("should round");
    assert_eq!((rounded.days(), rounded.hours()), (1, 0));

    let rounded = d
        .round(
            RoundingOptions::default().largest(Unit::Day),
            Some(&relative_ny(2024, 3, 11)),
        )
        .expect("should round");
    assert_eq!((rounded.days(), rounded.hours()), (0, 23));
}

#[test]
fn round_rejects_inverted_units_and_bad_increments() {
    let d = duration(partial().with_hours(5));
    assert!(d
        .round(RoundingOptions::new(Unit::Hour).largest(Unit::Minute), None)
        .is_err());
    assert!(d.round(RoundingOptions::new(Unit::Minute).increment(7), None).is_err());
    assert!(d.round(RoundingOptions::default(), None).is_err());
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[test]
fn total_of_exact_durations() {
    let d = duration(partial().with_minutes(90));
    assert_eq!(d.total(Unit::Hour, None).expect("should total"), 1.5);
    let d = duration(partial().with_days(1));
    assert_eq!(d.total(Unit::Hour, None).expect("should total"), 24.0);
    assert_eq!(d.total(Unit::Second, None).expect("should total"), 86_400.0);
}

#[test]
fn total_relative_to_anchor() {
    let month = Duration::from_unit(Unit::Month, 1).expect("should build duration");
    assert_eq!(
        month.total(Unit::Day, Some(&relative_date(2023, 2, 1))).expect("should total"),
        28.0
    );
    let day = Duration::from_unit(Unit::Day, 1).expect("should build duration");
    assert_eq!(
        day.total(Unit::Hour, Some(&relative_ny(2024, 3, 10))).expect("should total"),
        23.0
    );
    assert_eq!(
        day.total(Unit::Hour, Some(&relative_ny(2024, 11, 3))).expect("should total"),
        25.0
    );
}

#[test]
fn total_in_months_is_fractional() {
    let d = duration(partial().with_days(45));
    let months = d
        .total(Unit::Month, Some(&relative_date(2023, 1, 1)))
        .expect("should total");
    // January has 31 days, then 14 of February's 28.
    assert!((months - 1.5).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Addition and comparison
// ---------------------------------------------------------------------------

#[test]
fn add_exact_durations() {
    let a = duration(partial().with_hours(1));
    let b = duration(partial().with_minutes(90));
    let sum = a.add(&b, None).expect("should add");
    assert_eq!((sum.hours(), sum.minutes()), (2, 30));
    let difference = a.subtract(&b, None).expect("should subtract");
    assert_eq!((difference.hours(), difference.minutes()), (0, -30));
}

#[test]
fn add_calendar_durations_needs_anchor() {
    let month = Duration::from_unit(Unit::Month, 1).expect("should build duration");
    let day = Duration::from_unit(Unit::Day, 1).expect("should build duration");
    assert!(month.add(&day, None).is_err());

    let sum = month.add(&day, Some(&relative_date(2024, 1, 31))).expect("should add");
    assert_eq!((sum.months(), sum.days()), (1, 1));
}

#[test]
fn compare_exact_and_relative() {
    let hours = duration(partial().with_hours(25));
    let day = duration(partial().with_days(1));
    assert_eq!(hours.compare(&day, None).expect("should compare"), Ordering::Greater);
    assert_eq!(
        hours
            .compare(&day, Some(&relative_ny(2024, 11, 3)))
            .expect("should compare"),
        Ordering::Equal
    );

    let month = Duration::from_unit(Unit::Month, 1).expect("should build duration");
    let thirty = Duration::from_unit(Unit::Day, 30).expect("should build duration");
    assert!(month.compare(&thirty, None).is_err());
    assert_eq!(
        month
            .compare(&thirty, Some(&relative_date(2024, 2, 1)))
            .expect("should compare"),
        Ordering::Less
    );
    assert_eq!(
        month
            .compare(&thirty, Some(&relative_date(2024, 1, 1)))
            .expect("should compare"),
        Ordering::Greater
    );
}

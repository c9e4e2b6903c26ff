//! Property-based tests for arithmetic, rounding and differences.

use proptest::prelude::*;
use temporal_engine::{
    round_to_increment, DifferenceSettings, Disambiguation, Duration, Instant, Overflow,
    PartialDuration, PlainDate, PlainDateTime, PlainTime, RoundingMode, RoundingOptions, TimeZone,
    Unit,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_mode() -> impl Strategy<Value = RoundingMode> {
    prop_oneof![
        Just(RoundingMode::Ceil),
        Just(RoundingMode::Floor),
        Just(RoundingMode::Expand),
        Just(RoundingMode::Trunc),
        Just(RoundingMode::HalfCeil),
        Just(RoundingMode::HalfFloor),
        Just(RoundingMode::HalfExpand),
        Just(RoundingMode::HalfTrunc),
        Just(RoundingMode::HalfEven),
    ]
}

fn arb_time_unit() -> impl Strategy<Value = Unit> {
    prop_oneof![
        Just(Unit::Nanosecond),
        Just(Unit::Microsecond),
        Just(Unit::Millisecond),
        Just(Unit::Second),
        Just(Unit::Minute),
        Just(Unit::Hour),
    ]
}

/// Dates between 1900 and 2100 with a day that exists in every month.
fn arb_date() -> impl Strategy<Value = PlainDate> {
    (1900i32..2100, 1u8..=12, 1u8..=28)
        .prop_map(|(y, m, d)| PlainDate::new(y, m, d).expect("day 1-28 always exists"))
}

/// Dates between 1900 and 2100, including the 29th to the 31st.
fn arb_date_any_day() -> impl Strategy<Value = PlainDate> {
    (1900i32..2100, 1u8..=12, 1u8..=31).prop_map(|(y, m, d)| {
        PlainDate::new_with_overflow(y, m, d, Overflow::Constrain).expect("clamped into range")
    })
}

fn arb_time() -> impl Strategy<Value = PlainTime> {
    (0u8..24, 0u8..60, 0u8..60, 0u16..1000)
        .prop_map(|(h, m, s, ms)| PlainTime::new(h, m, s, ms, 0, 0).expect("fields in range"))
}

/// Instants within roughly ±100 years of the epoch.
fn arb_instant() -> impl Strategy<Value = Instant> {
    (-3_155_760_000i64..3_155_760_000, 0i64..1_000_000_000).prop_map(|(s, ns)| {
        Instant::from_epoch_nanoseconds(i128::from(s) * 1_000_000_000 + i128::from(ns))
            .expect("within range")
    })
}

/// Day-and-time durations with a single sign.
fn arb_exact_duration() -> impl Strategy<Value = Duration> {
    (0i64..400, 0i64..24, 0i64..60, 0i64..60, any::<bool>()).prop_map(|(d, h, m, s, negative)| {
        let sign = if negative { -1 } else { 1 };
        Duration::from_partial(
            PartialDuration::empty()
                .with_days(sign * d)
                .with_hours(sign * h)
                .with_minutes(sign * m)
                .with_seconds(sign * s),
        )
        .expect("single-signed fields")
    })
}

fn arb_zone() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("UTC"),
        Just("America/New_York"),
        Just("Europe/London"),
        Just("Australia/Lord_Howe"),
        Just("Asia/Kolkata"),
    ]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: rounding lands on a multiple, within one increment
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn rounding_lands_on_nearby_multiple(
        value in -1_000_000_000_000i128..1_000_000_000_000,
        increment in 1i128..100_000,
        mode in arb_mode(),
    ) {
        let rounded = round_to_increment(value, increment, mode).expect("positive increment");
        prop_assert_eq!(rounded % increment, 0);
        prop_assert!((rounded - value).abs() < increment);
    }

    #[test]
    fn rounding_is_idempotent(
        value in -1_000_000_000_000i128..1_000_000_000_000,
        increment in 1i128..100_000,
        mode in arb_mode(),
    ) {
        let once = round_to_increment(value, increment, mode).expect("positive increment");
        let twice = round_to_increment(once, increment, mode).expect("positive increment");
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn negated_mode_mirrors_negated_value(
        value in -1_000_000_000i128..1_000_000_000,
        increment in 1i128..10_000,
        mode in arb_mode(),
    ) {
        let direct = round_to_increment(value, increment, mode).expect("positive increment");
        let mirrored = round_to_increment(-value, increment, mode.negate()).expect("positive increment");
        prop_assert_eq!(direct, -mirrored);
    }
}

// ---------------------------------------------------------------------------
// Property 2: exact arithmetic reverses
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn instant_add_then_subtract_is_identity(
        instant in arb_instant(),
        hours in -100_000i64..100_000,
        nanos in 0i128..1_000_000_000,
    ) {
        let duration = Duration::from_partial(
            PartialDuration::empty()
                .with_hours(hours)
                .with_nanoseconds(if hours < 0 { -nanos } else { nanos }),
        )
        .expect("single-signed fields");
        let moved = instant.add(&duration).expect("stays in range");
        prop_assert_eq!(moved.subtract(&duration).expect("stays in range"), instant);
    }

    #[test]
    fn date_add_days_then_subtract_is_identity(date in arb_date(), days in -100_000i64..100_000) {
        let duration = Duration::from_unit(Unit::Day, days).expect("valid duration");
        let moved = date.add(&duration, Overflow::Reject).expect("days never overflow a month");
        prop_assert_eq!(moved.subtract(&duration, Overflow::Reject).expect("reverses"), date);
    }

    #[test]
    fn date_add_years_months_then_subtract_is_identity(
        date in arb_date_any_day(),
        years in 0i64..50,
        months in 0i64..30,
        negative in any::<bool>(),
    ) {
        let sign = if negative { -1 } else { 1 };
        let duration = Duration::from_partial(
            PartialDuration::empty().with_years(sign * years).with_months(sign * months),
        )
        .expect("single-signed fields");
        // Reject refuses to clamp, so a failed add is the clamping case.
        let Ok(moved) = date.add(&duration, Overflow::Reject) else {
            return Ok(());
        };
        prop_assert_eq!(moved.subtract(&duration, Overflow::Reject).expect("reverses"), date);
    }

    #[test]
    fn date_add_weeks_days_then_subtract_is_identity(
        date in arb_date_any_day(),
        weeks in 0i64..500,
        days in 0i64..500,
        negative in any::<bool>(),
    ) {
        let sign = if negative { -1 } else { 1 };
        let duration = Duration::from_partial(
            PartialDuration::empty().with_weeks(sign * weeks).with_days(sign * days),
        )
        .expect("single-signed fields");
        let moved = date.add(&duration, Overflow::Reject).expect("days never clamp");
        prop_assert_eq!(moved.subtract(&duration, Overflow::Reject).expect("reverses"), date);
    }

    #[test]
    fn date_time_add_exact_then_subtract_is_identity(
        date in arb_date(),
        time in arb_time(),
        duration in arb_exact_duration(),
    ) {
        let start = PlainDateTime::new(date, time).expect("valid date-time");
        let moved = start.add(&duration, Overflow::Constrain).expect("stays in range");
        prop_assert_eq!(moved.subtract(&duration, Overflow::Constrain).expect("reverses"), start);
    }
}

// ---------------------------------------------------------------------------
// Property 3: until composes with add
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn date_plus_until_reaches_target(a in arb_date(), b in arb_date(), largest in prop_oneof![
        Just(Unit::Day), Just(Unit::Week), Just(Unit::Month), Just(Unit::Year)
    ]) {
        let d = a.until(&b, DifferenceSettings::default().largest(largest)).expect("should diff");
        prop_assert_eq!(a.add(&d, Overflow::Constrain).expect("should add"), b);
    }

    #[test]
    fn instant_until_is_negated_since(a in arb_instant(), b in arb_instant(), unit in arb_time_unit()) {
        let settings = DifferenceSettings::default().largest(Unit::Hour).smallest(unit);
        let until = a.until(&b, settings).expect("should diff");
        let since = b.since(&a, settings).expect("should diff");
        prop_assert_eq!(until, since);
        prop_assert_eq!(a.until(&b, settings).expect("should diff").negated(),
            b.until(&a, settings).expect("should diff"));
    }

    #[test]
    fn date_until_is_negated_reverse(a in arb_date_any_day(), b in arb_date_any_day()) {
        let settings = DifferenceSettings::default();
        let forward = a.until(&b, settings).expect("should diff");
        let backward = b.until(&a, settings).expect("should diff");
        prop_assert_eq!(forward.negated(), backward);
    }

    #[test]
    fn time_until_is_negated_reverse(a in arb_time(), b in arb_time()) {
        let settings = DifferenceSettings::default();
        let forward = a.until(&b, settings).expect("should diff");
        prop_assert_eq!(forward.negated(), b.until(&a, settings).expect("should diff"));
    }

    #[test]
    fn date_time_until_is_negated_reverse(
        d1 in arb_date(), t1 in arb_time(), d2 in arb_date(), t2 in arb_time(),
    ) {
        let a = PlainDateTime::new(d1, t1).expect("valid date-time");
        let b = PlainDateTime::new(d2, t2).expect("valid date-time");
        let settings = DifferenceSettings::default();
        let forward = a.until(&b, settings).expect("should diff");
        prop_assert_eq!(forward.negated(), b.until(&a, settings).expect("should diff"));
    }

    #[test]
    fn zoned_until_is_negated_reverse(
        d1 in arb_date(), t1 in arb_time(), d2 in arb_date(), t2 in arb_time(), zone in arb_zone(),
    ) {
        let tz = TimeZone::new(zone).expect("zone in database");
        let resolve = |date, time| {
            PlainDateTime::new(date, time)
                .expect("valid date-time")
                .to_zoned_date_time(&tz, Disambiguation::Compatible)
                .expect("should resolve")
        };
        let a = resolve(d1, t1);
        let b = resolve(d2, t2);
        let settings = DifferenceSettings::default();
        let forward = a.until(&b, settings).expect("should diff");
        prop_assert_eq!(forward.negated(), b.until(&a, settings).expect("should diff"));
    }

    #[test]
    fn time_until_then_add_reaches_target(a in arb_time(), b in arb_time()) {
        let d = a.until(&b, DifferenceSettings::default()).expect("should diff");
        prop_assert_eq!(a.add(&d), b);
    }

    #[test]
    fn zoned_add_until_reaches_target(
        date in arb_date(),
        time in arb_time(),
        zone in arb_zone(),
        duration in arb_exact_duration(),
    ) {
        let tz = TimeZone::new(zone).expect("zone in database");
        let wall = PlainDateTime::new(date, time).expect("valid date-time");
        let start = wall.to_zoned_date_time(&tz, Disambiguation::Compatible).expect("should resolve");
        let end = start.add(&duration, Overflow::Constrain).expect("should add");
        let d = start.until(&end, DifferenceSettings::default().largest(Unit::Day)).expect("should diff");
        prop_assert_eq!(start.add(&d, Overflow::Constrain).expect("should add"), end);
    }
}

// ---------------------------------------------------------------------------
// Property 4: rounding values
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn instant_round_is_idempotent(instant in arb_instant(), unit in arb_time_unit(), mode in arb_mode()) {
        let options = RoundingOptions::new(unit).mode(mode);
        let once = instant.round(options).expect("should round");
        prop_assert_eq!(once.round(options).expect("should round"), once);
    }

    #[test]
    fn time_round_to_hour_clears_smaller_fields(time in arb_time(), mode in arb_mode()) {
        let rounded = time.round(RoundingOptions::new(Unit::Hour).mode(mode)).expect("should round");
        prop_assert_eq!((rounded.minute(), rounded.second(), rounded.millisecond()), (0, 0, 0));
    }

    #[test]
    fn hours_in_day_is_near_24(date in arb_date(), zone in arb_zone()) {
        let tz = TimeZone::new(zone).expect("zone in database");
        let zdt = date.to_zoned_date_time(None, &tz, Disambiguation::Compatible).expect("should resolve");
        let hours = zdt.hours_in_day().expect("should measure");
        prop_assert!((22.0..=26.0).contains(&hours), "{} had {} hours", date, hours);
    }
}

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use temporal_engine::{
    DifferenceSettings, Disambiguation, Duration, Overflow, PartialDuration, PlainDate,
    PlainDateTime, RelativeTo, RoundingOptions, TimeZone, Unit, ZonedDateTime,
};

fn date_arithmetic(c: &mut Criterion) {
    let date = PlainDate::new(2024, 1, 31).unwrap();
    let other = PlainDate::new(2031, 7, 4).unwrap();
    let duration = Duration::from_partial(
        PartialDuration::empty()
            .with_years(1)
            .with_months(13)
            .with_days(45),
    )
    .unwrap();

    c.bench_function("PlainDate::add years/months/days", |b| {
        b.iter(|| black_box(date).add(black_box(&duration), Overflow::Constrain))
    });

    c.bench_function("PlainDate::until largest year", |b| {
        let settings = DifferenceSettings::default().largest(Unit::Year);
        b.iter(|| black_box(date).until(black_box(&other), settings))
    });
}

fn zoned_arithmetic(c: &mut Criterion) {
    let tz = TimeZone::new("America/New_York").unwrap();
    let start = ZonedDateTime::from_plain_date_time(
        &PlainDateTime::new_iso(2024, 3, 9, 12, 0, 0, 0, 0, 0).unwrap(),
        &tz,
        Disambiguation::Compatible,
    )
    .unwrap();
    let end = start
        .add(&Duration::from_unit(Unit::Day, 400).unwrap(), Overflow::Constrain)
        .unwrap();

    c.bench_function("TimeZone::new cached lookup", |b| {
        b.iter(|| TimeZone::new(black_box("America/New_York")))
    });

    c.bench_function("ZonedDateTime::until largest month", |b| {
        let settings = DifferenceSettings::default().largest(Unit::Month);
        b.iter(|| black_box(&start).until(black_box(&end), settings))
    });

    c.bench_function("ZonedDateTime::round to day", |b| {
        b.iter(|| black_box(&start).round(RoundingOptions::new(Unit::Day)))
    });

    c.bench_function("Duration::round relative to zoned", |b| {
        let duration = Duration::from_unit(Unit::Hour, 10_000).unwrap();
        let relative_to = RelativeTo::Zoned(start.clone());
        let options = RoundingOptions::new(Unit::Day).largest(Unit::Month);
        b.iter(|| black_box(&duration).round(options, Some(&relative_to)))
    });
}

criterion_group!(benches, date_arithmetic, zoned_arithmetic);
criterion_main!(benches);

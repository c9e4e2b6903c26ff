//! ISO-8601 string forms.
//!
//! Years outside 0000..=9999 use the expanded six-digit form with a sign
//! (`+275760`, `-000001`). Fractional seconds print only the digits needed.

use std::fmt::{self, Display, Formatter, Write as _};

use serde::{Serialize, Serializer};

use crate::duration::Duration;
use crate::instant::Instant;
use crate::plain_date::PlainDate;
use crate::plain_date_time::PlainDateTime;
use crate::plain_time::PlainTime;
use crate::tz::TimeZone;
use crate::zoned_date_time::ZonedDateTime;
use crate::NS_PER_SECOND;

fn write_year(f: &mut Formatter<'_>, year: i32) -> fmt::Result {
    if (0..=9999).contains(&year) {
        write!(f, "{:04}", year)
    } else {
        let sign = if year < 0 { '-' } else { '+' };
        write!(f, "{}{:06}", sign, year.unsigned_abs())
    }
}

/// Writes `.fffffffff` with trailing zeros removed, or nothing for zero.
fn write_fraction(f: &mut Formatter<'_>, nanoseconds: u32) -> fmt::Result {
    if nanoseconds == 0 {
        return Ok(());
    }
    let digits = format!("{:09}", nanoseconds);
    write!(f, ".{}", digits.trim_end_matches('0'))
}

impl Display for PlainDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_year(f, self.year())?;
        write!(f, "-{:02}-{:02}", self.month(), self.day())
    }
}

impl Display for PlainTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour(), self.minute(), self.second())?;
        let sub_second = u32::from(self.millisecond()) * 1_000_000
            + u32::from(self.microsecond()) * 1_000
            + u32::from(self.nanosecond());
        write_fraction(f, sub_second)
    }
}

impl Display for PlainDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date(), self.time())
    }
}

impl Display for Instant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}Z", TimeZone::utc().plain_date_time_for(self))
    }
}

impl Display for ZonedDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}[{}]",
            self.to_plain_date_time(),
            self.offset(),
            self.time_zone_id()
        )
    }
}

/// `P1Y2M3W4DT5H6M7.008S`; `PT0S` when zero; sub-second fields are folded
/// into the seconds.
impl Display for Duration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.sign() < 0 {
            f.write_char('-')?;
        }
        f.write_char('P')?;
        for (value, designator) in [
            (self.years(), 'Y'),
            (self.months(), 'M'),
            (self.weeks(), 'W'),
            (self.days(), 'D'),
        ] {
            if value != 0 {
                write!(f, "{}{}", value.unsigned_abs(), designator)?;
            }
        }

        let seconds_ns = (i128::from(self.seconds()) * NS_PER_SECOND
            + i128::from(self.milliseconds()) * 1_000_000
            + self.microseconds() * 1_000
            + self.nanoseconds())
        .unsigned_abs();
        let whole_seconds = seconds_ns / NS_PER_SECOND as u128;
        let fraction = (seconds_ns % NS_PER_SECOND as u128) as u32;
        let has_time = self.hours() != 0 || self.minutes() != 0 || seconds_ns != 0;

        if has_time || self.is_zero() {
            f.write_char('T')?;
        }
        if self.hours() != 0 {
            write!(f, "{}H", self.hours().unsigned_abs())?;
        }
        if self.minutes() != 0 {
            write!(f, "{}M", self.minutes().unsigned_abs())?;
        }
        if seconds_ns != 0 || self.is_zero() {
            write!(f, "{}", whole_seconds)?;
            write_fraction(f, fraction)?;
            f.write_char('S')?;
        }
        Ok(())
    }
}

macro_rules! serialize_as_string {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }
        )*
    };
}

serialize_as_string!(PlainDate, PlainTime, PlainDateTime, Instant, ZonedDateTime);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::PartialDuration;

    #[test]
    fn expanded_years_use_six_digits() {
        assert_eq!(PlainDate::new(-1, 1, 1).unwrap().to_string(), "-000001-01-01");
        assert_eq!(PlainDate::new(275_760, 9, 13).unwrap().to_string(), "+275760-09-13");
        assert_eq!(PlainDate::new(987, 6, 5).unwrap().to_string(), "0987-06-05");
    }

    #[test]
    fn time_fraction_drops_trailing_zeros() {
        assert_eq!(PlainTime::new(1, 2, 3, 400, 0, 0).unwrap().to_string(), "01:02:03.4");
        assert_eq!(PlainTime::new(1, 2, 3, 0, 0, 7).unwrap().to_string(), "01:02:03.000000007");
        assert_eq!(PlainTime::default().to_string(), "00:00:00");
    }

    #[test]
    fn duration_iso_form() {
        let full = Duration::new(1, 2, 3, 4, 5, 6, 7, 8, 9, 10).unwrap();
        assert_eq!(full.to_string(), "P1Y2M3W4DT5H6M7.00800901S");
        assert_eq!(Duration::default().to_string(), "PT0S");
        let negative = Duration::from_partial(PartialDuration::empty().with_days(-3)).unwrap();
        assert_eq!(negative.to_string(), "-P3D");
        let millis = Duration::from_partial(PartialDuration::empty().with_milliseconds(1500)).unwrap();
        assert_eq!(millis.to_string(), "PT1.5S");
    }

    #[test]
    fn instant_prints_utc() {
        assert_eq!(
            Instant::from_epoch_seconds(0).unwrap().to_string(),
            "1970-01-01T00:00:00Z"
        );
        assert_eq!(
            Instant::from_epoch_nanoseconds(-1).unwrap().to_string(),
            "1969-12-31T23:59:59.999999999Z"
        );
    }
}

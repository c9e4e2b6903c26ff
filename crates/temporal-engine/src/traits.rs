//! Field access shared across value types.
//!
//! Each value type holds only its own state. These traits expose the derived
//! calendar, clock and timeline fields uniformly, so generic code can read a
//! year from a `PlainDate` and a `ZonedDateTime` alike.

use crate::instant::Instant;
use crate::plain_date::PlainDate;
use crate::plain_date_time::PlainDateTime;
use crate::plain_time::PlainTime;
use crate::zoned_date_time::ZonedDateTime;

/// Values with a calendar date.
pub trait HasDate {
    fn plain_date(&self) -> PlainDate;

    fn year(&self) -> i32 {
        self.plain_date().year()
    }

    fn month(&self) -> u8 {
        self.plain_date().month()
    }

    fn day(&self) -> u8 {
        self.plain_date().day()
    }

    fn month_code(&self) -> String {
        self.plain_date().month_code()
    }

    fn day_of_week(&self) -> u8 {
        self.plain_date().day_of_week()
    }

    fn day_of_year(&self) -> u16 {
        self.plain_date().day_of_year()
    }

    fn week_of_year(&self) -> u8 {
        self.plain_date().week_of_year()
    }

    fn year_of_week(&self) -> i32 {
        self.plain_date().year_of_week()
    }

    fn days_in_month(&self) -> u8 {
        self.plain_date().days_in_month()
    }

    fn days_in_year(&self) -> u16 {
        self.plain_date().days_in_year()
    }

    fn in_leap_year(&self) -> bool {
        self.plain_date().in_leap_year()
    }
}

/// Values with a time of day.
pub trait HasTime {
    fn plain_time(&self) -> PlainTime;

    fn hour(&self) -> u8 {
        self.plain_time().hour()
    }

    fn minute(&self) -> u8 {
        self.plain_time().minute()
    }

    fn second(&self) -> u8 {
        self.plain_time().second()
    }

    fn millisecond(&self) -> u16 {
        self.plain_time().millisecond()
    }

    fn microsecond(&self) -> u16 {
        self.plain_time().microsecond()
    }

    fn nanosecond(&self) -> u16 {
        self.plain_time().nanosecond()
    }
}

/// Values fixed to a point on the timeline.
pub trait HasInstant {
    fn instant(&self) -> Instant;

    fn epoch_nanoseconds(&self) -> i128 {
        self.instant().epoch_nanoseconds()
    }

    fn epoch_milliseconds(&self) -> i64 {
        self.instant().epoch_milliseconds()
    }
}

impl HasDate for PlainDate {
    fn plain_date(&self) -> PlainDate {
        *self
    }
}

impl HasDate for PlainDateTime {
    fn plain_date(&self) -> PlainDate {
        self.date()
    }
}

impl HasDate for ZonedDateTime {
    fn plain_date(&self) -> PlainDate {
        self.to_plain_date()
    }
}

impl HasTime for PlainTime {
    fn plain_time(&self) -> PlainTime {
        *self
    }
}

impl HasTime for PlainDateTime {
    fn plain_time(&self) -> PlainTime {
        self.time()
    }
}

impl HasTime for ZonedDateTime {
    fn plain_time(&self) -> PlainTime {
        self.to_plain_time()
    }
}

impl HasInstant for Instant {
    fn instant(&self) -> Instant {
        *self
    }
}

impl HasInstant for ZonedDateTime {
    fn instant(&self) -> Instant {
        self.to_instant()
    }
}

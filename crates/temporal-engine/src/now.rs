//! The current time, read from the system clock.

use std::env;

use chrono::Utc;

use crate::error::Result;
use crate::instant::Instant;
use crate::plain_date::PlainDate;
use crate::plain_date_time::PlainDateTime;
use crate::plain_time::PlainTime;
use crate::tz::TimeZone;
use crate::zoned_date_time::ZonedDateTime;
use crate::NS_PER_SECOND;

/// Entry points that read the system clock.
///
/// Every other part of the crate is a pure function of its inputs.
pub struct Now;

impl Now {
    pub fn instant() -> Result<Instant> {
        let now = Utc::now();
        Instant::from_epoch_nanoseconds(
            i128::from(now.timestamp()) * NS_PER_SECOND + i128::from(now.timestamp_subsec_nanos()),
        )
    }

    /// The host's zone from the `TZ` environment variable, or `UTC`.
    pub fn time_zone_id() -> String {
        env::var("TZ")
            .ok()
            .map(|tz| tz.trim_start_matches(':').to_string())
            .filter(|tz| !tz.is_empty())
            .unwrap_or_else(|| "UTC".to_string())
    }

    /// The current instant in `time_zone`, or in the host's zone.
    pub fn zoned_date_time_iso(time_zone: Option<TimeZone>) -> Result<ZonedDateTime> {
        let time_zone = match time_zone {
            Some(time_zone) => time_zone,
            None => TimeZone::new(&Now::time_zone_id())?,
        };
        Ok(ZonedDateTime::new(Now::instant()?, time_zone))
    }

    pub fn plain_date_time_iso(time_zone: Option<TimeZone>) -> Result<PlainDateTime> {
        Ok(Now::zoned_date_time_iso(time_zone)?.to_plain_date_time())
    }

    pub fn plain_date_iso(time_zone: Option<TimeZone>) -> Result<PlainDate> {
        Ok(Now::zoned_date_time_iso(time_zone)?.to_plain_date())
    }

    pub fn plain_time_iso(time_zone: Option<TimeZone>) -> Result<PlainTime> {
        Ok(Now::zoned_date_time_iso(time_zone)?.to_plain_time())
    }
}

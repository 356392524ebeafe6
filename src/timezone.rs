//! Local time for stamping new transactions.

use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the current UTC offset of a canonical timezone such as "Asia/Jakarta".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// A source of the current local date and time.
pub trait Clock {
    /// The current local date and time, truncated to whole seconds.
    fn now(&self) -> PrimitiveDateTime;
}

/// Reads the system clock and converts it to a configured timezone.
#[derive(Debug, Clone)]
pub struct LocalClock {
    timezone: String,
}

impl LocalClock {
    /// Create a clock for a canonical timezone name.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidTimezone] if `canonical_timezone` is not a
    /// known timezone.
    pub fn new(canonical_timezone: &str) -> Result<Self, Error> {
        match get_local_offset(canonical_timezone) {
            Some(_) => Ok(Self {
                timezone: canonical_timezone.to_owned(),
            }),
            None => Err(Error::InvalidTimezone(canonical_timezone.to_owned())),
        }
    }
}

impl Clock for LocalClock {
    fn now(&self) -> PrimitiveDateTime {
        // The offset is looked up each time so daylight saving changes apply.
        let offset = get_local_offset(&self.timezone).unwrap_or(UtcOffset::UTC);
        let now = OffsetDateTime::now_utc().to_offset(offset);
        let now = now.replace_nanosecond(0).unwrap_or(now);

        PrimitiveDateTime::new(now.date(), now.time())
    }
}

/// A clock that always reads the same time.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub PrimitiveDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> PrimitiveDateTime {
        self.0
    }
}

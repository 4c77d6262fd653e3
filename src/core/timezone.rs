use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Resolves "today" for reports in the configured business timezone.
///
/// The weighted pipeline depends on which month is current, so the reference
/// date must be taken in the office's local offset rather than UTC.
#[derive(Debug, Clone, Copy)]
pub struct ReportClock {
    offset: FixedOffset,
}

impl ReportClock {
    /// Create a clock for a whole-hour UTC offset (e.g. `1` for Europe/Warsaw winter time)
    pub fn from_offset_hours(hours: i32) -> Result<Self, String> {
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
            .ok_or_else(|| format!("Invalid UTC offset: {} hours", hours))
    }

    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Local calendar date for a UTC instant
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Local calendar date right now
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }

    /// Use the explicit date when supplied, otherwise today
    pub fn resolve(&self, as_of: Option<NaiveDate>) -> NaiveDate {
        as_of.unwrap_or_else(|| self.today())
    }
}

impl Default for ReportClock {
    fn default() -> Self {
        Self::utc()
    }
}

/// Parse a `YYYY-MM-DD` date supplied by a client
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Expected YYYY-MM-DD", value))
}

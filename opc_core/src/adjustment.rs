//! Adjustment dates and the administrative cutoff they are published at.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::DateError, trend::Trend};

/// The timezone identifier of the administration publishing the adjustments.
pub static TIMEZONE: &str = "Asia/Shanghai";
/// The offset of [`TIMEZONE`] to UTC, the administration does not observe daylight saving time.
pub const UTC_OFFSET_SECONDS: i32 = 8 * 3600;
/// The hour of day at which price changes take effect.
pub const CUTOFF_HOUR: i64 = 16;

static DATE_FORMAT: &str = "%Y-%m-%d";
static END_OF_DAY: [&str; 2] = ["24:00", "24:00:00"];

/// The fixed offset of the administrative timezone.
pub fn timezone() -> FixedOffset {
    FixedOffset::east_opt(UTC_OFFSET_SECONDS).expect("UTC+8 is a valid offset")
}

/// The civil date in the administrative timezone at the given instant.
pub fn today_at(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&timezone()).date_naive()
}

/// One entry of the adjustment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentDate {
    /// The raw date, `YYYY-MM-DD` optionally followed by a time of day.
    pub date: String,
    /// The trend recorded for this date by an administrator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

impl AdjustmentDate {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            trend: None,
        }
    }

    /// Read the raw date as a cutoff moment.
    pub fn moment(&self) -> Result<CutoffMoment, DateError> {
        self.date.parse()
    }
}

/// A civil date at the administrative cutoff hour.
///
/// Whatever time of day a raw date carries, including the end-of-day marker `24:00`, the moment
/// is the cutoff of that same civil date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CutoffMoment {
    date: NaiveDate,
}

impl CutoffMoment {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The instant the adjustment takes effect.
    pub fn start(&self) -> DateTime<FixedOffset> {
        let local = self.date.and_time(NaiveTime::default()) + Duration::hours(CUTOFF_HOUR);
        let utc = local - Duration::seconds(i64::from(UTC_OFFSET_SECONDS));
        DateTime::from_naive_utc_and_offset(utc, timezone())
    }

    /// One hour after [`CutoffMoment::start`].
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.start() + Duration::hours(1)
    }
}

impl FromStr for CutoffMoment {
    type Err = DateError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DateError::Empty);
        }
        let (date_part, time_part) = match raw.split_once(&[' ', 'T'][..]) {
            Some((date, time)) => (date, Some(time.trim())),
            None => (raw, None),
        };
        let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT)
            .map_err(|_| DateError::InvalidDate(date_part.to_string()))?;
        if let Some(time) = time_part {
            let valid = END_OF_DAY.contains(&time)
                || NaiveTime::parse_from_str(time, "%H:%M").is_ok()
                || NaiveTime::parse_from_str(time, "%H:%M:%S").is_ok();
            if !valid {
                return Err(DateError::InvalidTime(time.to_string()));
            }
        }
        Ok(Self { date })
    }
}

impl fmt::Display for CutoffMoment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format(DATE_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::{
        adjustment::{today_at, AdjustmentDate, CutoffMoment},
        error::DateError,
    };

    #[test]
    fn test_plain_date_starts_at_cutoff() {
        let moment: CutoffMoment = "2024-06-01".parse().unwrap();
        assert_eq!(moment.start().to_rfc3339(), "2024-06-01T16:00:00+08:00");
        assert_eq!(moment.end().to_rfc3339(), "2024-06-01T17:00:00+08:00");
    }

    #[test]
    fn test_end_of_day_stays_on_same_date() {
        let moment = AdjustmentDate::new("2024-06-17 24:00").moment().unwrap();
        assert_eq!(moment.date(), NaiveDate::from_ymd_opt(2024, 6, 17).unwrap());
        assert_eq!(moment.start().to_rfc3339(), "2024-06-17T16:00:00+08:00");
        let moment: CutoffMoment = "2024-12-31T24:00:00".parse().unwrap();
        assert_eq!(moment.start().to_rfc3339(), "2024-12-31T16:00:00+08:00");
    }

    #[test]
    fn test_other_times_are_normalized() {
        let moment: CutoffMoment = "2024-06-01 09:30".parse().unwrap();
        assert_eq!(moment.start().to_rfc3339(), "2024-06-01T16:00:00+08:00");
    }

    #[test]
    fn test_malformed_dates() {
        assert_eq!("".parse::<CutoffMoment>(), Err(DateError::Empty));
        assert_eq!(
            "2024-13-01".parse::<CutoffMoment>(),
            Err(DateError::InvalidDate("2024-13-01".to_string()))
        );
        assert_eq!(
            "next friday".parse::<CutoffMoment>(),
            Err(DateError::InvalidDate("next".to_string()))
        );
        assert_eq!(
            "2024-06-01 25:00".parse::<CutoffMoment>(),
            Err(DateError::InvalidTime("25:00".to_string()))
        );
    }

    #[test]
    fn test_today_uses_administrative_timezone() {
        let late_utc = Utc.with_ymd_and_hms(2024, 5, 31, 17, 0, 0).unwrap();
        assert_eq!(today_at(late_utc), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let early_utc = Utc.with_ymd_and_hms(2024, 5, 31, 15, 59, 0).unwrap();
        assert_eq!(today_at(early_utc), NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
    }
}

//! Travel date and departure hour handling.
//!
//! The booking form takes the date as a `YYYYMMDD` string and the earliest
//! departure as a two-digit hour. Only even hours are offered by the form,
//! so odd hours are rejected here rather than failing later in the browser.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Error returned when parsing a travel date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Not exactly eight ASCII digits
    #[error("date must be 8 digits in YYYYMMDD form")]
    Format,

    /// Eight digits, but not a real day
    #[error("date is not a real calendar day")]
    Calendar,
}

/// Error returned when parsing a departure hour.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid departure hour: {reason}")]
pub struct HourError {
    reason: &'static str,
}

impl HourError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A calendar date to travel on.
///
/// # Examples
///
/// ```
/// use train_booker::domain::TravelDate;
///
/// let date = TravelDate::parse("20240315").unwrap();
/// assert_eq!(date.to_string(), "20240315");
///
/// assert!(TravelDate::parse("2024-03-15").is_err());
/// assert!(TravelDate::parse("20230230").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TravelDate(NaiveDate);

impl TravelDate {
    /// Parse a date from `YYYYMMDD` form.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let bytes = s.as_bytes();
        if bytes.len() != 8 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(DateError::Format);
        }

        let year = parse_digits(&bytes[0..4]).ok_or(DateError::Format)?;
        let month = parse_digits(&bytes[4..6]).ok_or(DateError::Format)?;
        let day = parse_digits(&bytes[6..8]).ok_or(DateError::Format)?;

        NaiveDate::from_ymd_opt(year as i32, month, day)
            .map(Self)
            .ok_or(DateError::Calendar)
    }

    /// Wrap an already valid date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the underlying date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the date in the `YYYYMMDD` form the search form expects.
    pub fn as_compact(&self) -> String {
        format!(
            "{:04}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl fmt::Debug for TravelDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TravelDate({})", self.as_compact())
    }
}

impl fmt::Display for TravelDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_compact())
    }
}

/// Earliest departure hour for the search, always even and in `00..=22`.
///
/// # Examples
///
/// ```
/// use train_booker::domain::DepartureHour;
///
/// let hour = DepartureHour::parse("08").unwrap();
/// assert_eq!(hour.hour(), 8);
/// assert_eq!(hour.to_string(), "08");
///
/// assert!(DepartureHour::parse("8").is_err());
/// assert!(DepartureHour::parse("09").is_err());
/// assert!(DepartureHour::parse("24").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepartureHour(u8);

impl DepartureHour {
    /// Parse an hour from two-digit form.
    pub fn parse(s: &str) -> Result<Self, HourError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(HourError::new("expected two digits"));
        }

        let hour = parse_digits(bytes).ok_or_else(|| HourError::new("expected two digits"))?;
        if hour > 23 {
            return Err(HourError::new("hour must be 0-23"));
        }
        if hour % 2 != 0 {
            return Err(HourError::new("only even hours can be searched"));
        }

        Ok(Self(hour as u8))
    }

    /// Returns the hour (0-22).
    pub fn hour(&self) -> u8 {
        self.0
    }
}

impl fmt::Debug for DepartureHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DepartureHour({:02})", self.0)
    }
}

impl fmt::Display for DepartureHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Parse a run of ASCII digits into a number.
fn parse_digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, &b| {
        if b.is_ascii_digit() {
            Some(acc * 10 + u32::from(b - b'0'))
        } else {
            None
        }
    })
}

//! Domain error types.
//!
//! These errors represent a search request that cannot be run. They are
//! raised before any browser automation starts and are never retried.

use super::Station;

/// Which end of the journey a station was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationRole {
    Departure,
    Arrival,
}

impl std::fmt::Display for StationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StationRole::Departure => f.write_str("departure"),
            StationRole::Arrival => f.write_str("arrival"),
        }
    }
}

/// Validation failures for a search request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Station name is not on the SRT network
    #[error("unknown {role} station '{name}'")]
    UnknownStation { role: StationRole, name: String },

    /// Departure and arrival are the same station
    #[error("departure and arrival are both {0}")]
    SameStation(Station),

    /// Date is not eight digits
    #[error("date '{0}' must be digits only, in YYYYMMDD form")]
    InvalidDateFormat(String),

    /// Date digits do not form a real day
    #[error("date '{0}' is not a real calendar day")]
    InvalidDate(String),

    /// Hour is not a two-digit even hour
    #[error("time '{0}' must be an even hour such as 06, 08 or 14")]
    InvalidTimeFormat(String),

    /// Passenger count outside what one booking can hold
    #[error("passenger count {0} must be between 1 and 9")]
    InvalidPassengerCount(u8),

    /// Asked to check zero rows
    #[error("at least one row must be checked")]
    EmptyRowWindow,

    /// Last row of the window is past the largest row index
    #[error("cannot skip {ignore} rows and then check {check} more")]
    RowWindowTooLarge { ignore: usize, check: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::UnknownStation {
            role: StationRole::Departure,
            name: "서울".into(),
        };
        assert_eq!(err.to_string(), "unknown departure station '서울'");

        let err = ValidationError::UnknownStation {
            role: StationRole::Arrival,
            name: "용산".into(),
        };
        assert_eq!(err.to_string(), "unknown arrival station '용산'");

        let err = ValidationError::SameStation(Station::Busan);
        assert_eq!(err.to_string(), "departure and arrival are both 부산");

        let err = ValidationError::InvalidDate("20230230".into());
        assert_eq!(err.to_string(), "date '20230230' is not a real calendar day");

        let err = ValidationError::InvalidPassengerCount(0);
        assert_eq!(err.to_string(), "passenger count 0 must be between 1 and 9");

        let err = ValidationError::EmptyRowWindow;
        assert_eq!(err.to_string(), "at least one row must be checked");

        let err = ValidationError::RowWindowTooLarge {
            ignore: usize::MAX,
            check: 2,
        };
        assert_eq!(
            err.to_string(),
            format!("cannot skip {} rows and then check 2 more", usize::MAX)
        );
    }
}

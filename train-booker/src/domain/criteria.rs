//! Search criteria and their validation.

use std::ops::RangeInclusive;

use super::error::{StationRole, ValidationError};
use super::station::Station;
use super::time::{DateError, DepartureHour, TravelDate};

/// Largest party a single booking can hold.
const MAX_PASSENGERS: u8 = 9;

/// Default number of result rows to check.
pub const DEFAULT_ROWS_TO_CHECK: usize = 2;

/// A search request as supplied by the user, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Departure station display name.
    pub departure: String,
    /// Arrival station display name.
    pub arrival: String,
    /// Travel date, `YYYYMMDD`.
    pub date: String,
    /// Earliest departure hour, two digits.
    pub time: String,
    /// Number of adult passengers.
    pub passengers: u8,
    /// How many top-ranked rows to consider.
    pub rows_to_check: usize,
    /// How many top-ranked rows to skip before considering.
    pub rows_to_ignore: usize,
    /// Whether a waitlist place is acceptable when no seat is free.
    pub want_waitlist: bool,
}

impl SearchCriteria {
    /// Create criteria with default passengers and row window.
    pub fn new(
        departure: impl Into<String>,
        arrival: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            departure: departure.into(),
            arrival: arrival.into(),
            date: date.into(),
            time: time.into(),
            passengers: 1,
            rows_to_check: DEFAULT_ROWS_TO_CHECK,
            rows_to_ignore: 0,
            want_waitlist: false,
        }
    }

    /// Set the passenger count.
    pub fn with_passengers(mut self, n: u8) -> Self {
        self.passengers = n;
        self
    }

    /// Set how many rows to skip and how many to check after that.
    pub fn with_rows(mut self, ignore: usize, check: usize) -> Self {
        self.rows_to_ignore = ignore;
        self.rows_to_check = check;
        self
    }

    /// Set whether a waitlist place is acceptable.
    pub fn with_waitlist(mut self, want: bool) -> Self {
        self.want_waitlist = want;
        self
    }

    /// Validate the criteria. See [`validate`].
    pub fn validate(&self) -> Result<ValidCriteria, ValidationError> {
        validate(self)
    }
}

/// Validate a search request.
///
/// Checks run in a fixed order (stations, date format, date, time,
/// passengers, rows), so the first problem found is the one reported.
pub fn validate(criteria: &SearchCriteria) -> Result<ValidCriteria, ValidationError> {
    let departure =
        Station::parse(&criteria.departure).map_err(|e| ValidationError::UnknownStation {
            role: StationRole::Departure,
            name: e.name().to_string(),
        })?;
    let arrival =
        Station::parse(&criteria.arrival).map_err(|e| ValidationError::UnknownStation {
            role: StationRole::Arrival,
            name: e.name().to_string(),
        })?;
    if departure == arrival {
        return Err(ValidationError::SameStation(departure));
    }

    let date = TravelDate::parse(&criteria.date).map_err(|e| match e {
        DateError::Format => ValidationError::InvalidDateFormat(criteria.date.clone()),
        DateError::Calendar => ValidationError::InvalidDate(criteria.date.clone()),
    })?;

    let hour = DepartureHour::parse(&criteria.time)
        .map_err(|_| ValidationError::InvalidTimeFormat(criteria.time.clone()))?;

    if criteria.passengers == 0 || criteria.passengers > MAX_PASSENGERS {
        return Err(ValidationError::InvalidPassengerCount(criteria.passengers));
    }

    if criteria.rows_to_check == 0 {
        return Err(ValidationError::EmptyRowWindow);
    }
    if criteria
        .rows_to_ignore
        .checked_add(criteria.rows_to_check)
        .is_none()
    {
        return Err(ValidationError::RowWindowTooLarge {
            ignore: criteria.rows_to_ignore,
            check: criteria.rows_to_check,
        });
    }

    Ok(ValidCriteria {
        departure,
        arrival,
        date,
        hour,
        passengers: criteria.passengers,
        rows: RowWindow {
            ignore: criteria.rows_to_ignore,
            check: criteria.rows_to_check,
        },
        want_waitlist: criteria.want_waitlist,
    })
}

/// The range of result rows a pass looks at.
///
/// Rows are 1-based ranks in the search result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    ignore: usize,
    check: usize,
}

impl RowWindow {
    /// Number of top rows skipped.
    pub fn ignore(&self) -> usize {
        self.ignore
    }

    /// Number of rows checked after the skipped ones.
    pub fn check(&self) -> usize {
        self.check
    }

    /// Row indices to scan, in rank order.
    ///
    /// Cannot overflow: [`validate`] rejects windows whose last row does
    /// not fit in a `usize`.
    pub fn indices(&self) -> RangeInclusive<usize> {
        (self.ignore + 1)..=(self.ignore + self.check)
    }
}

/// Search criteria that passed validation.
///
/// Only [`validate`] can build one, so holders can trust every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCriteria {
    departure: Station,
    arrival: Station,
    date: TravelDate,
    hour: DepartureHour,
    passengers: u8,
    rows: RowWindow,
    want_waitlist: bool,
}

impl ValidCriteria {
    pub fn departure(&self) -> Station {
        self.departure
    }

    pub fn arrival(&self) -> Station {
        self.arrival
    }

    pub fn date(&self) -> TravelDate {
        self.date
    }

    pub fn hour(&self) -> DepartureHour {
        self.hour
    }

    pub fn passengers(&self) -> u8 {
        self.passengers
    }

    pub fn rows(&self) -> RowWindow {
        self.rows
    }

    pub fn want_waitlist(&self) -> bool {
        self.want_waitlist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> SearchCriteria {
        SearchCriteria::new("동탄", "동대구", "20220119", "08")
    }

    #[test]
    fn valid_criteria_pass() {
        let valid = criteria().validate().unwrap();
        assert_eq!(valid.departure(), Station::Dongtan);
        assert_eq!(valid.arrival(), Station::DongDaegu);
        assert_eq!(valid.date().as_compact(), "20220119");
        assert_eq!(valid.hour().hour(), 8);
        assert_eq!(valid.passengers(), 1);
        assert_eq!(valid.rows().indices(), 1..=2);
        assert!(!valid.want_waitlist());
    }

    #[test]
    fn unknown_departure() {
        let mut c = criteria();
        c.departure = "서울".into();
        assert_eq!(
            c.validate(),
            Err(ValidationError::UnknownStation {
                role: StationRole::Departure,
                name: "서울".into(),
            })
        );
    }

    #[test]
    fn unknown_arrival() {
        let mut c = criteria();
        c.arrival = "대구".into();
        assert!(matches!(
            c.validate(),
            Err(ValidationError::UnknownStation {
                role: StationRole::Arrival,
                ..
            })
        ));
    }

    #[test]
    fn same_station_rejected() {
        let mut c = criteria();
        c.arrival = "동탄".into();
        assert_eq!(
            c.validate(),
            Err(ValidationError::SameStation(Station::Dongtan))
        );
    }

    #[test]
    fn date_errors() {
        let mut c = criteria();
        c.date = "2022-01-19".into();
        assert_eq!(
            c.validate(),
            Err(ValidationError::InvalidDateFormat("2022-01-19".into()))
        );

        c.date = "2022011".into();
        assert!(matches!(
            c.validate(),
            Err(ValidationError::InvalidDateFormat(_))
        ));

        c.date = "20230230".into();
        assert_eq!(
            c.validate(),
            Err(ValidationError::InvalidDate("20230230".into()))
        );
    }

    #[test]
    fn station_checked_before_date() {
        let mut c = criteria();
        c.departure = "서울".into();
        c.date = "nonsense".into();
        assert!(matches!(
            c.validate(),
            Err(ValidationError::UnknownStation { .. })
        ));
    }

    #[test]
    fn time_errors() {
        let mut c = criteria();
        c.time = "09".into();
        assert_eq!(
            c.validate(),
            Err(ValidationError::InvalidTimeFormat("09".into()))
        );
    }

    #[test]
    fn passenger_bounds() {
        assert_eq!(
            criteria().with_passengers(0).validate(),
            Err(ValidationError::InvalidPassengerCount(0))
        );
        assert_eq!(
            criteria().with_passengers(10).validate(),
            Err(ValidationError::InvalidPassengerCount(10))
        );
        assert!(criteria().with_passengers(9).validate().is_ok());
    }

    #[test]
    fn empty_row_window_rejected() {
        assert_eq!(
            criteria().with_rows(3, 0).validate(),
            Err(ValidationError::EmptyRowWindow)
        );
    }

    #[test]
    fn row_window_past_usize_max_rejected() {
        assert_eq!(
            criteria().with_rows(usize::MAX, 2).validate(),
            Err(ValidationError::RowWindowTooLarge {
                ignore: usize::MAX,
                check: 2,
            })
        );

        let valid = criteria().with_rows(usize::MAX - 2, 2).validate().unwrap();
        assert_eq!(*valid.rows().indices().end(), usize::MAX);
    }

    #[test]
    fn row_window_skips_ignored_rows() {
        let valid = criteria().with_rows(2, 3).validate().unwrap();
        assert_eq!(valid.rows().ignore(), 2);
        assert_eq!(valid.rows().check(), 3);
        assert_eq!(valid.rows().indices().collect::<Vec<_>>(), vec![3, 4, 5]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Names off the network are always rejected as unknown stations
        #[test]
        fn unknown_station_always_rejected(name in "[a-zA-Z가-힣]{1,6}") {
            prop_assume!(Station::parse(&name).is_err());
            let mut c = SearchCriteria::new("수서", "부산", "20240101", "10");
            c.arrival = name;
            let is_unknown = matches!(
                c.validate(),
                Err(ValidationError::UnknownStation { .. })
            );
            prop_assert!(is_unknown);
        }

        /// Any malformed date is a format error
        #[test]
        fn malformed_date_rejected(date in "[0-9]{0,7}|[0-9]{9,10}|[0-9]{3}[a-z/-][0-9]{4}") {
            let c = SearchCriteria::new("수서", "부산", date, "10");
            let is_format = matches!(
                c.validate(),
                Err(ValidationError::InvalidDateFormat(_))
            );
            prop_assert!(is_format);
        }

        /// The window always starts right after the ignored rows
        #[test]
        fn window_bounds(ignore in 0usize..20, check in 1usize..20) {
            let c = SearchCriteria::new("수서", "부산", "20240101", "10").with_rows(ignore, check);
            let rows = c.validate().unwrap().rows();
            prop_assert_eq!(*rows.indices().start(), ignore + 1);
            prop_assert_eq!(rows.indices().count(), check);
        }

        /// Windows at the top of the index range either fit or are rejected
        #[test]
        fn window_near_usize_max(ignore in (usize::MAX - 40)..=usize::MAX, check in 1usize..40) {
            let c = SearchCriteria::new("수서", "부산", "20240101", "10").with_rows(ignore, check);
            match ignore.checked_add(check) {
                Some(end) => {
                    let rows = c.validate().unwrap().rows();
                    prop_assert_eq!(*rows.indices().end(), end);
                    prop_assert_eq!(rows.indices().count(), check);
                }
                None => {
                    let too_large = matches!(
                        c.validate(),
                        Err(ValidationError::RowWindowTooLarge { .. })
                    );
                    prop_assert!(too_large);
                }
            }
        }
    }
}

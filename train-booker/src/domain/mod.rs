//! Domain types for the SRT booker.
//!
//! This module contains the validated search request and the types it is
//! built from. All types enforce their invariants at construction time,
//! so code that receives a [`ValidCriteria`] never re-checks it.

mod criteria;
mod error;
mod station;
mod time;

pub use criteria::{DEFAULT_ROWS_TO_CHECK, RowWindow, SearchCriteria, ValidCriteria, validate};
pub use error::{StationRole, ValidationError};
pub use station::{Station, UnknownStation};
pub use time::{DateError, DepartureHour, HourError, TravelDate};

//! Observation and activation types exchanged with a driver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Seat column state of a result row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    /// A reserve action is offered.
    Bookable,
    /// No seats left.
    #[default]
    SoldOut,
    /// The row re-rendered while being read.
    Unreadable,
}

/// Waitlist column state of a result row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistStatus {
    /// A waitlist application is offered.
    Offerable,
    /// No waitlist on this row.
    #[default]
    Unavailable,
    /// The row re-rendered while being read.
    Unreadable,
}

/// One read of a result row.
///
/// `Unreadable` fields mean the row went stale between locating it and
/// reading it. They count as sold out / unavailable for this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowObservation {
    /// 1-based rank in the result list.
    pub index: usize,
    pub seat: SeatStatus,
    pub waitlist: WaitlistStatus,
}

impl RowObservation {
    pub fn new(index: usize, seat: SeatStatus, waitlist: WaitlistStatus) -> Self {
        Self {
            index,
            seat,
            waitlist,
        }
    }

    /// A row that could not be read at all.
    pub fn unreadable(index: usize) -> Self {
        Self::new(index, SeatStatus::Unreadable, WaitlistStatus::Unreadable)
    }

    /// True if a seat can be reserved right now.
    pub fn is_bookable(&self) -> bool {
        self.seat == SeatStatus::Bookable
    }

    /// True if a waitlist place is offered right now.
    pub fn is_waitlist_offerable(&self) -> bool {
        self.waitlist == WaitlistStatus::Offerable
    }
}

/// Result of dispatching a claim action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationResult {
    /// The action was dispatched.
    #[default]
    Succeeded,
    /// The action could not be dispatched (e.g. an overlay took the click).
    Blocked,
    /// Dispatched, but the site says the slot is gone.
    Rejected,
}

/// Login details for the booking site.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

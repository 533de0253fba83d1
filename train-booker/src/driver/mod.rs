//! Automation driver contract.
//!
//! The booking loop never touches a browser directly. Everything it needs
//! from the booking site goes through [`AutomationDriver`], so the loop's
//! ordering, fallback and refresh rules can be exercised against a
//! [`ScriptedDriver`] with no browser involved.
//!
//! Read operations may be called on a page that has just re-rendered. They
//! report a vanished element as `Unreadable` rather than failing; only
//! unexpected or permanent problems come back as [`DriverError`].

mod error;
mod scripted;
mod types;

pub use error::DriverError;
pub use scripted::{DriverCall, Script, ScriptedClaim, ScriptedDriver, ScriptedPass, ScriptedRow};
pub use types::{ActivationResult, Credentials, RowObservation, SeatStatus, WaitlistStatus};

use crate::domain::ValidCriteria;

/// Capabilities the booking loop needs from the booking site.
///
/// A driver owns one logged-in session and is borrowed exclusively by a
/// single booking loop, hence `&mut self` throughout.
#[allow(async_fn_in_trait)]
pub trait AutomationDriver {
    /// Log in. Fails with [`DriverError::Authentication`] if refused.
    async fn authenticate(&mut self, credentials: &Credentials) -> Result<(), DriverError>;

    /// Run a search. Calling again with the same criteria re-issues it.
    async fn submit_search(&mut self, criteria: &ValidCriteria) -> Result<(), DriverError>;

    /// Read the seat and waitlist state of a 1-based result row.
    async fn read_row(&mut self, index: usize) -> Result<RowObservation, DriverError>;

    /// Press the reserve action on a row.
    async fn activate_reservation(&mut self, index: usize)
    -> Result<ActivationResult, DriverError>;

    /// Press the reserve action through a second input path.
    ///
    /// Only used after [`activate_reservation`](Self::activate_reservation)
    /// reported [`ActivationResult::Blocked`].
    async fn activate_reservation_fallback(
        &mut self,
        index: usize,
    ) -> Result<ActivationResult, DriverError>;

    /// Press the waitlist action on a row.
    async fn activate_waitlist(&mut self, index: usize) -> Result<ActivationResult, DriverError>;

    /// True iff the page shows the post-reservation success marker.
    async fn confirmation_visible(&mut self) -> Result<bool, DriverError>;

    /// Return from a reservation attempt to the result list.
    async fn go_back_to_results(&mut self) -> Result<(), DriverError>;

    /// Re-run the current search to refresh the result list.
    async fn resubmit_search(&mut self) -> Result<(), DriverError>;
}

//! Scripted driver for dry runs and tests.
//!
//! Plays back a fixed sequence of result pages instead of talking to the
//! booking site. Each resubmit advances to the next page; once the script
//! runs out the last page repeats. Every call is recorded so tests can
//! assert on exactly what the booking loop asked for.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ValidCriteria;

use super::AutomationDriver;
use super::error::DriverError;
use super::types::{ActivationResult, Credentials, RowObservation, SeatStatus, WaitlistStatus};

/// How the site responds when a row is claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptedClaim {
    /// Result of the primary reserve action.
    pub primary: ActivationResult,
    /// Result of the fallback reserve action.
    pub fallback: ActivationResult,
    /// Whether a dispatched reservation lands on the success page.
    pub confirmed: bool,
    /// Result of the waitlist action.
    pub waitlist: ActivationResult,
}

impl Default for ScriptedClaim {
    fn default() -> Self {
        Self {
            primary: ActivationResult::Succeeded,
            fallback: ActivationResult::Succeeded,
            confirmed: true,
            waitlist: ActivationResult::Succeeded,
        }
    }
}

/// One result row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptedRow {
    pub seat: SeatStatus,
    pub waitlist: WaitlistStatus,
    pub claim: ScriptedClaim,
}

impl ScriptedRow {
    /// Sold out with no waitlist.
    pub fn sold_out() -> Self {
        Self::default()
    }

    /// A seat is offered and claiming it succeeds.
    pub fn bookable() -> Self {
        Self {
            seat: SeatStatus::Bookable,
            ..Self::default()
        }
    }

    /// Sold out, but a waitlist place is offered.
    pub fn waitlist() -> Self {
        Self {
            waitlist: WaitlistStatus::Offerable,
            ..Self::default()
        }
    }

    /// The row went stale while being read.
    pub fn unreadable() -> Self {
        Self {
            seat: SeatStatus::Unreadable,
            waitlist: WaitlistStatus::Unreadable,
            ..Self::default()
        }
    }

    /// Override how claims on this row behave.
    pub fn with_claim(mut self, claim: ScriptedClaim) -> Self {
        self.claim = claim;
        self
    }
}

/// One result page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedPass {
    #[serde(default)]
    pub rows: Vec<ScriptedRow>,
}

impl ScriptedPass {
    pub fn new(rows: Vec<ScriptedRow>) -> Self {
        Self { rows }
    }
}

/// A full playback script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Refuse every login attempt.
    #[serde(default)]
    pub reject_login: bool,
    /// Result pages, in the order successive searches see them.
    pub passes: Vec<ScriptedPass>,
}

impl Script {
    pub fn new(passes: Vec<ScriptedPass>) -> Self {
        Self {
            reject_login: false,
            passes,
        }
    }
}

/// A call made against a [`ScriptedDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCall {
    Authenticate,
    SubmitSearch,
    ReadRow(usize),
    ActivateReservation(usize),
    ActivateReservationFallback(usize),
    ActivateWaitlist(usize),
    ConfirmationVisible,
    GoBackToResults,
    ResubmitSearch,
}

/// Driver that plays back a [`Script`].
#[derive(Debug, Clone)]
pub struct ScriptedDriver {
    script: Script,
    pass: usize,
    searched: bool,
    confirmed: bool,
    calls: Vec<DriverCall>,
}

impl ScriptedDriver {
    /// Create a driver from an in-memory script.
    pub fn new(script: Script) -> Result<Self, DriverError> {
        if script.passes.is_empty() {
            return Err(DriverError::Script(
                "script must contain at least one pass".to_string(),
            ));
        }

        Ok(Self {
            script,
            pass: 0,
            searched: false,
            confirmed: false,
            calls: Vec::new(),
        })
    }

    /// Load a script from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| DriverError::Script(format!("failed to read {:?}: {}", path, e)))?;
        let script: Script = serde_json::from_str(&json)
            .map_err(|e| DriverError::Script(format!("failed to parse {:?}: {}", path, e)))?;
        Self::new(script)
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    /// How many times a particular call was made.
    pub fn count(&self, call: DriverCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    /// Index of the result page currently shown.
    pub fn pass(&self) -> usize {
        self.pass
    }

    fn row(&self, index: usize) -> Option<&ScriptedRow> {
        let last = self.script.passes.len() - 1;
        let page = &self.script.passes[self.pass.min(last)];
        index.checked_sub(1).and_then(|i| page.rows.get(i))
    }

    /// Resolve a reserve action and remember whether it reached the success page.
    fn dispatch(
        &mut self,
        index: usize,
        pick: fn(&ScriptedClaim) -> ActivationResult,
    ) -> ActivationResult {
        let (result, confirmed) = match self.row(index) {
            Some(row) => (pick(&row.claim), row.claim.confirmed),
            None => (ActivationResult::Rejected, false),
        };
        self.confirmed = result == ActivationResult::Succeeded && confirmed;
        result
    }
}

impl AutomationDriver for ScriptedDriver {
    async fn authenticate(&mut self, credentials: &Credentials) -> Result<(), DriverError> {
        self.calls.push(DriverCall::Authenticate);
        if self.script.reject_login {
            return Err(DriverError::Authentication(format!(
                "login refused for {}",
                credentials.user
            )));
        }
        Ok(())
    }

    async fn submit_search(&mut self, criteria: &ValidCriteria) -> Result<(), DriverError> {
        self.calls.push(DriverCall::SubmitSearch);
        debug!(
            departure = %criteria.departure(),
            arrival = %criteria.arrival(),
            "Scripted search submitted"
        );
        self.searched = true;
        Ok(())
    }

    async fn read_row(&mut self, index: usize) -> Result<RowObservation, DriverError> {
        self.calls.push(DriverCall::ReadRow(index));
        if !self.searched {
            return Err(DriverError::UnexpectedPage(
                "no search has been submitted".to_string(),
            ));
        }

        Ok(match self.row(index) {
            Some(row) => RowObservation::new(index, row.seat, row.waitlist),
            None => RowObservation::unreadable(index),
        })
    }

    async fn activate_reservation(
        &mut self,
        index: usize,
    ) -> Result<ActivationResult, DriverError> {
        self.calls.push(DriverCall::ActivateReservation(index));
        Ok(self.dispatch(index, |claim| claim.primary))
    }

    async fn activate_reservation_fallback(
        &mut self,
        index: usize,
    ) -> Result<ActivationResult, DriverError> {
        self.calls.push(DriverCall::ActivateReservationFallback(index));
        Ok(self.dispatch(index, |claim| claim.fallback))
    }

    async fn activate_waitlist(&mut self, index: usize) -> Result<ActivationResult, DriverError> {
        self.calls.push(DriverCall::ActivateWaitlist(index));
        Ok(self
            .row(index)
            .map(|row| row.claim.waitlist)
            .unwrap_or(ActivationResult::Rejected))
    }

    async fn confirmation_visible(&mut self) -> Result<bool, DriverError> {
        self.calls.push(DriverCall::ConfirmationVisible);
        Ok(self.confirmed)
    }

    async fn go_back_to_results(&mut self) -> Result<(), DriverError> {
        self.calls.push(DriverCall::GoBackToResults);
        self.confirmed = false;
        Ok(())
    }

    async fn resubmit_search(&mut self) -> Result<(), DriverError> {
        self.calls.push(DriverCall::ResubmitSearch);
        self.pass += 1;
        self.confirmed = false;
        debug!(pass = self.pass, "Scripted search resubmitted");
        Ok(())
    }
}

//! The booking loop.
//!
//! Each pass reads the configured rows in rank order and claims the first
//! one that can be claimed. A pass that claims nothing waits a jittered
//! interval, resubmits the search and starts over. There is no retry
//! ceiling: the loop runs until something is claimed or it is cancelled.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::domain::ValidCriteria;
use crate::driver::{ActivationResult, AutomationDriver, DriverError};

use super::config::BookingConfig;
use super::pacing::{Jitter, Pacer, TokioPacer, UniformJitter};
use super::state::{BookingOutcome, SessionState};

/// Error from the booking loop.
///
/// Only permanent driver failures end the loop early; stale rows and
/// lost races are handled inside it.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("driver failed during booking: {0}")]
    Driver(#[from] DriverError),
}

/// What a finished loop hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingReport {
    pub outcome: BookingOutcome,
    pub session: SessionState,
}

/// Where the loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Reading rows; `row` is the next one to read.
    Scanning { row: usize },
    ClaimAttempt(usize),
    WaitlistAttempt(usize),
    RefreshWait,
    Done(BookingOutcome),
}

/// Runs the polling and claim loop against a driver.
///
/// Holds the loop's policy (timing, sleep and jitter sources, cancellation)
/// and borrows a driver for the length of each run.
pub struct BookingMachine<P = TokioPacer, J = UniformJitter> {
    config: BookingConfig,
    pacer: P,
    jitter: J,
    cancel: CancellationToken,
}

impl BookingMachine {
    /// A machine that sleeps for real with random jitter.
    pub fn new(config: BookingConfig) -> Self {
        Self {
            config,
            pacer: TokioPacer,
            jitter: UniformJitter::new(),
            cancel: CancellationToken::new(),
        }
    }
}

impl<P: Pacer, J: Jitter> BookingMachine<P, J> {
    /// Replace the sleep source.
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> BookingMachine<Q, J> {
        BookingMachine {
            config: self.config,
            pacer,
            jitter: self.jitter,
            cancel: self.cancel,
        }
    }

    /// Replace the jitter source.
    pub fn with_jitter<K: Jitter>(self, jitter: K) -> BookingMachine<P, K> {
        BookingMachine {
            config: self.config,
            pacer: self.pacer,
            jitter,
            cancel: self.cancel,
        }
    }

    /// Stop the loop when this token is cancelled.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The token that stops this machine.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run a fresh session until something is claimed or the loop is cancelled.
    ///
    /// The driver must already be logged in and showing results for `criteria`.
    pub async fn run<D: AutomationDriver>(
        &mut self,
        driver: &mut D,
        criteria: &ValidCriteria,
    ) -> Result<BookingReport, BookingError> {
        self.resume(driver, criteria, SessionState::new()).await
    }

    /// Continue a session from a previous state.
    ///
    /// A state that already holds a claim returns straight away without
    /// touching the driver.
    pub async fn resume<D: AutomationDriver>(
        &mut self,
        driver: &mut D,
        criteria: &ValidCriteria,
        mut session: SessionState,
    ) -> Result<BookingReport, BookingError> {
        let rows = criteria.rows().indices();
        let (first, last) = (*rows.start(), *rows.end());

        let mut phase = match session.outcome() {
            Some(outcome) => Phase::Done(outcome),
            None => Phase::Scanning { row: first },
        };

        loop {
            trace!(?phase, "Booking phase");
            phase = match phase {
                Phase::Scanning { row } if row == first && self.cancel.is_cancelled() => {
                    info!(
                        refresh_count = session.refresh_count(),
                        "Cancelled before pass"
                    );
                    Phase::Done(BookingOutcome::Cancelled)
                }
                Phase::Scanning { row } => {
                    if row == first {
                        debug!(
                            refresh_count = session.refresh_count(),
                            first, last, "Starting pass"
                        );
                    }
                    self.scan(driver, criteria, row, last).await?
                }
                Phase::ClaimAttempt(row) => self.claim(driver, row, &mut session).await?,
                Phase::WaitlistAttempt(row) => self.waitlist(driver, row, &mut session).await?,
                Phase::RefreshWait => self.refresh(driver, first, &mut session).await?,
                Phase::Done(outcome) => return Ok(BookingReport { outcome, session }),
            };
        }
    }

    /// Read one row and decide what to do with it.
    async fn scan<D: AutomationDriver>(
        &self,
        driver: &mut D,
        criteria: &ValidCriteria,
        row: usize,
        last: usize,
    ) -> Result<Phase, BookingError> {
        if row > last {
            return Ok(Phase::RefreshWait);
        }

        let obs = driver.read_row(row).await?;
        trace!(row, seat = ?obs.seat, waitlist = ?obs.waitlist, "Row observed");

        if obs.is_bookable() {
            Ok(Phase::ClaimAttempt(row))
        } else if criteria.want_waitlist() && obs.is_waitlist_offerable() {
            Ok(Phase::WaitlistAttempt(row))
        } else {
            Ok(Phase::Scanning { row: row + 1 })
        }
    }

    /// Try to reserve a seat on a row that read as bookable.
    async fn claim<D: AutomationDriver>(
        &self,
        driver: &mut D,
        row: usize,
        session: &mut SessionState,
    ) -> Result<Phase, BookingError> {
        info!(row, "Seat available, claiming");

        let mut result = driver.activate_reservation(row).await?;
        if result == ActivationResult::Blocked {
            warn!(row, "Reserve action blocked, trying fallback");
            result = driver.activate_reservation_fallback(row).await?;
        }
        debug!(row, ?result, "Reservation dispatched");

        if driver.confirmation_visible().await? {
            info!(row, "Seat reserved");
            session.record_reserved(row);
            return Ok(Phase::Done(BookingOutcome::Reserved(row)));
        }

        info!(row, "Seat gone before the claim landed, back to results");
        driver.go_back_to_results().await?;
        Ok(Phase::Scanning { row: row + 1 })
    }

    /// Try to join the waitlist on a row that offers it.
    async fn waitlist<D: AutomationDriver>(
        &self,
        driver: &mut D,
        row: usize,
        session: &mut SessionState,
    ) -> Result<Phase, BookingError> {
        info!(row, "Waitlist offered, applying");

        match driver.activate_waitlist(row).await? {
            ActivationResult::Succeeded => {
                info!(row, "Waitlist place taken");
                session.record_waitlisted(row);
                Ok(Phase::Done(BookingOutcome::Waitlisted(row)))
            }
            ActivationResult::Rejected => {
                info!(row, "Waitlist refused, back to results");
                driver.go_back_to_results().await?;
                Ok(Phase::Scanning { row: row + 1 })
            }
            ActivationResult::Blocked => {
                warn!(row, "Waitlist action blocked");
                Ok(Phase::Scanning { row: row + 1 })
            }
        }
    }

    /// Wait, resubmit the search and go back to the top of the list.
    async fn refresh<D: AutomationDriver>(
        &mut self,
        driver: &mut D,
        first: usize,
        session: &mut SessionState,
    ) -> Result<Phase, BookingError> {
        let wait = self
            .jitter
            .pick(self.config.refresh_min(), self.config.refresh_max());
        debug!(wait_ms = wait.as_millis() as u64, "Waiting before refresh");

        if !self.pause(wait).await {
            info!(
                refresh_count = session.refresh_count(),
                "Cancelled while waiting"
            );
            return Ok(Phase::Done(BookingOutcome::Cancelled));
        }

        driver.resubmit_search().await?;
        session.record_refresh();
        info!(refresh_count = session.refresh_count(), "Search refreshed");

        let settle = self.config.settle();
        if !settle.is_zero() {
            // Cancellation here is picked up at the top of the next pass
            self.pause(settle).await;
        }

        Ok(Phase::Scanning { row: first })
    }

    /// Sleep unless cancelled first. Returns false if cancelled.
    async fn pause(&self, duration: Duration) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = self.pacer.sleep(duration) => !self.cancel.is_cancelled(),
        }
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;

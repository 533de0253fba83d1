//! Session progress and terminal outcomes.

use std::fmt;

/// What the session has achieved so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Progress {
    #[default]
    Pending,
    Reserved(usize),
    Waitlisted(usize),
}

/// Progress of one booking session.
///
/// Created when the loop starts and threaded through it by value. Only the
/// loop mutates it; callers can read it once the loop returns, or hand a
/// previous state back in to resume counting from where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    booked: bool,
    refresh_count: u64,
    progress: Progress,
}

impl SessionState {
    /// A fresh session: nothing booked, no refreshes yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a seat or waitlist place has been claimed.
    pub fn booked(&self) -> bool {
        self.booked
    }

    /// Number of times the search has been resubmitted.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub(super) fn record_refresh(&mut self) {
        self.refresh_count += 1;
    }

    pub(super) fn record_reserved(&mut self, row: usize) {
        self.booked = true;
        self.progress = Progress::Reserved(row);
    }

    pub(super) fn record_waitlisted(&mut self, row: usize) {
        self.booked = true;
        self.progress = Progress::Waitlisted(row);
    }

    /// The terminal outcome, if the session has reached one.
    pub fn outcome(&self) -> Option<BookingOutcome> {
        match self.progress {
            Progress::Pending => None,
            Progress::Reserved(row) => Some(BookingOutcome::Reserved(row)),
            Progress::Waitlisted(row) => Some(BookingOutcome::Waitlisted(row)),
        }
    }
}

/// How a booking loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOutcome {
    /// A seat on this row was reserved.
    Reserved(usize),
    /// A waitlist place on this row was taken.
    Waitlisted(usize),
    /// The loop was told to stop.
    Cancelled,
}

impl BookingOutcome {
    /// True for reserved and waitlisted outcomes.
    pub fn is_success(&self) -> bool {
        !matches!(self, BookingOutcome::Cancelled)
    }

    /// The claimed row, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            BookingOutcome::Reserved(row) | BookingOutcome::Waitlisted(row) => Some(*row),
            BookingOutcome::Cancelled => None,
        }
    }
}

impl fmt::Display for BookingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingOutcome::Reserved(row) => write!(f, "reserved a seat on row {row}"),
            BookingOutcome::Waitlisted(row) => write!(f, "joined the waitlist on row {row}"),
            BookingOutcome::Cancelled => f.write_str("cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state() {
        let state = SessionState::new();
        assert!(!state.booked());
        assert_eq!(state.refresh_count(), 0);
        assert_eq!(state.progress(), Progress::Pending);
        assert_eq!(state.outcome(), None);
    }

    #[test]
    fn recording_a_claim_books_the_session() {
        let mut state = SessionState::new();
        state.record_refresh();
        state.record_refresh();
        state.record_reserved(2);

        assert!(state.booked());
        assert_eq!(state.refresh_count(), 2);
        assert_eq!(state.outcome(), Some(BookingOutcome::Reserved(2)));

        let mut state = SessionState::new();
        state.record_waitlisted(1);
        assert_eq!(state.outcome(), Some(BookingOutcome::Waitlisted(1)));
    }

    #[test]
    fn outcome_helpers() {
        assert!(BookingOutcome::Reserved(1).is_success());
        assert!(BookingOutcome::Waitlisted(3).is_success());
        assert!(!BookingOutcome::Cancelled.is_success());

        assert_eq!(BookingOutcome::Waitlisted(3).row(), Some(3));
        assert_eq!(BookingOutcome::Cancelled.row(), None);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(
            BookingOutcome::Reserved(1).to_string(),
            "reserved a seat on row 1"
        );
        assert_eq!(
            BookingOutcome::Waitlisted(2).to_string(),
            "joined the waitlist on row 2"
        );
        assert_eq!(BookingOutcome::Cancelled.to_string(), "cancelled");
    }
}

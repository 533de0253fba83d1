//! Booking state machine.
//!
//! This module implements the loop that watches the result list and claims
//! a seat the moment one appears:
//!
//! ```text
//!             ┌──────────────── lost race / refused ───────────────┐
//!             ▼                                                    │
//!   ──► Scanning ──bookable──► ClaimAttempt ──confirmed──► Done    │
//!        │   ▲  └──waitlist──► WaitlistAttempt ──taken──► Done     │
//!        │   │                   └─────────────────────────────────┘
//!  rows  │   │ resubmit
//!  done  ▼   │
//!       RefreshWait ──cancelled──► Done(Cancelled)
//! ```
//!
//! Rows are always read in rank order and the first claimable row wins.
//! Timing goes through [`Pacer`] and [`Jitter`] so tests never sleep.

mod config;
mod machine;
mod pacing;
mod state;

pub use config::BookingConfig;
pub use machine::{BookingError, BookingMachine, BookingReport};
pub use pacing::{FixedJitter, Jitter, Pacer, TokioPacer, UniformJitter};
pub use state::{BookingOutcome, Progress, SessionState};

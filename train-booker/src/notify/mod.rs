//! Success notifications.
//!
//! Once a seat is claimed the owner has a limited time to pay, so the
//! booker makes noise: an audio cue on the local machine and a Telegram
//! message. Both are best-effort. A sink that fails is logged and skipped;
//! nothing here can fail the booking.

mod audio;
mod error;
mod telegram;

use std::path::PathBuf;

use tracing::{info, warn};

pub use audio::{AudioCue, CommandAudioCue};
pub use error::NotifyError;
pub use telegram::{MessageSink, TelegramConfig, TelegramSink};

use crate::booking::BookingOutcome;
use crate::domain::ValidCriteria;

/// Tells the owner a booking landed.
#[allow(async_fn_in_trait)]
pub trait Notify {
    /// Signal a successful outcome. Never fails.
    async fn notify(&self, outcome: &BookingOutcome, criteria: &ValidCriteria);
}

/// Dispatches to an optional audio cue and an optional message sink.
#[derive(Debug, Clone)]
pub struct Notifier<A, M> {
    audio: Option<(A, PathBuf)>,
    message: Option<M>,
}

impl<A: AudioCue, M: MessageSink> Notifier<A, M> {
    /// Build from whichever sinks are configured.
    pub fn new(audio: Option<(A, PathBuf)>, message: Option<M>) -> Self {
        Self { audio, message }
    }

    /// True if no sink is configured.
    pub fn is_silent(&self) -> bool {
        self.audio.is_none() && self.message.is_none()
    }
}

impl<A: AudioCue, M: MessageSink> Notify for Notifier<A, M> {
    async fn notify(&self, outcome: &BookingOutcome, criteria: &ValidCriteria) {
        if !outcome.is_success() {
            return;
        }

        let text = success_message(outcome, criteria);

        let audio = async {
            if let Some((cue, resource)) = &self.audio {
                match cue.play(resource).await {
                    Ok(()) => info!(resource = %resource.display(), "Played audio cue"),
                    Err(e) => warn!(error = %e, "Audio cue failed"),
                }
            }
        };

        let message = async {
            if let Some(sink) = &self.message {
                match sink.send(&text).await {
                    Ok(()) => info!("Sent booking message"),
                    Err(e) => warn!(error = %e, "Booking message failed"),
                }
            }
        };

        futures::join!(audio, message);
    }
}

/// Text of the success message.
pub fn success_message(outcome: &BookingOutcome, criteria: &ValidCriteria) -> String {
    let headline = match outcome {
        BookingOutcome::Waitlisted(_) => "예약대기 완료!",
        _ => "예약완료!",
    };
    format!(
        "{headline}\n출발:{}\n도착:{}\n날짜:{}\n시간:대략{}",
        criteria.departure(),
        criteria.arrival(),
        criteria.date(),
        criteria.hour()
    )
}

//! One booking session from raw criteria to notification.

use tracing::info;

use crate::booking::{BookingError, BookingMachine, BookingReport, Jitter, Pacer};
use crate::domain::{SearchCriteria, ValidationError};
use crate::driver::{AutomationDriver, Credentials, DriverError};
use crate::notify::Notify;

/// Why a session ended without an outcome.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid search: {0}")]
    Validation(#[from] ValidationError),

    #[error("login failed: {0}")]
    Login(#[source] DriverError),

    #[error("search failed: {0}")]
    Search(#[source] DriverError),

    #[error(transparent)]
    Booking(#[from] BookingError),
}

/// Validate, log in, search, run the loop, and notify on success.
///
/// Criteria are checked before the driver is touched. Cancellation is
/// reported as a `Cancelled` outcome, not an error, and does not notify.
pub async fn run_session<D, P, J, N>(
    criteria: &SearchCriteria,
    credentials: &Credentials,
    driver: &mut D,
    machine: &mut BookingMachine<P, J>,
    notifier: &N,
) -> Result<BookingReport, SessionError>
where
    D: AutomationDriver,
    P: Pacer,
    J: Jitter,
    N: Notify,
{
    let valid = criteria.validate()?;

    driver
        .authenticate(credentials)
        .await
        .map_err(SessionError::Login)?;
    info!("Logged in");

    driver
        .submit_search(&valid)
        .await
        .map_err(SessionError::Search)?;
    info!(
        date = %valid.date(),
        hour = %valid.hour(),
        passengers = valid.passengers(),
        "Search submitted"
    );

    let report = machine.run(driver, &valid).await?;
    info!(
        outcome = %report.outcome,
        refresh_count = report.session.refresh_count(),
        "Booking finished"
    );

    if report.outcome.is_success() {
        notifier.notify(&report.outcome, &valid).await;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingConfig, BookingOutcome, FixedJitter};
    use crate::domain::ValidCriteria;
    use crate::driver::{DriverCall, Script, ScriptedDriver, ScriptedPass, ScriptedRow};
    use crate::notify::{AudioCue, MessageSink, Notifier, NotifyError};
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    struct NoSleep;

    impl Pacer for NoSleep {
        async fn sleep(&self, _duration: Duration) {}
    }

    #[derive(Default)]
    struct CountingNotify {
        calls: Mutex<Vec<BookingOutcome>>,
    }

    impl Notify for CountingNotify {
        async fn notify(&self, outcome: &BookingOutcome, _criteria: &ValidCriteria) {
            self.calls.lock().unwrap().push(*outcome);
        }
    }

    #[derive(Default)]
    struct BrokenAudio {
        attempts: Arc<AtomicUsize>,
    }

    impl AudioCue for BrokenAudio {
        async fn play(&self, resource: &Path) -> Result<(), NotifyError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError::MissingResource(resource.to_path_buf()))
        }
    }

    #[derive(Default)]
    struct BrokenSink {
        attempts: Arc<AtomicUsize>,
    }

    impl MessageSink for BrokenSink {
        async fn send(&self, _text: &str) -> Result<(), NotifyError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError::Api {
                status: 401,
                message: "Unauthorized".into(),
            })
        }
    }

    fn machine() -> BookingMachine<NoSleep, FixedJitter> {
        BookingMachine::new(BookingConfig::default())
            .with_pacer(NoSleep)
            .with_jitter(FixedJitter(Duration::from_secs(3)))
    }

    fn creds() -> Credentials {
        Credentials::new("010-1234-5678", "hunter2")
    }

    fn criteria() -> SearchCriteria {
        SearchCriteria::new("수서", "부산", "20240315", "08")
    }

    fn driver(passes: Vec<ScriptedPass>) -> ScriptedDriver {
        ScriptedDriver::new(Script::new(passes)).unwrap()
    }

    #[tokio::test]
    async fn unknown_station_never_touches_driver() {
        let mut d = driver(vec![ScriptedPass::new(vec![ScriptedRow::bookable()])]);
        let notify = CountingNotify::default();
        let bad = SearchCriteria::new("서울", "부산", "20240315", "08");

        let err = run_session(&bad, &creds(), &mut d, &mut machine(), &notify)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::UnknownStation { .. })
        ));
        assert!(d.calls().is_empty());
        assert!(notify.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bad_date_never_touches_driver() {
        let mut d = driver(vec![ScriptedPass::new(vec![ScriptedRow::bookable()])]);
        let bad = SearchCriteria::new("수서", "부산", "20230230", "08");

        let err = run_session(
            &bad,
            &creds(),
            &mut d,
            &mut machine(),
            &CountingNotify::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::InvalidDate(_))
        ));
        assert!(d.calls().is_empty());
    }

    #[tokio::test]
    async fn first_row_reserved_notifies_once() {
        let mut d = driver(vec![ScriptedPass::new(vec![
            ScriptedRow::bookable(),
            ScriptedRow::sold_out(),
        ])]);
        let notify = CountingNotify::default();

        let report = run_session(&criteria(), &creds(), &mut d, &mut machine(), &notify)
            .await
            .unwrap();

        assert_eq!(report.outcome, BookingOutcome::Reserved(1));
        assert_eq!(report.session.refresh_count(), 0);
        assert_eq!(
            *notify.calls.lock().unwrap(),
            vec![BookingOutcome::Reserved(1)]
        );
        assert_eq!(&d.calls()[..2], &[DriverCall::Authenticate, DriverCall::SubmitSearch]);
    }

    #[tokio::test]
    async fn login_refused_is_reported() {
        let mut script = Script::new(vec![ScriptedPass::new(vec![ScriptedRow::bookable()])]);
        script.reject_login = true;
        let mut d = ScriptedDriver::new(script).unwrap();

        let err = run_session(
            &criteria(),
            &creds(),
            &mut d,
            &mut machine(),
            &CountingNotify::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            SessionError::Login(DriverError::Authentication(_))
        ));
        assert_eq!(d.count(DriverCall::SubmitSearch), 0);
    }

    #[tokio::test]
    async fn cancelled_session_does_not_notify() {
        let mut d = driver(vec![ScriptedPass::new(vec![ScriptedRow::sold_out()])]);
        let notify = CountingNotify::default();
        let token = CancellationToken::new();
        token.cancel();
        let mut m = machine().with_cancellation(token);

        let report = run_session(&criteria(), &creds(), &mut d, &mut m, &notify)
            .await
            .unwrap();

        assert_eq!(report.outcome, BookingOutcome::Cancelled);
        assert!(notify.calls.lock().unwrap().is_empty());
        assert_eq!(d.count(DriverCall::ResubmitSearch), 0);
    }

    #[tokio::test]
    async fn failing_sinks_do_not_change_outcome() {
        let mut d = driver(vec![ScriptedPass::new(vec![ScriptedRow::bookable()])]);
        let audio = BrokenAudio::default();
        let sink = BrokenSink::default();
        let (played, sent) = (audio.attempts.clone(), sink.attempts.clone());
        let notifier = Notifier::new(Some((audio, PathBuf::from("done.mp3"))), Some(sink));

        let report = run_session(&criteria(), &creds(), &mut d, &mut machine(), &notifier)
            .await
            .unwrap();

        assert_eq!(report.outcome, BookingOutcome::Reserved(1));
        assert!(report.session.booked());
        assert_eq!(played.load(Ordering::SeqCst), 1);
        assert_eq!(sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn demo_script_books_second_row() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/sold-out-then-free.json");
        let mut d = ScriptedDriver::from_file(&path).unwrap();
        let notify = CountingNotify::default();

        let report = run_session(&criteria(), &creds(), &mut d, &mut machine(), &notify)
            .await
            .unwrap();

        assert_eq!(report.outcome, BookingOutcome::Reserved(2));
        assert_eq!(report.session.refresh_count(), 2);
        assert_eq!(d.count(DriverCall::ActivateReservationFallback(2)), 1);
        assert_eq!(notify.calls.lock().unwrap().len(), 1);
    }
}

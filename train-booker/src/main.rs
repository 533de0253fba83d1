use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use train_booker::booking::{BookingConfig, BookingMachine, BookingOutcome};
use train_booker::config::{DriverChoice, NotifyConfig, Options, RunConfig};
use train_booker::driver::ScriptedDriver;
use train_booker::notify::{CommandAudioCue, Notifier, TelegramSink};
use train_booker::session::run_session;
use train_booker::srt::SrtDriver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = Options::parse();

    let filter = if options.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = RunConfig::resolve(&options).context("invalid configuration")?;
    let notifier = build_notifier(&config.notify)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C, stopping");
                on_signal.cancel();
            }
            Err(e) => warn!(error = %e, "Cannot listen for Ctrl-C"),
        }
    });

    let mut machine =
        BookingMachine::new(BookingConfig::default()).with_cancellation(cancel.clone());

    info!(
        departure = %config.criteria.departure,
        arrival = %config.criteria.arrival,
        date = %config.criteria.date,
        time = %config.criteria.time,
        rows_to_ignore = config.criteria.rows_to_ignore,
        rows_to_check = config.criteria.rows_to_check,
        want_waitlist = config.criteria.want_waitlist,
        "Starting train-booker v{}",
        env!("CARGO_PKG_VERSION")
    );

    match config.driver {
        DriverChoice::Scripted(path) => {
            let mut driver = ScriptedDriver::from_file(&path)
                .with_context(|| format!("cannot load script {}", path.display()))?;
            let report = run_session(
                &config.criteria,
                &config.credentials,
                &mut driver,
                &mut machine,
                &notifier,
            )
            .await?;
            info!(
                outcome = %report.outcome,
                calls = driver.calls().len(),
                "Scripted run complete"
            );
        }
        DriverChoice::Browser(web) => {
            let mut driver = SrtDriver::launch(&web)
                .await
                .context("cannot start browser; is chromedriver running?")?;
            let result = run_session(
                &config.criteria,
                &config.credentials,
                &mut driver,
                &mut machine,
                &notifier,
            )
            .await;

            if matches!(&result, Ok(report) if report.outcome != BookingOutcome::Cancelled) {
                info!("Finish payment in the browser, then press Ctrl-C to close it");
                cancel.cancelled().await;
            }

            if let Err(e) = driver.close().await {
                warn!(error = %e, "Failed to close browser");
            }
            result?;
        }
    }

    Ok(())
}

fn build_notifier(
    config: &NotifyConfig,
) -> anyhow::Result<Notifier<CommandAudioCue, TelegramSink>> {
    let audio = config
        .audio_cue
        .clone()
        .map(|path| (CommandAudioCue::system(), path));
    let message = config
        .telegram
        .clone()
        .map(TelegramSink::new)
        .transpose()
        .context("cannot build telegram client")?;

    let notifier = Notifier::new(audio, message);
    if notifier.is_silent() {
        info!("No notification configured");
    }
    Ok(notifier)
}

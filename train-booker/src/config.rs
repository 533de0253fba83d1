//! Command-line and file configuration.
//!
//! Search options come either from flags or, when `--config` is given,
//! from a YAML file. The two are never mixed: with a file, search flags are
//! ignored. Credentials left out of the file fall back to the flags or the
//! `SRT_USER` / `SRT_PASSWORD` environment variables.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Deserializer};

use crate::domain::{DEFAULT_ROWS_TO_CHECK, SearchCriteria};
use crate::driver::Credentials;
use crate::notify::TelegramConfig;
use crate::webdriver::WebDriverConfig;

/// Default chromedriver address.
const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Errors building the run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required option: {0}")]
    Missing(&'static str),

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("telegram needs both a bot token and a chat id")]
    PartialTelegram,
}

/// Book an SRT seat the moment one frees up.
#[derive(Debug, Clone, Parser)]
#[command(name = "train-booker")]
#[command(about = "Watch SRT search results and book the first free seat")]
#[command(version)]
pub struct Options {
    /// SRT membership number, email or phone
    #[arg(long, env = "SRT_USER")]
    pub user: Option<String>,

    /// SRT password
    #[arg(long, env = "SRT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Departure station, e.g. 동탄
    #[arg(long, visible_alias = "dpt")]
    pub departure: Option<String>,

    /// Arrival station, e.g. 동대구
    #[arg(long, visible_alias = "arr")]
    pub arrival: Option<String>,

    /// Travel date as YYYYMMDD
    #[arg(long, visible_alias = "dt")]
    pub date: Option<String>,

    /// Earliest departure hour, an even hour such as 08
    #[arg(long, visible_alias = "tm")]
    pub time: Option<String>,

    /// Adult passengers
    #[arg(long, default_value_t = 1)]
    pub passengers: u8,

    /// How many result rows to watch
    #[arg(long, visible_alias = "num", default_value_t = DEFAULT_ROWS_TO_CHECK)]
    pub rows_to_check: usize,

    /// How many top result rows to skip
    #[arg(long, default_value_t = 0)]
    pub rows_to_ignore: usize,

    /// Join the waitlist when no seat is free
    #[arg(long, visible_alias = "reserve")]
    pub waitlist: bool,

    /// Sound file to play when booked
    #[arg(long)]
    pub audio_cue: Option<PathBuf>,

    /// Telegram bot token for the success message
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: Option<String>,

    /// Telegram chat to send the success message to
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,

    /// chromedriver address
    #[arg(long, default_value = DEFAULT_WEBDRIVER_URL)]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Replay a JSON script instead of opening a browser
    #[arg(long)]
    pub scripted: Option<PathBuf>,

    /// YAML file with the search options
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Search options read from a YAML file.
///
/// The key names of the older Python tool are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(alias = "login_id", deserialize_with = "text")]
    pub user: Option<String>,
    #[serde(alias = "login_psw", deserialize_with = "text")]
    pub password: Option<String>,
    #[serde(alias = "dpt_stn")]
    pub departure: Option<String>,
    #[serde(alias = "arr_stn")]
    pub arrival: Option<String>,
    #[serde(alias = "dpt_dt", deserialize_with = "text")]
    pub date: Option<String>,
    #[serde(alias = "dpt_tm", deserialize_with = "hour_text")]
    pub time: Option<String>,
    #[serde(alias = "num_passenger")]
    pub passengers: Option<u8>,
    #[serde(alias = "num_trains_to_check")]
    pub rows_to_check: Option<usize>,
    #[serde(alias = "num_trains_to_ignore")]
    pub rows_to_ignore: Option<usize>,
    #[serde(alias = "want_reserve")]
    pub want_waitlist: Option<bool>,
    #[serde(alias = "notify_sound_file_path")]
    pub audio_cue: Option<PathBuf>,
    #[serde(deserialize_with = "text")]
    pub telegram_token: Option<String>,
    #[serde(deserialize_with = "text")]
    pub telegram_chat_id: Option<String>,
}

/// YAML reads `20240315` and `-1001` as numbers; these fields want text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(i64),
}

fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?.map(|s| match s {
        Scalar::Text(t) => t,
        Scalar::Number(n) => n.to_string(),
    }))
}

/// Like [`text`], but a bare `8` becomes `"08"`.
fn hour_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?.map(|s| match s {
        Scalar::Text(t) => t,
        Scalar::Number(n) => format!("{n:02}"),
    }))
}

impl FileConfig {
    /// Parse YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Read and parse a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Which driver to run against.
#[derive(Debug, Clone)]
pub enum DriverChoice {
    /// A real browser through chromedriver
    Browser(WebDriverConfig),
    /// A JSON script, no browser
    Scripted(PathBuf),
}

/// Where to send the success notification.
#[derive(Debug, Clone, Default)]
pub struct NotifyConfig {
    pub audio_cue: Option<PathBuf>,
    pub telegram: Option<TelegramConfig>,
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub criteria: SearchCriteria,
    pub credentials: Credentials,
    pub notify: NotifyConfig,
    pub driver: DriverChoice,
}

impl RunConfig {
    /// Build from parsed flags, reading `--config` if given.
    pub fn resolve(options: &Options) -> Result<Self, ConfigError> {
        let file = match &options.config {
            Some(path) => Some(FileConfig::load(path)?),
            None => None,
        };
        Self::merge(options, file)
    }

    /// Combine flags with an already-parsed file.
    pub fn merge(options: &Options, file: Option<FileConfig>) -> Result<Self, ConfigError> {
        let (criteria, user, password, audio_cue, token, chat_id) = match file {
            Some(f) => {
                let criteria = SearchCriteria::new(
                    required(f.departure, "departure")?,
                    required(f.arrival, "arrival")?,
                    required(f.date, "date")?,
                    required(f.time, "time")?,
                )
                .with_passengers(f.passengers.unwrap_or(1))
                .with_rows(
                    f.rows_to_ignore.unwrap_or(0),
                    f.rows_to_check.unwrap_or(DEFAULT_ROWS_TO_CHECK),
                )
                .with_waitlist(f.want_waitlist.unwrap_or(false));
                (
                    criteria,
                    f.user.or_else(|| options.user.clone()),
                    f.password.or_else(|| options.password.clone()),
                    f.audio_cue,
                    f.telegram_token,
                    f.telegram_chat_id,
                )
            }
            None => {
                let criteria = SearchCriteria::new(
                    required(options.departure.clone(), "departure")?,
                    required(options.arrival.clone(), "arrival")?,
                    required(options.date.clone(), "date")?,
                    required(options.time.clone(), "time")?,
                )
                .with_passengers(options.passengers)
                .with_rows(options.rows_to_ignore, options.rows_to_check)
                .with_waitlist(options.waitlist);
                (
                    criteria,
                    options.user.clone(),
                    options.password.clone(),
                    options.audio_cue.clone(),
                    options.telegram_token.clone(),
                    options.telegram_chat_id.clone(),
                )
            }
        };

        let driver = match &options.scripted {
            Some(path) => DriverChoice::Scripted(path.clone()),
            None => DriverChoice::Browser(
                WebDriverConfig::new()
                    .with_base_url(options.webdriver_url.clone())
                    .with_headless(options.headless),
            ),
        };

        // A scripted run never logs in for real
        let credentials = match &driver {
            DriverChoice::Scripted(_) => {
                Credentials::new(user.unwrap_or_default(), password.unwrap_or_default())
            }
            DriverChoice::Browser(_) => {
                Credentials::new(required(user, "user")?, required(password, "password")?)
            }
        };

        let telegram = match (token, chat_id) {
            (Some(token), Some(chat_id)) => Some(TelegramConfig::new(token, chat_id)),
            (None, None) => None,
            _ => return Err(ConfigError::PartialTelegram),
        };

        Ok(Self {
            criteria,
            credentials,
            notify: NotifyConfig {
                audio_cue,
                telegram,
            },
            driver,
        })
    }
}

fn required<T>(value: Option<T>, name: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::Missing(name))
}

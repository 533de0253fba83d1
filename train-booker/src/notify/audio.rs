//! Audio cue played when a booking lands.

use std::path::Path;

use tokio::process::Command;

use super::error::NotifyError;

/// Plays a sound file.
#[allow(async_fn_in_trait)]
pub trait AudioCue {
    async fn play(&self, resource: &Path) -> Result<(), NotifyError>;
}

/// Plays audio by running an external player process.
///
/// The file path is appended as the last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAudioCue {
    program: String,
    args: Vec<String>,
}

impl CommandAudioCue {
    /// Use a specific player and leading arguments.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The platform's usual command-line player.
    pub fn system() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("afplay", Vec::new())
        } else {
            Self::new(
                "ffplay",
                ["-nodisp", "-autoexit", "-loglevel", "quiet"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            )
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandAudioCue {
    fn default() -> Self {
        Self::system()
    }
}

impl AudioCue for CommandAudioCue {
    async fn play(&self, resource: &Path) -> Result<(), NotifyError> {
        if !resource.is_file() {
            return Err(NotifyError::MissingResource(resource.to_path_buf()));
        }

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(resource)
            .status()
            .await?;

        if !status.success() {
            return Err(NotifyError::PlayerFailed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}

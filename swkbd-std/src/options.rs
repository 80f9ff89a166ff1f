use crate::Error;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};
use swkbd_core::ConfigValidator;

/// Bridge settings that persist across sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    /// Words rejected when a keyboard enables its profanity filter
    pub blocked_words: Vec<String>,

    /// Longest time the emulator thread waits for the dialog, in
    /// milliseconds. `None` waits until the dialog completes.
    pub timeout_ms: Option<u64>,
}

impl BridgeOptions {
    /// Load options from `path`, or return the defaults if the file is
    /// missing or malformed
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(options) => options,
            Err(Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read bridge options, using defaults");
                Self::default()
            }
        }
    }

    /// Read options from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or parsed.
    pub fn read(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save options to `path` as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or the file can't be written.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Validator configured with these options.
    #[must_use]
    pub fn validator(&self) -> ConfigValidator {
        ConfigValidator::new().with_blocked_words(&self.blocked_words)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_ms =
            timeout.map(|timeout| u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }
}

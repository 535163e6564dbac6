//! Modification-time polling for config hot-reload.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::SkylineConfig;
use crate::error::{SkylineError, SkylineResult};

/// Watches a config file and reloads it when its modification time advances.
///
/// Polling is cheap (one `stat` call), so callers can check once per frame
/// or on a timer.
#[derive(Debug)]
pub struct ConfigWatcher {
    path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl ConfigWatcher {
    /// Creates a watcher. Nothing is read until [`ConfigWatcher::load`] or
    /// [`ConfigWatcher::poll`] is called.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_modified: None,
        }
    }

    /// Returns the watched path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file unconditionally and remembers its modification time.
    ///
    /// # Errors
    ///
    /// Returns any error of [`SkylineConfig::load`].
    pub fn load(&mut self) -> SkylineResult<SkylineConfig> {
        let modified = self.modified()?;
        let config = SkylineConfig::load(&self.path)?;
        self.last_modified = Some(modified);
        Ok(config)
    }

    /// Reloads the file if it changed since the last successful load.
    ///
    /// Returns `Ok(None)` when the file is unchanged. A file that fails to
    /// parse keeps the old timestamp, so it is retried on the next poll.
    ///
    /// # Errors
    ///
    /// Returns any error of [`SkylineConfig::load`].
    pub fn poll(&mut self) -> SkylineResult<Option<SkylineConfig>> {
        let modified = self.modified()?;
        if self.last_modified.is_some_and(|last| modified <= last) {
            return Ok(None);
        }

        let config = SkylineConfig::load(&self.path)?;
        self.last_modified = Some(modified);
        tracing::info!("Config {} changed, reloaded", self.path.display());
        Ok(Some(config))
    }

    fn modified(&self) -> SkylineResult<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|source| SkylineError::ConfigIo {
                path: self.path.clone(),
                source,
            })
    }
}

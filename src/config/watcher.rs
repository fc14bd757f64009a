//! Level hot reload.
//!
//! Watches the configuration file and forwards the `[levels]` table whenever
//! it changes. Formats, composer and declarations stay as they were when the
//! interceptor was built, so edits to them are ignored until restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::LevelsConfig;

/// Sends the new level table each time the watched file changes it.
pub struct LevelsWatcher {
    path: PathBuf,
    current: LevelsConfig,
    update_tx: mpsc::UnboundedSender<LevelsConfig>,
}

impl LevelsWatcher {
    /// `current` is the table already in effect; saves that leave it
    /// unchanged are not forwarded.
    pub fn new(
        path: &Path,
        current: LevelsConfig,
    ) -> (Self, mpsc::UnboundedReceiver<LevelsConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            current,
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            mut current,
            update_tx,
        } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    if let Some(levels) = changed_levels(&watched, &mut current) {
                        let _ = update_tx.send(levels);
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Level watcher started");
        Ok(watcher)
    }
}

/// Reload `path`; the new level table if it differs from `current`.
///
/// A file that fails to load or validate keeps `current`.
fn changed_levels(path: &Path, current: &mut LevelsConfig) -> Option<LevelsConfig> {
    let levels = match load_config(path) {
        Ok(config) => config.levels,
        Err(e) => {
            tracing::error!(error = %e, "Failed to reload config, keeping current levels");
            return None;
        }
    };
    if levels == *current {
        return None;
    }
    *current = levels.clone();
    Some(levels)
}

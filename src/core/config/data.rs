use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::constants::{DEFAULT_INTERVAL_MS, DEFAULT_WORD_TICK_MULTIPLIER};
use crate::core::reveal::{RevealMode, RevealSettings};

/// Persistent reveal defaults. Unset fields fall back to built-in defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Milliseconds between character-mode ticks
    pub interval_ms: Option<u64>,
    /// Reveal granularity ("character" or "word")
    pub mode: Option<RevealMode>,
    /// Word-mode slowdown relative to `interval_ms`
    pub word_tick_multiplier: Option<u32>,
    /// Animate replies; when off, text appears fully formed
    pub animation: Option<bool>,
}

impl Config {
    /// Resolves the effective reveal settings, filling in defaults.
    pub fn reveal_settings(&self) -> RevealSettings {
        RevealSettings {
            mode: self.mode.unwrap_or_default(),
            interval: Duration::from_millis(self.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS)),
            word_tick_multiplier: self
                .word_tick_multiplier
                .unwrap_or(DEFAULT_WORD_TICK_MULTIPLIER),
            animation: self.animation.unwrap_or(true),
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

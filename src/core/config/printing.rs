use crate::core::config::data::Config;
use crate::core::constants::{DEFAULT_INTERVAL_MS, DEFAULT_WORD_TICK_MULTIPLIER};

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

impl Config {
    /// One `key: value` line per setting, noting defaults for unset keys.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(match self.interval_ms {
            Some(ms) => format!("  interval: {ms}ms"),
            None => format!("  interval: (unset, default: {DEFAULT_INTERVAL_MS}ms)"),
        });
        lines.push(match self.mode {
            Some(mode) => format!("  mode: {}", mode.as_str()),
            None => "  mode: (unset, default: character)".to_string(),
        });
        lines.push(match self.word_tick_multiplier {
            Some(factor) => format!("  word-multiplier: {factor}"),
            None => format!("  word-multiplier: (unset, default: {DEFAULT_WORD_TICK_MULTIPLIER})"),
        });
        lines.push(match self.animation {
            Some(value) => format!("  animation: {}", format_bool(value)),
            None => "  animation: (unset, default: on)".to_string(),
        });
        lines
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        for line in self.describe() {
            println!("{line}");
        }
    }
}

//! Settings management for CLI set/unset commands.

use std::error::Error;
use std::fmt;

use crate::core::config::printing::format_bool;
use crate::core::config::Config;
use crate::core::constants::{DEFAULT_INTERVAL_MS, DEFAULT_WORD_TICK_MULTIPLIER};
use crate::core::reveal::RevealMode;

/// Keys accepted by `set` and `unset`, in display order.
pub const SETTING_KEYS: [&str; 4] = ["interval", "mode", "word-multiplier", "animation"];

/// Errors that can occur when modifying configuration settings.
#[derive(Debug, PartialEq, Eq)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// The provided value could not be parsed as a boolean.
    InvalidBoolean(String),
    /// The provided value is not a non-negative integer.
    InvalidNumber { key: &'static str, input: String },
    /// The provided value is not a reveal mode.
    InvalidMode(String),
    /// No value was given for the key.
    MissingValue {
        hint: &'static str,
        example: &'static str,
    },
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key} (available: {})",
                SETTING_KEYS.join(", ")
            ),
            SettingError::InvalidBoolean(input) => write!(
                f,
                "Invalid boolean value: {input}. Use 'on' or 'off' (also accepts true/false, yes/no)"
            ),
            SettingError::InvalidNumber { key, input } => {
                write!(f, "Invalid value for {key}: {input} (expected a whole number)")
            }
            SettingError::InvalidMode(input) => {
                write!(f, "Invalid reveal mode: {input} (expected character or word)")
            }
            SettingError::MissingValue { hint, example } => write!(f, "{hint}\nExample: {example}"),
        }
    }
}

impl Error for SettingError {}

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no, 1/0 (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn require<'a>(
    value: Option<&'a str>,
    hint: &'static str,
    example: &'static str,
) -> Result<&'a str, SettingError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(SettingError::MissingValue { hint, example }),
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, input: &str) -> Result<T, SettingError> {
    input.parse().map_err(|_| SettingError::InvalidNumber {
        key,
        input: input.to_string(),
    })
}

/// Applies `key = value` to `config` and returns the message to show.
pub fn apply_set(
    config: &mut Config,
    key: &str,
    value: Option<&str>,
) -> Result<String, SettingError> {
    match key {
        "interval" => {
            let input = require(
                value,
                "To set the reveal interval, specify milliseconds:",
                "chatreveal set interval 20",
            )?;
            let ms: u64 = parse_number("interval", input)?;
            config.interval_ms = Some(ms);
            Ok(format!("✅ Set interval to: {ms}ms"))
        }
        "mode" => {
            let input = require(
                value,
                "To set the reveal mode, specify character or word:",
                "chatreveal set mode word",
            )?;
            let mode: RevealMode = input
                .parse()
                .map_err(|_| SettingError::InvalidMode(input.to_string()))?;
            config.mode = Some(mode);
            Ok(format!("✅ Set mode to: {}", mode.as_str()))
        }
        "word-multiplier" => {
            let input = require(
                value,
                "To set how much slower word mode ticks, specify a factor:",
                "chatreveal set word-multiplier 3",
            )?;
            let factor: u32 = parse_number("word-multiplier", input)?;
            config.word_tick_multiplier = Some(factor);
            Ok(format!("✅ Set word-multiplier to: {factor}"))
        }
        "animation" => {
            let input = require(
                value,
                "To toggle the reveal animation, specify on or off:",
                "chatreveal set animation off",
            )?;
            let enabled =
                parse_bool(input).ok_or_else(|| SettingError::InvalidBoolean(input.to_string()))?;
            config.animation = Some(enabled);
            Ok(format!("✅ Set animation to: {}", format_bool(enabled)))
        }
        other => Err(SettingError::UnknownKey(other.to_string())),
    }
}

/// Clears `key` in `config` and returns the message to show.
pub fn apply_unset(config: &mut Config, key: &str) -> Result<String, SettingError> {
    let default_display = match key {
        "interval" => {
            config.interval_ms = None;
            format!("{DEFAULT_INTERVAL_MS}ms")
        }
        "mode" => {
            config.mode = None;
            RevealMode::default().as_str().to_string()
        }
        "word-multiplier" => {
            config.word_tick_multiplier = None;
            DEFAULT_WORD_TICK_MULTIPLIER.to_string()
        }
        "animation" => {
            config.animation = None;
            format_bool(true).to_string()
        }
        other => return Err(SettingError::UnknownKey(other.to_string())),
    };
    Ok(format!("✅ Unset {key} (will use default: {default_display})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for yes in ["on", "TRUE", "yes", "1", " On "] {
            assert_eq!(parse_bool(yes), Some(true), "{yes}");
        }
        for no in ["off", "false", "No", "0"] {
            assert_eq!(parse_bool(no), Some(false), "{no}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn set_updates_each_key() {
        let mut config = Config::default();
        apply_set(&mut config, "interval", Some("15")).unwrap();
        apply_set(&mut config, "mode", Some("word")).unwrap();
        apply_set(&mut config, "word-multiplier", Some("2")).unwrap();
        let message = apply_set(&mut config, "animation", Some("off")).unwrap();

        assert_eq!(message, "✅ Set animation to: off");
        assert_eq!(config.interval_ms, Some(15));
        assert_eq!(config.mode, Some(RevealMode::Word));
        assert_eq!(config.word_tick_multiplier, Some(2));
        assert_eq!(config.animation, Some(false));
    }

    #[test]
    fn set_rejects_bad_input_without_touching_config() {
        let mut config = Config::default();
        assert_eq!(
            apply_set(&mut config, "interval", Some("fast")),
            Err(SettingError::InvalidNumber {
                key: "interval",
                input: "fast".to_string()
            })
        );
        assert_eq!(
            apply_set(&mut config, "mode", Some("line")),
            Err(SettingError::InvalidMode("line".to_string()))
        );
        assert_eq!(
            apply_set(&mut config, "animation", Some("sometimes")),
            Err(SettingError::InvalidBoolean("sometimes".to_string()))
        );
        assert!(matches!(
            apply_set(&mut config, "mode", None),
            Err(SettingError::MissingValue { .. })
        ));
        assert_eq!(
            apply_set(&mut config, "speed", Some("1")),
            Err(SettingError::UnknownKey("speed".to_string()))
        );
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unset_restores_defaults() {
        let mut config = Config {
            interval_ms: Some(5),
            mode: Some(RevealMode::Word),
            word_tick_multiplier: Some(9),
            animation: Some(false),
        };
        for key in SETTING_KEYS {
            apply_unset(&mut config, key).unwrap();
        }
        assert_eq!(config, Config::default());
        assert_eq!(
            apply_unset(&mut config, "interval").unwrap(),
            "✅ Unset interval (will use default: 30ms)"
        );
        assert!(apply_unset(&mut config, "nope").is_err());
    }
}

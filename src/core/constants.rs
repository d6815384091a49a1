//! Shared constants used across the application

/// Default milliseconds between two character-mode reveal ticks.
pub const DEFAULT_INTERVAL_MS: u64 = 30;

/// Word mode ticks this many times slower than character mode.
pub const DEFAULT_WORD_TICK_MULTIPLIER: u32 = 4;

/// Tick intervals below this are clamped; a zero-period timer cannot be armed.
pub const MIN_INTERVAL_MS: u64 = 1;

/// Environment variable holding the `tracing` filter for the binary.
pub const LOG_FILTER_ENV: &str = "CHATREVEAL_LOG";

//! Build-wide tunables.

/// Interactive prompt text.
pub const PROMPT: &str = "SHELL>> ";

/// Lower bound for the percentage-valued commands (brightness, volume).
pub const LEVEL_MIN: i64 = 0;

/// Upper bound for the percentage-valued commands.
pub const LEVEL_MAX: i64 = 100;

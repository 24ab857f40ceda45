// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared setup for the Understory demos.
//!
//! The library crates only emit records through the `log` facade; the demos
//! install a `simplelog` terminal logger so those records are visible.

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

/// Environment variable selecting the log level (`error`, `warn`, `info`, `debug`, `trace`).
pub const LOG_ENV: &str = "UNDERSTORY_LOG";

/// Parse a level name; unknown or missing names turn logging off.
pub fn level_from_str(name: Option<&str>) -> LevelFilter {
    name.and_then(|n| n.trim().parse().ok())
        .unwrap_or(LevelFilter::Off)
}

/// Install a terminal logger on stderr with the level taken from [`LOG_ENV`].
///
/// Calling this more than once keeps the first logger.
pub fn init_logger() {
    let level = level_from_str(std::env::var(LOG_ENV).ok().as_deref());
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(level_from_str(Some("trace")), LevelFilter::Trace);
        assert_eq!(level_from_str(Some(" Debug ")), LevelFilter::Debug);
        assert_eq!(level_from_str(Some("loud")), LevelFilter::Off);
        assert_eq!(level_from_str(None), LevelFilter::Off);
    }

    #[test]
    fn init_logger_twice_keeps_first() {
        init_logger();
        init_logger();
        let expected = level_from_str(std::env::var(LOG_ENV).ok().as_deref());
        assert_eq!(log::max_level(), expected, "level comes from {LOG_ENV}");
    }
}

//! Diagnostic logging.
//!
//! Diagnostics go to stderr through `fern` and never mix with the per-file
//! lines on stdout.

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Maps the number of `--verbose` flags to a level filter.
pub fn level_from_occurrences(occurrences: u8) -> LevelFilter {
    match occurrences {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the global logger.
///
/// Fails if a logger was already set.
pub fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::White)
        .debug(Color::White)
        .trace(Color::BrightBlack);

    Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{}] {}",
                colors.color(record.level()),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    log::debug!("Logger initialized at level {}", level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_occurrences() {
        assert_eq!(level_from_occurrences(0), LevelFilter::Warn);
        assert_eq!(level_from_occurrences(1), LevelFilter::Debug);
        assert_eq!(level_from_occurrences(2), LevelFilter::Trace);
        assert_eq!(level_from_occurrences(255), LevelFilter::Trace);
    }
}

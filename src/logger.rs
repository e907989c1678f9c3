use std::io::Write;
use std::time::Instant;

use anstyle::{AnsiColor, Style};
use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

const ERROR_STYLE: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Red)));
const WARN_STYLE: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Yellow)));

struct CliLogger {
    file: Option<Mutex<std::fs::File>>,
    filter: LevelFilter,
    color: bool,
    start: Instant,
}

impl CliLogger {
    fn render(&self, level: Level, message: &str) -> String {
        let style = match level {
            Level::Error => ERROR_STYLE,
            Level::Warn => WARN_STYLE,
            Level::Info | Level::Debug | Level::Trace => return message.to_string(),
        };
        if self.color {
            format!("{style}{message}{style:#}")
        } else {
            message.to_string()
        }
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = format!("{}", record.args());
        eprintln!("{}", self.render(record.level(), &message));

        if let Some(ref file) = self.file {
            let elapsed = self.start.elapsed().as_secs_f64();
            let _ = writeln!(
                file.lock(),
                "[{elapsed:.3}s] [{}] {} - {message}",
                record.level(),
                record.target(),
            );
        }
    }

    fn flush(&self) {
        if let Some(ref file) = self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Picks the level filter: `RUST_LOG` wins, then `--verbose`, then `Info`.
#[must_use]
pub fn level_filter(rust_log: Option<&str>, verbose: bool) -> LevelFilter {
    rust_log
        .and_then(|s| s.parse().ok())
        .unwrap_or(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
}

/// Initialize the global logger. Records go to stderr as bare messages and,
/// when given, to `log_file` with a timestamp and level.
///
/// # Errors
///
/// Returns `SetLoggerError` if a logger is already installed.
pub fn init(verbose: bool, log_file: Option<std::fs::File>) -> Result<(), log::SetLoggerError> {
    let filter = level_filter(std::env::var("RUST_LOG").ok().as_deref(), verbose);

    let logger = CliLogger {
        file: log_file.map(Mutex::new),
        filter,
        color: std::io::IsTerminal::is_terminal(&std::io::stderr()),
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(filter);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_precedence() {
        assert_eq!(level_filter(None, false), LevelFilter::Info);
        assert_eq!(level_filter(None, true), LevelFilter::Debug);
        assert_eq!(level_filter(Some("warn"), true), LevelFilter::Warn);
        assert_eq!(level_filter(Some("nonsense"), false), LevelFilter::Info);
    }

    #[test]
    fn test_render_styles_errors_only_with_color() {
        let plain = CliLogger {
            file: None,
            filter: LevelFilter::Info,
            color: false,
            start: Instant::now(),
        };
        assert_eq!(plain.render(Level::Error, "[Error] boom"), "[Error] boom");

        let colored = CliLogger { color: true, ..plain };
        assert_eq!(
            colored.render(Level::Error, "[Error] boom"),
            "\x1b[31m[Error] boom\x1b[0m"
        );
        assert_eq!(colored.render(Level::Info, "Done."), "Done.");
    }
}

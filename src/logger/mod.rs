//! Diagnostics go to stderr so generated text can be piped from stdout.

use colored::{Color, Colorize};
use log::Level;

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Blue,
        Level::Debug => Color::Magenta,
        Level::Trace => Color::Green,
    }
}

pub fn stderr(level: log::LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            let level = record.level();
            let prefix = format!("{}:", level.to_string().to_lowercase());
            out.finish(format_args!("{} {}", prefix.color(level_color(level)), message))
        })
        .chain(std::io::stderr())
}

/// Installs the stderr logger. Fails if a logger was already installed.
pub fn init(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    stderr(level).apply()
}

use std::io::{self, IsTerminal};

use anyhow::{bail, Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Parse a level name accepted by `--log-level`
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    let level = match level {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        _ => bail!("unknown log level '{}'", level),
    };
    Ok(level)
}

/// Install the global logger. Output goes to stdout, colored when attached
/// to a terminal; debug level adds timestamps.
pub fn init(level: &str) -> Result<()> {
    let level = parse_level(level)?;

    let is_terminal = io::stdout().is_terminal();
    let with_time = level >= LevelFilter::Debug;

    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red)
        .debug(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let time = if with_time {
                format!(
                    "{} ",
                    humantime::format_rfc3339_millis(std::time::SystemTime::now())
                )
            } else {
                String::new()
            };

            if is_terminal {
                out.finish(format_args!(
                    "{}[{}] {}",
                    time,
                    colors.color(record.level()),
                    message
                ))
            } else {
                out.finish(format_args!("{}[{}] {}", time, record.level(), message))
            }
        })
        .level(level)
        // reqwest/hyper internals are noise at debug
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .chain(io::stdout())
        .apply()
        .context("init logger")?;

    Ok(())
}

//! File logger.
//!
//! The logger is installed before the config file is read, so whatever config
//! loading reports ends up in the log. It accepts every level itself; the
//! effective level is the global `log` max level, which starts at the default
//! and is replaced by the configured one through [`apply_level`].

use std::fs::File;
use std::io;
use std::path::Path;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::core::config::DEFAULT_LOG_LEVEL;

/// Install a `WriteLogger` writing to `path` (truncated) at the default level.
pub fn init(path: &Path) -> io::Result<()> {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let file = File::create(path)?;
    WriteLogger::init(LevelFilter::Trace, log_config, file).map_err(io::Error::other)?;
    log::set_max_level(DEFAULT_LOG_LEVEL);
    Ok(())
}

/// Switch to the resolved level once the config is known.
pub fn apply_level(level: LevelFilter) {
    log::set_max_level(level);
}

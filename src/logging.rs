//! File logging for the terminal binary.
//!
//! The terminal is owned by the renderer, so everything goes to a timestamped
//! file under the configured log directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use log::LevelFilter;

/// Path of the log file for a run started at `unix_secs`
pub fn log_path(dir: &Path, unix_secs: u64) -> PathBuf {
    dir.join(format!("{}.log", unix_secs))
}

/// Install a debug-level `WriteLogger` into `<dir>/<unix time>.log`
pub fn init(dir: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create log directory {}", dir))?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let path = log_path(Path::new(dir), time);
    let file = File::create(&path).with_context(|| format!("create log file {}", path.display()))?;
    simplelog::WriteLogger::init(LevelFilter::Debug, config, file).context("initialize logger")?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path() {
        let path = log_path(Path::new("logs"), 1_700_000_000);
        assert_eq!(path, Path::new("logs").join("1700000000.log"));
    }
}

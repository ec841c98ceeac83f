use std::{fs::OpenOptions, path::Path, sync::Mutex};

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_FILTER: &str = "info";

#[must_use]
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Installs a plain-text subscriber appending to `log_file`. Without a log
/// file nothing is installed: the terminal belongs to the sky.
///
/// Returns whether a subscriber was installed.
///
/// # Errors
///
/// The log file cannot be opened, or a global subscriber already exists.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).context("creating log directory failed")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {} failed", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_env_filter());
    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("installing log subscriber failed")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_info() {
        assert_eq!(default_env_filter().to_string(), "info");
    }

    #[test]
    fn no_log_file_installs_nothing() {
        assert!(!init(None).expect("no-op"));
    }

    #[test]
    fn log_file_receives_events() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("logs").join("sky.log");
        assert!(init(Some(&path)).expect("install subscriber"));

        tracing::warn!(target: "mirror_sky::logging", "logging smoke test");
        let contents = std::fs::read_to_string(&path).expect("log file exists");
        assert!(contents.contains("logging smoke test"));
        assert!(!contents.contains('\u{1b}'), "no ANSI escapes");
    }
}

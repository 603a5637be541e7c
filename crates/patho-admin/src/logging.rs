//! 日志初始化

use crate::config::{LogFormat, LoggingConfig};
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// 安装全局日志订阅者，`RUST_LOG` 覆盖配置中的级别
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&config.level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match (&config.format, open_log_file(config.file_path.as_deref())?) {
        (LogFormat::Json, Some(file)) => builder.json().with_writer(Mutex::new(file)).try_init(),
        (LogFormat::Json, None) => builder.json().try_init(),
        (LogFormat::Pretty, Some(file)) => builder.pretty().with_ansi(false).with_writer(Mutex::new(file)).try_init(),
        (LogFormat::Pretty, None) => builder.pretty().try_init(),
        (LogFormat::Compact, Some(file)) => builder.compact().with_ansi(false).with_writer(Mutex::new(file)).try_init(),
        (LogFormat::Compact, None) => builder.compact().try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {}", level)),
    }
}

fn open_log_file(file_path: Option<&str>) -> Result<Option<File>> {
    let Some(file_path) = file_path else {
        return Ok(None);
    };

    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create log directory {:?}", parent))?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file_path)
        .with_context(|| format!("Failed to open log file {}", file_path))?;
    Ok(Some(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/nested/pathodx.log");

        let file = open_log_file(path.to_str()).unwrap();
        assert!(file.is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_stdout_when_no_file() {
        assert!(open_log_file(None).unwrap().is_none());
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("patho_web=debug,sqlx=warn").is_ok());
    }
}

//! Tracing subscriber initialisation.
//!
//! The terminal belongs to the TUI, so logs go to a file. Follow them with
//! `tail -f` in another terminal; `RUST_LOG=sticky_headings::sync=trace`
//! shows every refresh.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Why the log file subscriber could not be installed.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("cannot create log directory {path:?}: {source}")]
    DirectoryCreation {
        /// Directory that was being created.
        path: PathBuf,
        /// Cause.
        #[source]
        source: std::io::Error,
    },

    /// The path has no UTF-8 file name.
    #[error("log path has no usable file name: {0:?}")]
    InvalidPath(PathBuf),

    /// The path has no parent directory.
    #[error("log path has no parent directory: {0:?}")]
    NoParentDirectory(PathBuf),

    /// A global subscriber is already installed.
    #[error("a tracing subscriber is already installed")]
    SubscriberAlreadySet,
}

/// Split a log file path into its directory and file name.
pub fn split_log_path(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;
    let directory = log_path
        .parent()
        .ok_or_else(|| LoggingError::NoParentDirectory(log_path.to_path_buf()))?;
    Ok((directory, file_name))
}

/// `RUST_LOG` filter, falling back to [`DEFAULT_DIRECTIVE`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber writing to `log_path`.
///
/// Creates the log directory if it doesn't exist.
///
/// # Errors
///
/// Returns `LoggingError` if the path is unusable, the directory cannot be
/// created, or a global subscriber is already installed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let (directory, file_name) = split_log_path(log_path)?;

    // An empty parent means the current directory
    if !directory.as_os_str().is_empty() {
        std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
            path: directory.to_path_buf(),
            source,
        })?;
    }

    let file_appender = tracing_appender::rolling::never(directory, file_name);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn split_log_path_separates_directory_and_name() {
        let (dir, name) = split_log_path(Path::new("/var/log/sticky/app.log")).unwrap();
        assert_eq!(dir, Path::new("/var/log/sticky"));
        assert_eq!(name, "app.log");
    }

    #[test]
    fn split_log_path_rejects_root() {
        assert!(matches!(
            split_log_path(Path::new("/")),
            Err(LoggingError::InvalidPath(_))
        ));
    }

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory_if_missing() {
        let test_dir = std::env::temp_dir().join("sticky_headings_test_logs_create");
        let log_file = test_dir.join("test.log");
        let _ = fs::remove_dir_all(&test_dir);

        // May fail if a subscriber is already set; the directory is created first
        let _ = init(&log_file);

        assert!(test_dir.exists(), "log directory should be created: {test_dir:?}");
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn second_init_reports_subscriber_already_set() {
        let test_dir = std::env::temp_dir().join("sticky_headings_test_logs_twice");
        let log_file = test_dir.join("twice.log");

        let _ = init(&log_file);
        let second = init(&log_file);

        assert!(matches!(second, Err(LoggingError::SubscriberAlreadySet)));
        let _ = fs::remove_dir_all(&test_dir);
    }
}

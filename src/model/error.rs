//! Error types for sticky-headings.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose
//! via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level binary error wrapping all fatal failures
//!   - [`SourceError`] - Document file reading and watching failures
//!   - [`ConfigError`](crate::config::ConfigError) - Settings file failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing setup failures
//!   - `std::io::Error` - Terminal failures
//! - [`SyncError`] - View synchronisation failures, always absorbed
//!
//! # Recovery Strategy
//!
//! Synchronisation failures are **never** surfaced to the user. Every
//! [`SyncError`] is logged and the affected view degrades to showing no
//! sticky headings. Only startup failures (missing file, unreadable config,
//! broken terminal) reach [`AppError`].

use crate::model::ViewId;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error for the terminal host.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to open or read a document.
    #[error("Failed to read document: {0}")]
    Source(#[from] SourceError),

    /// Settings file could not be read, parsed or written.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Terminal or TUI rendering error.
    ///
    /// Fatal: without a working terminal the host cannot function.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors encountered when loading or watching a document.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The document does not exist at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use sticky_headings::model::error::SourceError;
    ///
    /// let err = SourceError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.md")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.md"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The document path is empty.
    #[error("Invalid document path: {0}")]
    InvalidPath(#[from] crate::model::InvalidFileId),

    /// The file watcher could not be started.
    #[error("Watcher error: {0}")]
    Watch(String),

    /// Generic I/O error reading the document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures inside the view synchroniser.
///
/// None of these are user-visible. They exist so that the pipeline can use
/// `?` and so that each absorbed failure is logged with its cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The file has no outline data. Treated as an empty pinned set.
    #[error("No outline available for {view}")]
    MissingOutline {
        /// View whose outline was requested.
        view: ViewId,
    },

    /// The outline is stale after an edit and has not been resolved yet.
    ///
    /// Recomputation against a fresh outline waits for the resolve signal.
    #[error("Outline for {view} is waiting for resolve")]
    UnresolvedFile {
        /// View whose file is unresolved.
        view: ViewId,
    },

    /// The view closed or stopped being tracked while work was pending.
    #[error("{view} is no longer tracked")]
    DetachedView {
        /// View that disappeared.
        view: ViewId,
    },

    /// The host could not report a scroll position for the view.
    #[error("No scroll metrics for {view}")]
    NoScrollMetrics {
        /// View without a scroller.
        view: ViewId,
    },

    /// A measurement completed after a newer request replaced it.
    #[error("Measurement {seq} for {view} was superseded")]
    StaleMeasurement {
        /// View the measurement belonged to.
        view: ViewId,
        /// Sequence number of the superseded request.
        seq: u64,
    },

    /// A measurement never completed within the configured timeout.
    #[error("Measurement {seq} for {view} expired")]
    MeasurementExpired {
        /// View the measurement belonged to.
        view: ViewId,
        /// Sequence number of the abandoned request.
        seq: u64,
    },

    /// The requested heading index is outside the view's outline.
    #[error("Heading {index} is not in the outline of {view}")]
    UnknownHeading {
        /// View that was asked.
        view: ViewId,
        /// Requested outline index.
        index: usize,
    },
}

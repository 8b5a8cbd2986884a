//! Core identifier newtypes with smart constructors.
//!
//! Views are keyed by an opaque [`ViewId`], never by the view object itself,
//! so a closed view can never be reached through a dangling handle.

use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque identity of an open view (pane, leaf, split).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(u64);

impl ViewId {
    /// Wrap a host-issued identity.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw identity.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Identity of a document file, by path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(PathBuf);

impl FileId {
    /// Smart constructor: validates a non-empty path.
    pub fn new(raw: impl Into<PathBuf>) -> Result<Self, InvalidFileId> {
        let path = raw.into();
        if path.as_os_str().is_empty() {
            return Err(InvalidFileId::Empty);
        }
        Ok(Self(path))
    }

    /// The file path.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name without directories, lossily decoded.
    pub fn name(&self) -> String {
        self.0
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.to_string_lossy().into_owned())
    }

    /// Whether the file is a markdown document.
    pub fn is_markdown(&self) -> bool {
        matches!(
            self.0.extension().and_then(|ext| ext.to_str()),
            Some("md" | "markdown")
        )
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

// ===== Error Types =====

/// Rejected file path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFileId {
    /// The path was empty.
    #[error("File path cannot be empty")]
    Empty,
}

// ===== Tests =====

//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod heading;
pub mod identifiers;
pub mod key_action;
pub mod settings;

// Re-export for convenience
pub use error::{AppError, SourceError, SyncError};
pub use heading::{
    Heading, HeadingLevel, InvalidHeadingLevel, OutlineItem, PinnedHeading, SourcePosition,
};
pub use identifiers::{FileId, InvalidFileId, ViewId};
pub use key_action::KeyAction;
pub use settings::{DisplayMode, EditMode, HeadingStyle, ScrollBehaviour, Settings};

//! View synchronisation.
//!
//! Tracks every open markdown view and keeps its sticky block consistent
//! with its scroll position. Host access goes through [`Workspace`] and
//! [`HeadingRenderer`].

pub mod host;
pub mod measure;
pub mod synchronizer;
pub mod throttle;
pub mod tracking;

pub use host::{HeadingRenderer, OpenView, RenderUpdate, ScrollMetrics, Workspace};
pub use measure::{MeasureTicket, MeasurementSlot, PendingMeasurement};
pub use synchronizer::{SyncOptions, Synchronizer, DEFAULT_SCROLL_WINDOW};
pub use throttle::{Throttle, ThrottlePolicy};
pub use tracking::{TrackState, ViewState, ViewTable};

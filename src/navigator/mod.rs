//! Status indicator and heading navigator.

pub mod session;
pub mod status;
pub mod tween;

pub use session::{jump_scroll_top, JumpRequest, NavItem, NavigatorSession};
pub use status::{StatusEntry, StatusHeading, StatusIndicator};
pub use tween::{Easing, ScrollTween};

//! Internal test modules - whitebox tests with crate access
//!
//! Tests here can reach crate-private items such as the acceptance harness
//! and the test-only outline builders.

mod reducer_properties;

mod view_snapshots;

//! Sticky headings
//!
//! Keeps the headings of the section being read pinned above a markdown
//! view while it scrolls.
//!
//! The pure core (`outline`, `model`) computes which headings are pinned.
//! `sync` drives any host through the [`sync::Workspace`] and
//! [`sync::HeadingRenderer`] traits. `view` is the terminal host behind the
//! `sticky` binary.

pub mod config;
pub mod logging;
pub mod model;
pub mod navigator;
pub mod outline;
pub mod source;
pub mod sync;
pub mod view;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;

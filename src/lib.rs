//! Lines Layout
//!
//! Vertical layout engine for virtualized line sequences: custom line
//! heights, whitespace zones between lines and viewport queries over
//! million-line documents.
//!
//! The engine lives in [`layout`]. [`config`], [`logging`], [`scenario`]
//! and [`model`] form the shell used by the `lines-layout` binary.

pub mod config;
pub mod layout;
pub mod logging;
pub mod model;
pub mod scenario;

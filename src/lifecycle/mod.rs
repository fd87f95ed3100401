//! Wiring and observability.
//!
//! # Main Components
//!
//! - [`Catalog`] - Registers the sample model into a namespace over a chosen transport
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod catalog;
pub mod tracing;

pub use catalog::*;
pub use self::tracing::setup_tracing;

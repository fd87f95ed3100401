//! Concrete [`Transport`](crate::framework::Transport) implementations.

pub mod config;
pub mod http;

pub use config::*;
pub use http::*;

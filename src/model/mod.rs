//! Sample resource kinds declared with [`resource!`](crate::resource).
//!
//! A manufacturer makes widgets, and every widget is assembled from parts.

pub mod manufacturer;
pub mod part;
pub mod widget;

pub use manufacturer::*;
pub use part::*;
pub use widget::*;

use crate::framework::ResourceSchema;

/// Schemas of every sample kind, ready to register in one namespace.
pub fn schemas() -> Vec<ResourceSchema> {
    vec![Widget::schema(), Part::schema(), Manufacturer::schema()]
}

//! Generic resource-mapping layer for JSON:API style services.
//!
//! This module provides the building blocks for mapping remote resources onto
//! local entities with dirty tracking, lazily resolved relationships and a
//! depth-first save walk.
//!
//! # Main Components
//!
//! - [`ResourceSchema`] - Declares a resource kind: attributes, relationships, key case
//! - [`Namespace`] - Registry binding schemas to one [`Transport`]
//! - [`ResourceClass`] - Class-level operations: `create`, `find`, `filter`, `all`
//! - [`Resource`] - One fetched instance with tracked attributes and memoized relationships
//! - [`HasMany`] - Owned, memoized has-many collection; saved with its owner
//! - [`ResourceError`] / [`TransportError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test resources without a server.

pub mod association;
pub mod attributes;
pub mod error;
pub mod inflect;
pub mod macros;
pub mod mock;
pub mod namespace;
pub mod resource;
pub mod schema;
pub mod serializer;
pub mod transport;

// Re-export core types for convenience
pub use association::{HasMany, Persist};
pub use attributes::AttributeStore;
pub use error::{ResourceError, TransportError};
pub use inflect::KeyCase;
pub use namespace::{Namespace, NamespaceBuilder};
pub use resource::{Resource, ResourceClass};
pub use schema::{RelationshipDef, RelationshipKind, ResourceSchema, ResourceSchemaBuilder};
pub use serializer::{ResourceData, ResourceHash};
pub use transport::{Method, RequestOptions, Response, Transport};

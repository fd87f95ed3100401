//! # API Resource
//!
//! > **Client-side resource mapping for JSON:API services.**
//!
//! This crate maps records of a remote JSON:API service onto local entities.
//! Each entity tracks which attributes changed, resolves its relationships
//! lazily (once), and writes only what changed back to the server.
//!
//! ## 🚀 Core Concepts
//!
//! ### Dirty Tracking
//! Every attribute write marks the key as modified. `save` sends exactly the
//! modified keys, and a clean entity issues no request at all.
//!
//! ### Lazy, Memoized Relationships
//! `has_many` fetches the target collection filtered by the owner's foreign key
//! the first time it is asked for, then hands back the same collection. Edits to
//! those children are persisted by the owner's `save`, children first.
//!
//! ### Mocking: Testing without a Server
//! Every request goes through the [`Transport`](framework::Transport) trait.
//! See the [`framework::mock`] module for a scripted transport.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! [`ResourceError`](framework::ResourceError) covers mapping failures and wraps
//! [`TransportError`](framework::TransportError) unchanged via `#[from]`, so a
//! `404` from `find` can still be matched as one.
//!
//! ### 2. Registry Instead of Globals
//! Relationship targets are resolved by type name through a
//! [`Namespace`](framework::Namespace), validated when it is built.
//!
//! ### 3. Concurrency Model
//! Requests are awaited one at a time in a deterministic order. An entity is
//! `Send` but is not meant to be shared while it is being mutated.
//!
//! ### 4. Observability
//! `tracing` spans wrap every class operation, relationship resolution and save.
//! See the [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Schemas, the namespace registry, entities, the serializer and the transport seam.
//! - **Key items**: [`Resource`](framework::Resource), [`ResourceClass`](framework::ResourceClass),
//!   [`resource!`].
//!
//! ### 2. The Wire ([`clients`])
//! - **Role**: The HTTP [`Transport`](framework::Transport) built on `reqwest`.
//! - **Key items**: [`HttpTransport`](clients::HttpTransport), [`HttpConfig`](clients::HttpConfig).
//!
//! ### 3. The Wiring ([`lifecycle`])
//! - **Key items**: [`Catalog`](lifecycle::Catalog), [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 4. The Sample Model ([`model`])
//! Widgets, their parts and their manufacturer, declared with [`resource!`].
//!
//! ### Running Tests
//!
//! ```bash
//! RUST_LOG=debug cargo test
//! ```

pub mod clients;
pub mod framework;
pub mod lifecycle;
pub mod model;

#[doc(hidden)]
pub mod __private {
    pub use paste::paste;
    pub use serde_json::Value;
}

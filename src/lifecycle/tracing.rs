//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber filtered by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Class operations**: `create`, `find`, `filter` spans carry `resource_type`
//! - **Instance operations**: relationship resolution and `save` spans carry `resource_type` and `id`
//! - **Transport**: one span per HTTP request with `method` and `path`
//! - **Errors**: every failed request is logged once at `warn` before it propagates
//!
//! ## Usage Examples
//!
//! ```bash
//! # Creates and updates only
//! RUST_LOG=info cargo test
//!
//! # Full request bodies, filters and memo resolution
//! RUST_LOG=debug cargo test
//!
//! # Only the resource layer
//! RUST_LOG=api_resource::framework=debug cargo test
//! ```
//!
//! With `RUST_LOG=debug`, saving a widget whose part was edited looks like:
//!
//! ```text
//! DEBUG has_many:filter: Filter filters={"widget_id": Number(5)}
//! DEBUG has_many:filter: Fetched count=2
//! DEBUG save:save:save: Update body=Object {"data": Object {...}}
//! INFO save:save:save: Updated id=11
//! DEBUG save: Clean, nothing to save
//! ```

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Span names already say where we are
        .compact()
        .try_init();
}

//! In-memory graph store.
//!
//! Owns the durable side of linking for this process: entities by FQN and
//! edges deduplicated on the (source, target, kind) triple. The store is the
//! query surface for downstream consumers (the documentation scheduler),
//! exposed by source, target, and kind, plus a petgraph view for traversal.

pub mod export;
pub mod graph_view;
mod store;

pub use store::{InMemoryGraphStore, StoreError, StoredEdge};

//! Graph linking engine.
//!
//! Takes a flat snapshot of already-extracted code entities plus their raw
//! syntactic facts (imports, supertype names, annotation names, signature
//! tokens, call usages, thrown types) and derives typed, directed edges
//! between entities: containment, inheritance, calls, annotation usage,
//! signature dependencies, exception propagation, and integration edges to
//! synthetic endpoint/topic nodes.
//!
//! Resolution is best-effort and heuristic; there is no type checker behind
//! it. Unresolved references are skipped, never errors.

pub mod cache;
pub mod config;
pub mod engine;
pub mod index;
pub mod linker;
pub mod model;
pub mod refine;
pub mod resolve;
pub mod sink;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::LinkerConfig;
pub use engine::GraphLinkingEngine;
pub use index::EntitySnapshotIndex;
pub use model::edge::{EdgeKind, EdgeProposal};
pub use model::entity::{Entity, EntityKind};
pub use model::facts::{EntityRecord, RawFacts, UsageReference};
pub use model::stats::LinkRunStats;
pub use sink::GraphSink;

//! Persistence sink interface.
//!
//! The engine proposes; the sink owns durable storage, transactional
//! boundaries, and the (source, target, kind) dedup guarantee. Sink errors
//! propagate out of the engine uncaught: this core has no transaction
//! authority and cannot meaningfully retry.

use crate::model::edge::EdgeProposal;
use crate::model::entity::Entity;
use anyhow::Result;

pub trait GraphSink: Send + Sync {
    /// Insert-or-update a (virtual) entity by FQN.
    fn upsert_entity(&self, entity: &Entity) -> Result<()>;

    /// Insert-if-absent every proposal, keyed by (source, target, kind).
    /// Returns the number of rows actually written.
    fn upsert_edges(&self, proposals: &[EdgeProposal]) -> Result<usize>;
}

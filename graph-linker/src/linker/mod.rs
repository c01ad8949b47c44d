//! Edge linkers: one strategy per edge family.
//!
//! Each linker is a pure function of (entity, facts, index) and holds no
//! mutable state, so the engine can run them in any order and in parallel
//! across entities. A linker returning `Err` only loses edges for that one
//! entity; the orchestrator catches, logs, and moves on.

pub mod annotation;
pub mod calls;
pub mod inheritance;
pub mod integration;
pub mod signature;
pub mod structural;
pub mod throws;
pub mod virtual_nodes;

use crate::index::EntitySnapshotIndex;
use crate::model::edge::EdgeProposal;
use crate::model::entity::Entity;
use crate::model::facts::RawFacts;
use anyhow::Result;
use std::sync::Arc;

/// Strategy for deriving edges of one family.
pub trait EdgeLinker: Send + Sync {
    /// Stable name, used in failure logs.
    fn name(&self) -> &'static str;

    /// Cheap pre-filter; `link` is only invoked when this returns true.
    fn applies_to(&self, _entity: &Entity) -> bool {
        true
    }

    fn link(
        &self,
        entity: &Arc<Entity>,
        facts: &RawFacts,
        index: &EntitySnapshotIndex,
    ) -> Result<Vec<EdgeProposal>>;
}

/// Owner FQN for linking: the extractor records it in the facts; fall back
/// to the entity's own owner reference when the facts omit it.
pub(crate) fn owner_fqn<'a>(entity: &'a Entity, facts: &'a RawFacts) -> Option<&'a str> {
    facts
        .owner_fqn
        .as_deref()
        .or(entity.owner_fqn.as_deref())
        .filter(|s| !s.is_empty())
}

/// Package path used for same-package resolution; blank when unknown.
pub(crate) fn package_of(entity: &Entity) -> &str {
    entity.package.as_deref().unwrap_or("")
}

//! Containment edges: package → type and owner → member.

use crate::index::EntitySnapshotIndex;
use crate::linker::{EdgeLinker, owner_fqn};
use crate::model::edge::{EdgeKind, EdgeProposal};
use crate::model::entity::Entity;
use crate::model::facts::RawFacts;
use anyhow::Result;
use std::sync::Arc;

/// Derives CONTAINS edges from declared owner/package relationships.
///
/// A member with no owner, or a type whose package has no entity in the
/// snapshot, simply produces no edge.
pub struct StructuralLinker;

impl EdgeLinker for StructuralLinker {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn applies_to(&self, entity: &Entity) -> bool {
        entity.kind.is_member() || entity.kind.is_type()
    }

    fn link(
        &self,
        entity: &Arc<Entity>,
        facts: &RawFacts,
        index: &EntitySnapshotIndex,
    ) -> Result<Vec<EdgeProposal>> {
        let mut res = Vec::new();

        if entity.kind.is_member() {
            if let Some(owner) = owner_fqn(entity, facts).and_then(|o| index.find_by_fqn(o)) {
                res.push(EdgeProposal::new(
                    owner.clone(),
                    entity.clone(),
                    EdgeKind::Contains,
                ));
            }
        }

        if entity.kind.is_type() {
            if let Some(pkg) = entity
                .package
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .and_then(|p| index.find_package(p))
            {
                res.push(EdgeProposal::new(
                    pkg.clone(),
                    entity.clone(),
                    EdgeKind::Contains,
                ));
            }
        }

        Ok(res)
    }
}

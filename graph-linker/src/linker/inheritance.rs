//! Supertype edges: IMPLEMENTS for interface targets, INHERITS otherwise,
//! plus a generic DEPENDS_ON either way.

use crate::index::EntitySnapshotIndex;
use crate::linker::{EdgeLinker, package_of};
use crate::model::edge::{EdgeKind, EdgeProposal};
use crate::model::entity::{Entity, EntityKind};
use crate::model::facts::RawFacts;
use anyhow::Result;
use std::sync::Arc;

pub struct InheritanceLinker;

impl EdgeLinker for InheritanceLinker {
    fn name(&self) -> &'static str {
        "inheritance"
    }

    fn applies_to(&self, entity: &Entity) -> bool {
        entity.kind.is_type()
    }

    fn link(
        &self,
        entity: &Arc<Entity>,
        facts: &RawFacts,
        index: &EntitySnapshotIndex,
    ) -> Result<Vec<EdgeProposal>> {
        let mut res = Vec::new();
        let pkg = package_of(entity);

        // Extractor-resolved FQNs first; raw simple names as the tail.
        let candidates = facts
            .supertypes_resolved
            .iter()
            .chain(facts.supertypes_simple.iter());

        for raw in candidates {
            let Some(target) = index.resolve_type(raw, &facts.imports, pkg) else {
                continue;
            };
            let kind = if target.kind == EntityKind::Interface {
                EdgeKind::Implements
            } else {
                EdgeKind::Inherits
            };
            res.push(EdgeProposal::new(entity.clone(), target.clone(), kind));
            res.push(EdgeProposal::new(
                entity.clone(),
                target,
                EdgeKind::DependsOn,
            ));
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{entity, facts};

    #[test]
    fn interface_target_yields_implements() {
        let iface = entity("com.ex.Repo", "Repo", EntityKind::Interface);
        let class = entity("com.ex.JdbcRepo", "JdbcRepo", EntityKind::Class);
        let idx = EntitySnapshotIndex::build(&[iface, class.clone()]);

        let mut f = facts();
        f.supertypes_simple = vec!["Repo".into()];
        let edges = InheritanceLinker.link(&class, &f, &idx).unwrap();

        let kinds: Vec<EdgeKind> = edges.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EdgeKind::Implements, EdgeKind::DependsOn]);
        assert!(edges.iter().all(|e| e.target.fqn == "com.ex.Repo"));
    }

    #[test]
    fn class_target_yields_inherits() {
        let base = entity("com.ex.BaseJob", "BaseJob", EntityKind::Class);
        let class = entity("com.ex.NightlyJob", "NightlyJob", EntityKind::Class);
        let idx = EntitySnapshotIndex::build(&[base, class.clone()]);

        let mut f = facts();
        f.supertypes_simple = vec!["BaseJob".into()];
        let edges = InheritanceLinker.link(&class, &f, &idx).unwrap();

        let kinds: Vec<EdgeKind> = edges.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EdgeKind::Inherits, EdgeKind::DependsOn]);
    }

    #[test]
    fn resolved_fqns_are_tried_before_simple_names() {
        let right = entity("com.a.Base", "Base", EntityKind::Class);
        let decoy = entity("com.b.Base", "Base", EntityKind::Class);
        let class = entity("com.z.Sub", "Sub", EntityKind::Class);
        let idx = EntitySnapshotIndex::build(&[decoy, right, class.clone()]);

        let mut f = facts();
        f.supertypes_resolved = vec!["com.a.Base".into()];
        let edges = InheritanceLinker.link(&class, &f, &idx).unwrap();
        assert_eq!(edges[0].target.fqn, "com.a.Base");
    }

    #[test]
    fn unresolved_supertypes_are_skipped_silently() {
        let class = entity("com.ex.Sub", "Sub", EntityKind::Class);
        let idx = EntitySnapshotIndex::build(&[class.clone()]);

        let mut f = facts();
        f.supertypes_simple = vec!["Missing".into()];
        assert!(InheritanceLinker.link(&class, &f, &idx).unwrap().is_empty());
    }
}

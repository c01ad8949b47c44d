//! Exception propagation edges: THROWS per resolved thrown-type name.

use crate::index::EntitySnapshotIndex;
use crate::linker::{EdgeLinker, package_of};
use crate::model::edge::{EdgeKind, EdgeProposal};
use crate::model::entity::Entity;
use crate::model::facts::RawFacts;
use anyhow::Result;
use std::sync::Arc;

pub struct ThrowLinker;

impl EdgeLinker for ThrowLinker {
    fn name(&self) -> &'static str {
        "throws"
    }

    fn applies_to(&self, entity: &Entity) -> bool {
        entity.kind.is_callable()
    }

    fn link(
        &self,
        entity: &Arc<Entity>,
        facts: &RawFacts,
        index: &EntitySnapshotIndex,
    ) -> Result<Vec<EdgeProposal>> {
        let pkg = package_of(entity);
        let mut res = Vec::new();
        for thrown in &facts.throws_types {
            if let Some(target) = index.resolve_type(thrown, &facts.imports, pkg) {
                res.push(EdgeProposal::new(entity.clone(), target, EdgeKind::Throws));
            }
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::EntityKind;
    use crate::testutil::{entity, facts};

    #[test]
    fn resolved_thrown_types_link_unresolved_skip() {
        let exc = entity("com.ex.OrderRejected", "OrderRejected", EntityKind::Exception);
        let method = entity("com.ex.place", "place", EntityKind::Method);
        let idx = EntitySnapshotIndex::build(&[exc, method.clone()]);

        let mut f = facts();
        f.throws_types = vec!["OrderRejected".into(), "java.io.IOException".into()];
        let edges = ThrowLinker.link(&method, &f, &idx).unwrap();

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].kind, EdgeKind::Throws);
        assert_eq!(edges[0].target.fqn, "com.ex.OrderRejected");
    }
}

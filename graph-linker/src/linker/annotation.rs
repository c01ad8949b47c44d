//! Annotation usage edges: ANNOTATED_WITH plus DEPENDS_ON per resolved
//! annotation type.

use crate::index::EntitySnapshotIndex;
use crate::linker::{EdgeLinker, package_of};
use crate::model::edge::{EdgeKind, EdgeProposal};
use crate::model::facts::RawFacts;
use crate::model::entity::Entity;
use anyhow::Result;
use std::sync::Arc;

pub struct AnnotationLinker;

impl EdgeLinker for AnnotationLinker {
    fn name(&self) -> &'static str {
        "annotation"
    }

    fn link(
        &self,
        entity: &Arc<Entity>,
        facts: &RawFacts,
        index: &EntitySnapshotIndex,
    ) -> Result<Vec<EdgeProposal>> {
        if facts.annotations.is_empty() {
            return Ok(Vec::new());
        }

        let pkg = package_of(entity);
        let mut res = Vec::new();
        for a in &facts.annotations {
            let Some(target) = index.resolve_type(a, &facts.imports, pkg) else {
                continue;
            };
            res.push(EdgeProposal::new(
                entity.clone(),
                target.clone(),
                EdgeKind::AnnotatedWith,
            ));
            res.push(EdgeProposal::new(
                entity.clone(),
                target,
                EdgeKind::DependsOn,
            ));
        }
        Ok(res)
    }
}

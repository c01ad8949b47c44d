//! Signature dependency edges: DEPENDS_ON from a callable's parameter and
//! return types, attributed to the declaring type when it resolves.

use crate::index::EntitySnapshotIndex;
use crate::linker::{EdgeLinker, owner_fqn, package_of};
use crate::model::edge::{EdgeKind, EdgeProposal};
use crate::model::entity::Entity;
use crate::model::facts::RawFacts;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Capitalized-or-not identifier following a `:` in a raw signature, e.g.
/// `fun place(order: Order): Receipt`.
static TYPE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":\s*([A-Za-z_][A-Za-z0-9_\.]*)").expect("type token regex"));

pub struct SignatureDependencyLinker;

impl EdgeLinker for SignatureDependencyLinker {
    fn name(&self) -> &'static str {
        "signature"
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
        let tokens = signature_tokens(entity, facts);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        // Dependencies of a method belong to its declaring type when known.
        let src = owner_fqn(entity, facts)
            .and_then(|o| index.find_by_fqn(o))
            .cloned()
            .unwrap_or_else(|| entity.clone());

        let pkg = package_of(entity);
        let mut res = Vec::new();
        for t in &tokens {
            let Some(target) = index.resolve_type(t, &facts.imports, pkg) else {
                continue;
            };
            if target.fqn != src.fqn {
                res.push(EdgeProposal::new(src.clone(), target, EdgeKind::DependsOn));
            }
        }
        Ok(res)
    }
}

/// Type tokens of the signature. Structured param/return facts win; an
/// unstructured raw signature string is scraped as a fallback.
fn signature_tokens(entity: &Entity, facts: &RawFacts) -> BTreeSet<String> {
    let has_structured = !facts.param_types.is_empty()
        || facts.return_type.as_deref().is_some_and(|r| !r.trim().is_empty());

    if has_structured {
        return facts
            .param_types
            .iter()
            .cloned()
            .chain(facts.return_type.iter().cloned())
            .collect();
    }

    match entity.signature.as_deref() {
        Some(sig) if !sig.trim().is_empty() => TYPE_TOKEN
            .captures_iter(sig)
            .map(|c| {
                let t = c.get(1).map(|m| m.as_str()).unwrap_or("");
                let t = t.split('<').next().unwrap_or(t);
                t.split('?').next().unwrap_or(t).to_string()
            })
            .collect(),
        _ => BTreeSet::new(),
    }
}

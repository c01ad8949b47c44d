//! Call edges from raw usage tokens.
//!
//! Resolution is receiver-shape driven:
//! - bare names resolve inside the owner scope first (every overload, not
//!   just the first), then fall back to general type resolution;
//! - dotted names with an uppercase-initial receiver treat the receiver as a
//!   type; anything else is assumed to be `this`/a field of the current
//!   owner.
//!
//! Self-calls and call cycles are expected output, not anomalies.

use crate::index::EntitySnapshotIndex;
use crate::linker::{EdgeLinker, owner_fqn, package_of};
use crate::model::edge::{EdgeKind, EdgeProposal};
use crate::model::entity::Entity;
use crate::model::facts::{RawFacts, UsageReference};
use anyhow::Result;
use std::sync::Arc;
use tracing::trace;

pub struct CallLinker;

impl EdgeLinker for CallLinker {
    fn name(&self) -> &'static str {
        "calls"
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
        if facts.usages.is_empty() {
            return Ok(Vec::new());
        }

        let owner = owner_fqn(entity, facts);
        let pkg = package_of(entity);
        let mut res = Vec::new();

        for usage in &facts.usages {
            match usage {
                UsageReference::Bare { name, is_call } => {
                    if !is_call {
                        continue;
                    }
                    if let Some(owner) = owner {
                        let candidates = owner_scoped_candidates(index, owner, name);
                        if !candidates.is_empty() {
                            for c in candidates {
                                res.push(call_edge(entity, c));
                            }
                            continue;
                        }
                    }
                    if let Some(target) = index.resolve_type(name, &facts.imports, pkg) {
                        res.push(call_edge(entity, &target));
                    } else {
                        trace!(usage = %name, caller = %entity.fqn, "bare usage unresolved");
                    }
                }
                UsageReference::Qualified {
                    receiver,
                    member,
                    is_call,
                } => {
                    if !is_call {
                        continue;
                    }
                    let receiver_fqn = if starts_uppercase(receiver) {
                        index
                            .resolve_type(receiver, &facts.imports, pkg)
                            .map(|t| t.fqn.clone())
                    } else {
                        owner.map(str::to_string)
                    };
                    let Some(receiver_fqn) = receiver_fqn else {
                        trace!(receiver = %receiver, member = %member, caller = %entity.fqn,
                               "receiver unresolved");
                        continue;
                    };
                    for c in owner_scoped_candidates(index, &receiver_fqn, member) {
                        res.push(call_edge(entity, c));
                    }
                }
            }
        }
        Ok(res)
    }
}

/// Every entity reachable as `<scope>.<name>`: overloads by base FQN first,
/// then members of the scope sharing the simple name.
fn owner_scoped_candidates<'a>(
    index: &'a EntitySnapshotIndex,
    scope_fqn: &str,
    name: &str,
) -> &'a [Arc<Entity>] {
    let by_base = index.callables_by_base_fqn(&format!("{scope_fqn}.{name}"));
    if !by_base.is_empty() {
        return by_base;
    }
    index.members_named(scope_fqn, name)
}

fn call_edge(caller: &Arc<Entity>, target: &Arc<Entity>) -> EdgeProposal {
    EdgeProposal::new(caller.clone(), target.clone(), EdgeKind::CallsCode)
}

fn starts_uppercase(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_uppercase())
}

//! Read-only lookup structures over one snapshot of entities.
//!
//! Built once per run, then only read. All maps hold `Arc<Entity>` so the
//! index can be shared freely across parallel linker invocations.
//!
//! Construction never fails: entities with a blank FQN are skipped from the
//! FQN index but still reachable through the simple-name index when a simple
//! name is available.

use crate::model::entity::{Entity, EntityKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable per-run entity index.
#[derive(Debug, Default)]
pub struct EntitySnapshotIndex {
    by_fqn: HashMap<String, Arc<Entity>>,
    /// Simple names are not unique; candidates keep snapshot order so the
    /// "first candidate" fallback stays deterministic across runs.
    by_simple: HashMap<String, Vec<Arc<Entity>>>,
    packages: HashMap<String, Arc<Entity>>,
    /// Callables grouped by FQN with any trailing `(...)` overload suffix
    /// stripped, so `com.ex.Owner.process` finds every overload.
    by_base_fqn: HashMap<String, Vec<Arc<Entity>>>,
    /// Members grouped by (owner FQN, simple name).
    members: HashMap<(String, String), Vec<Arc<Entity>>>,
    len: usize,
}

impl EntitySnapshotIndex {
    pub fn build(entities: &[Arc<Entity>]) -> Self {
        let mut idx = Self {
            len: entities.len(),
            ..Self::default()
        };

        for e in entities {
            let fqn_blank = e.fqn.trim().is_empty();
            if !fqn_blank {
                idx.by_fqn.insert(e.fqn.clone(), e.clone());

                if e.kind == EntityKind::Package {
                    idx.packages.insert(e.fqn.clone(), e.clone());
                }
                if e.kind.is_callable() {
                    let base = base_fqn(&e.fqn).to_string();
                    idx.by_base_fqn.entry(base).or_default().push(e.clone());
                }
            }

            let simple = match &e.name {
                Some(n) if !n.is_empty() => Some(n.clone()),
                _ if !fqn_blank => Some(e.simple_name().to_string()),
                _ => None,
            };
            if let Some(simple) = simple {
                idx.by_simple
                    .entry(simple.clone())
                    .or_default()
                    .push(e.clone());
                if let Some(owner) = &e.owner_fqn {
                    idx.members
                        .entry((owner.clone(), simple))
                        .or_default()
                        .push(e.clone());
                }
            }
        }

        idx
    }

    pub fn find_by_fqn(&self, fqn: &str) -> Option<&Arc<Entity>> {
        self.by_fqn.get(fqn)
    }

    /// All entities sharing a simple name, in snapshot order.
    pub fn find_all_by_simple_name(&self, name: &str) -> &[Arc<Entity>] {
        self.by_simple.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find_package(&self, path: &str) -> Option<&Arc<Entity>> {
        self.packages.get(path)
    }

    /// All callables whose overload-stripped FQN matches `base`.
    pub fn callables_by_base_fqn(&self, base: &str) -> &[Arc<Entity>] {
        self.by_base_fqn.get(base).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All members of `owner` with the given simple name.
    pub fn members_named(&self, owner_fqn: &str, name: &str) -> &[Arc<Entity>] {
        self.members
            .get(&(owner_fqn.to_string(), name.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// FQN with any trailing overload suffix (`(...)`) stripped.
pub fn base_fqn(fqn: &str) -> &str {
    fqn.split('(').next().unwrap_or(fqn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::EntityKind;
    use crate::testutil::{entity, member};

    #[test]
    fn blank_fqn_skipped_from_fqn_index_but_kept_by_simple_name() {
        let ghost = entity("", "Ghost", EntityKind::Class);
        let idx = EntitySnapshotIndex::build(&[ghost]);
        assert!(idx.find_by_fqn("").is_none());
        assert_eq!(idx.find_all_by_simple_name("Ghost").len(), 1);
    }

    #[test]
    fn overloads_share_a_base_fqn() {
        let a = entity("com.ex.Owner.process(int)", "process", EntityKind::Method);
        let b = entity(
            "com.ex.Owner.process(String)",
            "process",
            EntityKind::Method,
        );
        let idx = EntitySnapshotIndex::build(&[a, b]);
        assert_eq!(idx.callables_by_base_fqn("com.ex.Owner.process").len(), 2);
        assert!(idx.callables_by_base_fqn("com.ex.Owner.other").is_empty());
    }

    #[test]
    fn members_are_scoped_by_owner() {
        let m1 = member(
            "com.ex.A.run()",
            "run",
            "com.ex.A",
            EntityKind::Method,
        );
        let m2 = member(
            "com.ex.B.run()",
            "run",
            "com.ex.B",
            EntityKind::Method,
        );
        let idx = EntitySnapshotIndex::build(&[m1, m2]);
        assert_eq!(idx.members_named("com.ex.A", "run").len(), 1);
        assert_eq!(idx.members_named("com.ex.A", "run")[0].fqn, "com.ex.A.run()");
    }

    #[test]
    fn packages_resolve_by_path() {
        let pkg = entity("com.ex", "ex", EntityKind::Package);
        let idx = EntitySnapshotIndex::build(&[pkg]);
        assert!(idx.find_package("com.ex").is_some());
        assert!(idx.find_package("com.other").is_none());
    }
}

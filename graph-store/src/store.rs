//! Edge/entity storage with the triple dedup guarantee.

use graph_linker::{EdgeKind, EdgeProposal, Entity, GraphSink};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity has a blank fqn")]
    BlankFqn,
}

/// One persisted edge row. Entities are referenced by FQN, the snapshot
/// identity, not by storage id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredEdge {
    pub source_fqn: String,
    pub target_fqn: String,
    pub kind: EdgeKind,
}

#[derive(Default)]
struct Inner {
    entities: HashMap<String, Entity>,
    edges: Vec<StoredEdge>,
    edge_keys: HashSet<(String, String, EdgeKind)>,
}

/// Thread-safe in-memory store implementing [`GraphSink`].
#[derive(Default)]
pub struct InMemoryGraphStore {
    inner: Mutex<Inner>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity (insert or replace by FQN).
    pub fn put_entity(&self, entity: &Entity) -> Result<(), StoreError> {
        if entity.fqn.trim().is_empty() {
            return Err(StoreError::BlankFqn);
        }
        self.lock().entities.insert(entity.fqn.clone(), entity.clone());
        Ok(())
    }

    /// Insert edges, skipping triples already present. Returns rows written.
    pub fn put_edges(&self, proposals: &[EdgeProposal]) -> Result<usize, StoreError> {
        let mut inner = self.lock();
        let mut written = 0;
        for p in proposals {
            if p.source.fqn.trim().is_empty() || p.target.fqn.trim().is_empty() {
                return Err(StoreError::BlankFqn);
            }
            let key = (p.source.fqn.clone(), p.target.fqn.clone(), p.kind);
            if inner.edge_keys.insert(key) {
                inner.edges.push(StoredEdge {
                    source_fqn: p.source.fqn.clone(),
                    target_fqn: p.target.fqn.clone(),
                    kind: p.kind,
                });
                written += 1;
            }
        }
        info!(written, skipped = proposals.len() - written, "edges upserted");
        Ok(written)
    }

    pub fn entity(&self, fqn: &str) -> Option<Entity> {
        self.lock().entities.get(fqn).cloned()
    }

    pub fn entities(&self) -> Vec<Entity> {
        let mut all: Vec<Entity> = self.lock().entities.values().cloned().collect();
        all.sort_by(|a, b| a.fqn.cmp(&b.fqn));
        all
    }

    /// Virtual nodes only: entities carrying the synthetic FQN schemes.
    pub fn virtual_nodes(&self) -> Vec<Entity> {
        self.entities()
            .into_iter()
            .filter(|e| e.fqn.starts_with("endpoint://") || e.fqn.starts_with("topic://"))
            .collect()
    }

    pub fn edges(&self) -> Vec<StoredEdge> {
        self.lock().edges.clone()
    }

    pub fn edges_from(&self, source_fqn: &str) -> Vec<StoredEdge> {
        self.filter_edges(|e| e.source_fqn == source_fqn)
    }

    pub fn edges_to(&self, target_fqn: &str) -> Vec<StoredEdge> {
        self.filter_edges(|e| e.target_fqn == target_fqn)
    }

    pub fn edges_with_kind(&self, kind: EdgeKind) -> Vec<StoredEdge> {
        self.filter_edges(|e| e.kind == kind)
    }

    pub fn edge_count(&self) -> usize {
        self.lock().edges.len()
    }

    pub fn entity_count(&self) -> usize {
        self.lock().entities.len()
    }

    fn filter_edges(&self, pred: impl Fn(&StoredEdge) -> bool) -> Vec<StoredEdge> {
        self.lock().edges.iter().filter(|e| pred(e)).cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GraphSink for InMemoryGraphStore {
    fn upsert_entity(&self, entity: &Entity) -> anyhow::Result<()> {
        self.put_entity(entity)?;
        Ok(())
    }

    fn upsert_edges(&self, proposals: &[EdgeProposal]) -> anyhow::Result<usize> {
        Ok(self.put_edges(proposals)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_linker::EntityKind;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn entity(fqn: &str, kind: EntityKind) -> Arc<Entity> {
        Arc::new(Entity {
            id: None,
            fqn: fqn.into(),
            name: None,
            package: None,
            kind,
            owner_fqn: None,
            signature: None,
            meta: BTreeMap::new(),
        })
    }

    fn edge(src: &Arc<Entity>, dst: &Arc<Entity>, kind: EdgeKind) -> EdgeProposal {
        EdgeProposal::new(src.clone(), dst.clone(), kind)
    }

    #[test]
    fn repeated_upsert_writes_once() {
        let store = InMemoryGraphStore::new();
        let a = entity("com.ex.A", EntityKind::Class);
        let b = entity("com.ex.B", EntityKind::Class);

        let first = store
            .put_edges(&[edge(&a, &b, EdgeKind::DependsOn)])
            .unwrap();
        let second = store
            .put_edges(&[edge(&a, &b, EdgeKind::DependsOn)])
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn same_pair_may_carry_several_kinds() {
        let store = InMemoryGraphStore::new();
        let a = entity("com.ex.A", EntityKind::Class);
        let b = entity("com.ex.B", EntityKind::Interface);

        store
            .put_edges(&[
                edge(&a, &b, EdgeKind::Implements),
                edge(&a, &b, EdgeKind::DependsOn),
            ])
            .unwrap();
        assert_eq!(store.edge_count(), 2);
        assert_eq!(store.edges_from("com.ex.A").len(), 2);
    }

    #[test]
    fn queries_by_source_target_kind() {
        let store = InMemoryGraphStore::new();
        let a = entity("com.ex.A", EntityKind::Method);
        let b = entity("com.ex.B", EntityKind::Method);
        let c = entity("com.ex.C", EntityKind::Method);

        store
            .put_edges(&[
                edge(&a, &b, EdgeKind::CallsCode),
                edge(&b, &a, EdgeKind::CallsCode),
                edge(&a, &c, EdgeKind::Throws),
            ])
            .unwrap();

        assert_eq!(store.edges_from("com.ex.A").len(), 2);
        assert_eq!(store.edges_to("com.ex.A").len(), 1);
        assert_eq!(store.edges_with_kind(EdgeKind::CallsCode).len(), 2);
    }

    #[test]
    fn blank_fqn_is_a_constraint_violation() {
        let store = InMemoryGraphStore::new();
        let ghost = entity("", EntityKind::Class);
        assert!(matches!(
            store.put_entity(&ghost),
            Err(StoreError::BlankFqn)
        ));
    }

    #[test]
    fn virtual_nodes_are_recognizable_by_scheme() {
        let store = InMemoryGraphStore::new();
        store
            .put_entity(&entity("com.ex.A", EntityKind::Class))
            .unwrap();
        store
            .put_entity(&entity("endpoint://GET https://api/x", EntityKind::Endpoint))
            .unwrap();
        store
            .put_entity(&entity("topic://orders", EntityKind::Topic))
            .unwrap();

        assert_eq!(store.virtual_nodes().len(), 2);
        assert_eq!(store.entity_count(), 3);
    }
}

//! petgraph view of the stored graph.
//!
//! Downstream consumers traverse the finished graph (neighborhoods, reverse
//! dependencies, reachability); building a petgraph once per query session is
//! cheaper than teaching every consumer the store's query surface.

use crate::store::InMemoryGraphStore;
use graph_linker::{EdgeKind, Entity};
use petgraph::graph::{Graph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

/// Materialize the store into a directed petgraph.
///
/// Edges whose endpoints were never registered as entities are skipped:
/// the store guarantees linked runs register virtual nodes before edges, so
/// a dangling FQN means the snapshot itself never contained the entity.
pub fn build_graph(store: &InMemoryGraphStore) -> Graph<Entity, EdgeKind> {
    let mut g: Graph<Entity, EdgeKind> = Graph::new();

    let mut idx: HashMap<String, NodeIndex> = HashMap::new();
    for entity in store.entities() {
        let fqn = entity.fqn.clone();
        let node = g.add_node(entity);
        idx.insert(fqn, node);
    }

    for edge in store.edges() {
        if let (Some(&src), Some(&dst)) = (idx.get(&edge.source_fqn), idx.get(&edge.target_fqn)) {
            g.add_edge(src, dst, edge.kind);
        }
    }

    debug!(
        nodes = g.node_count(),
        edges = g.edge_count(),
        "graph view built"
    );
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_linker::{EdgeProposal, EntityKind};
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

    #[test]
    fn nodes_and_edges_materialize() {
        let store = InMemoryGraphStore::new();
        let a = entity("com.ex.A", EntityKind::Method);
        let b = entity("com.ex.B", EntityKind::Method);
        store.put_entity(&a).unwrap();
        store.put_entity(&b).unwrap();
        store
            .put_edges(&[EdgeProposal::new(a.clone(), b.clone(), EdgeKind::CallsCode)])
            .unwrap();

        let g = build_graph(&store);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn dangling_edges_are_skipped() {
        let store = InMemoryGraphStore::new();
        let a = entity("com.ex.A", EntityKind::Method);
        let ghost = entity("com.ex.Ghost", EntityKind::Method);
        store.put_entity(&a).unwrap();
        store
            .put_edges(&[EdgeProposal::new(a.clone(), ghost, EdgeKind::CallsCode)])
            .unwrap();

        let g = build_graph(&store);
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 0);
    }
}

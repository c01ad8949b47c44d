//! Synthetic entities for external systems.
//!
//! HTTP endpoints, message topics, and library methods have no declaration in
//! the scanned source, so the integration linker fabricates entities for them
//! on first encounter. The factory registry is the only shared mutable state
//! of a run; insert-if-absent goes through one mutex so concurrent linkers
//! referencing the same endpoint cannot mint duplicates, and "newly created"
//! is reported exactly once per key.

use crate::index::EntitySnapshotIndex;
use crate::model::entity::{Entity, EntityKind};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use uuid::Uuid;

/// Placeholder when an integration point carries no url/topic.
const UNKNOWN: &str = "unknown";

/// Marker stored in `Entity.meta` so synthetic nodes are recognizable.
const SOURCE_TAG: &str = "library_analysis";

#[derive(Default)]
pub struct VirtualNodeFactory {
    registry: Mutex<HashMap<String, Arc<Entity>>>,
    minted: Mutex<Vec<Arc<Entity>>>,
}

impl VirtualNodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key for an endpoint node: `endpoint://<METHOD> <url>`, the verb
    /// omitted when unknown.
    pub fn endpoint_fqn(url: Option<&str>, http_method: Option<&str>) -> String {
        let url = non_blank(url).unwrap_or(UNKNOWN);
        match non_blank(http_method) {
            Some(m) => format!("endpoint://{m} {url}"),
            None => format!("endpoint://{url}"),
        }
    }

    /// Key for a topic node: `topic://<topic>`.
    pub fn topic_fqn(topic: Option<&str>) -> String {
        format!("topic://{}", non_blank(topic).unwrap_or(UNKNOWN))
    }

    /// Obtain the endpoint node for (url, method), minting it on first use.
    /// Returns the node and whether this call created it.
    pub fn get_or_create_endpoint(
        &self,
        url: Option<&str>,
        http_method: Option<&str>,
        index: &EntitySnapshotIndex,
    ) -> (Arc<Entity>, bool) {
        let url_str = non_blank(url).unwrap_or(UNKNOWN).to_string();
        let fqn = Self::endpoint_fqn(url, http_method);
        let verb = non_blank(http_method).map(str::to_string);
        self.get_or_create(fqn, index, move |fqn| {
            let name = url_str
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(&url_str)
                .to_string();
            let mut meta = BTreeMap::new();
            meta.insert("url".to_string(), url_str.clone());
            meta.insert(
                "http_method".to_string(),
                verb.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
            );
            meta.insert("source".to_string(), SOURCE_TAG.to_string());
            synthetic(fqn, name, EntityKind::Endpoint, meta)
        })
    }

    /// Obtain the topic node for a topic name, minting it on first use.
    pub fn get_or_create_topic(
        &self,
        topic: Option<&str>,
        index: &EntitySnapshotIndex,
    ) -> (Arc<Entity>, bool) {
        let topic_str = non_blank(topic).unwrap_or(UNKNOWN).to_string();
        let fqn = Self::topic_fqn(topic);
        self.get_or_create(fqn, index, move |fqn| {
            let mut meta = BTreeMap::new();
            meta.insert("topic".to_string(), topic_str.clone());
            meta.insert("source".to_string(), SOURCE_TAG.to_string());
            synthetic(fqn, topic_str.clone(), EntityKind::Topic, meta)
        })
    }

    /// Obtain the proxy node standing in for a library method. Proxies keep
    /// the library FQN as-is; only endpoint/topic nodes carry a scheme.
    pub fn get_or_create_library_proxy(
        &self,
        method_fqn: &str,
        index: &EntitySnapshotIndex,
    ) -> (Arc<Entity>, bool) {
        let fqn = method_fqn.to_string();
        self.get_or_create(fqn, index, |fqn| {
            let name = fqn.rsplit('.').next().unwrap_or(fqn).to_string();
            let mut meta = BTreeMap::new();
            meta.insert("source".to_string(), SOURCE_TAG.to_string());
            synthetic(fqn, name, EntityKind::Method, meta)
        })
    }

    /// Nodes minted so far, draining the report. The engine flushes these to
    /// the sink before edges so every edge endpoint exists.
    pub fn take_minted(&self) -> Vec<Arc<Entity>> {
        std::mem::take(&mut *lock(&self.minted))
    }

    fn get_or_create(
        &self,
        fqn: String,
        index: &EntitySnapshotIndex,
        build: impl FnOnce(&str) -> Entity,
    ) -> (Arc<Entity>, bool) {
        // A node persisted by an earlier run shows up in the snapshot; reuse it.
        if let Some(existing) = index.find_by_fqn(&fqn) {
            return (existing.clone(), false);
        }

        let mut registry = lock(&self.registry);
        if let Some(existing) = registry.get(&fqn) {
            return (existing.clone(), false);
        }
        let node = Arc::new(build(&fqn));
        registry.insert(fqn.clone(), node.clone());
        lock(&self.minted).push(node.clone());
        debug!(fqn = %fqn, kind = %node.kind, "minted virtual node");
        (node, true)
    }
}

fn synthetic(fqn: &str, name: String, kind: EntityKind, meta: BTreeMap<String, String>) -> Entity {
    Entity {
        // Deterministic id so re-running a snapshot mints identical nodes.
        id: Some(Uuid::new_v5(&Uuid::nil(), fqn.as_bytes()).to_string()),
        fqn: fqn.to_string(),
        name: Some(name),
        package: None,
        kind,
        owner_fqn: None,
        signature: None,
        meta,
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

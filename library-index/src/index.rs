//! In-memory library method index.
//!
//! The real system keeps library metadata in a database; for linking we only
//! need FQN lookup and integration-point extraction, so a static map loaded
//! from a JSONL dump is enough.

use crate::model::{IntegrationMeta, IntegrationPoint, IntegrationPointSource, LibraryMethod};
use anyhow::{Context, Result};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::Arc,
};
use tracing::info;

/// Lookup of library methods by fully-qualified name.
pub trait LibraryMethodIndex: Send + Sync {
    fn find_by_method_fqn(&self, fqn: &str) -> Option<Arc<LibraryMethod>>;
}

/// Static, fully materialized library index.
#[derive(Debug, Default)]
pub struct StaticLibraryIndex {
    by_fqn: HashMap<String, Arc<LibraryMethod>>,
}

impl StaticLibraryIndex {
    /// Build the index from an already loaded method list.
    pub fn from_methods(methods: Vec<LibraryMethod>) -> Self {
        let by_fqn = methods
            .into_iter()
            .map(|m| (m.fqn.clone(), Arc::new(m)))
            .collect();
        Self { by_fqn }
    }

    /// Load the index from a JSONL file, one [`LibraryMethod`] per line.
    /// Blank lines are skipped.
    pub fn from_jsonl(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let mut methods = Vec::new();
        for (lineno, line) in BufReader::new(f).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let m: LibraryMethod = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}", path.display(), lineno + 1))?;
            methods.push(m);
        }
        info!(methods = methods.len(), "library index loaded");
        Ok(Self::from_methods(methods))
    }

    pub fn len(&self) -> usize {
        self.by_fqn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fqn.is_empty()
    }
}

impl LibraryMethodIndex for StaticLibraryIndex {
    fn find_by_method_fqn(&self, fqn: &str) -> Option<Arc<LibraryMethod>> {
        self.by_fqn.get(fqn).cloned()
    }
}

impl IntegrationPointSource for StaticLibraryIndex {
    /// Flatten the stored [`IntegrationMeta`] into per-interaction points.
    ///
    /// A URL fans out over every observed HTTP verb (or a single verb-less
    /// point when none were recorded). Kafka topics and Camel URIs are matched
    /// against their call details by key; unmatched entries fall back to
    /// "UNKNOWN" / no route type.
    fn extract(&self, method: &LibraryMethod) -> Vec<IntegrationPoint> {
        extract_points(&method.integration)
    }
}

fn extract_points(meta: &IntegrationMeta) -> Vec<IntegrationPoint> {
    let mut points = Vec::new();

    for url in &meta.urls {
        let verbs: Vec<Option<&String>> = if meta.http_methods.is_empty() {
            vec![None]
        } else {
            meta.http_methods.iter().map(Some).collect()
        };
        for verb in verbs {
            points.push(IntegrationPoint::HttpEndpoint {
                url: Some(url.clone()),
                http_method: verb.cloned(),
                has_retry: meta.has_retry,
                has_timeout: meta.has_timeout,
                has_circuit_breaker: meta.has_circuit_breaker,
            });
        }
    }

    for topic in &meta.kafka_topics {
        let call = meta.kafka_calls.iter().find(|c| &c.topic == topic);
        points.push(IntegrationPoint::KafkaTopic {
            topic: Some(topic.clone()),
            operation: call
                .and_then(|c| c.operation.clone())
                .unwrap_or_else(|| "UNKNOWN".to_string()),
        });
    }

    for uri in &meta.camel_uris {
        let call = meta.camel_calls.iter().find(|c| &c.uri == uri);
        points.push(IntegrationPoint::CamelRoute {
            uri: Some(uri.clone()),
            endpoint_type: call.and_then(|c| c.endpoint_type.clone()),
        });
    }

    points
}

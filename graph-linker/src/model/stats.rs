//! Statistics for one linking run: counters plus per-phase timings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a single engine run.
///
/// Serialized into `summary.json` by the persistence layer; keep field names
/// stable and lowercase with underscores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRunStats {
    /// Entities in the snapshot after limits were applied.
    pub total_entities: usize,
    /// Edge proposals before triple dedup.
    pub proposed_edges: usize,
    /// Distinct (source, target, kind) triples flushed to the sink.
    pub unique_edges: usize,
    /// Virtual endpoint/topic/proxy nodes minted this run.
    pub new_virtual_nodes: usize,
    /// CALLS_CODE edges pointing at library method proxies.
    pub library_proxy_edges: usize,
    /// Per-entity linker failures that were caught and skipped.
    pub linker_failures: usize,

    pub index_build_ms: u64,
    pub linking_ms: u64,
    pub persistence_ms: u64,
    pub total_ms: u64,

    /// ISO 8601 UTC timestamps.
    pub started_at: String,
    pub finished_at: String,
}

impl LinkRunStats {
    pub fn timestamp(t: DateTime<Utc>) -> String {
        t.to_rfc3339()
    }

    /// Multi-line, human-readable form for the run-completion log line.
    pub fn to_log_string(&self) -> String {
        format!(
            "Linking completed:\n\
             \x20 - Entities processed: {}\n\
             \x20 - Edges proposed: {}\n\
             \x20 - Edges flushed (unique): {}\n\
             \x20 - New virtual nodes: {}\n\
             \x20 - Library proxy edges: {}\n\
             \x20 - Linker failures: {}\n\
             \x20 - Index build: {}ms\n\
             \x20 - Linking: {}ms\n\
             \x20 - Persistence: {}ms\n\
             \x20 - Total: {}ms",
            self.total_entities,
            self.proposed_edges,
            self.unique_edges,
            self.new_virtual_nodes,
            self.library_proxy_edges,
            self.linker_failures,
            self.index_build_ms,
            self.linking_ms,
            self.persistence_ms,
            self.total_ms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_string_carries_counters() {
        let stats = LinkRunStats {
            total_entities: 3,
            proposed_edges: 10,
            unique_edges: 8,
            new_virtual_nodes: 1,
            library_proxy_edges: 2,
            linker_failures: 0,
            index_build_ms: 1,
            linking_ms: 2,
            persistence_ms: 3,
            total_ms: 6,
            started_at: "2026-01-01T00:00:00+00:00".into(),
            finished_at: "2026-01-01T00:00:01+00:00".into(),
        };
        let s = stats.to_log_string();
        assert!(s.contains("Edges flushed (unique): 8"));
        assert!(s.contains("Linker failures: 0"));
    }
}

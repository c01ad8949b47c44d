//! JSONL writers for linking artifacts.
//!
//! Each writer outputs **one compact JSON object per line**, making the
//! format grep-friendly and easy to stream. The format is stable across
//! runs; avoid breaking changes unless versioned explicitly.

use crate::store::InMemoryGraphStore;
use anyhow::{Context, Result};
use graph_linker::LinkRunStats;
use serde_json::json;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::info;

/// Paths of everything one persist pass produced.
#[derive(Debug, Clone)]
pub struct PersistSummary {
    pub out_dir: PathBuf,
    pub nodes_path: PathBuf,
    pub edges_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Write graph nodes as JSONL (`graph_nodes.jsonl`).
pub fn write_nodes_jsonl(path: &Path, store: &InMemoryGraphStore) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);

    for e in store.entities() {
        let rec = json!({
            "fqn": e.fqn,
            "name": e.simple_name(),
            "kind": e.kind.as_str(),
            "package": e.package,
            "owner": e.owner_fqn,
            "meta": e.meta,
        });
        serde_json::to_writer(&mut w, &rec)?;
        w.write_all(b"\n")?;
    }

    w.flush()?;
    info!("jsonl: wrote graph nodes -> {}", path.display());
    Ok(())
}

/// Write graph edges as JSONL (`graph_edges.jsonl`).
pub fn write_edges_jsonl(path: &Path, store: &InMemoryGraphStore) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);

    for e in store.edges() {
        let rec = json!({
            "src": e.source_fqn,
            "dst": e.target_fqn,
            "label": e.kind.as_str(),
        });
        serde_json::to_writer(&mut w, &rec)?;
        w.write_all(b"\n")?;
    }

    w.flush()?;
    info!("jsonl: wrote graph edges -> {}", path.display());
    Ok(())
}

/// Write the run summary (`summary.json`, pretty-printed).
pub fn write_summary_json(path: &Path, stats: &LinkRunStats) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(f), stats)?;
    info!("json: wrote run summary -> {}", path.display());
    Ok(())
}

/// Persist every artifact into `out_dir`, creating it as needed.
pub fn persist_all(
    out_dir: &Path,
    store: &InMemoryGraphStore,
    stats: &LinkRunStats,
) -> Result<PersistSummary> {
    fs::create_dir_all(out_dir).with_context(|| format!("create dir {}", out_dir.display()))?;

    let nodes_path = out_dir.join("graph_nodes.jsonl");
    let edges_path = out_dir.join("graph_edges.jsonl");
    let summary_path = out_dir.join("summary.json");

    write_nodes_jsonl(&nodes_path, store)?;
    write_edges_jsonl(&edges_path, store)?;
    write_summary_json(&summary_path, stats)?;

    Ok(PersistSummary {
        out_dir: out_dir.to_path_buf(),
        nodes_path,
        edges_path,
        summary_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_linker::{EdgeKind, EdgeProposal, Entity, EntityKind};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn sample_store() -> InMemoryGraphStore {
        let store = InMemoryGraphStore::new();
        let a = Arc::new(Entity {
            id: None,
            fqn: "com.ex.A".into(),
            name: Some("A".into()),
            package: Some("com.ex".into()),
            kind: EntityKind::Class,
            owner_fqn: None,
            signature: None,
            meta: BTreeMap::new(),
        });
        let b = Arc::new(Entity {
            fqn: "com.ex.B".into(),
            name: Some("B".into()),
            ..(*a).clone()
        });
        store.put_entity(&a).unwrap();
        store.put_entity(&b).unwrap();
        store
            .put_edges(&[EdgeProposal::new(a, b, EdgeKind::DependsOn)])
            .unwrap();
        store
    }

    #[test]
    fn edges_jsonl_has_one_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph_edges.jsonl");
        write_edges_jsonl(&path, &sample_store()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let v: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(v["label"], "depends_on");
    }

    #[test]
    fn persist_all_creates_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run");
        let stats = serde_json::from_value::<graph_linker::LinkRunStats>(serde_json::json!({
            "total_entities": 2, "proposed_edges": 1, "unique_edges": 1,
            "new_virtual_nodes": 0, "library_proxy_edges": 0, "linker_failures": 0,
            "index_build_ms": 0, "linking_ms": 0, "persistence_ms": 0, "total_ms": 0,
            "started_at": "2026-01-01T00:00:00+00:00",
            "finished_at": "2026-01-01T00:00:00+00:00"
        }))
        .unwrap();

        let summary = persist_all(&out, &sample_store(), &stats).unwrap();
        assert!(summary.nodes_path.exists());
        assert!(summary.edges_path.exists());
        assert!(summary.summary_path.exists());
    }
}

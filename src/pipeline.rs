//! High-level orchestration: load a snapshot, link it, export artifacts.
//!
//! The extraction front end writes an entity+facts snapshot as JSONL; this
//! pipeline loads it in full, runs the linking engine against the configured
//! library index, and exports nodes/edges/summary into a timestamped folder.

use anyhow::{Context, Result};
use chrono::Utc;
use graph_linker::{EntityRecord, GraphLinkingEngine, LinkerConfig};
use graph_linker::cache::TtlCache;
use graph_store::export::{self, PersistSummary};
use graph_store::InMemoryGraphStore;
use library_index::StaticLibraryIndex;
use std::{
    env,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tracing::info;

/// Entry point for the binary: paths come from the environment.
///
/// - `SNAPSHOT_PATH` — entity snapshot JSONL (required);
/// - `LIBRARY_PATH`  — library method JSONL (optional);
/// - `OUT_DIR`       — artifact root (default `graphs_data`).
pub fn run_from_env() -> Result<PersistSummary> {
    let snapshot_path =
        env::var("SNAPSHOT_PATH").context("SNAPSHOT_PATH is not set; nothing to link")?;
    let library_path = env::var("LIBRARY_PATH").ok();
    let out_root = env::var("OUT_DIR").unwrap_or_else(|_| "graphs_data".to_string());

    run_linking(
        Path::new(&snapshot_path),
        library_path.as_deref().map(Path::new),
        Path::new(&out_root),
    )
}

/// Full pipeline over explicit paths.
#[tracing::instrument(level = "info", skip_all, fields(snapshot = %snapshot_path.display()))]
pub fn run_linking(
    snapshot_path: &Path,
    library_path: Option<&Path>,
    out_root: &Path,
) -> Result<PersistSummary> {
    let config = LinkerConfig::default();
    config.validate()?;

    let records = load_snapshot(snapshot_path)?;
    info!(entities = records.len(), "Snapshot loaded");

    let library = Arc::new(match library_path {
        Some(p) => StaticLibraryIndex::from_jsonl(p)?,
        None => StaticLibraryIndex::default(),
    });

    let store = InMemoryGraphStore::new();
    let engine = GraphLinkingEngine::new(config, library.clone(), library);
    let stats = engine.run(records, &store)?;

    // Summary counts are asked for repeatedly by callers polling progress;
    // cache them for a short window instead of re-counting the store.
    let mut counts: TtlCache<&str, usize> = TtlCache::new(Duration::from_secs(30));
    let nodes = counts.get_or_insert_with("entities", || store.entity_count());
    let edges = counts.get_or_insert_with("edges", || store.edge_count());
    info!(nodes, edges, "Graph ready");

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let out_dir: PathBuf = out_root.join(timestamp);
    export::persist_all(&out_dir, &store, &stats)
}

/// Read the snapshot JSONL, one [`EntityRecord`] per line. Blank lines are
/// skipped; a malformed line is an input error, not a linking failure.
fn load_snapshot(path: &Path) -> Result<Vec<EntityRecord>> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut records = Vec::new();
    for (lineno, line) in BufReader::new(f).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let rec: EntityRecord = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", path.display(), lineno + 1))?;
        records.push(rec);
    }
    Ok(records)
}

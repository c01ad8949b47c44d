//! Linking orchestrator.
//!
//! One run: refine kinds, build the snapshot index once, link every entity
//! with every applicable linker, dedup the proposals on the
//! (source, target, kind) triple, and flush virtual nodes then edges to the
//! sink. Linkers are pure and the index is read-only, so entities fan out
//! across rayon workers; the virtual-node registry is the only shared
//! mutable state.
//!
//! A linker failing on one entity loses only that entity's edges for that
//! linker; the failure is logged, counted, and the run continues. Sink
//! errors propagate.

use crate::config::LinkerConfig;
use crate::index::EntitySnapshotIndex;
use crate::linker::annotation::AnnotationLinker;
use crate::linker::calls::CallLinker;
use crate::linker::inheritance::InheritanceLinker;
use crate::linker::integration::IntegrationLinker;
use crate::linker::signature::SignatureDependencyLinker;
use crate::linker::structural::StructuralLinker;
use crate::linker::throws::ThrowLinker;
use crate::linker::virtual_nodes::VirtualNodeFactory;
use crate::linker::EdgeLinker;
use crate::model::edge::{EdgeKind, EdgeProposal};
use crate::model::entity::{Entity, EntityKind};
use crate::model::facts::RawFacts;
use crate::model::stats::LinkRunStats;
use crate::refine::KindRefiner;
use crate::sink::GraphSink;
use crate::EntityRecord;
use anyhow::Result;
use chrono::Utc;
use library_index::{IntegrationPointSource, LibraryMethodIndex};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub struct GraphLinkingEngine {
    config: LinkerConfig,
    library: Arc<dyn LibraryMethodIndex>,
    points: Arc<dyn IntegrationPointSource>,
}

impl GraphLinkingEngine {
    pub fn new(
        config: LinkerConfig,
        library: Arc<dyn LibraryMethodIndex>,
        points: Arc<dyn IntegrationPointSource>,
    ) -> Self {
        Self {
            config,
            library,
            points,
        }
    }

    /// Link one full snapshot and flush the results to `sink`.
    #[tracing::instrument(level = "info", skip_all, fields(entities = records.len()))]
    pub fn run(&self, mut records: Vec<EntityRecord>, sink: &dyn GraphSink) -> Result<LinkRunStats> {
        let started_at = Utc::now();
        let run_start = Instant::now();

        let max = self.config.limits.max_entities;
        if max > 0 && records.len() > max {
            warn!(
                total = records.len(),
                max, "snapshot exceeds max_entities; tail dropped"
            );
            records.truncate(max);
        }

        if self.config.features.refine_kinds {
            let refiner = KindRefiner::with_default_rules();
            for rec in &mut records {
                rec.entity.kind = refiner.refine(&rec.entity, &rec.facts);
            }
        }

        let rows: Vec<(Arc<Entity>, RawFacts)> = records
            .into_iter()
            .map(|r| (Arc::new(r.entity), r.facts))
            .collect();

        let index_start = Instant::now();
        let entities: Vec<Arc<Entity>> = rows.iter().map(|(e, _)| e.clone()).collect();
        let index = EntitySnapshotIndex::build(&entities);
        let index_build_ms = elapsed_ms(index_start);
        info!(entities = index.len(), "snapshot index built");

        let factory = Arc::new(VirtualNodeFactory::new());
        let linkers = self.build_linkers(factory.clone());

        let linking_start = Instant::now();
        let usage_cap = self.config.limits.max_usages_per_entity;
        let link_one = |(entity, facts): &(Arc<Entity>, RawFacts)| {
            let facts = capped_facts(entity, facts, usage_cap);
            link_entity(&linkers, entity, &facts, &index)
        };

        let (proposals, linker_failures) = if self.config.features.parallel {
            rows.par_iter()
                .map(link_one)
                .reduce(|| (Vec::new(), 0), merge_outcomes)
        } else {
            rows.iter()
                .map(link_one)
                .fold((Vec::new(), 0), |acc, out| merge_outcomes(acc, out))
        };
        let linking_ms = elapsed_ms(linking_start);

        let proposed_edges = proposals.len();
        let unique = dedup_triples(proposals);
        let library_proxy_edges = unique
            .iter()
            .filter(|e| e.kind == EdgeKind::CallsCode && is_library_proxy(&e.target))
            .count();

        let persistence_start = Instant::now();
        let minted = factory.take_minted();
        for node in &minted {
            sink.upsert_entity(node)?;
        }
        let written = sink.upsert_edges(&unique)?;
        let persistence_ms = elapsed_ms(persistence_start);
        info!(written, minted = minted.len(), "flushed to sink");

        let stats = LinkRunStats {
            total_entities: rows.len(),
            proposed_edges,
            unique_edges: unique.len(),
            new_virtual_nodes: minted.len(),
            library_proxy_edges,
            linker_failures,
            index_build_ms,
            linking_ms,
            persistence_ms,
            total_ms: elapsed_ms(run_start),
            started_at: LinkRunStats::timestamp(started_at),
            finished_at: LinkRunStats::timestamp(Utc::now()),
        };
        info!("{}", stats.to_log_string());
        Ok(stats)
    }

    fn build_linkers(&self, factory: Arc<VirtualNodeFactory>) -> Vec<Box<dyn EdgeLinker>> {
        let mut linkers: Vec<Box<dyn EdgeLinker>> = vec![
            Box::new(StructuralLinker),
            Box::new(InheritanceLinker),
            Box::new(AnnotationLinker),
            Box::new(SignatureDependencyLinker),
        ];
        if self.config.features.link_calls {
            linkers.push(Box::new(CallLinker));
        }
        if self.config.features.link_integrations {
            linkers.push(Box::new(IntegrationLinker::new(
                self.library.clone(),
                self.points.clone(),
                factory,
            )));
        }
        linkers.push(Box::new(ThrowLinker));
        linkers
    }
}

/// Run every applicable linker over one entity, isolating failures.
fn link_entity(
    linkers: &[Box<dyn EdgeLinker>],
    entity: &Arc<Entity>,
    facts: &RawFacts,
    index: &EntitySnapshotIndex,
) -> (Vec<EdgeProposal>, usize) {
    let mut edges = Vec::new();
    let mut failures = 0;
    for linker in linkers {
        if !linker.applies_to(entity) {
            continue;
        }
        match linker.link(entity, facts, index) {
            Ok(mut proposed) => edges.append(&mut proposed),
            Err(err) => {
                failures += 1;
                warn!(
                    entity = %entity.fqn,
                    linker = linker.name(),
                    error = %err,
                    "linker failed; entity skipped for this linker"
                );
            }
        }
    }
    (edges, failures)
}

fn merge_outcomes(
    (mut edges, failures): (Vec<EdgeProposal>, usize),
    (mut more, more_failures): (Vec<EdgeProposal>, usize),
) -> (Vec<EdgeProposal>, usize) {
    edges.append(&mut more);
    (edges, failures + more_failures)
}

/// First occurrence per (source, target, kind) triple, order preserved.
fn dedup_triples(proposals: Vec<EdgeProposal>) -> Vec<EdgeProposal> {
    let mut seen: HashSet<(String, String, EdgeKind)> = HashSet::with_capacity(proposals.len());
    proposals
        .into_iter()
        .filter(|p| {
            seen.insert((
                p.source.fqn.clone(),
                p.target.fqn.clone(),
                p.kind,
            ))
        })
        .collect()
}

fn is_library_proxy(e: &Entity) -> bool {
    e.kind == EntityKind::Method && e.meta.get("source").map(String::as_str) == Some("library_analysis")
}

/// Clamp the usage list; everything else passes through untouched.
fn capped_facts(entity: &Entity, facts: &RawFacts, cap: usize) -> RawFacts {
    if cap == 0 || facts.usages.len() <= cap {
        return facts.clone();
    }
    warn!(
        entity = %entity.fqn,
        usages = facts.usages.len(),
        cap,
        "usage list exceeds cap; tail dropped"
    );
    let mut f = facts.clone();
    f.usages.truncate(cap);
    f
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

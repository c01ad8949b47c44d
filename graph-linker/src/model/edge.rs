//! Edge model: typed, directed relationships between entities.
//!
//! The same (source, target) pair may carry several edge kinds; the
//! (source, target, kind) triple is the idempotence/dedup key everywhere.

use crate::model::entity::Entity;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Semantics of a graph edge.
///
/// Avoid renaming existing variants, as they are part of exported artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Contains,
    Inherits,
    Implements,
    AnnotatedWith,
    DependsOn,
    CallsCode,
    Throws,
    CallsHttp,
    Produces,
    Consumes,
    RetriesTo,
    TimeoutsTo,
    CircuitBreakerTo,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        use EdgeKind::*;
        match self {
            Contains => "contains",
            Inherits => "inherits",
            Implements => "implements",
            AnnotatedWith => "annotated_with",
            DependsOn => "depends_on",
            CallsCode => "calls_code",
            Throws => "throws",
            CallsHttp => "calls_http",
            Produces => "produces",
            Consumes => "consumes",
            RetriesTo => "retries_to",
            TimeoutsTo => "timeouts_to",
            CircuitBreakerTo => "circuit_breaker_to",
        }
    }
}

impl Display for EdgeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One proposed edge, produced by a linker and not yet persisted.
#[derive(Debug, Clone)]
pub struct EdgeProposal {
    pub source: Arc<Entity>,
    pub target: Arc<Entity>,
    pub kind: EdgeKind,
}

impl EdgeProposal {
    pub fn new(source: Arc<Entity>, target: Arc<Entity>, kind: EdgeKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }

    /// Dedup key: FQNs are the entity identity within a snapshot.
    pub fn triple_key(&self) -> (&str, &str, EdgeKind) {
        (&self.source.fqn, &self.target.fqn, self.kind)
    }
}

//! Entity model: one node of the code graph.
//!
//! Entities are produced by the extraction front end and are read-only inside
//! the linking engine. The `kind` set is closed; serialize as snake_case
//! strings so exported artifacts stay stable and grep-friendly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Kind of a code-graph entity.
///
/// Avoid renaming existing variants, as they are part of exported artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Package,
    Module,
    Repo,
    Class,
    Interface,
    Enum,
    Record,
    Service,
    Mapper,
    Config,
    Endpoint,
    Client,
    Job,
    Topic,
    Method,
    Field,
    Exception,
    Schema,
    DbQuery,
    Migration,
    Test,
}

impl EntityKind {
    /// Type-like kinds: contained in a package, may declare supertypes.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            EntityKind::Class
                | EntityKind::Interface
                | EntityKind::Enum
                | EntityKind::Record
                | EntityKind::Service
                | EntityKind::Mapper
                | EntityKind::Config
        )
    }

    /// Member kinds: contained in an owning type.
    pub fn is_member(self) -> bool {
        matches!(
            self,
            EntityKind::Method
                | EntityKind::Field
                | EntityKind::Endpoint
                | EntityKind::Job
                | EntityKind::Topic
        )
    }

    /// Callable kinds: carry signatures, usages, and thrown types.
    pub fn is_callable(self) -> bool {
        matches!(
            self,
            EntityKind::Method | EntityKind::Endpoint | EntityKind::Job | EntityKind::Topic
        )
    }

    pub fn as_str(self) -> &'static str {
        use EntityKind::*;
        match self {
            Package => "package",
            Module => "module",
            Repo => "repo",
            Class => "class",
            Interface => "interface",
            Enum => "enum",
            Record => "record",
            Service => "service",
            Mapper => "mapper",
            Config => "config",
            Endpoint => "endpoint",
            Client => "client",
            Job => "job",
            Topic => "topic",
            Method => "method",
            Field => "field",
            Exception => "exception",
            Schema => "schema",
            DbQuery => "db_query",
            Migration => "migration",
            Test => "test",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the code graph.
///
/// The FQN is the unique textual identity within one codebase snapshot;
/// virtual nodes use the synthetic `endpoint://` / `topic://` schemes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Opaque persistence id; absent for not-yet-persisted entities.
    #[serde(default)]
    pub id: Option<String>,

    /// Fully-qualified name, e.g. `com.example.orders.OrderService.place`.
    pub fqn: String,

    /// Simple name as it appears in source.
    #[serde(default)]
    pub name: Option<String>,

    /// Package/namespace path, e.g. `com.example.orders`.
    #[serde(default)]
    pub package: Option<String>,

    pub kind: EntityKind,

    /// FQN of the owning entity (declaring type for members).
    #[serde(default)]
    pub owner_fqn: Option<String>,

    /// Raw signature for callables, as captured from source.
    #[serde(default)]
    pub signature: Option<String>,

    /// Free-form metadata (virtual nodes record url/http_method/topic here).
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl Entity {
    /// Simple name: the explicit `name` if present, else the last FQN segment.
    pub fn simple_name(&self) -> &str {
        match &self.name {
            Some(n) if !n.is_empty() => n,
            _ => self.fqn.rsplit('.').next().unwrap_or(&self.fqn),
        }
    }
}

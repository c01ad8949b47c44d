//! Raw per-entity facts produced by the extraction front end.
//!
//! Everything here is unresolved text: simple names, dotted receiver.member
//! tokens, import paths. The linkers turn these into typed edges. Absent
//! lists deserialize as empty; there is no "missing facts" error path.

use crate::model::entity::Entity;
use serde::{Deserialize, Serialize};

/// A raw, unresolved mention of a callable or type found in a callable body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum UsageReference {
    /// Plain expression: `doLocalWork()` or `MyClass()`.
    Bare {
        name: String,
        #[serde(default = "default_true")]
        is_call: bool,
    },
    /// Dotted expression: `receiver.member` or `receiver.member()`.
    /// The receiver is the raw text left of the dot (a local, a type
    /// simple name, or a partially qualified path).
    Qualified {
        receiver: String,
        member: String,
        #[serde(default = "default_true")]
        is_call: bool,
    },
}

fn default_true() -> bool {
    true
}

/// Syntactic facts for one entity, as captured at extraction time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFacts {
    /// Import paths of the declaring file, in source order.
    #[serde(default)]
    pub imports: Vec<String>,

    /// FQN of the owning entity, for members.
    #[serde(default)]
    pub owner_fqn: Option<String>,

    /// Supertype simple names, as written in the declaration.
    #[serde(default)]
    pub supertypes_simple: Vec<String>,

    /// Supertype FQNs the extractor already resolved (takes precedence).
    #[serde(default)]
    pub supertypes_resolved: Vec<String>,

    /// Annotation names (simple or fully qualified).
    #[serde(default)]
    pub annotations: Vec<String>,

    /// Parameter type names from the structured signature.
    #[serde(default)]
    pub param_types: Vec<String>,

    /// Return type name from the structured signature.
    #[serde(default)]
    pub return_type: Option<String>,

    /// Raw call/field usages collected from the body.
    #[serde(default)]
    pub usages: Vec<UsageReference>,

    /// Thrown exception type names.
    #[serde(default)]
    pub throws_types: Vec<String>,
}

/// One snapshot row: an entity together with its raw facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity: Entity,
    #[serde(default)]
    pub facts: RawFacts,
}

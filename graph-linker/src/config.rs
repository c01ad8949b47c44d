//! Configuration for the linking engine.
//!
//! Groups:
//! - [`LinkerConfig`] — top-level container
//! - [`Limits`]       — snapshot size caps
//! - [`FeatureFlags`] — toggle optional linking passes
//!
//! All structs are `serde`-friendly so they can be loaded from JSON/YAML.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Top-level configuration for one engine instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkerConfig {
    pub limits: Limits,
    pub features: FeatureFlags,
}

impl LinkerConfig {
    /// Validate config sanity (no degenerate or absurd values).
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_usages_per_entity == 0 {
            return Err(anyhow!("`max_usages_per_entity` must be greater than 0"));
        }
        Ok(())
    }
}

/// Snapshot size caps. Zero means unlimited where noted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum entities to link per run (0 = unlimited).
    pub max_entities: usize,
    /// Usage references considered per callable; the tail beyond this is
    /// dropped with a warning.
    pub max_usages_per_entity: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_entities: 0,
            max_usages_per_entity: 10_000,
        }
    }
}

/// Optional linking passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Refine entity kinds from annotations/naming before indexing.
    pub refine_kinds: bool,
    /// Derive CALLS_CODE edges from raw usages.
    pub link_calls: bool,
    /// Derive integration edges via the library index.
    pub link_integrations: bool,
    /// Fan linking out across entities with rayon.
    pub parallel: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            refine_kinds: true,
            link_calls: true,
            link_integrations: true,
            parallel: true,
        }
    }
}

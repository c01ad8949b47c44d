//! Best-effort type reference resolution.
//!
//! Maps a textual reference (simple name, decorated generic, partially or
//! fully qualified name) to at most one entity, using a fixed priority chain:
//!
//! 1. exact FQN match;
//! 2. an import ending in `.<simple>`;
//! 3. `<current package>.<simple>` (same-package assumption);
//! 4. the first entity sharing the simple name.
//!
//! Step 4 picks the first of possibly many same-named candidates, in
//! snapshot order, which keeps re-linking deterministic. Do not reorder the
//! chain; every linker relies on this exact fallback priority.

use crate::index::EntitySnapshotIndex;
use crate::model::entity::Entity;
use std::sync::Arc;

impl EntitySnapshotIndex {
    /// Resolve `reference` to an entity, or `None` (silently) when no
    /// strategy matches.
    pub fn resolve_type(
        &self,
        reference: &str,
        imports: &[String],
        current_package: &str,
    ) -> Option<Arc<Entity>> {
        if let Some(e) = self.find_by_fqn(reference) {
            return Some(e.clone());
        }

        let simple = bare_simple_name(reference);

        if let Some(import) = imports.iter().find(|i| ends_with_segment(i, simple)) {
            if let Some(e) = self.find_by_fqn(import) {
                return Some(e.clone());
            }
        }

        if let Some(e) = self.find_by_fqn(&format!("{current_package}.{simple}")) {
            return Some(e.clone());
        }

        self.find_all_by_simple_name(simple).first().cloned()
    }
}

/// Bare simple name of a reference: last `.` segment, with a trailing `?`
/// and any generic argument list stripped.
pub fn bare_simple_name(reference: &str) -> &str {
    let s = reference.rsplit('.').next().unwrap_or(reference);
    let s = s.strip_suffix('?').unwrap_or(s);
    s.split('<').next().unwrap_or(s)
}

fn ends_with_segment(import: &str, simple: &str) -> bool {
    import
        .strip_suffix(simple)
        .is_some_and(|rest| rest.ends_with('.'))
}

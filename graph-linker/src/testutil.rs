//! Shared builders for linker tests.

use crate::model::entity::{Entity, EntityKind};
use crate::model::facts::RawFacts;
use std::collections::BTreeMap;
use std::sync::Arc;

pub(crate) fn entity(fqn: &str, name: &str, kind: EntityKind) -> Arc<Entity> {
    Arc::new(Entity {
        id: None,
        fqn: fqn.into(),
        name: if name.is_empty() {
            None
        } else {
            Some(name.into())
        },
        package: package_of(fqn),
        kind,
        owner_fqn: None,
        signature: None,
        meta: BTreeMap::new(),
    })
}

pub(crate) fn member(fqn: &str, name: &str, owner: &str, kind: EntityKind) -> Arc<Entity> {
    let mut e = (*entity(fqn, name, kind)).clone();
    e.owner_fqn = Some(owner.into());
    Arc::new(e)
}

pub(crate) fn facts() -> RawFacts {
    RawFacts::default()
}

fn package_of(fqn: &str) -> Option<String> {
    fqn.rsplit_once('.').map(|(pkg, _)| pkg.to_string())
}

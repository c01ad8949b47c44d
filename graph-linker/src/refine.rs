//! Entity kind refinement.
//!
//! Extractors classify declarations coarsely (class, method); annotations,
//! naming, and package conventions often say more: a `@Service`-annotated
//! class is a SERVICE, a `*Exception` subtype is an EXCEPTION. Refinement is
//! a registry of independent rules evaluated in a fixed order; the first rule
//! returning a kind wins, otherwise the base kind stands. This is a
//! strategy list, not a hierarchy: rules know nothing about each other.

use crate::model::entity::{Entity, EntityKind};
use crate::model::facts::RawFacts;
use std::collections::HashSet;

/// One classification rule.
pub trait KindRule: Send + Sync {
    /// Stable rule id, used in logs and tests.
    fn id(&self) -> &'static str;

    /// A refined kind for this entity, or `None` when the rule has no say.
    fn refine(&self, entity: &Entity, facts: &RawFacts) -> Option<EntityKind>;
}

/// Fixed-order rule registry.
pub struct KindRefiner {
    rules: Vec<Box<dyn KindRule>>,
}

impl KindRefiner {
    /// The standard rule set. Order matters: earlier rules shadow later
    /// ones for entities matching several conventions.
    pub fn with_default_rules() -> Self {
        Self {
            rules: vec![
                Box::new(EndpointClassRule),
                Box::new(ServiceLayerRule),
                Box::new(ClientRule),
                Box::new(ConfigRule),
                Box::new(MapperRule),
                Box::new(ExceptionTypeRule),
                Box::new(SchemaModelRule),
                Box::new(MigrationRule),
                Box::new(TestClassRule),
                Box::new(JobWorkerRule),
                Box::new(TopicListenerRule),
            ],
        }
    }

    pub fn refine(&self, entity: &Entity, facts: &RawFacts) -> EntityKind {
        self.rules
            .iter()
            .find_map(|r| r.refine(entity, facts))
            .unwrap_or(entity.kind)
    }
}

impl Default for KindRefiner {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

// --- matching helpers ---

fn anns(facts: &RawFacts) -> HashSet<String> {
    facts
        .annotations
        .iter()
        .map(|a| a.rsplit('.').next().unwrap_or(a).to_lowercase())
        .collect()
}

fn has_any_ann(a: &HashSet<String>, keys: &[&str]) -> bool {
    keys.iter().any(|k| a.contains(&k.to_lowercase()))
}

fn supers(facts: &RawFacts) -> HashSet<String> {
    facts
        .supertypes_resolved
        .iter()
        .chain(facts.supertypes_simple.iter())
        .map(|s| {
            let s = s.rsplit('.').next().unwrap_or(s);
            s.split('<').next().unwrap_or(s).to_lowercase()
        })
        .collect()
}

fn name_ends(entity: &Entity, suffixes: &[&str]) -> bool {
    let n = entity.simple_name().to_lowercase();
    suffixes.iter().any(|s| n.ends_with(&s.to_lowercase()))
}

fn pkg_contains(entity: &Entity, part: &str) -> bool {
    entity
        .package
        .as_deref()
        .unwrap_or("")
        .to_lowercase()
        .contains(part)
}

// --- rules ---

/// `@RestController`/`@Controller` classes expose HTTP endpoints.
struct EndpointClassRule;

impl KindRule for EndpointClassRule {
    fn id(&self) -> &'static str {
        "endpoint-class"
    }

    fn refine(&self, entity: &Entity, facts: &RawFacts) -> Option<EntityKind> {
        if !entity.kind.is_type() {
            return None;
        }
        has_any_ann(&anns(facts), &["RestController", "Controller"])
            .then_some(EntityKind::Endpoint)
    }
}

struct ServiceLayerRule;

impl KindRule for ServiceLayerRule {
    fn id(&self) -> &'static str {
        "service-layer"
    }

    fn refine(&self, entity: &Entity, facts: &RawFacts) -> Option<EntityKind> {
        if !entity.kind.is_type() {
            return None;
        }
        let a = anns(facts);
        if has_any_ann(&a, &["Service"]) {
            return Some(EntityKind::Service);
        }
        // Services sometimes ship as plain @Component inside a service package.
        if has_any_ann(&a, &["Component"]) && pkg_contains(entity, ".service") {
            return Some(EntityKind::Service);
        }
        if pkg_contains(entity, ".service") && name_ends(entity, &["Service"]) {
            return Some(EntityKind::Service);
        }
        None
    }
}

struct ClientRule;

impl KindRule for ClientRule {
    fn id(&self) -> &'static str {
        "http-client"
    }

    fn refine(&self, entity: &Entity, facts: &RawFacts) -> Option<EntityKind> {
        if !entity.kind.is_type() {
            return None;
        }
        if has_any_ann(&anns(facts), &["FeignClient", "HttpExchange"]) {
            return Some(EntityKind::Client);
        }
        (pkg_contains(entity, ".client") && name_ends(entity, &["Client"]))
            .then_some(EntityKind::Client)
    }
}

struct ConfigRule;

impl KindRule for ConfigRule {
    fn id(&self) -> &'static str {
        "configuration"
    }

    fn refine(&self, entity: &Entity, facts: &RawFacts) -> Option<EntityKind> {
        if !entity.kind.is_type() {
            return None;
        }
        if has_any_ann(&anns(facts), &["Configuration", "ConfigurationProperties"]) {
            return Some(EntityKind::Config);
        }
        (pkg_contains(entity, ".config") && name_ends(entity, &["Config", "Properties"]))
            .then_some(EntityKind::Config)
    }
}

struct MapperRule;

impl KindRule for MapperRule {
    fn id(&self) -> &'static str {
        "mapper"
    }

    fn refine(&self, entity: &Entity, facts: &RawFacts) -> Option<EntityKind> {
        if !entity.kind.is_type() {
            return None;
        }
        if has_any_ann(&anns(facts), &["Mapper"]) {
            return Some(EntityKind::Mapper);
        }
        (pkg_contains(entity, ".mapper") && name_ends(entity, &["Mapper"]))
            .then_some(EntityKind::Mapper)
    }
}

/// `*Exception`/`*Error` names or a `Throwable`-family supertype.
struct ExceptionTypeRule;

impl KindRule for ExceptionTypeRule {
    fn id(&self) -> &'static str {
        "exception-type"
    }

    fn refine(&self, entity: &Entity, facts: &RawFacts) -> Option<EntityKind> {
        if !entity.kind.is_type() {
            return None;
        }
        if name_ends(entity, &["Exception", "Error"]) {
            return Some(EntityKind::Exception);
        }
        let s = supers(facts);
        s.iter()
            .any(|sup| sup.ends_with("exception") || sup == "throwable")
            .then_some(EntityKind::Exception)
    }
}

struct SchemaModelRule;

impl KindRule for SchemaModelRule {
    fn id(&self) -> &'static str {
        "schema-model"
    }

    fn refine(&self, entity: &Entity, facts: &RawFacts) -> Option<EntityKind> {
        if !entity.kind.is_type() {
            return None;
        }
        has_any_ann(&anns(facts), &["Entity", "Table", "Document"]).then_some(EntityKind::Schema)
    }
}

struct MigrationRule;

impl KindRule for MigrationRule {
    fn id(&self) -> &'static str {
        "migration"
    }

    fn refine(&self, entity: &Entity, _facts: &RawFacts) -> Option<EntityKind> {
        if !entity.kind.is_type() {
            return None;
        }
        let n = entity.simple_name();
        // Flyway-style V<version>__<description> classes.
        let flyway = n.starts_with('V')
            && n.contains("__")
            && n[1..].chars().next().is_some_and(|c| c.is_ascii_digit());
        (flyway || pkg_contains(entity, ".migration")).then_some(EntityKind::Migration)
    }
}

struct TestClassRule;

impl KindRule for TestClassRule {
    fn id(&self) -> &'static str {
        "test-class"
    }

    fn refine(&self, entity: &Entity, _facts: &RawFacts) -> Option<EntityKind> {
        if !entity.kind.is_type() {
            return None;
        }
        name_ends(entity, &["Test", "Tests", "IT"]).then_some(EntityKind::Test)
    }
}

/// `@Scheduled` callables and `*Job`/`*Worker` components run on a schedule.
struct JobWorkerRule;

impl KindRule for JobWorkerRule {
    fn id(&self) -> &'static str {
        "job-worker"
    }

    fn refine(&self, entity: &Entity, facts: &RawFacts) -> Option<EntityKind> {
        let a = anns(facts);
        if entity.kind == EntityKind::Method && has_any_ann(&a, &["Scheduled"]) {
            return Some(EntityKind::Job);
        }
        if entity.kind.is_type()
            && has_any_ann(&a, &["Component"])
            && name_ends(entity, &["Job", "Worker"])
        {
            return Some(EntityKind::Job);
        }
        None
    }
}

struct TopicListenerRule;

impl KindRule for TopicListenerRule {
    fn id(&self) -> &'static str {
        "topic-listener"
    }

    fn refine(&self, entity: &Entity, facts: &RawFacts) -> Option<EntityKind> {
        if entity.kind != EntityKind::Method {
            return None;
        }
        has_any_ann(&anns(facts), &["KafkaListener", "KafkaHandler", "RabbitListener"])
            .then_some(EntityKind::Topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{entity, facts};

    #[test]
    fn service_annotation_wins() {
        let e = entity("com.ex.OrderManager", "OrderManager", EntityKind::Class);
        let mut f = facts();
        f.annotations = vec!["org.springframework.stereotype.Service".into()];
        assert_eq!(KindRefiner::default().refine(&e, &f), EntityKind::Service);
    }

    #[test]
    fn rest_controller_shadows_service_by_rule_order() {
        let e = entity("com.ex.OrderApi", "OrderApi", EntityKind::Class);
        let mut f = facts();
        f.annotations = vec!["RestController".into(), "Service".into()];
        // EndpointClassRule sits in front of ServiceLayerRule.
        assert_eq!(KindRefiner::default().refine(&e, &f), EntityKind::Endpoint);
    }

    #[test]
    fn exception_by_supertype() {
        let e = entity("com.ex.OrderRejected", "OrderRejected", EntityKind::Class);
        let mut f = facts();
        f.supertypes_simple = vec!["RuntimeException".into()];
        assert_eq!(KindRefiner::default().refine(&e, &f), EntityKind::Exception);
    }

    #[test]
    fn scheduled_method_becomes_job() {
        let e = entity("com.ex.Sync.run", "run", EntityKind::Method);
        let mut f = facts();
        f.annotations = vec!["Scheduled".into()];
        assert_eq!(KindRefiner::default().refine(&e, &f), EntityKind::Job);
    }

    #[test]
    fn kafka_listener_method_becomes_topic() {
        let e = entity("com.ex.Consumer.onOrder", "onOrder", EntityKind::Method);
        let mut f = facts();
        f.annotations = vec!["KafkaListener".into()];
        assert_eq!(KindRefiner::default().refine(&e, &f), EntityKind::Topic);
    }

    #[test]
    fn flyway_migration_class() {
        let e = entity(
            "db.migration.V7__add_orders",
            "V7__add_orders",
            EntityKind::Class,
        );
        assert_eq!(
            KindRefiner::default().refine(&e, &facts()),
            EntityKind::Migration
        );
    }

    #[test]
    fn unmatched_entity_keeps_base_kind() {
        let e = entity("com.ex.Order", "Order", EntityKind::Class);
        assert_eq!(KindRefiner::default().refine(&e, &facts()), EntityKind::Class);
    }
}

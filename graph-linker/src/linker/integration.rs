//! Integration edges via the library index.
//!
//! A raw usage that resolves to a known library method means the application
//! talks to an external system through that library. The caller gets a
//! CALLS_CODE edge to a proxy node for the library method, and one typed edge
//! per integration point the method exposes (HTTP endpoint, Kafka topic,
//! Camel route), targeting a virtual node minted by [`VirtualNodeFactory`].

use crate::index::EntitySnapshotIndex;
use crate::linker::virtual_nodes::VirtualNodeFactory;
use crate::linker::{EdgeLinker, owner_fqn, package_of};
use crate::model::edge::{EdgeKind, EdgeProposal};
use crate::model::entity::Entity;
use crate::model::facts::{RawFacts, UsageReference};
use anyhow::Result;
use library_index::{IntegrationPoint, IntegrationPointSource, LibraryMethodIndex};
use std::sync::Arc;
use tracing::trace;

pub struct IntegrationLinker {
    library: Arc<dyn LibraryMethodIndex>,
    points: Arc<dyn IntegrationPointSource>,
    factory: Arc<VirtualNodeFactory>,
}

impl IntegrationLinker {
    pub fn new(
        library: Arc<dyn LibraryMethodIndex>,
        points: Arc<dyn IntegrationPointSource>,
        factory: Arc<VirtualNodeFactory>,
    ) -> Self {
        Self {
            library,
            points,
            factory,
        }
    }

    fn handle_point(
        &self,
        caller: &Arc<Entity>,
        point: &IntegrationPoint,
        index: &EntitySnapshotIndex,
        res: &mut Vec<EdgeProposal>,
    ) {
        match point {
            IntegrationPoint::HttpEndpoint {
                url,
                http_method,
                has_retry,
                has_timeout,
                has_circuit_breaker,
            } => {
                let (node, _) = self.factory.get_or_create_endpoint(
                    url.as_deref(),
                    http_method.as_deref(),
                    index,
                );
                res.push(EdgeProposal::new(
                    caller.clone(),
                    node.clone(),
                    EdgeKind::CallsHttp,
                ));
                if *has_retry {
                    res.push(EdgeProposal::new(
                        caller.clone(),
                        node.clone(),
                        EdgeKind::RetriesTo,
                    ));
                }
                if *has_timeout {
                    res.push(EdgeProposal::new(
                        caller.clone(),
                        node.clone(),
                        EdgeKind::TimeoutsTo,
                    ));
                }
                if *has_circuit_breaker {
                    res.push(EdgeProposal::new(
                        caller.clone(),
                        node,
                        EdgeKind::CircuitBreakerTo,
                    ));
                }
            }
            IntegrationPoint::KafkaTopic { topic, operation } => {
                let (node, _) = self.factory.get_or_create_topic(topic.as_deref(), index);
                match operation.as_str() {
                    "PRODUCE" => {
                        res.push(EdgeProposal::new(caller.clone(), node, EdgeKind::Produces))
                    }
                    "CONSUME" => {
                        res.push(EdgeProposal::new(caller.clone(), node, EdgeKind::Consumes))
                    }
                    other => {
                        trace!(operation = other, caller = %caller.fqn,
                               "unknown topic operation; node registered without edge");
                    }
                }
            }
            IntegrationPoint::CamelRoute { uri, endpoint_type } => {
                // The node is registered for every route; only http-ish
                // routes get a typed edge. Other route kinds are an
                // extension point.
                let (node, _) = self.factory.get_or_create_endpoint(uri.as_deref(), None, index);
                let is_http = endpoint_type
                    .as_deref()
                    .is_some_and(|t| t.eq_ignore_ascii_case("http"))
                    || uri.as_deref().is_some_and(|u| u.starts_with("http"));
                if is_http {
                    res.push(EdgeProposal::new(caller.clone(), node, EdgeKind::CallsHttp));
                }
            }
        }
    }
}

impl EdgeLinker for IntegrationLinker {
    fn name(&self) -> &'static str {
        "integration"
    }

    fn applies_to(&self, entity: &Entity) -> bool {
        entity.kind.is_callable()
    }

    fn link(
        &self,
        entity: &Arc<Entity>,
        facts: &RawFacts,
        index: &EntitySnapshotIndex,
    ) -> Result<Vec<EdgeProposal>> {
        if facts.usages.is_empty() {
            return Ok(Vec::new());
        }

        let mut res = Vec::new();
        for usage in &facts.usages {
            let Some(method_fqn) = resolve_library_fqn(usage, entity, facts, index) else {
                continue;
            };
            let Some(method) = self.library.find_by_method_fqn(&method_fqn) else {
                continue;
            };

            let (proxy, _) = self
                .factory
                .get_or_create_library_proxy(&method.fqn, index);
            res.push(EdgeProposal::new(
                entity.clone(),
                proxy,
                EdgeKind::CallsCode,
            ));

            for point in self.points.extract(&method) {
                self.handle_point(entity, &point, index, &mut res);
            }
        }
        Ok(res)
    }
}

/// Candidate library-method FQN for a usage, mirroring the owner / static
/// import / class import / dotted-literal strategies of local resolution but
/// producing a string for the library index instead of a snapshot hit.
fn resolve_library_fqn(
    usage: &UsageReference,
    entity: &Entity,
    facts: &RawFacts,
    index: &EntitySnapshotIndex,
) -> Option<String> {
    let owner = owner_fqn(entity, facts);
    match usage {
        UsageReference::Bare { name, .. } => {
            if let Some(owner) = owner {
                return Some(format!("{owner}.{name}"));
            }
            // Static import brings the member itself into scope.
            if let Some(import) = facts
                .imports
                .iter()
                .find(|i| i.ends_with(&format!(".{name}")))
            {
                return Some(import.clone());
            }
            // A class import plus a bare call is a constructor/static call.
            if let Some(import) = facts.imports.iter().find(|i| {
                i.rsplit('.')
                    .next()
                    .and_then(|seg| seg.chars().next())
                    .is_some_and(|c| c.is_uppercase())
            }) {
                return Some(format!("{import}.{name}"));
            }
            if name.contains('.') {
                return Some(name.clone());
            }
            None
        }
        UsageReference::Qualified {
            receiver, member, ..
        } => {
            let receiver_fqn = if receiver.chars().next().is_some_and(|c| c.is_uppercase()) {
                index
                    .resolve_type(receiver, &facts.imports, package_of(entity))
                    .map(|t| t.fqn.clone())
                    // Not in the snapshot: assume an imported library type.
                    .or_else(|| {
                        facts
                            .imports
                            .iter()
                            .find(|i| i.ends_with(&format!(".{receiver}")))
                            .cloned()
                    })
            } else {
                owner.map(str::to_string)
            };
            receiver_fqn.map(|r| format!("{r}.{member}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::EntityKind;
    use crate::testutil::{entity, facts};
    use library_index::{IntegrationMeta, KafkaCall, LibraryMethod, StaticLibraryIndex};

    fn linker_with(methods: Vec<LibraryMethod>) -> (IntegrationLinker, Arc<VirtualNodeFactory>) {
        let lib = Arc::new(StaticLibraryIndex::from_methods(methods));
        let factory = Arc::new(VirtualNodeFactory::new());
        (
            IntegrationLinker::new(lib.clone(), lib, factory.clone()),
            factory,
        )
    }

    fn http_method(fqn: &str, has_retry: bool, has_circuit_breaker: bool) -> LibraryMethod {
        LibraryMethod {
            fqn: fqn.into(),
            library: None,
            integration: IntegrationMeta {
                urls: vec!["https://billing/api/charge".into()],
                http_methods: vec!["POST".into()],
                has_retry,
                has_circuit_breaker,
                ..IntegrationMeta::default()
            },
        }
    }

    fn qualified(receiver: &str, member: &str) -> UsageReference {
        UsageReference::Qualified {
            receiver: receiver.into(),
            member: member.into(),
            is_call: true,
        }
    }

    #[test]
    fn http_point_yields_calls_http_plus_flag_edges() {
        let (linker, _) = linker_with(vec![http_method("com.lib.Billing.charge", true, true)]);
        let caller = entity("com.ex.pay", "pay", EntityKind::Method);
        let idx = EntitySnapshotIndex::build(&[caller.clone()]);

        let mut f = facts();
        f.imports = vec!["com.lib.Billing".into()];
        f.usages = vec![qualified("Billing", "charge")];
        let edges = linker.link(&caller, &f, &idx).unwrap();

        let kinds: Vec<EdgeKind> = edges.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EdgeKind::CallsCode, // proxy for the library method
                EdgeKind::CallsHttp,
                EdgeKind::RetriesTo,
                EdgeKind::CircuitBreakerTo,
            ]
        );
        assert_eq!(
            edges[1].target.fqn,
            "endpoint://POST https://billing/api/charge"
        );
    }

    #[test]
    fn kafka_produce_consume_and_unknown_operations() {
        let produce = LibraryMethod {
            fqn: "com.lib.Kafka.send".into(),
            library: None,
            integration: IntegrationMeta {
                kafka_topics: vec!["orders".into()],
                kafka_calls: vec![KafkaCall {
                    topic: "orders".into(),
                    operation: Some("PRODUCE".into()),
                }],
                ..IntegrationMeta::default()
            },
        };
        let unknown = LibraryMethod {
            fqn: "com.lib.Kafka.poke".into(),
            library: None,
            integration: IntegrationMeta {
                kafka_topics: vec!["audit".into()],
                ..IntegrationMeta::default()
            },
        };
        let (linker, factory) = linker_with(vec![produce, unknown]);
        let caller = entity("com.ex.publish", "publish", EntityKind::Method);
        let idx = EntitySnapshotIndex::build(&[caller.clone()]);

        let mut f = facts();
        f.imports = vec!["com.lib.Kafka".into()];
        f.usages = vec![qualified("Kafka", "send"), qualified("Kafka", "poke")];
        let edges = linker.link(&caller, &f, &idx).unwrap();

        let kinds: Vec<EdgeKind> = edges.iter().map(|e| e.kind).collect();
        // poke's UNKNOWN operation registers the node but emits no typed edge.
        assert_eq!(
            kinds,
            vec![EdgeKind::CallsCode, EdgeKind::Produces, EdgeKind::CallsCode]
        );
        let minted: Vec<String> = factory
            .take_minted()
            .iter()
            .map(|n| n.fqn.clone())
            .collect();
        assert!(minted.contains(&"topic://audit".to_string()));
    }

    #[test]
    fn camel_route_links_http_only_for_http_routes() {
        let jms = LibraryMethod {
            fqn: "com.lib.Camel.route".into(),
            library: None,
            integration: IntegrationMeta {
                camel_uris: vec!["jms:queue:orders".into()],
                ..IntegrationMeta::default()
            },
        };
        let (linker, factory) = linker_with(vec![jms]);
        let caller = entity("com.ex.route", "route", EntityKind::Method);
        let idx = EntitySnapshotIndex::build(&[caller.clone()]);

        let mut f = facts();
        f.imports = vec!["com.lib.Camel".into()];
        f.usages = vec![qualified("Camel", "route")];
        let edges = linker.link(&caller, &f, &idx).unwrap();

        let kinds: Vec<EdgeKind> = edges.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EdgeKind::CallsCode], "no typed edge for jms");
        assert!(
            factory
                .take_minted()
                .iter()
                .any(|n| n.fqn == "endpoint://jms:queue:orders"),
            "node still registered"
        );
    }

    #[test]
    fn same_endpoint_from_two_callers_minted_once() {
        let (linker, factory) = linker_with(vec![http_method("com.lib.Billing.charge", false, false)]);
        let a = entity("com.ex.payA", "payA", EntityKind::Method);
        let b = entity("com.ex.payB", "payB", EntityKind::Method);
        let idx = EntitySnapshotIndex::build(&[a.clone(), b.clone()]);

        let mut f = facts();
        f.imports = vec!["com.lib.Billing".into()];
        f.usages = vec![qualified("Billing", "charge")];

        let ea = linker.link(&a, &f, &idx).unwrap();
        let eb = linker.link(&b, &f, &idx).unwrap();
        assert_eq!(ea[1].target.fqn, eb[1].target.fqn);

        // One endpoint + one proxy, despite two callers.
        let minted = factory.take_minted();
        assert_eq!(minted.len(), 2);
    }

    #[test]
    fn usages_not_matching_library_methods_are_ignored() {
        let (linker, _) = linker_with(vec![]);
        let caller = entity("com.ex.pay", "pay", EntityKind::Method);
        let idx = EntitySnapshotIndex::build(&[caller.clone()]);

        let mut f = facts();
        f.usages = vec![qualified("Billing", "charge")];
        assert!(linker.link(&caller, &f, &idx).unwrap().is_empty());
    }
}

//! Library method metadata and integration points.
//!
//! A `LibraryMethod` is one callable from a dependency jar/crate, enriched
//! with the integration analysis collected when the library was ingested.
//! `IntegrationPoint` is the flattened, per-call view the linker consumes.

use serde::{Deserialize, Serialize};

/// One callable from an ingested library, keyed by its fully-qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryMethod {
    /// Fully-qualified method name, e.g. `org.springframework.web.client.RestTemplate.getForObject`.
    pub fqn: String,

    /// Library artifact this method belongs to, if known.
    #[serde(default)]
    pub library: Option<String>,

    /// Integration analysis captured for this method.
    #[serde(default)]
    pub integration: IntegrationMeta,
}

/// Raw integration analysis as stored per library method.
///
/// Lists may be empty; a method with an empty `IntegrationMeta` exposes no
/// integration points at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationMeta {
    /// Outbound HTTP URLs this method may hit.
    #[serde(default)]
    pub urls: Vec<String>,
    /// HTTP verbs observed for those URLs.
    #[serde(default)]
    pub http_methods: Vec<String>,
    #[serde(default)]
    pub has_retry: bool,
    #[serde(default)]
    pub has_timeout: bool,
    #[serde(default)]
    pub has_circuit_breaker: bool,

    /// Kafka topics this method produces to or consumes from.
    #[serde(default)]
    pub kafka_topics: Vec<String>,
    /// Per-topic call details (operation direction).
    #[serde(default)]
    pub kafka_calls: Vec<KafkaCall>,

    /// Camel route URIs touched by this method.
    #[serde(default)]
    pub camel_uris: Vec<String>,
    /// Per-URI route details.
    #[serde(default)]
    pub camel_calls: Vec<CamelCall>,
}

/// One observed Kafka interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KafkaCall {
    pub topic: String,
    /// "PRODUCE" or "CONSUME"; anything else is kept verbatim.
    #[serde(default)]
    pub operation: Option<String>,
}

/// One observed Camel route interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CamelCall {
    pub uri: String,
    /// Route component type, e.g. "http", "jms", "file".
    #[serde(default)]
    pub endpoint_type: Option<String>,
}

/// Flattened integration point, one per external interaction of a library
/// method. The linker matches on the variant to decide the edge kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "point", rename_all = "snake_case")]
pub enum IntegrationPoint {
    HttpEndpoint {
        url: Option<String>,
        http_method: Option<String>,
        has_retry: bool,
        has_timeout: bool,
        has_circuit_breaker: bool,
    },
    KafkaTopic {
        topic: Option<String>,
        operation: String,
    },
    CamelRoute {
        uri: Option<String>,
        endpoint_type: Option<String>,
    },
}

/// Extracts the integration points a library method exposes.
pub trait IntegrationPointSource: Send + Sync {
    fn extract(&self, method: &LibraryMethod) -> Vec<IntegrationPoint>;
}

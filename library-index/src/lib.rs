//! Library/dependency metadata index.
//!
//! Applications call into third-party client libraries (HTTP clients, Kafka
//! producers, Camel routes). This crate holds the metadata side of that story:
//! which library methods exist, and which integration points each of them
//! exposes. The graph linker consults this index to turn a raw call usage into
//! typed integration edges.

pub mod index;
pub mod model;

pub use index::{LibraryMethodIndex, StaticLibraryIndex};
pub use model::{
    CamelCall, IntegrationMeta, IntegrationPoint, IntegrationPointSource, KafkaCall, LibraryMethod,
};

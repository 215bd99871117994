use std::collections::HashMap;

pub mod annotator;
pub mod config;
pub mod engine;
pub mod entity_graph;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod scorer;
pub mod shared;
pub mod store;
pub mod tokenizer;

pub use annotator::{Annotator, RegexAnnotator};
pub use config::{EngineConfig, EntityRetention};
pub use engine::{BatchReport, Engine, EngineState, DEFAULT_TRIGGER};
pub use entity_graph::EntityGraph;
pub use error::{AnnotationError, IndexError, Result};
pub use index::TermIndex;
pub use query::QueryMode;
pub use scorer::Scorer;
pub use shared::SharedEngine;
pub use store::DocumentStore;

/// Externally supplied document key, e.g. an article URL.
pub type DocId = String;

/// term -> occurrences within one document.
pub type TermVector = HashMap<String, u32>;

/// entity phrase -> occurrences within one document.
pub type EntityVector = HashMap<String, u32>;

/// Build a frequency vector over a token (or phrase) sequence.
pub fn count_vector<I, S>(items: I) -> HashMap<String, u32>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts: HashMap<String, u32> = HashMap::new();
    for item in items {
        *counts.entry(item.into()).or_insert(0) += 1;
    }
    counts
}

//! Composition root over the document store, term index and entity graph.
//!
//! All mutation goes through [`Engine::add`] and [`Engine::remove`], which keep
//! the three structures consistent with one another.

use crate::annotator::{Annotator, RegexAnnotator};
use crate::config::{EngineConfig, EntityRetention};
use crate::entity_graph::EntityGraph;
use crate::error::{IndexError, Result};
use crate::index::TermIndex;
use crate::query::{self, QueryMode};
use crate::store::DocumentStore;
use crate::tokenizer;
use crate::{count_vector, DocId, EntityVector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Word that opens the body of a wire-service article.
pub const DEFAULT_TRIGGER: &str = "Reuters";

/// Everything a snapshot needs to rebuild an engine exactly.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub store: DocumentStore,
    pub terms: TermIndex,
    pub entities: EntityGraph,
}

/// Per-item outcome of [`Engine::add_batch`].
#[derive(Debug, Default)]
pub struct BatchReport {
    pub added: Vec<DocId>,
    pub failures: Vec<(DocId, IndexError)>,
}

impl BatchReport {
    pub fn duplicates(&self) -> impl Iterator<Item = &DocId> {
        self.failures.iter().filter(|(_, e)| e.is_duplicate()).map(|(id, _)| id)
    }

    /// True when every failure is a duplicate id.
    pub fn is_clean_ignoring_duplicates(&self) -> bool {
        self.failures.iter().all(|(_, e)| e.is_duplicate())
    }

    pub fn is_clean(&self) -> bool { self.failures.is_empty() }
}

pub struct Engine<A = RegexAnnotator> {
    config: EngineConfig,
    state: EngineState,
    annotator: A,
}

impl Default for Engine<RegexAnnotator> {
    fn default() -> Self { Self::new(RegexAnnotator, EngineConfig::default()) }
}

impl<A: Annotator> Engine<A> {
    pub fn new(annotator: A, config: EngineConfig) -> Self {
        Self::from_state(EngineState::default(), annotator, config)
    }

    pub fn from_state(state: EngineState, annotator: A, config: EngineConfig) -> Self {
        Self { config, state, annotator }
    }

    pub fn state(&self) -> &EngineState { &self.state }

    pub fn into_state(self) -> EngineState { self.state }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn annotator(&self) -> &A { &self.annotator }

    /// Index a new document.
    ///
    /// Annotation runs before anything is written, so a failing annotator
    /// leaves the engine untouched.
    pub fn add(&mut self, id: &str, text: &str) -> Result<()> {
        if self.state.store.contains(id) {
            return Err(IndexError::DuplicateId(id.to_string()));
        }
        let tokens = self.annotator.tokenize(text)?;
        let phrases = self.annotator.extract_entity_phrases(text)?;

        self.state.store.put(id, text)?;
        let term_vector = count_vector(tokens);
        let entity_vector = count_vector(phrases);
        debug!(id, terms = term_vector.len(), entities = entity_vector.len(), "indexed document");
        self.state.terms.insert(id, term_vector);
        self.state.entities.insert(id, entity_vector);
        Ok(())
    }

    /// Drop a document's text and term data. Entity data follows
    /// [`EngineConfig::entity_retention`].
    ///
    /// Every structure is checked before the first write, so a state that lacks
    /// part of the document fails with `NotFound` and stays as it was.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let retract = self.config.entity_retention == EntityRetention::Retract;
        self.state.store.get(id)?;
        self.state.terms.term_vector(id)?;
        if retract {
            self.state.entities.entity_vector(id)?;
        }

        self.state.store.remove(id)?;
        self.state.terms.delete(id)?;
        if retract {
            self.state.entities.retract(id)?;
        }
        debug!(id, retention = ?self.config.entity_retention, "removed document");
        Ok(())
    }

    /// Add every item, recording each outcome instead of stopping at the first
    /// failure.
    pub fn add_batch<I, K, T>(&mut self, items: I) -> BatchReport
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: AsRef<str>,
    {
        let mut report = BatchReport::default();
        for (id, text) in items {
            let id = id.as_ref();
            match self.add(id, text.as_ref()) {
                Ok(()) => report.added.push(id.to_string()),
                Err(e) => {
                    if !e.is_duplicate() {
                        warn!(id, error = %e, "batch item failed");
                    }
                    report.failures.push((id.to_string(), e));
                }
            }
        }
        info!(added = report.added.len(), failed = report.failures.len(), "batch ingested");
        report
    }

    pub fn get(&self, id: &str) -> Result<&str> { self.state.store.get(id) }

    pub fn entity_vector(&self, id: &str) -> Result<&EntityVector> {
        self.state.entities.entity_vector(id)
    }

    pub fn associations(&self, entity: &str) -> Result<&HashMap<String, u32>> {
        self.state.entities.associations(entity)
    }

    pub fn top_associations(&self, entity: &str, n: usize) -> Result<Vec<(String, u32)>> {
        self.state.entities.top_associations(entity, n)
    }

    pub fn document_count(&self) -> usize { self.state.store.size() }

    /// Ranked retrieval; `mode` is `"or"` or `"and"`.
    pub fn query(&self, text: &str, k: usize, mode: &str) -> Result<Vec<(DocId, f64)>> {
        let mode: QueryMode = mode.parse()?;
        self.query_with_mode(text, k, mode)
    }

    pub fn query_with_mode(&self, text: &str, k: usize, mode: QueryMode) -> Result<Vec<(DocId, f64)>> {
        let tokens = self.annotator.tokenize(text)?;
        let hits = query::ranked(&self.state.terms, &tokens, k, mode)?;
        debug!(query = text, %mode, k, hits = hits.len(), "query");
        Ok(hits)
    }

    pub fn match_or<S: AsRef<str>>(&self, terms: &[S]) -> BTreeSet<DocId> {
        query::match_or(&self.state.terms, terms)
    }

    pub fn match_and<S: AsRef<str>>(&self, terms: &[S]) -> BTreeSet<DocId> {
        query::match_and(&self.state.terms, terms)
    }

    pub fn match_not<S: AsRef<str>>(&self, terms: &[S]) -> BTreeSet<DocId> {
        query::match_not(self.state.store.ids(), &self.state.terms, terms)
    }

    /// First sentence of the best document containing every term of `text`,
    /// read from the word `trigger` onwards (e.g. the "Reuters" dateline) or from
    /// the start when the document lacks it. `None` when no document matches.
    pub fn headline(&self, text: &str, trigger: &str) -> Result<Option<String>> {
        let hits = self.query_with_mode(text, 1, QueryMode::And)?;
        let Some((id, _)) = hits.into_iter().next() else {
            return Ok(None);
        };
        let raw = self.get(&id)?;
        Ok(Some(tokenizer::first_sentence(raw, trigger).to_string()))
    }

    /// Entities most mentioned across the top `num_docs` documents that contain
    /// every term of `text`; count descending, then phrase ascending.
    pub fn entities_for_query(&self, text: &str, num_docs: usize, n: usize) -> Result<Vec<(String, u32)>> {
        let hits = self.query_with_mode(text, num_docs, QueryMode::And)?;
        let mut totals: HashMap<String, u32> = HashMap::new();
        for (id, _) in &hits {
            for (phrase, count) in self.entity_vector(id)? {
                *totals.entry(phrase.clone()).or_insert(0) += count;
            }
        }
        let mut ranked: Vec<(String, u32)> = totals.into_iter().filter(|(_, c)| *c > 0).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        Ok(ranked)
    }
}

use crate::error::{IndexError, Result};
use crate::{DocId, EntityVector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Per-document entity vectors plus a symmetric co-occurrence count between
/// entity phrases. `cooccurrence[p][q]` is the number of inserted documents that
/// mention both `p` and `q`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityGraph {
    entity_vectors: HashMap<DocId, EntityVector>,
    cooccurrence: HashMap<String, HashMap<String, u32>>,
}

/// Distinct phrases with a nonzero count, sorted so pair updates are ordered.
fn distinct_entities(vector: &EntityVector) -> BTreeSet<&String> {
    vector.iter().filter(|(_, &n)| n > 0).map(|(p, _)| p).collect()
}

impl EntityGraph {
    pub fn new() -> Self { Self::default() }

    /// Record a document's entities. Every unordered pair of distinct phrases
    /// gains exactly 1 in both directions. Every phrase gets a key, even when it
    /// is the only entity of the document. Re-inserting an id overwrites its
    /// vector but keeps prior co-occurrence history.
    pub fn insert(&mut self, id: &str, entity_vector: EntityVector) {
        {
            let phrases = distinct_entities(&entity_vector);
            for p in &phrases {
                let row = self.cooccurrence.entry((*p).clone()).or_default();
                for q in phrases.iter().filter(|q| *q != p) {
                    *row.entry((*q).clone()).or_insert(0) += 1;
                }
            }
        }
        self.entity_vectors.insert(id.to_string(), entity_vector);
    }

    /// Undo what `insert` added for `id`. Keys and zeroed weights are kept.
    pub fn retract(&mut self, id: &str) -> Result<()> {
        let vector = self
            .entity_vectors
            .remove(id)
            .ok_or_else(|| IndexError::NotFound(id.to_string()))?;
        let phrases = distinct_entities(&vector);
        for p in &phrases {
            if let Some(row) = self.cooccurrence.get_mut(*p) {
                for q in phrases.iter().filter(|q| *q != p) {
                    if let Some(w) = row.get_mut(*q) {
                        *w = w.saturating_sub(1);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn entity_vector(&self, id: &str) -> Result<&EntityVector> {
        self.entity_vectors.get(id).ok_or_else(|| IndexError::NotFound(id.to_string()))
    }

    pub fn associations(&self, entity: &str) -> Result<&HashMap<String, u32>> {
        self.cooccurrence
            .get(entity)
            .ok_or_else(|| IndexError::UnknownEntity(entity.to_string()))
    }

    /// The `n` strongest associations, weight descending then phrase ascending.
    /// Zero weights are skipped.
    pub fn top_associations(&self, entity: &str, n: usize) -> Result<Vec<(String, u32)>> {
        let mut ranked: Vec<(String, u32)> = self
            .associations(entity)?
            .iter()
            .filter(|(_, &w)| w > 0)
            .map(|(q, &w)| (q.clone(), w))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        Ok(ranked)
    }

    pub fn weight(&self, p: &str, q: &str) -> u32 {
        self.cooccurrence.get(p).and_then(|row| row.get(q)).copied().unwrap_or(0)
    }

    pub fn entities(&self) -> impl Iterator<Item = &String> { self.cooccurrence.keys() }
}

use crate::error::{IndexError, Result};
use crate::{DocId, TermVector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

static EMPTY_POSTINGS: BTreeSet<DocId> = BTreeSet::new();

/// Term vectors, the inverted index and document frequencies, kept in lockstep.
///
/// Only [`TermIndex::insert`] and [`TermIndex::delete`] mutate, so for every term
/// `doc_freq[t] == postings[t].len()` and `id ∈ postings[t] ⇔ t ∈ term_vectors[id]`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermIndex {
    term_vectors: HashMap<DocId, TermVector>,
    postings: HashMap<String, BTreeSet<DocId>>, // ids sorted for deterministic output
    doc_freq: HashMap<String, u32>,             // zero entries are kept after deletes
}

impl TermIndex {
    pub fn new() -> Self { Self::default() }

    /// Index a document. Each distinct term bumps its document frequency once,
    /// whatever its in-document count. Re-inserting a live id replaces it.
    pub fn insert(&mut self, id: &str, term_vector: TermVector) {
        if let Some(previous) = self.term_vectors.remove(id) {
            self.unindex(id, &previous);
        }
        for term in term_vector.keys() {
            self.postings.entry(term.clone()).or_default().insert(id.to_string());
            *self.doc_freq.entry(term.clone()).or_insert(0) += 1;
        }
        self.term_vectors.insert(id.to_string(), term_vector);
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        let term_vector = self
            .term_vectors
            .remove(id)
            .ok_or_else(|| IndexError::NotFound(id.to_string()))?;
        self.unindex(id, &term_vector);
        Ok(())
    }

    fn unindex(&mut self, id: &str, term_vector: &TermVector) {
        for term in term_vector.keys() {
            if let Some(ids) = self.postings.get_mut(term) {
                ids.remove(id);
            }
            if let Some(df) = self.doc_freq.get_mut(term) {
                *df = df.saturating_sub(1);
            }
        }
    }

    /// Ids of documents containing `term`; empty for unknown terms.
    pub fn postings(&self, term: &str) -> &BTreeSet<DocId> {
        self.postings.get(term).unwrap_or(&EMPTY_POSTINGS)
    }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    pub fn term_vector(&self, id: &str) -> Result<&TermVector> {
        self.term_vectors.get(id).ok_or_else(|| IndexError::NotFound(id.to_string()))
    }

    pub fn document_count(&self) -> usize { self.term_vectors.len() }

    /// Every term that has ever been indexed, including those whose frequency
    /// has decayed to zero.
    pub fn terms(&self) -> impl Iterator<Item = &String> { self.doc_freq.keys() }

    pub fn ids(&self) -> impl Iterator<Item = &DocId> { self.term_vectors.keys() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count_vector;

    fn tv(words: &[&str]) -> TermVector { count_vector(words.iter().copied()) }

    #[test]
    fn doc_freq_counts_documents_not_occurrences() {
        let mut idx = TermIndex::new();
        idx.insert("d1", tv(&["the", "cat", "the"]));
        idx.insert("d2", tv(&["the", "dog"]));
        assert_eq!(idx.document_frequency("the"), 2);
        assert_eq!(idx.document_frequency("cat"), 1);
        assert_eq!(idx.document_frequency("zebra"), 0);
        assert_eq!(idx.postings("the").len(), 2);
        assert!(idx.postings("zebra").is_empty());
        assert_eq!(idx.document_count(), 2);
    }

    #[test]
    fn delete_keeps_zero_entries() {
        let mut idx = TermIndex::new();
        idx.insert("d1", tv(&["cat"]));
        idx.delete("d1").unwrap();
        assert_eq!(idx.document_frequency("cat"), 0);
        assert!(idx.postings("cat").is_empty());
        assert!(idx.terms().any(|t| t == "cat"));
        assert_eq!(idx.delete("d1"), Err(IndexError::NotFound("d1".into())));
        assert!(matches!(idx.term_vector("d1"), Err(IndexError::NotFound(_))));
    }

    #[test]
    fn reinsert_replaces_previous_vector() {
        let mut idx = TermIndex::new();
        idx.insert("d1", tv(&["cat"]));
        idx.insert("d1", tv(&["dog"]));
        assert_eq!(idx.document_frequency("cat"), 0);
        assert_eq!(idx.document_frequency("dog"), 1);
        assert_eq!(idx.document_count(), 1);
    }
}

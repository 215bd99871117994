//! Thread-safe engine handle: one writer at a time, concurrent readers otherwise.

use crate::annotator::{Annotator, RegexAnnotator};
use crate::engine::{BatchReport, Engine};
use crate::error::Result;
use crate::{DocId, EntityVector};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

pub struct SharedEngine<A = RegexAnnotator> {
    inner: Arc<RwLock<Engine<A>>>,
}

impl<A> Clone for SharedEngine<A> {
    fn clone(&self) -> Self { Self { inner: Arc::clone(&self.inner) } }
}

impl<A: Annotator> SharedEngine<A> {
    pub fn new(engine: Engine<A>) -> Self {
        Self { inner: Arc::new(RwLock::new(engine)) }
    }

    /// Hold the read guard across several calls that must see one state.
    pub fn read(&self) -> RwLockReadGuard<'_, Engine<A>> { self.inner.read() }

    pub fn write(&self) -> RwLockWriteGuard<'_, Engine<A>> { self.inner.write() }

    pub fn add(&self, id: &str, text: &str) -> Result<()> { self.inner.write().add(id, text) }

    pub fn remove(&self, id: &str) -> Result<()> { self.inner.write().remove(id) }

    pub fn add_batch<I, K, T>(&self, items: I) -> BatchReport
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: AsRef<str>,
    {
        self.inner.write().add_batch(items)
    }

    pub fn get(&self, id: &str) -> Result<String> {
        self.inner.read().get(id).map(str::to_string)
    }

    pub fn entity_vector(&self, id: &str) -> Result<EntityVector> {
        self.inner.read().entity_vector(id).cloned()
    }

    pub fn associations(&self, entity: &str) -> Result<HashMap<String, u32>> {
        self.inner.read().associations(entity).cloned()
    }

    pub fn document_count(&self) -> usize { self.inner.read().document_count() }

    pub fn query(&self, text: &str, k: usize, mode: &str) -> Result<Vec<(DocId, f64)>> {
        self.inner.read().query(text, k, mode)
    }

    pub fn match_not<S: AsRef<str>>(&self, terms: &[S]) -> BTreeSet<DocId> {
        self.inner.read().match_not(terms)
    }

    pub fn into_inner(self) -> std::result::Result<Engine<A>, Self> {
        Arc::try_unwrap(self.inner).map(RwLock::into_inner).map_err(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn writers_and_readers_share_one_engine() {
        let shared = SharedEngine::new(Engine::default());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let engine = shared.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        engine.add(&format!("t{t}-{i}"), "Reuters reports rain in Seoul").unwrap();
                        let _ = engine.query("rain", 3, "or").unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let engine = shared.read();
        assert_eq!(engine.document_count(), 100);
        let terms = &engine.state().terms;
        assert_eq!(terms.document_frequency("rain") as usize, terms.postings("rain").len());
        assert_eq!(terms.document_frequency("rain"), 100);
    }
}

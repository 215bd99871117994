use crate::error::{IndexError, Result};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw text keyed by document id; the ground truth for which ids are live.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStore {
    texts: HashMap<DocId, String>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    pub fn put(&mut self, id: &str, text: &str) -> Result<()> {
        if self.texts.contains_key(id) {
            return Err(IndexError::DuplicateId(id.to_string()));
        }
        self.texts.insert(id.to_string(), text.to_string());
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&str> {
        self.texts
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| IndexError::NotFound(id.to_string()))
    }

    pub fn remove(&mut self, id: &str) -> Result<()> {
        self.texts
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| IndexError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool { self.texts.contains_key(id) }

    pub fn size(&self) -> usize { self.texts.len() }

    pub fn ids(&self) -> impl Iterator<Item = &DocId> { self.texts.keys() }
}

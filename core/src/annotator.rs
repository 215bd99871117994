//! Natural-language annotation seam.
//!
//! The engine only needs two things from an annotator: the flat normalized token
//! stream of a text and the proper-noun entity phrases mentioned in it. Anything
//! heavier (POS tagging, NE chunking models) plugs in behind [`Annotator`].

use crate::error::AnnotationError;
use crate::tokenizer;

pub trait Annotator: Send + Sync {
    /// Lowercased tokens in original order, punctuation removed.
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnnotationError>;

    /// Space-joined proper-noun phrases in source order, duplicates kept.
    fn extract_entity_phrases(&self, text: &str) -> Result<Vec<String>, AnnotationError>;
}

/// Rule-based annotator backed by [`crate::tokenizer`]. Entity recognition is a
/// capitalization heuristic, so a capitalized sentence-initial word that is not a
/// function word is reported as a one-token entity.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexAnnotator;

impl Annotator for RegexAnnotator {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnnotationError> {
        Ok(tokenizer::tokenize(text))
    }

    fn extract_entity_phrases(&self, text: &str) -> Result<Vec<String>, AnnotationError> {
        Ok(tokenizer::entity_phrases(text))
    }
}

impl<A: Annotator + ?Sized> Annotator for Box<A> {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnnotationError> {
        (**self).tokenize(text)
    }

    fn extract_entity_phrases(&self, text: &str) -> Result<Vec<String>, AnnotationError> {
        (**self).extract_entity_phrases(text)
    }
}

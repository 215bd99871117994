//! TF-IDF cosine scoring against the live state of a [`TermIndex`].
//!
//! Nothing is cached: every call recomputes idf from the index as it is now.

use crate::index::TermIndex;
use crate::TermVector;

/// Lower bound on the cosine denominator.
pub const COSINE_EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    index: &'a TermIndex,
}

impl<'a> Scorer<'a> {
    pub fn new(index: &'a TermIndex) -> Self { Self { index } }

    /// `log10(N / (1 + df))`. An empty index has no rarity information, so
    /// every term weighs 0.0 instead of `log10(0)`.
    pub fn idf(&self, term: &str) -> f64 {
        let n = self.index.document_count();
        if n == 0 {
            return 0.0;
        }
        let df = self.index.document_frequency(term) as f64;
        (n as f64 / (1.0 + df)).log10()
    }

    pub fn dot(&self, tv1: &TermVector, tv2: &TermVector) -> f64 {
        let mut result = 0.0;
        for (term, &tf1) in tv1 {
            if let Some(&tf2) = tv2.get(term) {
                let idf = self.idf(term);
                result += tf1 as f64 * tf2 as f64 * idf * idf;
            }
        }
        result
    }

    pub fn length(&self, tv: &TermVector) -> f64 {
        tv.iter()
            .map(|(term, &tf)| {
                let w = tf as f64 * self.idf(term);
                w * w
            })
            .sum::<f64>()
            .sqrt()
    }

    pub fn cosine(&self, tv1: &TermVector, tv2: &TermVector) -> f64 {
        self.dot(tv1, tv2) / (self.length(tv1) * self.length(tv2)).max(COSINE_EPSILON)
    }
}

//! Boolean candidate resolution and ranked retrieval.

use crate::error::{IndexError, Result};
use crate::index::TermIndex;
use crate::scorer::Scorer;
use crate::{count_vector, DocId};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// documents containing at least one query term
    Or,
    /// documents containing every query term
    And,
}

impl FromStr for QueryMode {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "or" => Ok(QueryMode::Or),
            "and" => Ok(QueryMode::And),
            _ => Err(IndexError::UnsupportedMode(s.to_string())),
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Or => f.write_str("or"),
            QueryMode::And => f.write_str("and"),
        }
    }
}

pub fn match_or<S: AsRef<str>>(index: &TermIndex, terms: &[S]) -> BTreeSet<DocId> {
    let mut ids = BTreeSet::new();
    for term in terms {
        ids.extend(index.postings(&term.as_ref().to_lowercase()).iter().cloned());
    }
    ids
}

/// Intersection of the terms' postings. No terms matches nothing.
pub fn match_and<S: AsRef<str>>(index: &TermIndex, terms: &[S]) -> BTreeSet<DocId> {
    let Some((first, rest)) = terms.split_first() else {
        return BTreeSet::new();
    };
    let mut ids = index.postings(&first.as_ref().to_lowercase()).clone();
    for term in rest {
        if ids.is_empty() {
            break;
        }
        let postings = index.postings(&term.as_ref().to_lowercase());
        ids.retain(|id| postings.contains(id));
    }
    ids
}

/// `all_ids` minus every id containing any of the terms.
pub fn match_not<'a, I, S>(all_ids: I, index: &TermIndex, terms: &[S]) -> BTreeSet<DocId>
where
    I: IntoIterator<Item = &'a DocId>,
    S: AsRef<str>,
{
    let excluded = match_or(index, terms);
    all_ids.into_iter().filter(|id| !excluded.contains(*id)).cloned().collect()
}

/// Resolve candidates for `query_tokens` and rank them by cosine similarity.
///
/// Scores sort descending; equal scores fall back to ascending id so results
/// are deterministic.
pub fn ranked(index: &TermIndex, query_tokens: &[String], k: usize, mode: QueryMode) -> Result<Vec<(DocId, f64)>> {
    if k == 0 {
        return Ok(Vec::new());
    }
    let candidates = match mode {
        QueryMode::Or => match_or(index, query_tokens),
        QueryMode::And => match_and(index, query_tokens),
    };
    let query_vector = count_vector(query_tokens.iter().map(String::as_str));
    let scorer = Scorer::new(index);

    let mut scored = Vec::with_capacity(candidates.len());
    for id in candidates {
        let score = scorer.cosine(&query_vector, index.term_vector(&id)?);
        scored.push((id, score));
    }
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(k);
    Ok(scored)
}

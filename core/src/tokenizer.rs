use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_'’\-]*|\p{N}+(?:[.,:]\p{N}+)*").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","could","did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

fn is_capitalized(token: &str) -> bool {
    token.chars().next().map(char::is_uppercase).unwrap_or(false)
}

/// Split a possessive ending off a word: `Korea's` -> (`Korea`, true),
/// `leaders'` -> (`leaders`, true). Contractions such as `don't` are left alone.
fn split_possessive(token: &str) -> (&str, bool) {
    for suffix in ["'s", "’s", "'S", "’S", "'", "’"] {
        if let Some(stem) = token.strip_suffix(suffix) {
            if !stem.is_empty() {
                return (stem, true);
            }
        }
    }
    (token, false)
}

/// Tokenize text into lowercase terms using NFKC normalization.
/// Punctuation and possessive endings never form a token; order is preserved
/// and stopwords are kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized)
        .map(|m| split_possessive(m.as_str()).0.to_string())
        .collect()
}

/// Proper-noun phrases: maximal runs of adjacent capitalized words, separated only
/// by whitespace. Punctuation, lowercase words, numbers and capitalized function
/// words ("The", "In") end a run; a possessive word closes the run it belongs to.
pub fn entity_phrases(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>();
    let mut phrases = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    let mut last_end = 0;

    for mat in RE.find_iter(&normalized) {
        let (token, possessive) = split_possessive(mat.as_str());
        let contiguous = normalized[last_end..mat.start()].chars().all(char::is_whitespace);
        last_end = mat.end();
        if !contiguous {
            flush(&mut run, &mut phrases);
        }
        if is_capitalized(token) && !is_stopword(&token.to_lowercase()) {
            run.push(token);
            if possessive {
                flush(&mut run, &mut phrases);
            }
        } else {
            flush(&mut run, &mut phrases);
        }
    }
    flush(&mut run, &mut phrases);
    phrases
}

fn flush(run: &mut Vec<&str>, phrases: &mut Vec<String>) {
    if !run.is_empty() {
        phrases.push(run.join(" "));
        run.clear();
    }
}

/// First sentence of `text`, starting at the first occurrence of the word
/// `trigger` (or at the beginning when it is absent). A sentence ends at a period
/// followed by whitespace or end of text, unless the period closes a single
/// capital letter as in "U.S.". Without such a period the rest of the text is
/// returned.
pub fn first_sentence<'a>(text: &'a str, trigger: &str) -> &'a str {
    let start = RE
        .find_iter(text)
        .find(|m| split_possessive(m.as_str()).0 == trigger)
        .map(|m| m.start())
        .unwrap_or(0);
    let rest = &text[start..];
    for (i, _) in rest.match_indices('.') {
        let after = &rest[i + 1..];
        if !(after.is_empty() || after.starts_with(char::is_whitespace)) {
            continue;
        }
        let before = rest[..i].rsplit(|c: char| !c.is_alphanumeric()).next().unwrap_or("");
        let mut chars = before.chars();
        let initial = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase());
        if initial {
            continue;
        }
        return rest[..=i].trim();
    }
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("The cat sat on the mat.");
        assert_eq!(t, vec!["the", "cat", "sat", "on", "the", "mat"]);
    }

    #[test]
    fn possessive_is_dropped_from_terms() {
        assert_eq!(tokenize("Korea's leaders' plans don't change"), vec!["korea", "leaders", "plans", "don't", "change"]);
    }

    #[test]
    fn sentence_skips_initials() {
        assert_eq!(first_sentence("U.S. troops left. Then rain.", "Reuters"), "U.S. troops left.");
        assert_eq!(first_sentence("no period here", "Reuters"), "no period here");
    }

    #[test]
    fn punctuation_splits_phrases() {
        let p = entity_phrases("Seoul, Tokyo and Beijing");
        assert_eq!(p, vec!["Seoul", "Tokyo", "Beijing"]);
    }
}

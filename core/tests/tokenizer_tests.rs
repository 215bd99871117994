use newsdex_core::tokenizer::{entity_phrases, first_sentence, tokenize};

#[test]
fn it_lowercases_and_drops_punctuation() {
    let toks = tokenize("The café's menu: Soup, Bread & Wine!");
    assert_eq!(toks, vec!["the", "café", "menu", "soup", "bread", "wine"]);
}

#[test]
fn it_keeps_stopwords_and_does_not_stem() {
    let toks = tokenize("Running runners run and the runs");
    assert!(toks.contains(&"the".to_string()));
    assert!(toks.contains(&"and".to_string()));
    assert!(toks.contains(&"running".to_string()));
    assert!(!toks.contains(&"run's".to_string()));
}

#[test]
fn it_normalizes_compatibility_forms() {
    // fullwidth letters fold to ASCII under NFKC
    assert_eq!(tokenize("ＲＵＳＴ"), vec!["rust"]);
}

#[test]
fn it_keeps_numbers_whole() {
    assert_eq!(tokenize("Up 3.5% in 2024"), vec!["up", "3.5", "in", "2024"]);
}

#[test]
fn it_groups_capitalized_runs_into_entities() {
    let p = entity_phrases("North Korea test-fired a missile, Kim Jong Un said.");
    assert_eq!(p, vec!["North Korea", "Kim Jong Un"]);
}

#[test]
fn function_words_break_entity_runs() {
    let p = entity_phrases("The United Nations met in New York. The Kremlin declined.");
    assert_eq!(p, vec!["United Nations", "New York", "Kremlin"]);
}

#[test]
fn entity_duplicates_are_preserved() {
    let p = entity_phrases("Seoul hosted talks; Seoul will host again.");
    assert_eq!(p, vec!["Seoul", "Seoul"]);
}

#[test]
fn possessive_ends_an_entity_run() {
    assert_eq!(entity_phrases("North Korea's leader Kim Jong Un"), vec!["North Korea", "Kim Jong Un"]);
    assert_eq!(
        entity_phrases("North Korea’s leader Kim Jong Un met Trump's envoy."),
        vec!["North Korea", "Kim Jong Un", "Trump"]
    );
}

#[test]
fn possessive_terms_match_the_bare_word() {
    assert_eq!(tokenize("Korea's missile"), vec!["korea", "missile"]);
    assert_eq!(tokenize("Korea’s missile"), vec!["korea", "missile"]);
}

// Capitalization is the only signal, so sentence-initial words count as entities.
#[test]
fn sentence_initial_words_are_reported_as_entities() {
    assert_eq!(entity_phrases("Rain fell on Seoul. Prices rose."), vec!["Rain", "Seoul", "Prices"]);
}

#[test]
fn first_sentence_starts_at_trigger() {
    let text = "SEOUL (Reuters) - North Korea fired a missile, officials said. More follows.";
    assert_eq!(first_sentence(text, "Reuters"), "Reuters) - North Korea fired a missile, officials said.");
    assert_eq!(first_sentence(text, "AP"), "SEOUL (Reuters) - North Korea fired a missile, officials said.");
}

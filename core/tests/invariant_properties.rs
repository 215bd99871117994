use newsdex_core::{Annotator, Engine, EngineConfig, EntityRetention, RegexAnnotator};
use proptest::prelude::*;

const VOCAB: &[&str] = &[
    "the", "cat", "sat", "on", "mat", "rain", "Seoul", "Tokyo", "Kim", "Jong", "Un", "North", "Korea", ",", ".",
];

#[derive(Debug, Clone)]
enum Op {
    Add(usize, Vec<usize>),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..6usize, prop::collection::vec(0..VOCAB.len(), 0..10)).prop_map(|(id, words)| Op::Add(id, words)),
        1 => (0..6usize).prop_map(Op::Remove),
    ]
}

fn text(words: &[usize]) -> String {
    words.iter().map(|&w| VOCAB[w]).collect::<Vec<_>>().join(" ")
}

fn check<A: Annotator>(engine: &Engine<A>) -> Result<(), TestCaseError> {
    let state = engine.state();
    let terms = &state.terms;
    for term in terms.terms() {
        prop_assert_eq!(terms.document_frequency(term) as usize, terms.postings(term).len());
        for id in terms.postings(term) {
            prop_assert!(terms.term_vector(id).unwrap().contains_key(term));
        }
    }
    for id in terms.ids() {
        prop_assert!(state.store.contains(id));
        for term in terms.term_vector(id).unwrap().keys() {
            prop_assert!(terms.postings(term).contains(id));
        }
    }
    prop_assert_eq!(terms.document_count(), state.store.size());
    for p in state.entities.entities() {
        for q in state.entities.entities() {
            prop_assert_eq!(state.entities.weight(p, q), state.entities.weight(q, p));
        }
    }
    Ok(())
}

fn run(ops: Vec<Op>, retention: EntityRetention) -> Result<(), TestCaseError> {
    let config = EngineConfig { entity_retention: retention, ..EngineConfig::default() };
    let mut engine = Engine::new(RegexAnnotator, config);
    for op in ops {
        match op {
            Op::Add(id, words) => {
                let id = format!("d{id}");
                let existed = engine.get(&id).is_ok();
                let before = engine.state().clone();
                let result = engine.add(&id, &text(&words));
                prop_assert_eq!(result.is_err(), existed);
                if existed {
                    prop_assert_eq!(engine.state(), &before);
                }
            }
            Op::Remove(id) => {
                let id = format!("d{id}");
                let existed = engine.get(&id).is_ok();
                prop_assert_eq!(engine.remove(&id).is_ok(), existed);
            }
        }
        check(&engine)?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn structures_stay_in_sync_with_permanent_entities(ops in prop::collection::vec(op(), 1..40)) {
        run(ops, EntityRetention::Permanent)?;
    }

    #[test]
    fn structures_stay_in_sync_with_retracted_entities(ops in prop::collection::vec(op(), 1..40)) {
        run(ops, EntityRetention::Retract)?;
    }

    #[test]
    fn scores_are_finite_and_sorted(ops in prop::collection::vec(op(), 1..30), q in prop::collection::vec(0..VOCAB.len(), 0..4)) {
        let mut engine = Engine::default();
        for op in ops {
            if let Op::Add(id, words) = op {
                let _ = engine.add(&format!("d{id}"), &text(&words));
            }
        }
        for mode in ["or", "and"] {
            let hits = engine.query(&text(&q), 10, mode).unwrap();
            prop_assert!(hits.len() <= 10);
            prop_assert!(hits.iter().all(|(_, s)| s.is_finite()));
            prop_assert!(hits.windows(2).all(|w| w[0].1 >= w[1].1));
        }
    }
}

use proptest::prelude::*;
use spamlens_core::{MatchAutomaton, PatternSet, StateId, Status};

fn patterns() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e ]{1,5}", 0..8)
}

fn ascii_text() -> impl Strategy<Value = String> {
    "[a-eA-E !x]{0,48}"
}

proptest! {
    #[test]
    fn scan_is_deterministic(p in patterns(), t in ascii_text()) {
        let fa = MatchAutomaton::from_patterns(&p);
        prop_assert_eq!(fa.scan(&t), fa.scan(&t));
    }

    #[test]
    fn scan_ignores_case(p in patterns(), t in ascii_text()) {
        let fa = MatchAutomaton::from_patterns(&p);
        let base = fa.scan(&t);
        prop_assert_eq!(&base, &fa.scan(&t.to_lowercase()));
        prop_assert_eq!(&base, &fa.scan(&t.to_uppercase()));
    }

    #[test]
    fn one_record_per_character(p in patterns(), t in ascii_text()) {
        let out = MatchAutomaton::from_patterns(&p).scan(&t);
        prop_assert_eq!(out.log.len(), t.chars().count());
        for (rec, ch) in out.log.iter().zip(t.to_lowercase().chars()) {
            prop_assert_eq!(rec.ch, ch);
        }
    }

    #[test]
    fn match_is_followed_by_start(p in patterns(), t in ascii_text()) {
        let out = MatchAutomaton::from_patterns(&p).scan(&t);
        for pair in out.log.windows(2) {
            if pair[0].status.is_match() {
                prop_assert_eq!(pair[0].to_state, StateId::START);
                prop_assert_eq!(pair[1].from_state, StateId::START);
            }
        }
    }

    #[test]
    fn matches_mirror_log_statuses(p in patterns(), t in ascii_text()) {
        let out = MatchAutomaton::from_patterns(&p).scan(&t);
        let from_log: Vec<String> = out
            .log
            .iter()
            .filter_map(|r| match &r.status {
                Status::Match(pattern) => Some(pattern.clone()),
                _ => None,
            })
            .collect();
        prop_assert_eq!(out.matches, from_log);
    }

    #[test]
    fn every_match_is_a_pattern_ending_there(p in patterns(), t in ascii_text()) {
        let lowered = t.to_lowercase();
        let out = MatchAutomaton::from_patterns(&p).scan(&t);
        for (i, rec) in out.log.iter().enumerate() {
            if let Status::Match(pattern) = &rec.status {
                prop_assert!(p.iter().any(|q| q.trim() == pattern.as_str()));
                prop_assert!(lowered[..=i].ends_with(pattern.as_str()));
            }
        }
    }

    #[test]
    fn empty_dictionary_only_resets(t in ascii_text()) {
        let out = MatchAutomaton::build(&PatternSet::empty()).scan(&t);
        prop_assert!(out.matches.is_empty());
        prop_assert_eq!(out.log.len(), t.len());
        for rec in &out.log {
            prop_assert_eq!(&rec.status, &Status::Reset);
            prop_assert!(rec.from_state.is_start() && rec.to_state.is_start());
        }
    }

    #[test]
    fn empty_text_yields_empty_outcome(p in patterns()) {
        let out = MatchAutomaton::from_patterns(&p).scan("");
        prop_assert!(out.matches.is_empty());
        prop_assert!(out.log.is_empty());
    }

    #[test]
    fn rebuild_is_equivalent(p in patterns(), t in ascii_text()) {
        let a = MatchAutomaton::from_patterns(&p);
        let b = MatchAutomaton::from_patterns(&p);
        prop_assert_eq!(a.transitions(), b.transitions());
        prop_assert_eq!(a.scan(&t), b.scan(&t));
    }
}

#[test]
fn literal_scenarios() {
    let fa = MatchAutomaton::from_patterns(["win", "free"]);
    assert_eq!(fa.scan("You WIN a FREE prize").matches, ["win", "free"]);

    let fa = MatchAutomaton::from_patterns(["win"]);
    assert_eq!(fa.scan("wiwin").matches, ["win"]);

    let fa = MatchAutomaton::from_patterns(["she", "he"]);
    assert_eq!(fa.scan("she").matches, ["she"]);
}

#[test]
fn non_ascii_lowercasing_expands_log() {
    // 'İ' 小写为 "i̇"（两个字符），日志按小写后的字符计数
    let fa = MatchAutomaton::from_patterns(["i"]);
    let out = fa.scan("İ");
    assert_eq!(out.log.len(), "İ".to_lowercase().chars().count());
    assert_eq!(out.matches, ["i"]);
}

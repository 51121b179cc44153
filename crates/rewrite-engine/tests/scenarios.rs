//! End-to-end rewrite scenarios over byte-level rules.

use rewrite_engine::rewrite::{
    matches, one_top_rewrite, optimal_rewrites, rewrites, top_rewrite, top_rewrites,
};
use rewrite_engine::{
    Cascade, RewriteError, RewriteOptions, Rewriter, Rule, RuleArchive, RuleCascade, TokenType,
    TropicalWeight, VectorFst, all_strings, build_lattice, to_dfa,
};
use rewrite_fst::Transition;

type Fst = VectorFst<TropicalWeight>;

/// A rule mapping each input string to an output string with a weight.
fn rule(pairs: &[(&str, &str, f32)]) -> Fst {
    Fst::string_map(pairs.iter().map(|(i, o, w)| {
        (
            TokenType::Byte.compile(i).unwrap(),
            TokenType::Byte.compile(o).unwrap(),
            TropicalWeight::new(*w),
        )
    }))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("rewrite_engine=debug")
        .try_init();
}

// ---------------------------------------------------------------------------
// Single-rule scenarios
// ---------------------------------------------------------------------------

#[test]
fn unambiguous_top_rewrite() {
    let r = rule(&[("cat", "feline", 0.0)]);
    let options = RewriteOptions::default();
    assert_eq!(top_rewrite("cat", &r, &options).unwrap(), "feline");
    assert_eq!(one_top_rewrite("cat", &r, &options).unwrap(), "feline");
}

#[test]
fn tie_is_ambiguous() {
    let r = rule(&[("a", "x", 1.0), ("a", "y", 1.0)]);
    let err = one_top_rewrite("a", &r, &RewriteOptions::default()).unwrap_err();
    match &err {
        RewriteError::AmbiguousRewrite { first, second, .. } => {
            let mut pair = [first.as_str(), second.as_str()];
            pair.sort();
            assert_eq!(pair, ["x", "y"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("\"x\"") && message.contains("\"y\""));
}

#[test]
fn near_ties_within_delta_are_ambiguous() {
    let options = RewriteOptions::default();
    let close = rule(&[("a", "x", 1.0), ("a", "y", 1.0009)]);
    let err = one_top_rewrite("a", &close, &options).unwrap_err();
    assert!(matches!(err, RewriteError::AmbiguousRewrite { .. }), "{err:?}");
    let mut optimal = optimal_rewrites("a", &close, &options).unwrap();
    optimal.sort();
    assert_eq!(optimal, vec!["x", "y"]);

    let apart = rule(&[("a", "x", 1.0), ("a", "y", 1.002)]);
    assert_eq!(one_top_rewrite("a", &apart, &options).unwrap(), "x");
}

#[test]
fn n_shortest_rewrites() {
    let r = rule(&[("a", "p", 0.0), ("a", "q", 1.0), ("a", "r", 2.0)]);
    let best = top_rewrites("a", &r, 2, &RewriteOptions::default()).unwrap();
    assert_eq!(best, vec!["p", "q"]);
}

#[test]
fn closure_with_deletion() {
    // One final state looping over a:a/1, a:b/0, c:c/0 and c:<eps>/2.
    let mut r = Fst::new();
    let q = r.add_state();
    r.set_start(q);
    r.set_final(q, TropicalWeight::new(0.0));
    for (i, o, w) in [(b'a', b'a', 1.0), (b'a', b'b', 0.0), (b'c', b'c', 0.0), (b'c', 0, 2.0)] {
        r.add_transition(q, Transition::new(i.into(), o.into(), TropicalWeight::new(w), q));
    }
    let options = RewriteOptions::default();

    let mut all = rewrites("aca", &r, &options).unwrap();
    all.sort();
    assert_eq!(all, vec!["aa", "ab", "aca", "acb", "ba", "bb", "bca", "bcb"]);
    assert_eq!(optimal_rewrites("aca", &r, &options).unwrap(), vec!["bcb"]);
    assert_eq!(one_top_rewrite("aca", &r, &options).unwrap(), "bcb");

    let top = top_rewrites("aca", &r, 3, &options).unwrap();
    assert_eq!(top[0], "bcb");
    let mut runners_up = top[1..].to_vec();
    runners_up.sort();
    assert_eq!(runners_up, vec!["acb", "bca"]);
}

#[test]
fn insertion_loop_n_best() {
    // a:a/0 and <eps>:x/1 on one final state: infinitely many outputs.
    let mut r = Fst::new();
    let q = r.add_state();
    r.set_start(q);
    r.set_final(q, TropicalWeight::new(0.0));
    r.add_transition(q, Transition::new(b'a'.into(), b'a'.into(), TropicalWeight::new(0.0), q));
    r.add_transition(q, Transition::new(0, b'x'.into(), TropicalWeight::new(1.0), q));
    let options = RewriteOptions::default();

    let top = top_rewrites("a", &r, 3, &options).unwrap();
    assert_eq!(top[0], "a");
    let mut runners_up = top[1..].to_vec();
    runners_up.sort();
    assert_eq!(runners_up, vec!["ax", "xa"]);
    assert_eq!(one_top_rewrite("a", &r, &options).unwrap(), "a");
}

#[test]
fn containment() {
    let r = rule(&[("a", "p", 0.0)]);
    let options = RewriteOptions::default();
    assert!(matches("a", "p", &r, &options).unwrap());
    assert!(!matches("a", "q", &r, &options).unwrap());
}

#[test]
fn containment_still_reports_composition_failure() {
    let r = rule(&[("a", "p", 0.0)]);
    let err = matches("b", "p", &r, &RewriteOptions::default()).unwrap_err();
    assert!(matches!(err, RewriteError::CompositionFailure { .. }));
}

#[test]
fn inputs_outside_rule_language_fail() {
    let r = rule(&[("cat", "feline", 0.0), ("dog", "canine", 0.0)]);
    for input in ["cat", "dog"] {
        assert!(build_lattice(input, &r, &TokenType::Byte).is_ok());
    }
    for input in ["", "ca", "cats", "cow"] {
        let err = build_lattice(input, &r, &TokenType::Byte).unwrap_err();
        assert!(matches!(err, RewriteError::CompositionFailure { .. }), "{input:?}");
    }
}

#[test]
fn utf8_token_type() {
    let r = Fst::string_map([(
        TokenType::Utf8.compile("straße").unwrap(),
        TokenType::Utf8.compile("strasse").unwrap(),
        TropicalWeight::new(0.0),
    )]);
    let options = RewriteOptions::with_token_type(TokenType::Utf8);
    assert_eq!(top_rewrite("straße", &r, &options).unwrap(), "strasse");
}

#[test]
fn state_cap_is_a_warning_not_an_error() {
    init_tracing();
    // A trie of 300 three-digit outputs needs 334 DFA states; with
    // multiplier 0 the cap is 256.
    let outputs: Vec<String> = (0..300).map(|i| format!("{i:03}")).collect();
    let pairs: Vec<(&str, &str, f32)> = outputs.iter().map(|o| ("a", o.as_str(), 0.0)).collect();
    let r = rule(&pairs);
    let lattice = build_lattice("a", &r, &TokenType::Byte).unwrap();
    let dfa = to_dfa(&lattice, false, 0.0);
    assert!(dfa.state_cap_reached);

    let options = RewriteOptions::default().state_multiplier(0.0);
    let partial = rewrites("a", &r, &options).unwrap();
    assert!(partial.len() < 300);
    let full = rewrites("a", &r, &RewriteOptions::default()).unwrap();
    assert_eq!(full.len(), 300);
}

// ---------------------------------------------------------------------------
// Cascades
// ---------------------------------------------------------------------------

fn three_rules() -> [Fst; 3] {
    [
        rule(&[("a", "b", 0.0), ("a", "bb", 1.0)]),
        rule(&[("b", "c", 0.5), ("bb", "c", 0.0), ("bb", "cc", 2.0)]),
        rule(&[("c", "done", 0.0), ("cc", "twice", 0.0)]),
    ]
}

#[test]
fn cascade_equals_manual_threading() {
    let rules = three_rules();
    let options = RewriteOptions::default();

    let mut lattice = build_lattice("a", &rules[0], &TokenType::Byte).unwrap();
    for r in &rules[1..] {
        lattice = build_lattice(lattice, r, &TokenType::Byte).unwrap();
    }
    let dfa = to_dfa(&lattice, false, 4.0);
    let mut manual = all_strings(&dfa.lattice, &TokenType::Byte).unwrap();
    manual.sort();

    let cascade: Cascade = rules.iter().cloned().map(Rule::new).collect();
    let mut cascaded = cascade.rewrites("a", &options).unwrap();
    cascaded.sort();
    assert_eq!(cascaded, manual);
    assert_eq!(cascaded, vec!["done", "twice"]);
    assert_eq!(cascade.top_rewrite("a", &options).unwrap(), "done");
    assert_eq!(cascade.one_top_rewrite("a", &options).unwrap(), "done");
}

#[test]
fn rule_cascade_from_saved_archive() {
    let [first, second, third] = three_rules();
    let mut archive = RuleArchive::new();
    archive.insert("expand", first);
    archive.insert("merge", second);
    archive.insert("finish", third);

    let path = std::env::temp_dir().join(format!("rewrite-engine-{}.far", std::process::id()));
    archive.save(&path).unwrap();
    let mut cascade = RuleCascade::open(&path).unwrap();
    std::fs::remove_file(&path).ok();

    cascade.set_rules(["expand", "merge", "finish"]).unwrap();
    let options = RewriteOptions::default();
    assert_eq!(cascade.top_rewrites("a", 1, &options).unwrap(), vec!["done"]);
    assert!(cascade.matches("a", "twice", &options).unwrap());
    assert!(!cascade.matches("a", "thrice", &options).unwrap());
}

#[test]
fn rule_cascade_open_missing_file() {
    let err = RuleCascade::open("/nonexistent/dir/rules.far").unwrap_err();
    assert!(matches!(err, RewriteError::Fst(rewrite_engine::FstError::Io(_))));
}

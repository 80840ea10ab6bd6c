use crate::lsystem::LSystem;
use crate::module::{Definitions, IgnoreSet};

/// Initializes the `log` facade with `env_logger`'s test-capture mode, so
/// that running these tests with `--nocapture` shows the `debug!`/`trace!`
/// output `next_generation` emits at generation and rule-match boundaries.
/// Idempotent: later calls after the first are no-ops.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn word_to_string(words: &[crate::module::WordModule]) -> String {
    words
        .iter()
        .map(|m| {
            if m.params.is_empty() {
                m.symbol.clone()
            } else {
                let params: Vec<String> = m.params.iter().map(|p| format!("{p}")).collect();
                format!("{}({})", m.symbol, params.join(","))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn koch_snowflake_side() {
    init_logging();

    let mut system = LSystem::construct(
        "F + + F + + F",
        &["F?F - F + + F - F"],
        IgnoreSet::new(),
        Definitions::new(),
    )
    .unwrap();

    system.next_generation().unwrap();

    assert_eq!(
        word_to_string(system.current_word()),
        "F - F + + F - F + + F - F + + F - F + + F - F + + F - F"
    );
}

#[test]
fn bracketed_plant_keeps_brackets_balanced() {
    let mut system = LSystem::construct(
        "F",
        &["F?F F - [ - F + F + F ] + [ + F - F - F ]"],
        IgnoreSet::new(),
        Definitions::new(),
    )
    .unwrap();

    system.next_generation().unwrap();

    let word = system.current_word();
    assert_eq!(word.len(), 20);
    let opens = word.iter().filter(|m| m.symbol == "[").count();
    let closes = word.iter().filter(|m| m.symbol == "]").count();
    assert_eq!(opens, closes);
}

#[test]
fn parametric_single_step_evaluates_conditions_and_expressions() {
    let mut system = LSystem::construct(
        "F(1,0)",
        &[
            "F(x,t):t==0?F(x*0.3,2) + F(x*0.458,1) - - F(x*0.458,1) + F(x*0.7,0)",
            "F(x,t):t>0?F(x,t-1)",
        ],
        IgnoreSet::new(),
        Definitions::new(),
    )
    .unwrap();

    system.next_generation().unwrap();

    assert_eq!(
        word_to_string(system.current_word()),
        "F(0.3,2) + F(0.458,1) - - F(0.458,1) + F(0.7,0)"
    );
}

#[test]
fn identity_production_applies_when_no_rule_matches() {
    init_logging();

    let mut system =
        LSystem::construct("X", &["Y?Z"], IgnoreSet::new(), Definitions::new()).unwrap();

    for _ in 0..3 {
        system.next_generation().unwrap();
        assert_eq!(word_to_string(system.current_word()), "X");
    }
}

#[test]
fn rule_order_priority_prefers_the_earlier_declared_rule() {
    let mut system = LSystem::construct(
        "A",
        &["A?FIRST", "A?SECOND"],
        IgnoreSet::new(),
        Definitions::new(),
    )
    .unwrap();

    system.next_generation().unwrap();
    assert_eq!(word_to_string(system.current_word()), "FIRST");
}

#[test]
fn stochastic_rule_selection_converges_to_declared_frequencies() {
    let mut count_a = 0u32;
    let trials = 2000u32;

    for trial in 0..trials {
        let mut system = LSystem::construct(
            "F",
            &["F?0.3;A;0.7;B"],
            IgnoreSet::new(),
            Definitions::new(),
        )
        .unwrap();
        system.seed(trial as u64);
        system.next_generation().unwrap();
        if system.current_word()[0].symbol == "A" {
            count_a += 1;
        }
    }

    let frequency = f64::from(count_a) / f64::from(trials);
    assert!(
        (frequency - 0.3).abs() < 0.05,
        "expected frequency near 0.3, got {frequency}"
    );
}

#[test]
fn same_seed_reproduces_the_same_derivation() {
    let rules = ["F?0.3;A;0.7;B"];

    let mut a = LSystem::construct("F F F F F", &rules, IgnoreSet::new(), Definitions::new())
        .unwrap();
    a.seed(42);
    a.next_generation().unwrap();

    let mut b = LSystem::construct("F F F F F", &rules, IgnoreSet::new(), Definitions::new())
        .unwrap();
    b.seed(42);
    b.next_generation().unwrap();

    assert_eq!(
        word_to_string(a.current_word()),
        word_to_string(b.current_word())
    );
}

#[test]
fn definitions_are_shadowed_by_positional_parameters() {
    let definitions = Definitions::from_pairs([("r", 2.0)]);
    let mut system = LSystem::construct(
        "F(5)",
        &["F(r)?F(r)"],
        IgnoreSet::new(),
        definitions,
    )
    .unwrap();

    system.next_generation().unwrap();

    // The predecessor's formal parameter `r` is bound to the actual value 5,
    // which must shadow the global definition `r = 2`.
    assert_eq!(system.current_word()[0].params, vec![5.0]);
}

#[test]
fn unbound_identifier_during_evaluation_is_an_error_and_the_word_is_unchanged() {
    let mut system =
        LSystem::construct("F(1)", &["F(x)?F(y)"], IgnoreSet::new(), Definitions::new())
            .unwrap();

    let before = word_to_string(system.current_word());
    assert!(system.next_generation().is_err());
    assert_eq!(word_to_string(system.current_word()), before);
}

use crate::context::{find_left_context, find_right_context};
use crate::grammar::parse_axiom;
use crate::module::IgnoreSet;

#[test]
fn left_context_skips_a_balanced_bracket_block() {
    // A [ B ] C -- left context of C (index 4) is A, skipping the branch.
    let word = parse_axiom("A [ B ] C").unwrap();
    let ignore = IgnoreSet::new();
    let left = find_left_context(&word, 4, &ignore);
    assert_eq!(left.symbol, "A");
}

#[test]
fn right_context_does_not_escape_the_enclosing_branch() {
    // A [ B ] C -- right context of C (index 4, last position) is empty.
    let word = parse_axiom("A [ B ] C").unwrap();
    let ignore = IgnoreSet::new();
    let right = find_right_context(&word, 4, &ignore);
    assert!(right.is_empty());
}

#[test]
fn right_context_does_not_descend_into_a_side_branch() {
    // A [ B ] C -- right context of A (index 0) is C, not B.
    let word = parse_axiom("A [ B ] C").unwrap();
    let ignore = IgnoreSet::new();
    let right = find_right_context(&word, 0, &ignore);
    assert_eq!(right.symbol, "C");
}

#[test]
fn left_context_of_first_position_is_empty() {
    let word = parse_axiom("A B C").unwrap();
    let ignore = IgnoreSet::new();
    let left = find_left_context(&word, 0, &ignore);
    assert!(left.is_empty());
}

#[test]
fn right_context_of_last_position_is_empty() {
    let word = parse_axiom("A B C").unwrap();
    let ignore = IgnoreSet::new();
    let right = find_right_context(&word, 2, &ignore);
    assert!(right.is_empty());
}

#[test]
fn ignored_symbols_are_transparent_to_both_scans() {
    let word = parse_axiom("A X B").unwrap();
    let ignore = IgnoreSet::from_symbols(["X"]);
    assert_eq!(find_left_context(&word, 2, &ignore).symbol, "A");
    assert_eq!(find_right_context(&word, 0, &ignore).symbol, "B");
}

#[test]
fn nested_branches_are_skipped_as_a_whole() {
    // A [ B [ C ] D ] E -- left context of E is A.
    let word = parse_axiom("A [ B [ C ] D ] E").unwrap();
    let ignore = IgnoreSet::new();
    let pos = word.iter().position(|m| m.symbol == "E").unwrap();
    let left = find_left_context(&word, pos, &ignore);
    assert_eq!(left.symbol, "A");
}

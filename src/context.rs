//! Component D: the context locator (§4.D).
//!
//! Finds the nearest non-ignored neighbour to the left or right of a
//! position in the word, skipping whole bracketed side branches. Both
//! scans share the same counter shape (`opens`/`closes`/`first_pass`) but
//! diverge slightly at the bracket characters, matching the asymmetry the
//! specification calls out: left context may ascend out of the enclosing
//! branch, right context may not.

use crate::module::{IgnoreSet, WordModule};

/// Returns the left neighbour of `word[pos]`, or the empty module if the
/// scan reaches the start of the word without finding one on the main
/// branch.
pub fn find_left_context(word: &[WordModule], pos: usize, ignore: &IgnoreSet) -> WordModule {
    let mut opens = 0i32;
    let mut closes = 0i32;
    let mut first_pass = true;

    for i in (0..pos).rev() {
        let symbol = word[i].symbol.as_str();
        if ignore.contains(symbol) {
            continue;
        } else if symbol == "[" {
            if !first_pass {
                opens += 1;
            }
        } else if symbol == "]" {
            closes += 1;
        } else if closes == opens {
            return word[i].clone();
        }
        first_pass = false;
    }
    WordModule::empty()
}

/// Returns the right neighbour of `word[pos]`, or the empty module if the
/// scan reaches the end of the word, exits via `]`, or enters a `[`-opened
/// side branch without finding one on the main branch.
pub fn find_right_context(word: &[WordModule], pos: usize, ignore: &IgnoreSet) -> WordModule {
    let mut opens = 0i32;
    let mut closes = 0i32;
    let mut first_pass = true;

    for i in (pos + 1)..word.len() {
        let symbol = word[i].symbol.as_str();
        if ignore.contains(symbol) {
            continue;
        } else if symbol == "]" {
            if first_pass {
                return WordModule::empty();
            }
            closes += 1;
        } else if symbol == "[" {
            opens += 1;
        } else if opens == closes {
            return word[i].clone();
        }
        first_pass = false;
    }
    WordModule::empty()
}

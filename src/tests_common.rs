//! Helpers shared between the different test suites and benchmarks.

use alloc::{string::String, vec, vec::Vec};
use core::iter;

/// Mixed-script word list exercising multi-byte and supplementary-plane
/// code points alongside shared ASCII prefixes.
pub const DICTIONARY: &[&str] = &[
    "bar", "baz", "fobe", "foo", "fooooo", "fore", "für", "日本語", "😀", "😀😀",
];

/// Generate every word of the given length over the given alphabet.
pub fn generate_keys_fixed_length(len: usize, alphabet: &[char]) -> Vec<String> {
    let mut words = vec![String::new()];
    for _ in 0..len {
        words = words
            .iter()
            .flat_map(|word| {
                alphabet.iter().map(move |point| {
                    let mut next = word.clone();
                    next.push(*point);
                    next
                })
            })
            .collect();
    }
    words
}

/// Generate keys where each is a strict prefix of the next, so that most
/// values end up on interior nodes.
pub fn generate_keys_skewed(max_len: usize) -> impl Iterator<Item = String> {
    iter::successors(Some(String::from("a")), move |prev| {
        (prev.chars().count() < max_len).then(|| {
            let mut next = prev.clone();
            next.push(if prev.chars().count() % 2 == 0 { 'b' } else { 'a' });
            next
        })
    })
}

//! Safe collection types built on top of the raw trie.

mod map;

pub use map::*;

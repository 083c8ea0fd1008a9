#![cfg_attr(not(feature = "std"), no_std)]
#![deny(
    clippy::missing_safety_doc,
    unsafe_op_in_unsafe_fn,
    deprecated_in_future,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    rustdoc::invalid_codeblock_attributes
)]

//! Ternary search trie implementation
//!
//! A ternary search trie stores string keys one Unicode code point per
//! node, each node having three children: less, equal (one code point
//! further into the key), and greater. This trades the branching factor of
//! a classic trie for space efficiency while keeping ordered prefix
//! queries, making it a fit for dictionary and autocomplete-style lookups
//! over Unicode text.
//!
//! # References
//!
//!  - Bentley, J. L., & Sedgewick, R. (1997). Fast algorithms for sorting
//!    and searching strings. In Proceedings of the eighth annual ACM-SIAM
//!    symposium on discrete algorithms (pp. 360-369).

extern crate alloc;

mod collections;
mod raw;
pub mod visitor;

#[doc(hidden)]
pub mod tests_common;

pub use collections::*;
pub use raw::{EmptyKeyError, InvalidKeyError, KeyError};

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;

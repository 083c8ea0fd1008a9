//! Iterators over the entries whose keys start with a given prefix.

use alloc::{string::String, vec::Vec};
use core::iter::FusedIterator;

use super::{expand, Step};
use crate::{raw::search_unchecked, TstMap};

macro_rules! gen_prefix_iter {
    ($(#[$attr:meta])* $name:ident, $tree:ty, $ret:ty, |$word:ident, $node:ident| $emit:expr) => {
        $(#[$attr])*
        pub struct $name<'a, V> {
            steps: Vec<Step<V>>,
            remaining: usize,
            _tree: $tree,
        }

        impl<'a, V> $name<'a, V> {
            /// Create a new iterator over the stored keys starting with the
            /// given prefix.
            ///
            /// The prefix node is located with the same descent as an exact
            /// lookup; a key equal to the prefix is itself a match, and an
            /// absent prefix yields an empty iterator. The empty prefix
            /// matches every stored key.
            pub(crate) fn new(tree: $tree, prefix: &str) -> Self {
                let mut steps = Vec::new();

                match tree.root {
                    Some(root) if prefix.is_empty() => {
                        steps.push(Step::Explore(root, String::new()));
                    },
                    Some(root) => {
                        let points: Vec<char> = prefix.chars().collect();
                        // SAFETY: The iterator borrows the tree for its
                        // whole lifetime, so no mutation can overlap.
                        if let Some(node) = unsafe { search_unchecked(root, &points) } {
                            let word = String::from(prefix);
                            // SAFETY: Scoped shared reference, no
                            // overlapping mutation.
                            if let Some(middle) = unsafe { node.as_ref() }.middle {
                                steps.push(Step::Explore(middle, word.clone()));
                            }
                            steps.push(Step::Emit(node, word));
                        }
                    },
                    None => {},
                }

                Self {
                    steps,
                    remaining: tree.num_entries,
                    _tree: tree,
                }
            }
        }

        impl<'a, V> Iterator for $name<'a, V> {
            type Item = $ret;

            fn next(&mut self) -> Option<Self::Item> {
                while let Some(step) = self.steps.pop() {
                    match step {
                        Step::Explore(node, prefix) => {
                            // SAFETY: The iterator borrows the tree for its
                            // whole lifetime, so no mutation can overlap the
                            // traversal.
                            unsafe { expand(&mut self.steps, node, prefix) }
                        },
                        Step::Emit($node, $word) => {
                            if let Some(item) = $emit {
                                self.remaining -= 1;
                                return Some(item);
                            }
                        },
                    }
                }

                None
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                (0, Some(self.remaining))
            }
        }

        impl<'a, V> FusedIterator for $name<'a, V> {}
    };
}

gen_prefix_iter!(
    /// An iterator over the stored keys starting with a given prefix and
    /// their values, in depth-first emission order.
    Prefix,
    &'a TstMap<V>,
    (String, &'a V),
    // SAFETY: The shared borrow of the tree outlives the yielded reference
    // and precludes mutation.
    |word, node| unsafe { node.as_value_ref() }.map(|value| (word, value))
);
gen_prefix_iter!(
    /// An iterator over the stored keys starting with a given prefix and
    /// their values, mutably, in depth-first emission order.
    PrefixMut,
    &'a mut TstMap<V>,
    (String, &'a mut V),
    // SAFETY: The unique borrow of the tree outlives the yielded reference,
    // and every node is emitted exactly once.
    |word, node| unsafe { node.as_value_mut() }.map(|value| (word, value))
);
gen_prefix_iter!(
    /// An iterator over the stored keys starting with a given prefix, in
    /// depth-first emission order.
    PrefixKeys,
    &'a TstMap<V>,
    String,
    // SAFETY: The shared borrow of the tree precludes mutation; the value
    // reference does not escape.
    |word, node| unsafe { node.as_value_ref() }.map(|_| word)
);

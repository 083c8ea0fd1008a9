//! Structural invariant checking for the trie.

use core::fmt;

use crate::{raw::NodePtr, TstMap};

/// The ways a trie's node graph can violate its structural invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedTreeError {
    /// A node's code point falls outside the bounds imposed by the
    /// left/right links above it.
    OrderViolation {
        /// The offending node's code point.
        key: char,
    },
    /// A child's `parent` back-reference does not name the node whose link
    /// reaches it.
    ParentMismatch {
        /// The child node's code point.
        key: char,
    },
    /// The root's `parent` back-reference is set.
    RootParentSet,
    /// The number of value-holding nodes disagrees with the map's length.
    CountMismatch {
        /// Value-holding nodes found in the graph.
        found: usize,
        /// Length the map reports.
        expected: usize,
    },
}

impl fmt::Display for MalformedTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedTreeError::OrderViolation { key } => {
                write!(f, "node {key:?} violates the left < node < right ordering")
            },
            MalformedTreeError::ParentMismatch { key } => {
                write!(f, "node {key:?} has a parent back-reference to the wrong node")
            },
            MalformedTreeError::RootParentSet => {
                write!(f, "the root node has a parent back-reference")
            },
            MalformedTreeError::CountMismatch { found, expected } => {
                write!(
                    f,
                    "found {found} value-holding nodes but the map reports {expected} keys"
                )
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MalformedTreeError {}

/// Walks the whole node graph checking the structural invariants: the
/// left < node < right ordering within each comparison plane, `parent`
/// back-reference consistency, and the stored-key count.
///
/// A `middle` edge starts a fresh comparison plane, since the nodes below
/// it match the next code point of the key rather than competing for the
/// same position.
///
/// # Examples
///
/// ```rust
/// use tstrie::{visitor::WellFormedChecker, TstMap};
///
/// let mut map = TstMap::new();
/// map.insert("foo", 1);
/// map.insert("fob", 2);
/// map.remove("foo");
///
/// assert_eq!(WellFormedChecker::check(&map), Ok(()));
/// ```
pub struct WellFormedChecker;

impl WellFormedChecker {
    /// Check the given map, reporting the first violation found.
    pub fn check<V>(map: &TstMap<V>) -> Result<(), MalformedTreeError> {
        let mut values = 0;

        if let Some(root) = map.root_ptr() {
            // SAFETY: The shared map borrow precludes mutation for the
            // duration of the walk.
            unsafe { Self::check_node(root, None, None, None, &mut values)? };
        }

        if values != map.len() {
            return Err(MalformedTreeError::CountMismatch {
                found: values,
                expected: map.len(),
            });
        }
        Ok(())
    }

    /// Check one node against the parent and bound expectations, then
    /// recurse.
    ///
    /// # Safety
    ///  - No mutation of the subtree may overlap this call.
    unsafe fn check_node<V>(
        node_ptr: NodePtr<V>,
        parent: Option<NodePtr<V>>,
        lower: Option<char>,
        upper: Option<char>,
        values: &mut usize,
    ) -> Result<(), MalformedTreeError> {
        // SAFETY: Covered by the requirements on this function.
        let node = unsafe { node_ptr.as_ref() };

        if node.parent != parent {
            return Err(match parent {
                Some(_) => MalformedTreeError::ParentMismatch { key: node.key },
                None => MalformedTreeError::RootParentSet,
            });
        }
        if lower.is_some_and(|low| node.key <= low) || upper.is_some_and(|high| node.key >= high) {
            return Err(MalformedTreeError::OrderViolation { key: node.key });
        }
        if node.value.is_some() {
            *values += 1;
        }

        if let Some(left) = node.left {
            // SAFETY: Covered by the requirements on this function.
            unsafe { Self::check_node(left, Some(node_ptr), lower, Some(node.key), values)? };
        }
        if let Some(middle) = node.middle {
            // SAFETY: Covered by the requirements on this function.
            unsafe { Self::check_node(middle, Some(node_ptr), None, None, values)? };
        }
        if let Some(right) = node.right {
            // SAFETY: Covered by the requirements on this function.
            unsafe { Self::check_node(right, Some(node_ptr), Some(node.key), upper, values)? };
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_common::DICTIONARY;
    use crate::TstMap;

    #[test]
    fn empty_and_populated_maps_are_well_formed() {
        let mut map = TstMap::new();
        assert_eq!(WellFormedChecker::check(&map), Ok(()));

        for (index, key) in DICTIONARY.iter().copied().enumerate() {
            map.insert(key, index);
            assert_eq!(WellFormedChecker::check(&map), Ok(()), "after inserting {key}");
        }
    }

    #[test]
    fn map_stays_well_formed_across_deletions() {
        let mut map = TstMap::new();
        for (index, key) in DICTIONARY.iter().copied().enumerate() {
            map.insert(key, index);
        }

        for key in DICTIONARY {
            assert!(map.remove(key).is_some());
            assert_eq!(WellFormedChecker::check(&map), Ok(()), "after removing {key}");
        }
        assert!(map.is_empty());
    }
}

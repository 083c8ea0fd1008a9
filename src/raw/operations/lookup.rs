//! Exact-match descent through the trie.

use core::cmp::Ordering;

use crate::raw::NodePtr;

/// Search in the tree rooted at `root` for the node at which the given key
/// terminates.
///
/// The walk descends `left`/`right` without consuming input and `middle`
/// while consuming one code point, the same descent insert and delete use.
/// The returned node may be structural-only; callers decide whether a
/// missing value counts as a miss.
///
/// # Safety
///  - This function cannot be called concurrently with any mutating
///    operation on `root` or any child node of `root`.
pub unsafe fn search_unchecked<V>(root: NodePtr<V>, points: &[char]) -> Option<NodePtr<V>> {
    debug_assert!(!points.is_empty(), "validation rejects empty keys");

    let mut current = root;
    let mut depth = 0;

    loop {
        // SAFETY: The no-concurrent-mutation requirement on this function
        // means this shared reference cannot alias a mutable one.
        let node = unsafe { current.as_ref() };

        current = match points[depth].cmp(&node.key) {
            Ordering::Less => node.left?,
            Ordering::Greater => node.right?,
            Ordering::Equal => {
                depth += 1;
                if depth == points.len() {
                    return Some(current);
                }
                node.middle?
            },
        };
    }
}

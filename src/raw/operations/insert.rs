//! Insertion of key/value pairs into the trie.

use core::cmp::Ordering;

use crate::raw::{NodePtr, TstNode};

/// The results of a successful trie insert.
#[derive(Debug)]
pub struct InsertResult<V> {
    /// The root after the insert has been applied.
    ///
    /// Only differs from the previous root when the tree was empty.
    pub new_root: NodePtr<V>,
    /// The value previously stored under the inserted key, if any.
    ///
    /// Callers use this to keep the entry count accurate: replacing a value
    /// must not count as a new key.
    pub existing: Option<V>,
}

/// Insert the key, already decoded to code points, into the tree rooted at
/// `root`.
///
/// Between one and `points.len()` nodes are created, one per code point of
/// the path segment that did not exist yet. Re-inserting a present key
/// replaces its value and reports the old one in
/// [`InsertResult::existing`].
///
/// # Safety
///  - `root`, if present, must be a unique pointer to the tree; no other
///    read or write of any tree node may overlap this call.
pub unsafe fn insert_unchecked<V>(
    root: Option<NodePtr<V>>,
    points: &[char],
    value: V,
) -> InsertResult<V> {
    debug_assert!(!points.is_empty(), "validation rejects empty keys");

    let mut value = Some(value);
    let mut existing = None;
    // SAFETY: Covered by the requirements on this function.
    let new_root = unsafe { insert_recursive(root, points, &mut value, &mut existing) };
    // SAFETY: `new_root` is either the previous root or a freshly allocated
    // node; the unique-tree requirement means no other reference to it is
    // live.
    unsafe { new_root.as_mut() }.parent = None;

    InsertResult { new_root, existing }
}

/// One level of the recursive descent: consumes one code point per middle
/// step, allocating a node when the link is empty.
///
/// Returns the node now occupying this link so the caller can store it and
/// aim its `parent` back-reference.
///
/// # Safety
///  - Same unique-tree requirements as [`insert_unchecked`].
unsafe fn insert_recursive<V>(
    link: Option<NodePtr<V>>,
    points: &[char],
    value: &mut Option<V>,
    existing: &mut Option<V>,
) -> NodePtr<V> {
    let point = points[0];
    let node_ptr = match link {
        Some(node_ptr) => node_ptr,
        None => NodePtr::allocate(TstNode::new(point)),
    };

    // SAFETY: The unique-tree requirement means this is the only live
    // reference to the node; the recursive calls below only ever reference
    // *other* nodes.
    let node = unsafe { node_ptr.as_mut() };

    match point.cmp(&node.key) {
        Ordering::Less => {
            // SAFETY: Covered by the requirements on this function.
            let child = unsafe { insert_recursive(node.left, points, value, existing) };
            // SAFETY: `child` lives in the left subtree, a different
            // allocation than `node`, so the references do not alias.
            unsafe { child.as_mut() }.parent = Some(node_ptr);
            node.left = Some(child);
        },
        Ordering::Greater => {
            // SAFETY: Covered by the requirements on this function.
            let child = unsafe { insert_recursive(node.right, points, value, existing) };
            // SAFETY: `child` lives in the right subtree, a different
            // allocation than `node`, so the references do not alias.
            unsafe { child.as_mut() }.parent = Some(node_ptr);
            node.right = Some(child);
        },
        Ordering::Equal => {
            if let [_] = points {
                // The key is exhausted at a node reached via equality: this
                // node terminates it. Replace rather than double-store.
                if let Some(value) = value.take() {
                    *existing = node.value.replace(value);
                }
            } else {
                // SAFETY: Covered by the requirements on this function.
                let child =
                    unsafe { insert_recursive(node.middle, &points[1..], value, existing) };
                // SAFETY: `child` lives in the middle subtree, a different
                // allocation than `node`, so the references do not alias.
                unsafe { child.as_mut() }.parent = Some(node_ptr);
                node.middle = Some(child);
            }
        },
    }

    node_ptr
}

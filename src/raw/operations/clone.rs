//! Deep copies of the node graph.

use crate::raw::{NodePtr, TstNode};

/// Clone the subtree rooted at `root`, returning the new subtree's root with
/// its `parent` back-reference cleared.
///
/// # Safety
///  - This function cannot be called concurrently with any mutating
///    operation on `root` or any child node of `root`.
pub unsafe fn clone_tree<V: Clone>(root: NodePtr<V>) -> NodePtr<V> {
    // SAFETY: Shared walk, covered by the requirements on this function.
    let node = unsafe { root.as_ref() };

    let mut copy = TstNode::new(node.key);
    copy.value = node.value.clone();
    let copy_ptr = NodePtr::allocate(copy);

    // SAFETY: Covered by the requirements on this function.
    let left = unsafe { clone_child(node.left, copy_ptr) };
    let middle = unsafe { clone_child(node.middle, copy_ptr) };
    let right = unsafe { clone_child(node.right, copy_ptr) };

    {
        // SAFETY: The copy is freshly allocated; no other reference to it
        // is live.
        let copy = unsafe { copy_ptr.as_mut() };
        copy.left = left;
        copy.middle = middle;
        copy.right = right;
    }

    copy_ptr
}

/// Clone one child link, aiming the copy's `parent` at the copied parent.
///
/// # Safety
///  - Same requirements as [`clone_tree`].
unsafe fn clone_child<V: Clone>(
    link: Option<NodePtr<V>>,
    parent: NodePtr<V>,
) -> Option<NodePtr<V>> {
    link.map(|child| {
        // SAFETY: Covered by the requirements on this function.
        let child_copy = unsafe { clone_tree(child) };
        // SAFETY: The copy is freshly allocated; no other reference to it
        // is live.
        unsafe { child_copy.as_mut() }.parent = Some(parent);
        child_copy
    })
}

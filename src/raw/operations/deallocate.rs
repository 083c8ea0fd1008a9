//! Teardown of whole subtrees.

use alloc::vec::Vec;

use crate::raw::NodePtr;

/// Deallocate the given node and every node below it.
///
/// Values still stored in the subtree are dropped along with their nodes.
///
/// # Safety
///  - This function must only be called once for this root node and all
///    descendants, otherwise a double-free could result.
///  - This function should not be called concurrently with any read of the
///    tree, otherwise it could result in a use-after-free.
pub unsafe fn deallocate_tree<V>(root: NodePtr<V>) {
    let mut stack = Vec::new();

    stack.push(root);

    while let Some(node_ptr) = stack.pop() {
        {
            // SAFETY: The scope of this reference is bounded; the
            // deallocation of the node happens after the lifetime ends.
            let node = unsafe { node_ptr.as_ref() };
            stack.extend([node.left, node.middle, node.right].into_iter().flatten());
        }

        // SAFETY: The single call per node requirement is enforced by the
        // safety requirements on this function.
        drop(unsafe { NodePtr::deallocate(node_ptr) });
    }
}

//! Removal of keys from the trie.
//!
//! Deletion is the most delicate routine here. Clearing a value can leave a
//! chain of dead ancestors that must be unlinked one by one, and
//! structurally removing a node that still has both BST children requires
//! promoting a replacement without breaking the left < node < right
//! ordering. Every rewritten link has a matching `parent` back-reference to
//! keep consistent.

use core::fmt;

use crate::raw::{search_unchecked, NodePtr};

/// A location in the trie holding a value that can be deleted.
pub struct DeletePoint<V> {
    /// The node whose value terminates the key being removed.
    pub node: NodePtr<V>,
}

impl<V> fmt::Debug for DeletePoint<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeletePoint").field("node", &self.node).finish()
    }
}

/// The results of a successful delete operation.
#[derive(Debug)]
pub struct DeleteResult<V> {
    /// The new root for the tree, after the delete has been applied.
    ///
    /// If `None`, that means the tree is now empty.
    pub new_root: Option<NodePtr<V>>,
    /// The value that was removed.
    pub removed: V,
}

/// Search in the given tree for the node to delete, returning `None` if the
/// key is absent or terminates at a structural-only node.
///
/// # Safety
///  - This function cannot be called concurrently with any mutating
///    operation on `root` or any child node of `root`.
pub unsafe fn search_for_delete_point<V>(
    root: NodePtr<V>,
    points: &[char],
) -> Option<DeletePoint<V>> {
    // SAFETY: Covered by the requirements on this function.
    let node = unsafe { search_unchecked(root, points) }?;
    // SAFETY: Covered by the requirements on this function.
    unsafe { node.as_ref() }
        .value
        .is_some()
        .then_some(DeletePoint { node })
}

impl<V> DeletePoint<V> {
    /// Take the value out and repair the structure around the node, after
    /// the point has been found.
    ///
    /// # Safety
    ///  - `root` must be a unique pointer to the tree containing this
    ///    delete point; no other read or write of any tree node may overlap
    ///    this call.
    ///  - Pointers into the tree obtained before this call may be
    ///    invalidated; the surviving root is returned in [`DeleteResult`].
    pub unsafe fn apply(self, root: NodePtr<V>) -> DeleteResult<V> {
        let DeletePoint { node } = self;

        // SAFETY: The unique-tree requirement means no other reference to
        // the node is live; the reference ends before the rewrites below.
        let removed = unsafe { node.as_mut() }
            .value
            .take()
            .expect("delete point always holds a value");

        let mut new_root = Some(root);
        // SAFETY: Covered by the requirements on this function.
        unsafe { prune(node, &mut new_root) };

        DeleteResult { new_root, removed }
    }
}

/// Structurally remove the (already valueless) node if the trie no longer
/// needs it, in order of case specificity.
///
/// # Safety
///  - Same unique-tree requirements as [`DeletePoint::apply`]; `new_root`
///    must currently name the tree's root.
unsafe fn prune<V>(node: NodePtr<V>, new_root: &mut Option<NodePtr<V>>) {
    let (parent, left, middle, right) = {
        // SAFETY: Scoped shared reference, no overlapping mutation.
        let n = unsafe { node.as_ref() };
        debug_assert!(n.value.is_none(), "only valueless nodes are pruned");
        (n.parent, n.left, n.middle, n.right)
    };

    // A middle child means longer keys still route through this node; the
    // cleared value was the whole removal.
    if middle.is_some() {
        return;
    }

    match (left, right) {
        (None, None) => {
            // SAFETY: Covered by the requirements on this function.
            unsafe { remove_dead_leaf(node, parent, new_root) };
        },
        (Some(child), None) | (None, Some(child)) => {
            // A single BST child slides into the node's slot.
            // SAFETY: Covered by the requirements on this function.
            unsafe { replace_in_parent(node, parent, Some(child), new_root) };
            // SAFETY: `child` is a different allocation than any reference
            // taken above; aiming its back-reference at the grandparent
            // keeps the parent invariant.
            unsafe { child.as_mut() }.parent = parent;
            // SAFETY: Every link into the node has been rewritten; nothing
            // references it anymore.
            drop(unsafe { NodePtr::deallocate(node) });
        },
        (Some(left), Some(right)) => {
            // SAFETY: Covered by the requirements on this function.
            unsafe { promote_predecessor(node, parent, left, right, new_root) };
        },
    }
}

/// Splice a childless, valueless node out of its parent's slot, then walk
/// upward: each ancestor left valueless and childless by the splice is
/// itself removed.
///
/// # Safety
///  - Same unique-tree requirements as [`DeletePoint::apply`].
unsafe fn remove_dead_leaf<V>(
    node: NodePtr<V>,
    parent: Option<NodePtr<V>>,
    new_root: &mut Option<NodePtr<V>>,
) {
    let mut current = node;
    let mut parent = parent;

    loop {
        let Some(parent_ptr) = parent else {
            // The dead leaf was the root; the tree is now empty.
            *new_root = None;
            // SAFETY: The root slot no longer references the node.
            drop(unsafe { NodePtr::deallocate(current) });
            return;
        };

        // SAFETY: Covered by the requirements on this function.
        unsafe { set_child_link(parent_ptr, current, None) };
        // SAFETY: The parent's link was the only remaining reference.
        drop(unsafe { NodePtr::deallocate(current) });

        // SAFETY: Scoped shared reference, no overlapping mutation.
        let p = unsafe { parent_ptr.as_ref() };
        if p.value.is_some() || !p.is_childless() {
            return;
        }
        current = parent_ptr;
        parent = p.parent;
    }
}

/// Replace a node that has both BST children and no middle child with the
/// rightmost node of its left subtree, its in-order predecessor, preserving
/// the left < node < right ordering.
///
/// # Safety
///  - Same unique-tree requirements as [`DeletePoint::apply`].
unsafe fn promote_predecessor<V>(
    node: NodePtr<V>,
    parent: Option<NodePtr<V>>,
    left: NodePtr<V>,
    right: NodePtr<V>,
    new_root: &mut Option<NodePtr<V>>,
) {
    // Walk to the in-order predecessor: the rightmost node reachable from
    // the left child without crossing a middle edge.
    let mut pred = left;
    // SAFETY: Scoped shared references, no overlapping mutation.
    while let Some(next) = unsafe { pred.as_ref() }.right {
        pred = next;
    }

    // Detach the predecessor. The rightmost node cannot have a right child,
    // so the only subtree to hoist into its old slot is its left one.
    let (pred_parent, pred_left) = {
        // SAFETY: Scoped shared reference, no overlapping mutation.
        let p = unsafe { pred.as_ref() };
        debug_assert!(p.right.is_none(), "rightmost node cannot have a right child");
        (p.parent, p.left)
    };
    let pred_parent = pred_parent.expect("predecessor has at least the deleted node above it");
    // SAFETY: Covered by the requirements on this function. When the left
    // child itself is the predecessor, `pred_parent` is the deleted node and
    // this rewrites its left link.
    unsafe { set_child_link(pred_parent, pred, pred_left) };
    if let Some(hoisted) = pred_left {
        // SAFETY: `hoisted` is a different allocation; no reference alive.
        unsafe { hoisted.as_mut() }.parent = Some(pred_parent);
    }

    // Re-read the deleted node's left link: the detach above rewrote it in
    // the case where the predecessor was that left child.
    // SAFETY: Scoped shared reference, no overlapping mutation.
    let left = unsafe { node.as_ref() }.left;

    // The predecessor takes over the deleted node's subtrees and slot.
    {
        // SAFETY: No other reference to the predecessor is alive here.
        let p = unsafe { pred.as_mut() };
        p.left = left;
        p.right = Some(right);
        p.parent = parent;
    }
    if let Some(attached) = left {
        // SAFETY: Distinct allocation from all references above.
        unsafe { attached.as_mut() }.parent = Some(pred);
    }
    // SAFETY: Distinct allocation from all references above.
    unsafe { right.as_mut() }.parent = Some(pred);

    // SAFETY: Covered by the requirements on this function.
    unsafe { replace_in_parent(node, parent, Some(pred), new_root) };

    // SAFETY: Every link into the node has been rewritten.
    drop(unsafe { NodePtr::deallocate(node) });
}

/// Put `replacement` where `node` currently sits: the matching child slot of
/// `parent`, or the tree root when there is no parent.
///
/// # Safety
///  - Same unique-tree requirements as [`DeletePoint::apply`]; when
///    `parent` is `None`, `node` must be the node `new_root` names.
unsafe fn replace_in_parent<V>(
    node: NodePtr<V>,
    parent: Option<NodePtr<V>>,
    replacement: Option<NodePtr<V>>,
    new_root: &mut Option<NodePtr<V>>,
) {
    match parent {
        // SAFETY: Covered by the requirements on this function.
        Some(parent_ptr) => unsafe { set_child_link(parent_ptr, node, replacement) },
        None => *new_root = replacement,
    }
}

/// Rewrite whichever of the parent's child links points at `old` to point at
/// `new` instead.
///
/// # Safety
///  - `parent` must link to `old` through one of its child slots.
///  - No other reference to the parent node may be live.
unsafe fn set_child_link<V>(parent: NodePtr<V>, old: NodePtr<V>, new: Option<NodePtr<V>>) {
    // SAFETY: Covered by the requirements on this function.
    let p = unsafe { parent.as_mut() };
    if p.left == Some(old) {
        p.left = new;
    } else if p.middle == Some(old) {
        p.middle = new;
    } else if p.right == Some(old) {
        p.right = new;
    } else {
        unreachable!("parent does not link to the node being replaced");
    }
}

//! The in-memory representation of trie nodes.

use alloc::boxed::Box;
use core::{fmt, ptr::NonNull};

/// A single node of the ternary search trie.
///
/// Each node matches exactly one Unicode code point of some stored key. The
/// `left`/`right` links order sibling code points competing for the same key
/// position, while the `middle` link advances the match by one code point. A
/// node terminates a stored key iff [`value`][TstNode::value] is present; a
/// node may hold a value and still have children in any position (e.g. when
/// both `"foo"` and `"fooo"` are stored).
#[derive(Debug)]
pub struct TstNode<V> {
    /// The code point this node matches.
    pub key: char,
    /// The payload, present only at nodes that terminate a stored key.
    pub value: Option<V>,
    /// Non-owning back-reference to the node whose `left`/`middle`/`right`
    /// link reaches this node, `None` at the root.
    ///
    /// Used only for structural re-linking during delete. It must never be
    /// consulted for ownership, destruction order, or lifetime decisions;
    /// the owning direction is strictly parent-to-child.
    pub parent: Option<NodePtr<V>>,
    /// Owned subtree of code points ordering before [`key`][TstNode::key] at
    /// this key position.
    pub left: Option<NodePtr<V>>,
    /// Owned subtree continuing the match one code point further.
    pub middle: Option<NodePtr<V>>,
    /// Owned subtree of code points ordering after [`key`][TstNode::key].
    pub right: Option<NodePtr<V>>,
}

impl<V> TstNode<V> {
    /// Create a childless, valueless node matching the given code point.
    pub fn new(key: char) -> Self {
        TstNode {
            key,
            value: None,
            parent: None,
            left: None,
            middle: None,
            right: None,
        }
    }

    /// Returns `true` if the node has no child in any position.
    pub fn is_childless(&self) -> bool {
        self.left.is_none() && self.middle.is_none() && self.right.is_none()
    }
}

/// A pointer to a [`TstNode`].
#[repr(transparent)]
pub struct NodePtr<V>(NonNull<TstNode<V>>);

impl<V> NodePtr<V> {
    /// Move the given node to the heap and return a pointer that owns the
    /// allocation.
    pub fn allocate(node: TstNode<V>) -> Self {
        NodePtr(NonNull::from(Box::leak(Box::new(node))))
    }

    /// Take the node off the heap, releasing its allocation and returning
    /// the contents.
    ///
    /// The returned node still carries its value and child links; dropping
    /// it drops the value but leaves the children untouched, since child
    /// pointers do not own through `Drop`.
    ///
    /// # Safety
    ///  - This function can only be called once for a given node object,
    ///    otherwise a double-free could result.
    ///  - The pointer must have been returned by [`NodePtr::allocate`].
    ///  - No reference to the node may be live across this call.
    #[must_use]
    pub unsafe fn deallocate(node: Self) -> TstNode<V> {
        // SAFETY: The pointer originates from `Box::leak` in `allocate`, and
        // the single-call requirement means the box has not been reclaimed
        // yet.
        *unsafe { Box::from_raw(node.0.as_ptr()) }
    }

    /// Returns a shared reference to the node.
    ///
    /// # Safety
    ///  - You must enforce Rust's aliasing rules, since the returned
    ///    lifetime `'a` is arbitrarily chosen and does not necessarily
    ///    reflect the actual lifetime of the node. In particular, for the
    ///    duration of this lifetime, the node the pointer points to must not
    ///    get mutated.
    pub unsafe fn as_ref<'a>(self) -> &'a TstNode<V> {
        // SAFETY: The pointer is properly aligned and points to an
        // initialized node because it was constructed in `allocate`. The
        // lifetime requirements are passed up to the invoker.
        unsafe { self.0.as_ref() }
    }

    /// Returns a unique mutable reference to the node.
    ///
    /// # Safety
    ///  - You must enforce Rust's aliasing rules, since the returned
    ///    lifetime `'a` is arbitrarily chosen and does not necessarily
    ///    reflect the actual lifetime of the node. In particular, for the
    ///    duration of this lifetime, the node the pointer points to must not
    ///    get accessed (read or written) through any other pointer.
    pub unsafe fn as_mut<'a>(mut self) -> &'a mut TstNode<V> {
        // SAFETY: The pointer is properly aligned and points to an
        // initialized node because it was constructed in `allocate`. The
        // lifetime requirements are passed up to the invoker.
        unsafe { self.0.as_mut() }
    }

    /// Returns a shared reference to the node's value, if it holds one.
    ///
    /// # Safety
    ///  - Same aliasing requirements as [`NodePtr::as_ref`].
    pub unsafe fn as_value_ref<'a>(self) -> Option<&'a V> {
        // SAFETY: Covered by the requirements on this function.
        unsafe { self.as_ref() }.value.as_ref()
    }

    /// Returns a unique mutable reference to the node's value, if it holds
    /// one.
    ///
    /// # Safety
    ///  - Same aliasing requirements as [`NodePtr::as_mut`].
    pub unsafe fn as_value_mut<'a>(self) -> Option<&'a mut V> {
        // SAFETY: Covered by the requirements on this function.
        unsafe { self.as_mut() }.value.as_mut()
    }

    /// Acquires the underlying `*mut` pointer.
    pub fn to_ptr(self) -> *mut TstNode<V> {
        self.0.as_ptr()
    }
}

impl<V> Clone for NodePtr<V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<V> Copy for NodePtr<V> {}

impl<V> From<&mut TstNode<V>> for NodePtr<V> {
    fn from(node_ref: &mut TstNode<V>) -> Self {
        NodePtr(NonNull::from(node_ref))
    }
}

impl<V> PartialEq for NodePtr<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<V> Eq for NodePtr<V> {}

impl<V> fmt::Debug for NodePtr<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodePtr").field(&self.0).finish()
    }
}

impl<V> fmt::Pointer for NodePtr<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.0, f)
    }
}

//! Iterators over the map, driven by an explicit traversal stack.
//!
//! The emission order everywhere is the depth-first left / node / middle /
//! right walk: a node's accumulated key surfaces after its whole left
//! subtree and before its middle subtree.

use alloc::{string::String, vec::Vec};

use crate::raw::NodePtr;

mod into_iter;
mod iterator;
mod prefix;

pub use into_iter::*;
pub use iterator::*;
pub use prefix::*;

/// One pending step of the depth-first walk.
///
/// `Explore` schedules a subtree together with the key accumulated on the
/// way to it; `Emit` surfaces a node whose full key has already been built.
pub(crate) enum Step<V> {
    Explore(NodePtr<V>, String),
    Emit(NodePtr<V>, String),
}

/// Push the steps for one node so that the pops come out in left, node,
/// middle, right order.
///
/// # Safety
///  - No mutation of the tree may overlap the consumption of this stack.
pub(crate) unsafe fn expand<V>(stack: &mut Vec<Step<V>>, node_ptr: NodePtr<V>, prefix: String) {
    // SAFETY: Scoped shared reference, covered by the caller.
    let node = unsafe { node_ptr.as_ref() };

    let mut word = prefix.clone();
    word.push(node.key);

    // Pushed in reverse of the pop order.
    if let Some(right) = node.right {
        stack.push(Step::Explore(right, prefix.clone()));
    }
    if let Some(middle) = node.middle {
        stack.push(Step::Explore(middle, word.clone()));
    }
    stack.push(Step::Emit(node_ptr, word));
    if let Some(left) = node.left {
        stack.push(Step::Explore(left, prefix));
    }
}

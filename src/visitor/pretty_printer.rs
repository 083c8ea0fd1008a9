//! Printers that render the node graph for humans.

use alloc::string::String;
use core::fmt::{self, Display, Write};

use crate::{raw::NodePtr, TstMap};

/// Renders the trie as indented text, one node per line.
///
/// Each line carries the edge kind that reached the node (`L`/`M`/`R`, the
/// root has none), the node's code point, and the value when the node
/// terminates a stored key.
///
/// # Examples
///
/// ```rust
/// use tstrie::{visitor::TreePrinter, TstMap};
///
/// let mut map = TstMap::new();
/// map.insert("ab", 1);
/// map.insert("ac", 2);
///
/// let rendering = TreePrinter::render(&map);
/// assert_eq!(rendering.lines().count(), 3);
/// assert!(rendering.contains("'b' => 1"));
/// ```
pub struct TreePrinter;

impl TreePrinter {
    /// Write the rendering of the given map to `output`.
    pub fn print_tree<V: Display, O: Write>(output: &mut O, map: &TstMap<V>) -> fmt::Result {
        match map.root_ptr() {
            // SAFETY: The shared map borrow precludes mutation for the
            // duration of the walk.
            Some(root) => unsafe { Self::print_node(output, root, 0, "") },
            None => writeln!(output, "(empty)"),
        }
    }

    /// Render the given map into a fresh [`String`].
    pub fn render<V: Display>(map: &TstMap<V>) -> String {
        let mut output = String::new();
        Self::print_tree(&mut output, map).expect("fmt::Write to a String cannot fail");
        output
    }

    /// Write one node line, then recurse into the children.
    ///
    /// # Safety
    ///  - No mutation of the subtree may overlap this call.
    unsafe fn print_node<V: Display, O: Write>(
        output: &mut O,
        node_ptr: NodePtr<V>,
        depth: usize,
        edge: &str,
    ) -> fmt::Result {
        // SAFETY: Covered by the requirements on this function.
        let node = unsafe { node_ptr.as_ref() };

        for _ in 0..depth {
            output.write_str("    ")?;
        }
        match &node.value {
            Some(value) => writeln!(output, "{edge}{:?} => {value}", node.key)?,
            None => writeln!(output, "{edge}{:?}", node.key)?,
        }

        if let Some(left) = node.left {
            // SAFETY: Covered by the requirements on this function.
            unsafe { Self::print_node(output, left, depth + 1, "L ")? };
        }
        if let Some(middle) = node.middle {
            // SAFETY: Covered by the requirements on this function.
            unsafe { Self::print_node(output, middle, depth + 1, "M ")? };
        }
        if let Some(right) = node.right {
            // SAFETY: Covered by the requirements on this function.
            unsafe { Self::print_node(output, right, depth + 1, "R ")? };
        }

        Ok(())
    }
}

/// A visitor of the trie that will print the tree in "dot" notation.
///
/// See ['DOT Language | Graphviz'](https://graphviz.org/doc/info/lang.html)
/// for information about syntax and examples of the language.
#[cfg(feature = "std")]
pub struct DotPrinter<O: std::io::Write> {
    output: O,
    next_id: usize,
}

#[cfg(feature = "std")]
impl<O: std::io::Write> DotPrinter<O> {
    /// Write the dot-format of the given map to the given output.
    pub fn print_tree<V: Display>(output: O, map: &TstMap<V>) -> std::io::Result<()> {
        let mut visitor = DotPrinter { output, next_id: 0 };

        visitor.output_prelude()?;
        if let Some(root) = map.root_ptr() {
            // SAFETY: The shared map borrow precludes mutation for the
            // duration of the walk.
            let _ = unsafe { visitor.write_node(root) }?;
        }
        visitor.output_epilogue()
    }

    fn output_prelude(&mut self) -> std::io::Result<()> {
        writeln!(self.output, "strict digraph G {{")?;
        writeln!(self.output, "node [shape=record]")
    }

    fn output_epilogue(&mut self) -> std::io::Result<()> {
        writeln!(self.output, "}}")
    }

    fn get_id(&mut self) -> usize {
        let new_id = self.next_id;
        self.next_id += 1;
        new_id
    }

    /// Write one node record plus the labeled edges to its children.
    ///
    /// # Safety
    ///  - No mutation of the subtree may overlap this call.
    unsafe fn write_node<V: Display>(&mut self, node_ptr: NodePtr<V>) -> std::io::Result<usize> {
        // SAFETY: Covered by the requirements on this function.
        let node = unsafe { node_ptr.as_ref() };

        let node_id = self.get_id();
        write!(self.output, "n{node_id} ")?;
        match &node.value {
            Some(value) => writeln!(self.output, "[label=\"{{{:?} | {value}}}\"]", node.key)?,
            None => writeln!(self.output, "[label=\"{{{:?} | -}}\"]", node.key)?,
        }

        let children = [("L", node.left), ("M", node.middle), ("R", node.right)];
        for (edge, child) in children {
            if let Some(child) = child {
                // SAFETY: Covered by the requirements on this function.
                let child_id = unsafe { self.write_node(child) }?;
                writeln!(self.output, "n{node_id} -> n{child_id} [label=\"{edge}\"]")?;
            }
        }

        Ok(node_id)
    }
}

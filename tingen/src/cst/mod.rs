//! # Concrete syntax trees
//! The [Cst] struct is the tree the parser driver builds: a label plus an
//! ordered list of children, leaves carrying the shifted token text.
//!
//! [Cst::to_pseudocode] lowers a tree to three-address pseudocode. Chains of
//! single-child nodes are collapsed to their child first, then every
//! remaining interior node gets a fresh temporary `t<k>` and two lines of
//! output: a binding of the node's label to the temporary, and an
//! assignment of the children (leaf labels or child temporaries) into it.
//!
//! ```
//! use tingen::cst::Cst;
//!
//! let tree = Cst::with_children(
//!     "E".into(),
//!     vec![Cst::leaf("identifier -> x"), Cst::leaf("+"), Cst::leaf("identifier -> y")],
//! );
//! assert_eq!(
//!     tree.to_pseudocode(),
//!     vec![
//!         "E = t1".to_string(),
//!         "t1 := identifier -> x + identifier -> y".to_string(),
//!     ],
//! );
//! ```

use std::rc::Rc;

/// A node of the concrete syntax tree. Children are owned by their parent;
/// the tree is finite and acyclic by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cst {
    pub(crate) label: Rc<str>,
    pub(crate) children: Vec<Cst>,
}

impl Cst {
    /// A leaf node
    pub fn leaf(label: impl Into<Rc<str>>) -> Self {
        Cst {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// An interior node with the given children
    pub fn with_children(label: Rc<str>, children: Vec<Cst>) -> Self {
        Cst { label, children }
    }

    /// The label of this node
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The children of this node
    pub fn children(&self) -> &[Cst] {
        &self.children
    }

    /// The leaf labels in left-to-right order: the yield of the tree, which
    /// for a parser-built tree is the formatted input token sequence.
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a str>) {
        if self.children.is_empty() {
            leaves.push(&self.label);
        } else {
            for child in &self.children {
                child.collect_leaves(leaves);
            }
        }
    }

    /// Skips through single-child chains; a node with exactly one child is
    /// replaced by that child before emission.
    fn collapsed(&self) -> &Cst {
        let mut node = self;
        while node.children.len() == 1 {
            node = &node.children[0];
        }
        node
    }

    /// Lowers the tree to three-address pseudocode. Temporaries are numbered
    /// in discovery order, parents before their children; the assignment
    /// line of a node is reserved before its children emit, so each node's
    /// two lines stay adjacent and parents precede children in the output.
    pub fn to_pseudocode(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut counter = 1;
        self.lower(&mut lines, &mut counter);
        lines
    }

    /// Emits the pseudocode of one subtree. Returns the operand naming the
    /// subtree's value: its temporary for interior nodes, the label itself
    /// for leaves.
    fn lower(&self, lines: &mut Vec<String>, counter: &mut usize) -> String {
        let node = self.collapsed();
        if node.children.is_empty() {
            return node.label.to_string();
        }
        let temp = format!("t{counter}");
        *counter += 1;
        lines.push(format!("{} = {}", node.label, temp));
        let slot = lines.len();
        lines.push(String::new());
        let operands: Vec<String> = node
            .children
            .iter()
            .map(|child| child.lower(lines, counter))
            .collect();
        lines[slot] = format!("{} := {}", temp, operands.join(" "));
        temp
    }
}

//! Test fixtures: a minimal owned document tree.
//!
//! Validation runs against any type implementing
//! [`DocumentNode`](crate::validator::DocumentNode); production callers bring
//! their own tree. [`TreeNode`] is the in-crate implementation used by unit
//! and integration tests, with free-function builders so fixture trees read
//! like the documents they describe:
//!
//! ```rust,ignore
//! let doc = elem("book", vec![
//!     elem_with_text("title", "X"),
//!     elem_with_text("chapter", "a"),
//! ]);
//! ```

use crate::validator::DocumentNode;

/// An owned tree node. `name` is `None` for anonymous text nodes; `text` is
/// the content carried directly by this node, the shape mixed-content
/// documents use for text runs between elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: Option<String>,
    pub text: Option<String>,
    pub children: Vec<TreeNode>,
}

/// An element node with the given children.
pub fn elem(name: &str, children: Vec<TreeNode>) -> TreeNode {
    TreeNode {
        name: Some(name.to_string()),
        text: None,
        children,
    }
}

/// A leaf element carrying its text directly.
pub fn elem_with_text(name: &str, text: &str) -> TreeNode {
    TreeNode {
        name: Some(name.to_string()),
        text: Some(text.to_string()),
        children: Vec::new(),
    }
}

/// An anonymous text node.
pub fn text(content: &str) -> TreeNode {
    TreeNode {
        name: None,
        text: Some(content.to_string()),
        children: Vec::new(),
    }
}

impl DocumentNode for TreeNode {
    fn element_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn has_text(&self) -> bool {
        self.text.is_some()
    }

    fn children(&self) -> Vec<&TreeNode> {
        self.children.iter().collect()
    }
}

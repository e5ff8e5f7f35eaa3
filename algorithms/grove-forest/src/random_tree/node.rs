#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A node of a binary decision tree
///
/// Every node carries the action which led to it from its parent, e.g. `"A <= 4"`. A split node
/// owns either no children (an unlinked split) or exactly two, ordered
/// `[row[column] <= threshold, row[column] > threshold]`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Split {
        action: String,
        column: usize,
        threshold: f64,
        children: Option<Box<[Node; 2]>>,
    },
    Leaf {
        action: String,
        classification: bool,
    },
}

impl Node {
    pub fn leaf<S: Into<String>>(action: S, classification: bool) -> Self {
        Node::Leaf {
            action: action.into(),
            classification,
        }
    }

    /// Split node with both children attached
    pub fn branch<S: Into<String>>(
        action: S,
        column: usize,
        threshold: f64,
        le: Node,
        g: Node,
    ) -> Self {
        Node::Split {
            action: action.into(),
            column,
            threshold,
            children: Some(Box::new([le, g])),
        }
    }

    /// Split node without children
    pub fn unlinked<S: Into<String>>(action: S, column: usize, threshold: f64) -> Self {
        Node::Split {
            action: action.into(),
            column,
            threshold,
            children: None,
        }
    }

    pub fn action(&self) -> &str {
        match self {
            Node::Split { action, .. } | Node::Leaf { action, .. } => action,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Classification of a leaf, `None` for split nodes
    pub fn classification(&self) -> Option<bool> {
        match self {
            Node::Leaf { classification, .. } => Some(*classification),
            Node::Split { .. } => None,
        }
    }

    /// Feature column and threshold of a split, `None` for leaves
    pub fn split(&self) -> Option<(usize, f64)> {
        match self {
            Node::Split {
                column, threshold, ..
            } => Some((*column, *threshold)),
            Node::Leaf { .. } => None,
        }
    }

    /// Children in `[<=, >]` order; empty for leaves and unlinked splits
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Split {
                children: Some(children),
                ..
            } => &children[..],
            _ => &[],
        }
    }

    /// Graphviz attributes of this node
    ///
    /// Leaves show their classification as `0` or `1`, splits show their column. The `\n` in the
    /// label is a literal backslash followed by `n`.
    pub fn draw(&self) -> String {
        match self {
            Node::Leaf {
                action,
                classification,
            } => format!(
                "shape=ellipse,label=\"({})\\n{}\"",
                action, *classification as u8
            ),
            Node::Split { action, column, .. } => {
                format!("shape=box,label=\"({})\\n{}\"", action, column)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_node() {
        let node = Node::leaf("Some Action", true);
        assert!(node.is_leaf());
        assert_eq!(node.action(), "Some Action");
        assert_eq!(node.classification(), Some(true));
        assert_eq!(node.split(), None);
        assert!(node.children().is_empty());
        assert_eq!(node.draw(), "shape=ellipse,label=\"(Some Action)\\n1\"");
        assert_eq!(
            Node::leaf("Some Action", false).draw(),
            "shape=ellipse,label=\"(Some Action)\\n0\""
        );
    }

    #[test]
    fn split_node() {
        let node = Node::unlinked("Some Action", 2, 0.5);
        assert!(!node.is_leaf());
        assert_eq!(node.classification(), None);
        assert_eq!(node.split(), Some((2, 0.5)));
        assert!(node.children().is_empty());
        assert_eq!(node.draw(), "shape=box,label=\"(Some Action)\\n2\"");

        let node = Node::branch("x", 0, 1.0, Node::leaf("le", false), Node::leaf("g", true));
        let actions: Vec<_> = node.children().iter().map(Node::action).collect();
        assert_eq!(actions, ["le", "g"]);
    }
}

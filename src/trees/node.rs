use crate::data::{Attributes, Label, RealNumber};

/// Decision tree node
#[derive(Clone, Debug, PartialEq)]
pub enum Node<T: RealNumber> {
    Leaf {
        label: Label,
    },
    /// `positive` takes records whose `feature` value exceeds `threshold`.
    Internal {
        feature: usize,
        threshold: T,
        positive: Box<Node<T>>,
        negative: Box<Node<T>>,
    },
}

impl<T: RealNumber> Node<T> {
    pub fn leaf(label: Label) -> Self {
        Node::Leaf { label }
    }

    pub fn internal(feature: usize, threshold: T, positive: Node<T>, negative: Node<T>) -> Self {
        Node::Internal {
            feature,
            threshold,
            positive: Box::new(positive),
            negative: Box::new(negative),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Walks from this node to a leaf.
    pub fn predict<A: Attributes<T> + ?Sized>(&self, attributes: &A) -> Label {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { label } => return *label,
                Node::Internal {
                    feature,
                    threshold,
                    positive,
                    negative,
                } => {
                    node = if attributes.attribute(*feature) > *threshold {
                        positive.as_ref()
                    } else {
                        negative.as_ref()
                    };
                }
            }
        }
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal {
                positive, negative, ..
            } => 1 + positive.depth().max(negative.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal {
                positive, negative, ..
            } => positive.leaf_count() + negative.leaf_count(),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal {
                positive, negative, ..
            } => 1 + positive.node_count() + negative.node_count(),
        }
    }
}

use ndarray::{Array1, ArrayView1};

use crate::{projection::Projection, FittedModel};

mod fitter;
pub mod params;

pub use fitter::{fit, fit_rows};
pub use params::{SimilarityTreeParams, SimilarityTreeParamsBuilder};

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf,
    Split {
        p: Array1<f64>,
        q: Array1<f64>,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// 1 at the root, incremented for every internal ancestor.
    pub depth: usize,
    pub kind: NodeKind,
}

impl Node {
    pub const fn leaf(depth: usize) -> Self {
        Self {
            depth,
            kind: NodeKind::Leaf,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }
}

/// A fitted similarity tree. Nodes live in an arena and refer to their children by index,
/// children are always stored before their parent.
#[derive(Debug, Clone)]
pub struct SimilarityTree {
    nodes: Vec<Node>,
    root: usize,
    projection: Projection,
}

impl SimilarityTree {
    pub(crate) fn new(nodes: Vec<Node>, root: usize, projection: Projection) -> Self {
        debug_assert!(root < nodes.len());
        Self {
            nodes,
            root,
            projection,
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Deepest level reached by any node.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    pub fn n_leaves(&self) -> usize {
        self.leaves().count()
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(|node| node.is_leaf())
    }
}

impl FittedModel for SimilarityTree {
    /// Depth of the first node where `xi` and `xj` take different branches, or the depth of
    /// the leaf they share.
    fn distance(&self, xi: ArrayView1<f64>, xj: ArrayView1<f64>) -> usize {
        let mut node = self.root();
        loop {
            match &node.kind {
                NodeKind::Leaf => return node.depth,
                NodeKind::Split {
                    p,
                    q,
                    threshold,
                    left,
                    right,
                } => {
                    let i_left = self.projection.project(xi, p.view(), q.view()) <= *threshold;
                    let j_left = self.projection.project(xj, p.view(), q.view()) <= *threshold;
                    if i_left != j_left {
                        return node.depth;
                    }
                    node = &self.nodes[if i_left { *left } else { *right }];
                }
            }
        }
    }
}

use std::fmt::{self, Debug};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::depth::Depth;
use crate::node::Color;

/// Read-only view of a colored binary tree. Implemented by
/// [`RbTree`](crate::RbTree) and [`Snapshot`](crate::Snapshot), so the
/// validator also accepts trees that never went through the engine.
pub trait Shape {
    type Key;
    type Handle: Copy;

    /// Root node, None for an empty tree.
    fn top(&self) -> Option<Self::Handle>;

    fn left_of(&self, node: Self::Handle) -> Option<Self::Handle>;

    fn right_of(&self, node: Self::Handle) -> Option<Self::Handle>;

    fn key_of(&self, node: Self::Handle) -> &Self::Key;

    fn color_of(&self, node: Self::Handle) -> Color;
}

/// Rules checked by [`validate`]. Variants map to the five red-black
/// properties plus BST ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Property {
    /// 1. Every node is red or black. Guaranteed by [`Color`].
    Color,
    /// 2. Root is black.
    RootBlack,
    /// 3. NIL leaves are black. Guaranteed, leaves are not stored.
    NilBlack,
    /// 4. Red nodes have black children.
    RedRed,
    /// 5. Same number of black nodes on every path down to NIL.
    BlackHeight,
    /// In-order keys are non-decreasing.
    Ordering,
}

impl Property {
    /// Red-black property number, None for BST ordering.
    pub fn number(&self) -> Option<u8> {
        match self {
            Property::Color => Some(1),
            Property::RootBlack => Some(2),
            Property::NilBlack => Some(3),
            Property::RedRed => Some(4),
            Property::BlackHeight => Some(5),
            Property::Ordering => None,
        }
    }
}

/// A broken rule at the node holding `key`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PropertyViolation<K> {
    pub property: Property,
    pub key: K,
    pub detail: String,
}

impl<K> fmt::Display for PropertyViolation<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.property.number() {
            Some(n) => write!(f, "property {} at {:?}: {}", n, self.key, self.detail),
            None => write!(f, "ordering at {:?}: {}", self.key, self.detail),
        }
    }
}

/// Outcome of [`validate`]. Violations are data, a malformed tree is a
/// legitimate input.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationReport<K> {
    violations: Vec<PropertyViolation<K>>,
    black_height: Option<usize>,
    height: usize,
    node_count: usize,
    red_count: usize,
    black_count: usize,
    depths: Depth,
}

impl<K> ValidationReport<K> {
    #[inline]
    pub fn ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[PropertyViolation<K>] {
        &self.violations
    }

    /// Return true if any violation is of `property`.
    pub fn violates(&self, property: Property) -> bool {
        self.violations.iter().any(|v| v.property == property)
    }

    /// Black nodes from the root down to any NIL, root excluded, NIL
    /// included. None when paths disagree.
    #[inline]
    pub fn black_height(&self) -> Option<usize> {
        self.black_height
    }

    /// Nodes on the longest root-to-leaf path.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[inline]
    pub fn red_count(&self) -> usize {
        self.red_count
    }

    #[inline]
    pub fn black_count(&self) -> usize {
        self.black_count
    }

    pub fn depths(&self) -> &Depth {
        &self.depths
    }
}

/// Validate a tree with following rules:
///
/// * Root is black.
/// * From root to any leaf, no consecutive reds allowed in its path.
/// * Number of blacks should be same under left child and right child,
///   only the first mismatch is reported.
/// * In-order keys are non-decreasing.
///
/// Single traversal, the tree is not modified.
pub fn validate<S>(shape: &S) -> ValidationReport<S::Key>
where
    S: Shape,
    S::Key: Clone + Ord + Debug,
{
    let mut walk = Walk {
        shape,
        prev: None,
        violations: vec![],
        unbalanced: false,
        node_count: 0,
        red_count: 0,
        depths: Depth::new(),
    };

    let root = shape.top();
    if let Some(root) = root {
        if shape.color_of(root).is_red() {
            walk.violate(Property::RootBlack, root, "root is RED".to_string());
        }
    }
    let (blacks, height) = walk.subtree(root, false, 0);
    let black_height = match (blacks, root) {
        (Some(blacks), Some(root)) if shape.color_of(root).is_black() => Some(blacks - 1),
        (Some(blacks), Some(_)) => Some(blacks),
        (Some(_), None) => Some(0),
        (None, _) => None,
    };

    ValidationReport {
        violations: walk.violations,
        black_height,
        height,
        node_count: walk.node_count,
        red_count: walk.red_count,
        black_count: walk.node_count - walk.red_count,
        depths: walk.depths,
    }
}

struct Walk<'a, S>
where
    S: Shape,
{
    shape: &'a S,
    prev: Option<&'a S::Key>, // in-order predecessor of the next visit.
    violations: Vec<PropertyViolation<S::Key>>,
    unbalanced: bool,
    node_count: usize,
    red_count: usize,
    depths: Depth,
}

impl<'a, S> Walk<'a, S>
where
    S: Shape,
    S::Key: Clone + Ord + Debug,
{
    fn violate(&mut self, property: Property, node: S::Handle, detail: String) {
        let key = self.shape.key_of(node).clone();
        self.violations.push(PropertyViolation {
            property,
            key,
            detail,
        });
    }

    // Return (blacks, height), blacks counts black nodes from `node` down
    // to a NIL, both ends included. None once a mismatch was found below.
    // Post-order with an explicit stack, degenerate trees can be as deep
    // as they are long.
    fn subtree(&mut self, node: Option<S::Handle>, fromred: bool, depth: usize) -> (Option<usize>, usize) {
        let shape = self.shape;
        let mut frames = vec![Frame::Enter(node, fromred, depth)];
        let mut results: Vec<(Option<usize>, usize)> = vec![];

        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Enter(None, _, depth) => {
                    self.depths.sample(depth);
                    results.push((Some(1), 0));
                }
                Frame::Enter(Some(node), fromred, depth) => {
                    self.node_count += 1;
                    let red = shape.color_of(node).is_red();
                    if red {
                        self.red_count += 1;
                    }
                    if fromred && red {
                        self.violate(Property::RedRed, node, "RED node with RED parent".to_string());
                    }
                    frames.push(Frame::Exit(node, red));
                    frames.push(Frame::Enter(shape.right_of(node), red, depth + 1));
                    frames.push(Frame::Visit(node));
                    frames.push(Frame::Enter(shape.left_of(node), red, depth + 1));
                }
                Frame::Visit(node) => {
                    let key = shape.key_of(node);
                    if let Some(prev) = self.prev {
                        if prev > key {
                            let detail = format!("follows {:?} in-order", prev);
                            self.violate(Property::Ordering, node, detail);
                        }
                    }
                    self.prev = Some(key);
                }
                Frame::Exit(node, red) => {
                    let (rblacks, rheight) = self.pop_result(&mut results);
                    let (lblacks, lheight) = self.pop_result(&mut results);
                    let blacks = match (lblacks, rblacks) {
                        (Some(l), Some(r)) if l == r => Some(if red { l } else { l + 1 }),
                        (Some(l), Some(r)) => {
                            if !self.unbalanced {
                                self.unbalanced = true;
                                let detail = format!("left: {} right: {}", l, r);
                                self.violate(Property::BlackHeight, node, detail);
                            }
                            None
                        }
                        _ => None,
                    };
                    results.push((blacks, 1 + lheight.max(rheight)));
                }
            }
        }
        self.pop_result(&mut results)
    }

    fn pop_result(&self, results: &mut Vec<(Option<usize>, usize)>) -> (Option<usize>, usize) {
        match results.pop() {
            Some(result) => result,
            None => panic!("subtree(): unbalanced walk, call the programmer"),
        }
    }
}

enum Frame<H> {
    // (node, parent is red, depth)
    Enter(Option<H>, bool, usize),
    Visit(H),
    Exit(H, bool),
}

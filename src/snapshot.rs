#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::{Color, NodeId, Side};
use crate::validate::Shape;

/// One node of a [`Snapshot`], children are indices into the same
/// snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnapNode<K> {
    pub id: NodeId,
    pub key: K,
    pub color: Color,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

/// Structural copy of a tree, detached from any arena. Snapshots taken
/// from an [`RbTree`] list nodes in preorder with the root at index 0.
/// Hand-built snapshots, as used for test fixtures and target trees, are
/// assembled bottom-up:
///
/// ```
/// use rbtrace::{Color, Snapshot};
///
/// let mut snap = Snapshot::new();
/// let l = snap.push(10, Color::Red, None, None);
/// let r = snap.push(30, Color::Red, None, None);
/// let root = snap.push(20, Color::Black, Some(l), Some(r));
/// snap.set_root(Some(root));
/// assert_eq!(snap.keys(), vec![10, 20, 30]);
/// ```
///
/// [`RbTree`]: crate::RbTree
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot<K> {
    root: Option<usize>,
    nodes: Vec<SnapNode<K>>,
}

impl<K> Default for Snapshot<K> {
    fn default() -> Self {
        Snapshot {
            root: None,
            nodes: vec![],
        }
    }
}

impl<K> Snapshot<K> {
    /// Create an empty snapshot.
    pub fn new() -> Snapshot<K> {
        Default::default()
    }

    /// Append a node and return its index. Identity is assigned from the
    /// position, children must already be present.
    pub fn push(
        &mut self,
        key: K,
        color: Color,
        left: Option<usize>,
        right: Option<usize>,
    ) -> usize {
        let n = self.nodes.len();
        for child in left.iter().chain(right.iter()) {
            if *child >= n {
                panic!("push(): child {} not yet in snapshot", child);
            }
        }
        let id = NodeId::from_index(n + 1);
        self.push_node(SnapNode {
            id,
            key,
            color,
            left,
            right,
        })
    }

    pub(crate) fn push_node(&mut self, node: SnapNode<K>) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub(crate) fn attach(&mut self, parent: usize, side: Side, child: usize) {
        match side {
            Side::Left => self.nodes[parent].left = Some(child),
            Side::Right => self.nodes[parent].right = Some(child),
        }
    }

    pub fn set_root(&mut self, root: Option<usize>) {
        self.root = root;
    }

    #[inline]
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Number of nodes pushed, reachable from the root or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return true when no node was pushed, same count as [`len`](Snapshot::len).
    /// A snapshot with nodes but no root is not empty, it has an empty tree.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SnapNode<K>] {
        &self.nodes
    }

    pub fn node(&self, at: usize) -> &SnapNode<K> {
        &self.nodes[at]
    }

    pub fn set_color(&mut self, at: usize, color: Color) {
        self.nodes[at].color = color;
    }

    /// Index of the node with identity `id`.
    pub fn find(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// Indices reachable from root, in-order.
    pub fn inorder(&self) -> Vec<usize> {
        let mut acc = Vec::with_capacity(self.nodes.len());
        let (mut stack, mut cur) = (vec![], self.root);
        loop {
            while let Some(at) = cur {
                stack.push(at);
                cur = self.nodes[at].left;
            }
            match stack.pop() {
                Some(at) => {
                    acc.push(at);
                    cur = self.nodes[at].right;
                }
                None => break acc,
            }
        }
    }

    /// Compare keys, colors and structure, ignoring node identities.
    pub fn same_shape(&self, other: &Snapshot<K>) -> bool
    where
        K: PartialEq,
    {
        let mut stack = vec![(self.root, other.root)];
        while let Some(pair) = stack.pop() {
            match pair {
                (None, None) => (),
                (Some(a), Some(b)) => {
                    let (a, b) = (&self.nodes[a], &other.nodes[b]);
                    if a.key != b.key || a.color != b.color {
                        return false;
                    }
                    stack.push((a.left, b.left));
                    stack.push((a.right, b.right));
                }
                _ => return false,
            }
        }
        true
    }
}

impl<K> Snapshot<K>
where
    K: Clone,
{
    /// Keys reachable from root, in-order.
    pub fn keys(&self) -> Vec<K> {
        self.inorder()
            .into_iter()
            .map(|at| self.nodes[at].key.clone())
            .collect()
    }
}

impl<K> Shape for Snapshot<K> {
    type Key = K;
    type Handle = usize;

    fn top(&self) -> Option<usize> {
        self.root
    }

    fn left_of(&self, at: usize) -> Option<usize> {
        self.nodes[at].left
    }

    fn right_of(&self, at: usize) -> Option<usize> {
        self.nodes[at].right
    }

    fn key_of(&self, at: usize) -> &K {
        &self.nodes[at].key
    }

    fn color_of(&self, at: usize) -> Color {
        self.nodes[at].color
    }
}

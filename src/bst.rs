use std::fmt::{self, Debug};

use crate::depth::Depth;
use crate::error::Error;
use crate::tree::RbTree;

/// Plain, unbalanced binary search tree, kept only to show how tall the
/// same key sequence grows without rebalancing. Equal keys go right, as
/// they do in [`RbTree`]. Walks are iterative, sorted input degenerates
/// into a list as deep as the input is long.
#[derive(Clone, Debug)]
pub struct Bst<K> {
    nodes: Vec<BstNode<K>>,
    root: Option<usize>,
}

#[derive(Clone, Debug)]
struct BstNode<K> {
    key: K,
    left: Option<usize>,
    right: Option<usize>,
}

impl<K> Default for Bst<K> {
    fn default() -> Self {
        Bst {
            nodes: vec![],
            root: None,
        }
    }
}

impl<K> Bst<K>
where
    K: Clone + Ord,
{
    pub fn new() -> Bst<K> {
        Default::default()
    }

    /// Build a tree by inserting keys from `iter` in order.
    pub fn from_keys<I>(iter: I) -> Bst<K>
    where
        I: IntoIterator<Item = K>,
    {
        let mut bst = Bst::new();
        iter.into_iter().for_each(|key| bst.insert(key));
        bst
    }

    pub fn insert(&mut self, key: K) {
        let at = self.nodes.len();
        let mut cur = match self.root {
            None => {
                self.root = Some(at);
                self.nodes.push(BstNode {
                    key,
                    left: None,
                    right: None,
                });
                return;
            }
            Some(root) => root,
        };
        loop {
            let node = &mut self.nodes[cur];
            let slot = if key < node.key {
                &mut node.left
            } else {
                &mut node.right
            };
            match *slot {
                Some(next) => cur = next,
                None => {
                    *slot = Some(at);
                    break;
                }
            }
        }
        self.nodes.push(BstNode {
            key,
            left: None,
            right: None,
        });
    }

    pub fn contains(&self, key: &K) -> bool {
        let mut cur = self.root;
        while let Some(at) = cur {
            let node = &self.nodes[at];
            if *key == node.key {
                return true;
            }
            cur = if *key < node.key { node.left } else { node.right };
        }
        false
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.depths().max()
    }

    /// Leaf depth statistics, comparable with
    /// [`ValidationReport::depths`](crate::ValidationReport::depths).
    pub fn depths(&self) -> Depth {
        let mut depths = Depth::new();
        let mut stack = vec![(self.root, 0_usize)];
        while let Some((cur, depth)) = stack.pop() {
            match cur {
                None => depths.sample(depth),
                Some(at) => {
                    let node = &self.nodes[at];
                    stack.push((node.right, depth + 1));
                    stack.push((node.left, depth + 1));
                }
            }
        }
        depths
    }

    /// All keys, in-order.
    pub fn keys(&self) -> Vec<K> {
        let mut acc = Vec::with_capacity(self.nodes.len());
        let (mut stack, mut cur) = (vec![], self.root);
        loop {
            while let Some(at) = cur {
                stack.push(at);
                cur = self.nodes[at].left;
            }
            match stack.pop() {
                Some(at) => {
                    acc.push(self.nodes[at].key.clone());
                    cur = self.nodes[at].right;
                }
                None => break acc,
            }
        }
    }
}

/// Heights of a red-black tree and a plain BST built from the same keys.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub nodes: usize,
    pub rb_height: usize,
    pub rb_black_height: Option<usize>,
    pub bst_height: usize,
    pub rb_depths: Depth,
    pub bst_depths: Depth,
}

impl Comparison {
    /// Insert `keys`, in order, into both trees.
    pub fn of<K>(keys: &[K]) -> Result<Comparison, Error<K>>
    where
        K: Clone + Ord + Debug,
    {
        let rb = RbTree::build("comparison", keys.iter().cloned())?;
        let bst = Bst::from_keys(keys.iter().cloned());
        let report = rb.validate();
        let bst_depths = bst.depths();
        Ok(Comparison {
            nodes: rb.len(),
            rb_height: report.height(),
            rb_black_height: report.black_height(),
            bst_height: bst_depths.max(),
            rb_depths: report.depths().clone(),
            bst_depths,
        })
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "nodes: {} rb-height: {} bst-height: {} black-height: {:?}",
            self.nodes, self.rb_height, self.bst_height, self.rb_black_height
        )
    }
}

use std::{cmp::Ordering, fmt::Debug};

use log::debug;

use crate::config::Config;
use crate::error::Error;
use crate::node::{Color, Node, NodeId, NodeRef, Side};
use crate::snapshot::{SnapNode, Snapshot};
use crate::step::{Action, Recorder};
use crate::validate::{self, Shape, ValidationReport};

/// RbTree manages a single instance of a [CLRS][clrs] red-black tree
/// whose insert and delete return a replayable trace of every step.
///
/// Nodes live in an arena addressed by [`NodeId`], slot 0 is the NIL
/// sentinel. NIL is black, its links read as NIL and it is never written.
///
/// [clrs]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
#[derive(Clone)]
pub struct RbTree<K>
where
    K: Clone + Ord + Debug,
{
    name: String,
    config: Config,
    pub(crate) nodes: Vec<Option<Node<K>>>, // nodes[0] is NIL, always None.
    pub(crate) root: NodeId,
    pub(crate) n_count: usize, // number of entries in the tree.
}

/// Different ways to construct a new RbTree instance.
impl<K> RbTree<K>
where
    K: Clone + Ord + Debug,
{
    /// Create an empty instance of RbTree, identified by `name`.
    pub fn new<S>(name: S) -> RbTree<K>
    where
        S: AsRef<str>,
    {
        RbTree::with_config(name, Config::default())
    }

    pub fn with_config<S>(name: S, config: Config) -> RbTree<K>
    where
        S: AsRef<str>,
    {
        RbTree {
            name: name.as_ref().to_string(),
            config,
            nodes: vec![None],
            root: NodeId::NIL,
            n_count: Default::default(),
        }
    }

    /// Create a new tree and insert keys from `iter` in order, traces are
    /// discarded.
    pub fn build<S, I>(name: S, iter: I) -> Result<RbTree<K>, Error<K>>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = K>,
    {
        let mut tree = RbTree::new(name);
        for key in iter {
            tree.insert(key)?;
        }
        Ok(tree)
    }

    /// Load a tree from `snapshot`, which may come from anywhere, including
    /// hand-built fixtures that break red-black properties. Nodes get fresh
    /// identities.
    pub fn from_snapshot<S>(name: S, snapshot: &Snapshot<K>) -> RbTree<K>
    where
        S: AsRef<str>,
    {
        let mut tree = RbTree::new(name);
        tree.load(snapshot, false);
        debug!("{} loaded {} nodes from snapshot", tree.name, tree.n_count);
        tree
    }

    /// Load `snapshot` keeping its node identities, used to rebuild the
    /// state of a trace.
    pub(crate) fn restore(snapshot: &Snapshot<K>, config: Config) -> RbTree<K> {
        let mut tree = RbTree::with_config("replay", config);
        tree.load(snapshot, true);
        tree
    }

    fn load(&mut self, snapshot: &Snapshot<K>, keep_ids: bool) {
        let root = match snapshot.root() {
            Some(root) => root,
            None => return,
        };
        let mut stack = vec![(root, NodeId::NIL, Side::Left)];
        while let Some((at, parent, side)) = stack.pop() {
            let snode = snapshot.node(at);
            let node = Node::new(snode.key.clone(), snode.color);
            let id = if keep_ids {
                self.place(snode.id, node)
            } else {
                self.alloc(node)
            };
            self.link(parent, side, id);
            if let Some(right) = snode.right {
                stack.push((right, id, Side::Right));
            }
            if let Some(left) = snode.left {
                stack.push((left, id, Side::Left));
            }
        }
    }
}

/// Maintenance API.
impl<K> RbTree<K>
where
    K: Clone + Ord + Debug,
{
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Return the root identity, [`NodeId::NIL`] for an empty tree.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Check all five red-black properties and BST ordering. Refer to
    /// [`ValidationReport`].
    pub fn validate(&self) -> ValidationReport<K> {
        validate::validate(self)
    }

    /// Structural copy for renderers, preorder with identities.
    pub fn snapshot(&self) -> Snapshot<K> {
        let mut snap = Snapshot::new();
        if self.root.is_nil() {
            return snap;
        }
        let mut stack: Vec<(NodeId, Option<(usize, Side)>)> = vec![(self.root, None)];
        while let Some((id, from)) = stack.pop() {
            let node = self.slot(id);
            let at = snap.push_node(SnapNode {
                id,
                key: node.key.clone(),
                color: node.color,
                left: None,
                right: None,
            });
            if let Some((parent, side)) = from {
                snap.attach(parent, side, at);
            }
            if !node.right.is_nil() {
                stack.push((node.right, Some((at, Side::Right))));
            }
            if !node.left.is_nil() {
                stack.push((node.left, Some((at, Side::Left))));
            }
        }
        snap.set_root(Some(0));
        snap
    }
}

/// Read operations on RbTree instance.
impl<K> RbTree<K>
where
    K: Clone + Ord + Debug,
{
    /// Return a view of node `id`, None for NIL or a deleted node.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<K>> {
        let node = self.nodes.get(id.index())?.as_ref()?;
        Some(NodeRef { id, node })
    }

    /// Identity of the first node found equal to key.
    pub fn search(&self, key: &K) -> Option<NodeId> {
        let mut id = self.root;
        while !id.is_nil() {
            let node = self.slot(id);
            id = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&K> {
        self.search(key).map(|id| &self.slot(id).key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// All keys, in-order.
    pub fn keys(&self) -> Vec<K> {
        let mut acc = Vec::with_capacity(self.n_count);
        let (mut stack, mut id) = (vec![], self.root);
        loop {
            while !id.is_nil() {
                stack.push(id);
                id = self.slot(id).left;
            }
            match stack.pop() {
                Some(top) => {
                    let node = self.slot(top);
                    acc.push(node.key.clone());
                    id = node.right;
                }
                None => break acc,
            }
        }
    }
}

/// Arena primitives. Reads through NIL are allowed for color and links
/// only, everything else on NIL is a programming error.
impl<K> RbTree<K>
where
    K: Clone + Ord + Debug,
{
    pub(crate) fn slot(&self, id: NodeId) -> &Node<K> {
        match self.nodes.get(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("slot(): {} is not a live node, call the programmer", id),
        }
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.nodes.get_mut(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("slot_mut(): {} is not a live node, call the programmer", id),
        }
    }

    #[inline]
    pub(crate) fn key(&self, id: NodeId) -> &K {
        &self.slot(id).key
    }

    #[inline]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        if id.is_nil() {
            Color::Black
        } else {
            self.slot(id).color
        }
    }

    #[inline]
    pub(crate) fn is_red(&self, id: NodeId) -> bool {
        self.color(id).is_red()
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, side: Side) -> NodeId {
        if id.is_nil() {
            NodeId::NIL
        } else {
            self.slot(id).child(side)
        }
    }

    #[inline]
    pub(crate) fn left(&self, id: NodeId) -> NodeId {
        self.child(id, Side::Left)
    }

    #[inline]
    pub(crate) fn right(&self, id: NodeId) -> NodeId {
        self.child(id, Side::Right)
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        if id.is_nil() {
            NodeId::NIL
        } else {
            self.slot(id).parent
        }
    }

    /// Side of `id` under `parent`, `parent` NIL means root position.
    pub(crate) fn side_in(&self, parent: NodeId, id: NodeId) -> Side {
        if !parent.is_nil() && self.right(parent) == id {
            Side::Right
        } else {
            Side::Left
        }
    }

    pub(crate) fn alloc(&mut self, node: Node<K>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Some(node));
        self.n_count += 1;
        id
    }

    fn place(&mut self, id: NodeId, node: Node<K>) -> NodeId {
        if id.is_nil() {
            panic!("place(): NIL can not hold a node, call the programmer");
        }
        if self.nodes.len() <= id.index() {
            self.nodes.resize_with(id.index() + 1, || None);
        }
        if self.nodes[id.index()].is_some() {
            panic!("place(): {} already live, call the programmer", id);
        }
        self.nodes[id.index()] = Some(node);
        self.n_count += 1;
        id
    }

    pub(crate) fn free(&mut self, id: NodeId) -> Node<K> {
        match self.nodes.get_mut(id.index()).and_then(Option::take) {
            Some(node) => {
                self.n_count -= 1;
                node
            }
            _ => panic!("free(): {} is not a live node, call the programmer", id),
        }
    }

    /// Point slot `side` of `parent` at `child`, or the root when parent
    /// is NIL. Child's parent link follows unless child is NIL.
    pub(crate) fn link(&mut self, parent: NodeId, side: Side, child: NodeId) {
        if parent.is_nil() {
            self.root = child;
        } else {
            self.slot_mut(parent).set_child(side, child);
        }
        if !child.is_nil() {
            self.slot_mut(child).parent = parent;
        }
    }

    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        if id.is_nil() {
            panic!("set_color(): writing NIL color, call the programmer");
        }
        self.slot_mut(id).color = color;
    }

    /// Rotate around `x` so that `x` moves down toward `side`. The child
    /// on the opposite side must not be NIL.
    fn rotate(&mut self, x: NodeId, side: Side) -> NodeId {
        let y = self.child(x, side.opposite());
        if y.is_nil() {
            panic!("rotate_{}({}): {} child is NIL, call the programmer", side, x, side.opposite());
        }
        let inner = self.child(y, side);
        self.slot_mut(x).set_child(side.opposite(), inner);
        if !inner.is_nil() {
            self.slot_mut(inner).parent = x;
        }
        let xp = self.parent(x);
        let xside = self.side_in(xp, x);
        self.link(xp, xside, y);
        self.slot_mut(y).set_child(side, x);
        self.slot_mut(x).parent = y;
        y
    }

    /// Apply a recorded action without recording it again.
    pub(crate) fn apply(&mut self, action: &Action<K>) {
        match action {
            Action::Create { node, key, color } => {
                self.place(*node, Node::new(key.clone(), *color));
            }
            Action::ColorFlip { node, after, .. } => self.set_color(*node, *after),
            Action::RotateLeft { pivot, .. } => {
                self.rotate(*pivot, Side::Left);
            }
            Action::RotateRight { pivot, .. } => {
                self.rotate(*pivot, Side::Right);
            }
            Action::Relink {
                parent, side, new, ..
            } => self.link(parent.unwrap_or(NodeId::NIL), *side, *new),
            Action::Compare { .. }
            | Action::CaseEnter(_)
            | Action::CaseExit(_)
            | Action::Done => (),
        }
    }
}

/// Recorded structural primitives, each emits exactly one step.
impl<K> RbTree<K>
where
    K: Clone + Ord + Debug,
{
    //              (p)                       (p)
    //               |                         |
    //               x                         y
    //              / \                       / \
    //             a   y          =>         x   c
    //                / \                   / \
    //               b   c                 a   b
    //
    pub(crate) fn rotate_left(&mut self, x: NodeId, rec: &mut Recorder<K>) {
        let y = self.rotate(x, Side::Left);
        rec.push(Action::RotateLeft { pivot: x, child: y }, || {
            format!("LEFT-ROTATE({:?})", self.key(x))
        });
    }

    //              (p)                       (p)
    //               |                         |
    //               x                         y
    //              / \                       / \
    //             y   c          =>         a   x
    //            / \                           / \
    //           a   b                         b   c
    //
    pub(crate) fn rotate_right(&mut self, x: NodeId, rec: &mut Recorder<K>) {
        let y = self.rotate(x, Side::Right);
        rec.push(Action::RotateRight { pivot: x, child: y }, || {
            format!("RIGHT-ROTATE({:?})", self.key(x))
        });
    }

    /// Rotate `x` down toward `side`.
    pub(crate) fn rotate_toward(&mut self, x: NodeId, side: Side, rec: &mut Recorder<K>) {
        match side {
            Side::Left => self.rotate_left(x, rec),
            Side::Right => self.rotate_right(x, rec),
        }
    }

    /// Point slot `side` of `parent` at `new`, recorded.
    pub(crate) fn relink(&mut self, parent: NodeId, side: Side, new: NodeId, rec: &mut Recorder<K>) {
        let old = if parent.is_nil() {
            self.root
        } else {
            self.child(parent, side)
        };
        self.link(parent, side, new);
        let action = Action::Relink {
            parent: if parent.is_nil() { None } else { Some(parent) },
            side,
            old,
            new,
        };
        rec.push(action, || self.describe_relink(parent, side, new));
    }

    /// Replace subtree `u` by subtree `v` in u's parent.
    pub(crate) fn transplant(&mut self, u: NodeId, v: NodeId, rec: &mut Recorder<K>) {
        let up = self.parent(u);
        let side = self.side_in(up, u);
        self.relink(up, side, v, rec);
    }

    pub(crate) fn minimum(&self, mut x: NodeId) -> NodeId {
        while !self.left(x).is_nil() {
            x = self.left(x);
        }
        x
    }

    pub(crate) fn paint(&mut self, id: NodeId, color: Color, what: &str, rec: &mut Recorder<K>) {
        let before = self.color(id);
        self.set_color(id, color);
        let action = Action::ColorFlip {
            node: id,
            before,
            after: color,
        };
        rec.push(action, || format!("{}({:?}) -> {}", what, self.key(id), color));
    }

    fn describe_relink(&self, parent: NodeId, side: Side, new: NodeId) -> String {
        let new = if new.is_nil() {
            "NIL".to_string()
        } else {
            format!("{:?}", self.key(new))
        };
        if parent.is_nil() {
            format!("{} becomes ROOT", new)
        } else {
            format!("{} becomes {} child of {:?}", new, side, self.key(parent))
        }
    }
}

impl<K> Shape for RbTree<K>
where
    K: Clone + Ord + Debug,
{
    type Key = K;
    type Handle = NodeId;

    fn top(&self) -> Option<NodeId> {
        Some(self.root).filter(|id| !id.is_nil())
    }

    fn left_of(&self, id: NodeId) -> Option<NodeId> {
        Some(self.slot(id).left).filter(|id| !id.is_nil())
    }

    fn right_of(&self, id: NodeId) -> Option<NodeId> {
        Some(self.slot(id).right).filter(|id| !id.is_nil())
    }

    fn key_of(&self, id: NodeId) -> &K {
        &self.slot(id).key
    }

    fn color_of(&self, id: NodeId) -> Color {
        self.slot(id).color
    }
}

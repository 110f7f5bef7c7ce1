use std::{convert::TryFrom, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Node color. NIL leaves are always [`Color::Black`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    Red,
    Black,
}

impl Color {
    #[inline]
    pub fn is_red(self) -> bool {
        self == Color::Red
    }

    #[inline]
    pub fn is_black(self) -> bool {
        self == Color::Black
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::Red => write!(f, "RED"),
            Color::Black => write!(f, "BLACK"),
        }
    }
}

/// Which child slot of a parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Stable identity of a node inside one [`RbTree`] arena. Identities are
/// never reused, so a trace recorded earlier can not alias a node created
/// later.
///
/// [`RbTree`]: crate::RbTree
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The sentinel, index 0 of every arena.
    pub const NIL: NodeId = NodeId(0);

    #[inline]
    pub fn is_nil(self) -> bool {
        self == NodeId::NIL
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Identity of arena slot `at`. Panics past `u32::MAX`, slot 0 is NIL
    /// and must never be handed out twice.
    pub(crate) fn from_index(at: usize) -> NodeId {
        match u32::try_from(at) {
            Ok(at) => NodeId(at),
            Err(_) => panic!("from_index(): node ids exhausted at {}, call the programmer", at),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_nil() {
            write!(f, "NIL")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Arena entry. Links are indices; a link to [`NodeId::NIL`] is a leaf.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) color: Color,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) parent: NodeId,
}

impl<K> Node<K> {
    pub(crate) fn new(key: K, color: Color) -> Node<K> {
        Node {
            key,
            color,
            left: NodeId::NIL,
            right: NodeId::NIL,
            parent: NodeId::NIL,
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> NodeId {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: NodeId) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

/// Read-only view of a live node, returned by [`RbTree::node`].
///
/// [`RbTree::node`]: crate::RbTree::node
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a, K> {
    pub(crate) id: NodeId,
    pub(crate) node: &'a Node<K>,
}

impl<'a, K> NodeRef<'a, K> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> &'a K {
        &self.node.key
    }

    pub fn color(&self) -> Color {
        self.node.color
    }

    pub fn left(&self) -> NodeId {
        self.node.left
    }

    pub fn right(&self) -> NodeId {
        self.node.right
    }

    pub fn parent(&self) -> NodeId {
        self.node.parent
    }
}

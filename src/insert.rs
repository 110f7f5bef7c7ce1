use std::{cmp::Ordering, fmt::Debug};

use log::{debug, trace, warn};

use crate::config::Duplicates;
use crate::error::Error;
use crate::node::{Color, Node, NodeId, Side};
use crate::step::{Action, CaseTag, Fixup, Operation, OperationTrace, Recorder};
use crate::tree::RbTree;

/// Classification of one RB-INSERT-FIXUP iteration for node z. The side
/// is where z's parent hangs under the grandparent, `Side::Right` is the
/// mirrored variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertCase {
    /// Case 0: z is a RED root.
    RedRoot,
    /// Case 1: z's parent and uncle are RED.
    RedUncle(Side),
    /// Case 2: uncle BLACK, z is an inner child (triangle).
    Triangle(Side),
    /// Case 3: uncle BLACK, z is an outer child (line).
    Line(Side),
}

impl InsertCase {
    pub fn number(&self) -> u8 {
        match self {
            InsertCase::RedRoot => 0,
            InsertCase::RedUncle(_) => 1,
            InsertCase::Triangle(_) => 2,
            InsertCase::Line(_) => 3,
        }
    }

    pub fn tag(&self) -> CaseTag {
        let mirrored = match self {
            InsertCase::RedRoot => false,
            InsertCase::RedUncle(side) | InsertCase::Triangle(side) | InsertCase::Line(side) => {
                *side == Side::Right
            }
        };
        CaseTag {
            fixup: Fixup::Insert,
            number: self.number(),
            mirrored,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            InsertCase::RedRoot => "root is RED",
            InsertCase::RedUncle(_) => "uncle is RED",
            InsertCase::Triangle(_) => "uncle is BLACK, node is inner child",
            InsertCase::Line(_) => "uncle is BLACK, node is outer child",
        }
    }

    /// Return the case that applies to `z`, None when z's parent is BLACK
    /// and the fixup is complete.
    pub fn classify<K>(tree: &RbTree<K>, z: NodeId) -> Option<InsertCase>
    where
        K: Clone + Ord + Debug,
    {
        if z == tree.root() {
            return if tree.is_red(z) {
                Some(InsertCase::RedRoot)
            } else {
                None
            };
        }
        let p = tree.parent(z);
        if !tree.is_red(p) {
            return None;
        }
        let g = tree.parent(p);
        if g.is_nil() {
            panic!("classify({}): RED parent is the root, call the programmer", z);
        }
        let pside = tree.side_in(g, p);
        let uncle = tree.child(g, pside.opposite());
        let case = if tree.is_red(uncle) {
            InsertCase::RedUncle(pside)
        } else if tree.side_in(p, z) != pside {
            InsertCase::Triangle(pside)
        } else {
            InsertCase::Line(pside)
        };
        Some(case)
    }

    /// Apply this case at `z`, return the node the next iteration looks
    /// at, None when the fixup terminates.
    pub(crate) fn apply<K>(self, tree: &mut RbTree<K>, z: NodeId, rec: &mut Recorder<K>) -> Option<NodeId>
    where
        K: Clone + Ord + Debug,
    {
        match self {
            InsertCase::RedRoot => {
                tree.paint(z, Color::Black, "Root", rec);
                None
            }
            InsertCase::RedUncle(pside) => {
                let p = tree.parent(z);
                let g = tree.parent(p);
                let uncle = tree.child(g, pside.opposite());
                tree.paint(p, Color::Black, "Parent", rec);
                tree.paint(uncle, Color::Black, "Uncle", rec);
                tree.paint(g, Color::Red, "Grandparent", rec);
                Some(g)
            }
            InsertCase::Triangle(pside) => {
                // straighten into a line, the old parent becomes z.
                let p = tree.parent(z);
                tree.rotate_toward(p, pside, rec);
                Some(p)
            }
            InsertCase::Line(pside) => {
                let p = tree.parent(z);
                let g = tree.parent(p);
                tree.paint(p, Color::Black, "Parent", rec);
                tree.paint(g, Color::Red, "Grandparent", rec);
                tree.rotate_toward(g, pside.opposite(), rec);
                None
            }
        }
    }
}

/// Insertion engine, CLRS RB-INSERT.
impl<K> RbTree<K>
where
    K: Clone + Ord + Debug,
{
    /// Insert key and return the trace of every step taken. Equal keys go
    /// right, unless the tree is configured with [`Duplicates::Reject`].
    pub fn insert(&mut self, key: K) -> Result<OperationTrace<K>, Error<K>> {
        debug!("{} insert {:?}", self.name(), key);
        let before = self.snapshot();
        let mut rec = Recorder::new(self.config().notes());

        let (mut parent, mut side) = (NodeId::NIL, Side::Left);
        let mut x = self.root();
        while !x.is_nil() {
            let went = match key.cmp(self.key(x)) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => match self.config().duplicates() {
                    Duplicates::Right => Side::Right,
                    Duplicates::Reject => {
                        warn!("{} insert {:?} rejected, already present", self.name(), key);
                        return Err(Error::DuplicateKey(key));
                    }
                },
            };
            rec.push(Action::Compare { node: x, went: Some(went) }, || {
                let op = if went == Side::Left { "<" } else { ">=" };
                format!("{:?} {} {:?}, go {}", key, op, self.key(x), went)
            });
            parent = x;
            side = went;
            x = self.child(x, went);
        }

        let z = self.alloc(Node::new(key.clone(), Color::Red));
        let create = Action::Create {
            node: z,
            key: key.clone(),
            color: Color::Red,
        };
        rec.push(create, || format!("new node {:?}, RED", key));
        self.relink(parent, side, z, &mut rec);

        self.insert_fixup(z, &mut rec);

        let n = rec.len();
        let trace = rec.seal(Operation::Insert, key, before, self.snapshot());
        debug!("{} insert {:?} done in {} steps", self.name(), trace.key(), n + 1);
        Ok(trace)
    }

    fn insert_fixup(&mut self, mut z: NodeId, rec: &mut Recorder<K>) {
        while let Some(case) = InsertCase::classify(self, z) {
            trace!("{} insert fixup at {}: {:?}", self.name(), z, case);
            rec.enter(case.tag(), case.describe());
            let next = case.apply(self, z, rec);
            rec.exit();
            match next {
                Some(next) => z = next,
                None => break,
            }
        }
        let root = self.root();
        if self.is_red(root) {
            self.paint(root, Color::Black, "Root", rec);
        }
    }
}

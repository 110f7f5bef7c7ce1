use std::{cmp::Ordering, fmt::Debug};

use log::{debug, trace, warn};

use crate::error::Error;
use crate::node::{Color, NodeId, Side};
use crate::step::{Action, CaseTag, Fixup, Operation, OperationTrace, Recorder};
use crate::tree::RbTree;

/// The x pointer of RB-DELETE-FIXUP, the node carrying the extra black.
/// x may be NIL, so its parent and its color are held here instead of
/// being written into the shared sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deficit {
    pub node: NodeId,
    pub parent: NodeId,
    pub color: Color,
}

impl Deficit {
    pub(crate) fn at<K>(tree: &RbTree<K>, node: NodeId, parent: NodeId) -> Deficit
    where
        K: Clone + Ord + Debug,
    {
        Deficit {
            node,
            parent,
            color: tree.color(node),
        }
    }

    fn side<K>(&self, tree: &RbTree<K>) -> Side
    where
        K: Clone + Ord + Debug,
    {
        if tree.left(self.parent) == self.node {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Classification of one RB-DELETE-FIXUP iteration. The side is where x
/// hangs under its parent, `Side::Right` is the mirrored variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteCase {
    /// Case 0: x is the root or RED, recolor BLACK and stop.
    Absorb,
    /// Case 1: sibling w is RED.
    RedSibling(Side),
    /// Case 2: w BLACK, both of w's children BLACK.
    BlackNephews(Side),
    /// Case 3: w BLACK, near child RED, far child BLACK.
    NearRed(Side),
    /// Case 4: w BLACK, far child RED.
    FarRed(Side),
}

impl DeleteCase {
    pub fn number(&self) -> u8 {
        match self {
            DeleteCase::Absorb => 0,
            DeleteCase::RedSibling(_) => 1,
            DeleteCase::BlackNephews(_) => 2,
            DeleteCase::NearRed(_) => 3,
            DeleteCase::FarRed(_) => 4,
        }
    }

    pub fn tag(&self) -> CaseTag {
        let mirrored = match self {
            DeleteCase::Absorb => false,
            DeleteCase::RedSibling(side)
            | DeleteCase::BlackNephews(side)
            | DeleteCase::NearRed(side)
            | DeleteCase::FarRed(side) => *side == Side::Right,
        };
        CaseTag {
            fixup: Fixup::Delete,
            number: self.number(),
            mirrored,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            DeleteCase::Absorb => "x is root or RED",
            DeleteCase::RedSibling(_) => "sibling is RED",
            DeleteCase::BlackNephews(_) => "sibling BLACK, both nephews BLACK",
            DeleteCase::NearRed(_) => "sibling BLACK, near nephew RED, far nephew BLACK",
            DeleteCase::FarRed(_) => "sibling BLACK, far nephew RED",
        }
    }

    /// Return the case that applies at `x`. A BLACK NIL sibling can not
    /// occur in a tree whose black-heights were balanced before the
    /// splice, finding one panics.
    pub fn classify<K>(tree: &RbTree<K>, x: &Deficit) -> DeleteCase
    where
        K: Clone + Ord + Debug,
    {
        if x.node == tree.root() || x.color.is_red() {
            return DeleteCase::Absorb;
        }
        let side = x.side(tree);
        let w = tree.child(x.parent, side.opposite());
        if w.is_nil() {
            panic!("classify({}): double black with NIL sibling, call the programmer", x.node);
        }
        if tree.is_red(w) {
            return DeleteCase::RedSibling(side);
        }
        let near = tree.child(w, side);
        let far = tree.child(w, side.opposite());
        match (tree.is_red(near), tree.is_red(far)) {
            (false, false) => DeleteCase::BlackNephews(side),
            (true, false) => DeleteCase::NearRed(side),
            (_, true) => DeleteCase::FarRed(side),
        }
    }

    /// Apply this case, moving `x` as CLRS does. Return false when the
    /// fixup terminates.
    pub(crate) fn apply<K>(self, tree: &mut RbTree<K>, x: &mut Deficit, rec: &mut Recorder<K>) -> bool
    where
        K: Clone + Ord + Debug,
    {
        match self {
            DeleteCase::Absorb => {
                if x.color.is_red() {
                    tree.paint(x.node, Color::Black, "x", rec);
                }
                x.color = Color::Black;
                false
            }
            DeleteCase::RedSibling(side) => {
                let p = x.parent;
                let w = tree.child(p, side.opposite());
                tree.paint(w, Color::Black, "Sibling", rec);
                tree.paint(p, Color::Red, "Parent", rec);
                tree.rotate_toward(p, side, rec);
                true
            }
            DeleteCase::BlackNephews(side) => {
                let p = x.parent;
                let w = tree.child(p, side.opposite());
                tree.paint(w, Color::Red, "Sibling", rec);
                *x = Deficit::at(tree, p, tree.parent(p));
                true
            }
            DeleteCase::NearRed(side) => {
                let w = tree.child(x.parent, side.opposite());
                let near = tree.child(w, side);
                tree.paint(near, Color::Black, "Near nephew", rec);
                tree.paint(w, Color::Red, "Sibling", rec);
                tree.rotate_toward(w, side.opposite(), rec);
                true
            }
            DeleteCase::FarRed(side) => {
                let p = x.parent;
                let w = tree.child(p, side.opposite());
                let far = tree.child(w, side.opposite());
                let pcolor = tree.color(p);
                tree.paint(w, pcolor, "Sibling", rec);
                tree.paint(p, Color::Black, "Parent", rec);
                tree.paint(far, Color::Black, "Far nephew", rec);
                tree.rotate_toward(p, side, rec);
                *x = Deficit::at(tree, tree.root(), NodeId::NIL);
                true
            }
        }
    }
}

/// Deletion engine, CLRS RB-DELETE.
impl<K> RbTree<K>
where
    K: Clone + Ord + Debug,
{
    /// Delete key and return the trace of every step taken. When key is
    /// absent the tree is left untouched and no trace is produced.
    pub fn delete(&mut self, key: &K) -> Result<OperationTrace<K>, Error<K>> {
        debug!("{} delete {:?}", self.name(), key);
        let before = self.snapshot();
        let mut rec = Recorder::new(self.config().notes());

        let z = match self.locate(key, &mut rec) {
            Some(z) => z,
            None => {
                warn!("{} delete {:?}, not found", self.name(), key);
                return Err(Error::NotFound(key.clone()));
            }
        };

        let (zl, zr) = (self.left(z), self.right(z));
        let (y_color, x) = if zl.is_nil() {
            let zp = self.parent(z);
            self.transplant(z, zr, &mut rec);
            (self.color(z), Deficit::at(self, zr, zp))
        } else if zr.is_nil() {
            let zp = self.parent(z);
            self.transplant(z, zl, &mut rec);
            (self.color(z), Deficit::at(self, zl, zp))
        } else {
            let y = self.minimum(zr);
            let y_color = self.color(y);
            let xn = self.right(y);
            let xp = if self.parent(y) == z {
                y
            } else {
                let yp = self.parent(y);
                self.transplant(y, xn, &mut rec);
                self.relink(y, Side::Right, zr, &mut rec);
                yp
            };
            self.transplant(z, y, &mut rec);
            self.relink(y, Side::Left, zl, &mut rec);
            let zcolor = self.color(z);
            if self.color(y) != zcolor {
                self.paint(y, zcolor, "Successor", &mut rec);
            }
            (y_color, Deficit::at(self, xn, xp))
        };
        self.free(z);

        if y_color.is_black() {
            self.delete_fixup(x, &mut rec);
        }

        let n = rec.len();
        let trace = rec.seal(Operation::Delete, key.clone(), before, self.snapshot());
        debug!("{} delete {:?} done in {} steps", self.name(), key, n + 1);
        Ok(trace)
    }

    fn locate(&self, key: &K, rec: &mut Recorder<K>) -> Option<NodeId> {
        let mut id = self.root();
        while !id.is_nil() {
            let went = match key.cmp(self.key(id)) {
                Ordering::Less => Some(Side::Left),
                Ordering::Greater => Some(Side::Right),
                Ordering::Equal => None,
            };
            rec.push(Action::Compare { node: id, went }, || match went {
                Some(Side::Left) => format!("{:?} < {:?}, go left", key, self.key(id)),
                Some(Side::Right) => format!("{:?} > {:?}, go right", key, self.key(id)),
                None => format!("{:?} == {:?}, found", key, self.key(id)),
            });
            match went {
                Some(side) => id = self.child(id, side),
                None => return Some(id),
            }
        }
        None
    }

    fn delete_fixup(&mut self, mut x: Deficit, rec: &mut Recorder<K>) {
        loop {
            let case = DeleteCase::classify(self, &x);
            trace!("{} delete fixup at {}: {:?}", self.name(), x.node, case);
            rec.enter(case.tag(), case.describe());
            let more = case.apply(self, &mut x, rec);
            rec.exit();
            if !more {
                break;
            }
        }
    }
}

use std::fmt::{self, Debug};

use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::{Color, NodeId, Side};
use crate::replay::Replay;
use crate::snapshot::Snapshot;

/// Tree operation that produced an [`OperationTrace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operation {
    Insert,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operation::Insert => write!(f, "INSERT"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Fixup loop a case number belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Fixup {
    Insert,
    Delete,
}

/// CLRS case of one fixup iteration. Insert cases are numbered 0..=3,
/// delete cases 0..=4. `mirrored` is set for the variant with left and
/// right swapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaseTag {
    pub fixup: Fixup,
    pub number: u8,
    pub mirrored: bool,
}

impl fmt::Display for CaseTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let fixup = match self.fixup {
            Fixup::Insert => "INSERT",
            Fixup::Delete => "DELETE",
        };
        if self.mirrored {
            write!(f, "{} CASE {} (mirror)", fixup, self.number)
        } else {
            write!(f, "{} CASE {}", fixup, self.number)
        }
    }
}

/// Discriminant of [`Action`], for renderers that only dispatch on kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepKind {
    Compare,
    Create,
    ColorFlip,
    RotateLeft,
    RotateRight,
    Relink,
    CaseEnter,
    CaseExit,
    Done,
}

/// One micro-action of an operation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Action<K> {
    /// Key compared against `node`; `went` is the side the descent took,
    /// None when the keys are equal and the descent stopped.
    Compare { node: NodeId, went: Option<Side> },
    /// Fresh, unlinked node.
    Create { node: NodeId, key: K, color: Color },
    ColorFlip {
        node: NodeId,
        before: Color,
        after: Color,
    },
    /// `child` is the pivot's right child that takes the pivot's place.
    RotateLeft { pivot: NodeId, child: NodeId },
    /// `child` is the pivot's left child that takes the pivot's place.
    RotateRight { pivot: NodeId, child: NodeId },
    /// Child slot `side` of `parent` changes from `old` to `new`, `parent`
    /// None stands for the root reference. `new` gets `parent` as its
    /// parent unless it is NIL.
    Relink {
        parent: Option<NodeId>,
        side: Side,
        old: NodeId,
        new: NodeId,
    },
    CaseEnter(CaseTag),
    CaseExit(CaseTag),
    Done,
}

impl<K> Action<K> {
    pub fn kind(&self) -> StepKind {
        match self {
            Action::Compare { .. } => StepKind::Compare,
            Action::Create { .. } => StepKind::Create,
            Action::ColorFlip { .. } => StepKind::ColorFlip,
            Action::RotateLeft { .. } => StepKind::RotateLeft,
            Action::RotateRight { .. } => StepKind::RotateRight,
            Action::Relink { .. } => StepKind::Relink,
            Action::CaseEnter(_) => StepKind::CaseEnter,
            Action::CaseExit(_) => StepKind::CaseExit,
            Action::Done => StepKind::Done,
        }
    }
}

/// Immutable record of one micro-action, with its position in the trace.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step<K> {
    seqno: usize,
    action: Action<K>,
    case: Option<CaseTag>, // fixup case this step belongs to.
    note: Option<String>,
}

impl<K> Step<K> {
    /// Position of this step in its trace, starting from 0.
    #[inline]
    pub fn seqno(&self) -> usize {
        self.seqno
    }

    #[inline]
    pub fn action(&self) -> &Action<K> {
        &self.action
    }

    #[inline]
    pub fn kind(&self) -> StepKind {
        self.action.kind()
    }

    #[inline]
    pub fn case(&self) -> Option<CaseTag> {
        self.case
    }

    pub fn case_number(&self) -> Option<u8> {
        self.case.map(|tag| tag.number)
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Nodes a renderer should highlight for this step, NIL excluded.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let ids = match &self.action {
            Action::Compare { node, .. } => vec![*node],
            Action::Create { node, .. } => vec![*node],
            Action::ColorFlip { node, .. } => vec![*node],
            Action::RotateLeft { pivot, child } => vec![*pivot, *child],
            Action::RotateRight { pivot, child } => vec![*pivot, *child],
            Action::Relink {
                parent, old, new, ..
            } => {
                let mut ids = vec![];
                ids.extend(parent.iter().copied());
                ids.push(*old);
                ids.push(*new);
                ids
            }
            Action::CaseEnter(_) | Action::CaseExit(_) | Action::Done => vec![],
        };
        ids.into_iter().filter(|id| !id.is_nil()).collect()
    }

    pub fn color_before(&self) -> Option<Color> {
        match &self.action {
            Action::ColorFlip { before, .. } => Some(*before),
            _ => None,
        }
    }

    pub fn color_after(&self) -> Option<Color> {
        match &self.action {
            Action::ColorFlip { after, .. } => Some(*after),
            Action::Create { color, .. } => Some(*color),
            _ => None,
        }
    }

    pub fn rotation_pivot(&self) -> Option<NodeId> {
        match &self.action {
            Action::RotateLeft { pivot, .. } | Action::RotateRight { pivot, .. } => Some(*pivot),
            _ => None,
        }
    }
}

/// Append-only log of steps for the operation in progress. Each
/// operation owns a fresh recorder and seals it into an
/// [`OperationTrace`] on completion.
pub(crate) struct Recorder<K> {
    steps: Vec<Step<K>>,
    case: Option<CaseTag>,
    notes: bool,
}

impl<K> Recorder<K>
where
    K: Clone + Ord + Debug,
{
    pub(crate) fn new(notes: bool) -> Recorder<K> {
        Recorder {
            steps: vec![],
            case: None,
            notes,
        }
    }

    /// Append `action`, `note` is evaluated only when notes are enabled.
    pub(crate) fn push<F>(&mut self, action: Action<K>, note: F)
    where
        F: FnOnce() -> String,
    {
        let seqno = self.steps.len();
        trace!("step {} {:?} case:{:?}", seqno, action, self.case);
        let note = if self.notes { Some(note()) } else { None };
        self.steps.push(Step {
            seqno,
            action,
            case: self.case,
            note,
        });
    }

    pub(crate) fn enter(&mut self, tag: CaseTag, desc: &str) {
        if let Some(open) = self.case {
            panic!("enter({}): {} still open, call the programmer", tag, open);
        }
        self.case = Some(tag);
        self.push(Action::CaseEnter(tag), || format!("{}: {}", tag, desc));
    }

    pub(crate) fn exit(&mut self) {
        let tag = match self.case {
            Some(tag) => tag,
            None => panic!("exit(): no case open, call the programmer"),
        };
        self.push(Action::CaseExit(tag), || format!("{} done", tag));
        self.case = None;
    }

    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }

    pub(crate) fn seal(
        mut self,
        operation: Operation,
        key: K,
        before: Snapshot<K>,
        after: Snapshot<K>,
    ) -> OperationTrace<K> {
        if self.case.is_some() {
            panic!("seal(): case left open, call the programmer");
        }
        self.push(Action::Done, || format!("{} {:?} complete", operation, key));
        OperationTrace {
            operation,
            key,
            steps: self.steps,
            before,
            after,
        }
    }
}

/// Sealed, read-only record of one insert or delete. Steps are held in a
/// vector, random access by sequence number is O(1).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OperationTrace<K> {
    operation: Operation,
    key: K,
    steps: Vec<Step<K>>,
    before: Snapshot<K>,
    after: Snapshot<K>,
}

impl<K> OperationTrace<K> {
    #[inline]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, seqno: usize) -> Option<&Step<K>> {
        self.steps.get(seqno)
    }

    pub fn steps(&self) -> &[Step<K>] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<Step<K>> {
        self.steps.iter()
    }

    /// Tree as it was before the operation.
    pub fn before(&self) -> &Snapshot<K> {
        &self.before
    }

    /// Tree as it was after the operation.
    pub fn after(&self) -> &Snapshot<K> {
        &self.after
    }

    /// Fixup cases entered, in order.
    pub fn cases(&self) -> Vec<CaseTag> {
        self.steps
            .iter()
            .filter_map(|step| match step.action {
                Action::CaseEnter(tag) => Some(tag),
                _ => None,
            })
            .collect()
    }

    /// Number of steps of `kind`.
    pub fn count(&self, kind: StepKind) -> usize {
        self.steps.iter().filter(|s| s.kind() == kind).count()
    }
}

impl<K> OperationTrace<K>
where
    K: Clone + Ord + Debug,
{
    /// Return a cursor positioned before the first step.
    pub fn replay(&self) -> Replay<K> {
        Replay::new(self)
    }
}

use std::fmt::Debug;

use log::trace;

use crate::config::Config;
use crate::snapshot::Snapshot;
use crate::step::{OperationTrace, Step};
use crate::tree::RbTree;

/// Cursor over an [`OperationTrace`]. Position `i` is the tree after the
/// first `i` steps, position 0 is [`OperationTrace::before`] and position
/// `len()` is [`OperationTrace::after`].
///
/// Moving forward applies one step, moving backward rebuilds from the
/// start. Use [`Replay::frames`] when every position is needed.
pub struct Replay<'a, K>
where
    K: Clone + Ord + Debug,
{
    trace: &'a OperationTrace<K>,
    tree: RbTree<K>,
    position: usize,
}

impl<'a, K> Replay<'a, K>
where
    K: Clone + Ord + Debug,
{
    pub(crate) fn new(trace: &'a OperationTrace<K>) -> Replay<'a, K> {
        Replay {
            trace,
            tree: RbTree::restore(trace.before(), Config::default()),
            position: 0,
        }
    }

    /// Number of positions after the start, same as the trace length.
    #[inline]
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Last applied step, None at position 0.
    pub fn current(&self) -> Option<&'a Step<K>> {
        let trace: &'a OperationTrace<K> = self.trace;
        self.position.checked_sub(1).and_then(|at| trace.get(at))
    }

    /// Apply the next step and return it, None at the end.
    pub fn forward(&mut self) -> Option<&'a Step<K>> {
        let trace: &'a OperationTrace<K> = self.trace;
        let step = trace.get(self.position)?;
        trace!("replay {} forward {:?}", self.position, step.kind());
        self.tree.apply(step.action());
        self.position += 1;
        Some(step)
    }

    /// Undo the last step and return it, None at the start.
    pub fn back(&mut self) -> Option<&'a Step<K>> {
        let step = self.current()?;
        self.seek(self.position - 1);
        Some(step)
    }

    /// Jump to `position`, clamped to `len()`.
    pub fn seek(&mut self, position: usize) {
        let position = position.min(self.len());
        if position < self.position {
            self.tree = RbTree::restore(self.trace.before(), Config::default());
            self.position = 0;
        }
        while self.position < position {
            self.forward();
        }
    }

    /// Tree at the current position.
    pub fn snapshot(&self) -> Snapshot<K> {
        self.tree.snapshot()
    }

    /// Tree at every position, `frames()[i]` is the tree after `i` steps.
    pub fn frames(&self) -> Vec<Snapshot<K>> {
        let mut replay = Replay::new(self.trace);
        let mut frames = Vec::with_capacity(self.len() + 1);
        frames.push(replay.snapshot());
        while replay.forward().is_some() {
            frames.push(replay.snapshot());
        }
        frames
    }
}

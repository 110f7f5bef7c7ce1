//! Search for insertion orders that produce a given red-black tree.
//!
//! Every permutation of the elements is inserted into a fresh tree and
//! the result compared with the target, keys colors and structure. In
//! helper mode an extra value, not among the elements, is inserted and
//! later deleted at chosen positions so that shapes unreachable by pure
//! insertion can be found.

use std::fmt::{self, Debug, Display};

use log::{debug, trace};

use crate::config::{Config, Duplicates};
use crate::error::SearchError;
use crate::snapshot::Snapshot;
use crate::tree::RbTree;
use crate::validate;

/// Default maximum number of matches collected by [`Search::run`].
pub const SEARCH_LIMIT: usize = 1000;

/// Which sequences to try.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Insert the permuted elements only.
    Direct,
    /// Insert the permuted elements with a helper inserted and deleted.
    Helper,
    /// Both of the above, per permutation.
    Both,
}

/// Where the helper goes within a sequence of `n` element insertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Helper inserted first and deleted right after.
    Begin,
    /// Helper inserted first and deleted last.
    Surround,
    /// Every insert position before every delete position.
    All,
}

impl Placement {
    // (insert position, delete position) pairs in a sequence of n + 2.
    fn positions(&self, n: usize) -> Vec<(usize, usize)> {
        match self {
            Placement::Begin => vec![(0, 1)],
            Placement::Surround => vec![(0, n + 1)],
            Placement::All => (0..=n)
                .flat_map(|ins| ((ins + 1)..=(n + 1)).map(move |del| (ins, del)))
                .collect(),
        }
    }
}

/// One operation of a matching sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op<K> {
    Insert(K),
    HelperInsert(K),
    HelperDelete(K),
}

impl<K> Display for Op<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Op::Insert(key) => write!(f, "{:?}", key),
            Op::HelperInsert(key) => write!(f, "+{:?}", key),
            Op::HelperDelete(key) => write!(f, "-{:?}", key),
        }
    }
}

/// A sequence that reproduces the target. `mode` is either
/// [`SearchMode::Direct`] or [`SearchMode::Helper`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match<K> {
    pub mode: SearchMode,
    pub ops: Vec<Op<K>>,
}

impl<K> Display for Match<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ops: Vec<String> = self.ops.iter().map(|op| op.to_string()).collect();
        write!(f, "[{}]", ops.join(", "))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome<K> {
    pub matches: Vec<Match<K>>,
    /// Number of sequences executed.
    pub checked: usize,
}

impl<K> SearchOutcome<K> {
    pub fn direct(&self) -> usize {
        self.count(SearchMode::Direct)
    }

    pub fn helper(&self) -> usize {
        self.count(SearchMode::Helper)
    }

    fn count(&self, mode: SearchMode) -> usize {
        self.matches.iter().filter(|m| m.mode == mode).count()
    }
}

/// Sequence search over permutations of `elements` for `target`.
///
/// ```
/// use rbtrace::{RbTree, Search};
///
/// // every order of three keys settles into 2B(1R, 3R).
/// let target = RbTree::build("target", vec![2, 1, 3]).unwrap().snapshot();
/// let outcome = Search::new(target, vec![1, 2, 3]).run().unwrap();
/// assert_eq!(outcome.checked, 6);
/// assert_eq!(outcome.direct(), 6);
/// assert_eq!(outcome.matches[0].to_string(), "[1, 2, 3]");
/// ```
pub struct Search<K> {
    target: Snapshot<K>,
    elements: Vec<K>,
    mode: SearchMode,
    helper: Option<K>,
    placement: Placement,
    prefix: Vec<K>,
    limit: usize,
}

impl<K> Search<K>
where
    K: Clone + Ord + Debug,
{
    /// Direct mode, no helper, no prefix, limit [`SEARCH_LIMIT`].
    pub fn new(target: Snapshot<K>, elements: Vec<K>) -> Search<K> {
        Search {
            target,
            elements,
            mode: SearchMode::Direct,
            helper: None,
            placement: Placement::All,
            prefix: vec![],
            limit: SEARCH_LIMIT,
        }
    }

    pub fn set_mode(&mut self, mode: SearchMode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn set_helper(&mut self, helper: K) -> &mut Self {
        self.helper = Some(helper);
        self
    }

    pub fn set_placement(&mut self, placement: Placement) -> &mut Self {
        self.placement = placement;
        self
    }

    /// Fix the first insertions to `prefix`, only the remaining elements
    /// are permuted.
    pub fn set_prefix(&mut self, prefix: Vec<K>) -> &mut Self {
        self.prefix = prefix;
        self
    }

    pub fn set_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = limit;
        self
    }

    /// Validate inputs and run the search, stopping once `limit` matches
    /// are collected.
    pub fn run(&self) -> Result<SearchOutcome<K>, SearchError> {
        self.check()?;

        let rest: Vec<K> = self
            .elements
            .iter()
            .filter(|e| !self.prefix.contains(e))
            .cloned()
            .collect();
        let helper = match self.mode {
            SearchMode::Direct => None,
            SearchMode::Helper | SearchMode::Both => self.helper.as_ref(),
        };
        debug!(
            "search {} elements, prefix {}, mode {:?}, helper {:?}",
            self.elements.len(),
            self.prefix.len(),
            self.mode,
            helper
        );

        let mut outcome = SearchOutcome {
            matches: vec![],
            checked: 0,
        };
        let mut perm = Permutations::new(rest.len());
        'outer: while let Some(order) = perm.next_order() {
            let keys: Vec<&K> = self.prefix.iter().chain(order.iter().map(|&i| &rest[i])).collect();

            if self.mode != SearchMode::Helper {
                let ops: Vec<Op<K>> = keys.iter().map(|&k| Op::Insert(k.clone())).collect();
                outcome.checked += 1;
                if self.reproduces(&ops) {
                    trace!("search direct match {:?}", keys);
                    outcome.matches.push(Match {
                        mode: SearchMode::Direct,
                        ops,
                    });
                    if outcome.matches.len() >= self.limit {
                        break 'outer;
                    }
                }
            }

            if let Some(h) = helper {
                for (ins, del) in self.placement.positions(keys.len()) {
                    let ops = with_helper(&keys, h, ins, del);
                    outcome.checked += 1;
                    if self.reproduces(&ops) {
                        trace!("search helper match at ({}, {}) {:?}", ins, del, keys);
                        outcome.matches.push(Match {
                            mode: SearchMode::Helper,
                            ops,
                        });
                        if outcome.matches.len() >= self.limit {
                            break 'outer;
                        }
                    }
                }
            }
        }

        debug!(
            "search done, {} checked, direct:{} helper:{}",
            outcome.checked,
            outcome.direct(),
            outcome.helper()
        );
        Ok(outcome)
    }

    fn check(&self) -> Result<(), SearchError> {
        if self.target.root().is_none() {
            return Err(SearchError::EmptyTarget);
        }
        let report = validate::validate(&self.target);
        if !report.ok() {
            let errs: Vec<String> = report.violations().iter().map(|v| v.to_string()).collect();
            return Err(SearchError::InvalidTarget(errs.join("; ")));
        }
        let keys = self.target.keys();
        if keys.windows(2).any(|w| w[0] == w[1]) {
            return Err(SearchError::DuplicateTargetKeys);
        }
        if self.elements.is_empty() {
            return Err(SearchError::NoElements);
        }
        match &self.helper {
            Some(h) if self.elements.contains(h) => return Err(SearchError::HelperInElements),
            None if self.mode == SearchMode::Helper => return Err(SearchError::MissingHelper),
            _ => (),
        }
        if self.prefix.iter().any(|p| !self.elements.contains(p)) {
            return Err(SearchError::PrefixNotInElements);
        }
        let mut prefix = self.prefix.clone();
        prefix.sort();
        if prefix.windows(2).any(|w| w[0] == w[1]) {
            return Err(SearchError::DuplicatePrefix);
        }
        Ok(())
    }

    fn reproduces(&self, ops: &[Op<K>]) -> bool {
        match execute(ops) {
            Some(tree) => tree.snapshot().same_shape(&self.target),
            None => false,
        }
    }
}

fn with_helper<K>(keys: &[&K], helper: &K, ins: usize, del: usize) -> Vec<Op<K>>
where
    K: Clone,
{
    let mut keys = keys.iter();
    (0..keys.len() + 2)
        .filter_map(|at| {
            if at == ins {
                Some(Op::HelperInsert(helper.clone()))
            } else if at == del {
                Some(Op::HelperDelete(helper.clone()))
            } else {
                keys.next().map(|&k| Op::Insert(k.clone()))
            }
        })
        .collect()
}

fn execute<K>(ops: &[Op<K>]) -> Option<RbTree<K>>
where
    K: Clone + Ord + Debug,
{
    let mut config = Config::default();
    config.set_duplicates(Duplicates::Right).set_notes(false);
    let mut tree = RbTree::with_config("search", config);
    for op in ops.iter() {
        match op {
            Op::Insert(key) | Op::HelperInsert(key) => tree.insert(key.clone()).ok()?,
            Op::HelperDelete(key) => tree.delete(key).ok()?,
        };
    }
    Some(tree)
}

// Index permutations of 0..n in lexicographic order, n! of them, one for
// n == 0.
struct Permutations {
    order: Vec<usize>,
    started: bool,
    done: bool,
}

impl Permutations {
    fn new(n: usize) -> Permutations {
        Permutations {
            order: (0..n).collect(),
            started: false,
            done: false,
        }
    }

    fn next_order(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.order);
        }
        let order = &mut self.order;
        let pivot = match (1..order.len()).rev().find(|&i| order[i - 1] < order[i]) {
            Some(i) => i - 1,
            None => {
                self.done = true;
                return None;
            }
        };
        let swap = match (pivot + 1..order.len()).rev().find(|&j| order[j] > order[pivot]) {
            Some(j) => j,
            None => panic!("next_order(): no successor for pivot, call the programmer"),
        };
        order.swap(pivot, swap);
        order[pivot + 1..].reverse();
        Some(&self.order)
    }
}

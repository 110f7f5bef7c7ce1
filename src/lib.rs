//! Red-black tree engine after CLRS, every insert and delete returns an
//! [`OperationTrace`] that a renderer can step through, forward and back.
//!
//! ```
//! use rbtrace::RbTree;
//!
//! let mut tree = RbTree::new("demo");
//! tree.insert(10).unwrap();
//! tree.insert(20).unwrap();
//! let trace = tree.insert(30).unwrap();
//!
//! let cases: Vec<u8> = trace.cases().iter().map(|c| c.number).collect();
//! assert_eq!(cases, vec![3]);
//! assert!(tree.validate().ok());
//!
//! let mut replay = trace.replay();
//! replay.seek(replay.len());
//! assert_eq!(&replay.snapshot(), trace.after());
//! ```
//!
//! Broken structural invariants, like rotating around a missing child or
//! writing the color of NIL, are programming errors and panic. Absent
//! keys and rejected duplicates are returned as [`Error`]. Property
//! violations found by [`validate`] are data, not errors.
//!
//! The crate logs through the `log` facade and never installs a logger.

mod bst;
mod coloring;
mod config;
mod delete;
mod depth;
mod error;
mod insert;
mod node;
mod replay;
mod search;
mod snapshot;
mod step;
mod tree;
mod validate;

pub use crate::bst::{Bst, Comparison};
pub use crate::coloring::{count_colorings, recolor_random};
pub use crate::config::{Config, Duplicates};
pub use crate::delete::{DeleteCase, Deficit};
pub use crate::depth::Depth;
pub use crate::error::{Error, SearchError};
pub use crate::insert::InsertCase;
pub use crate::node::{Color, NodeId, NodeRef, Side};
pub use crate::replay::Replay;
pub use crate::search::{Match, Op, Placement, Search, SearchMode, SearchOutcome, SEARCH_LIMIT};
pub use crate::snapshot::{SnapNode, Snapshot};
pub use crate::step::{Action, CaseTag, Fixup, Operation, OperationTrace, Step, StepKind};
pub use crate::tree::RbTree;
pub use crate::validate::{validate, Property, PropertyViolation, Shape, ValidationReport};

#[cfg(test)]
mod delete_test;
#[cfg(test)]
mod search_test;
#[cfg(test)]
mod validate_test;

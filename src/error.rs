use std::fmt::Debug;

use thiserror::Error;

/// Error enumerates the recoverable failures of tree operations. Broken
/// structural invariants are not errors, they panic, refer to the
/// [crate] documentation.
#[derive(Error, Debug, PartialEq)]
pub enum Error<K>
where
    K: Debug,
{
    /// Returned by delete() when key is absent. The tree is untouched.
    #[error("key {0:?} not found")]
    NotFound(K),
    /// Returned by insert() when key is already present and the tree is
    /// configured with [`Duplicates::Reject`](crate::Duplicates::Reject).
    #[error("key {0:?} already present")]
    DuplicateKey(K),
}

/// SearchError enumerates invalid inputs to [`Search::run`].
///
/// [`Search::run`]: crate::Search::run
#[derive(Error, Debug, PartialEq)]
pub enum SearchError {
    #[error("target tree is empty")]
    EmptyTarget,
    /// The String component lists the violations found by the validator.
    #[error("target is not a valid red-black tree: {0}")]
    InvalidTarget(String),
    #[error("target tree has duplicate keys")]
    DuplicateTargetKeys,
    #[error("no elements to permute")]
    NoElements,
    #[error("helper value must not be one of the elements")]
    HelperInElements,
    #[error("helper mode requires a helper value")]
    MissingHelper,
    #[error("prefix value is not one of the elements")]
    PrefixNotInElements,
    #[error("prefix values contain duplicates")]
    DuplicatePrefix,
}

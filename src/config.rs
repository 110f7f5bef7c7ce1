#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What insert does with a key equal to one already in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Duplicates {
    /// Descend right on ties, the new node lands after its equals in
    /// in-order sequence.
    Right,
    /// Stop the descent on the equal node and return
    /// [`Error::DuplicateKey`](crate::Error::DuplicateKey).
    Reject,
}

/// Engine configuration, fixed for the life of an [`RbTree`].
///
/// ```
/// use rbtrace::{Config, Duplicates, RbTree};
///
/// let mut config = Config::default();
/// config.set_duplicates(Duplicates::Reject).set_notes(false);
/// let tree: RbTree<u32> = RbTree::with_config("analyze", config);
/// assert_eq!(tree.config().duplicates(), Duplicates::Reject);
/// ```
///
/// [`RbTree`]: crate::RbTree
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    duplicates: Duplicates,
    notes: bool, // attach human readable text to every step.
}

impl Default for Config {
    fn default() -> Config {
        Config {
            duplicates: Duplicates::Right,
            notes: true,
        }
    }
}

impl Config {
    pub fn set_duplicates(&mut self, duplicates: Duplicates) -> &mut Config {
        self.duplicates = duplicates;
        self
    }

    /// Steps carry a note like `"15 < 20, go left"` when enabled. Disable
    /// for bulk workloads where nobody reads the trace.
    pub fn set_notes(&mut self, notes: bool) -> &mut Config {
        self.notes = notes;
        self
    }

    #[inline]
    pub fn duplicates(&self) -> Duplicates {
        self.duplicates
    }

    #[inline]
    pub fn notes(&self) -> bool {
        self.notes
    }
}

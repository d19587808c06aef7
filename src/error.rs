use thiserror::Error;

/// Errors reported by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A [`Builder`](crate::Builder) was asked to build a map without a comparator.
    #[error("an ordered map cannot be built without a comparator")]
    MissingComparator,

    /// [`verify`](crate::RBTreeMap::verify) found a broken tree invariant.
    #[error("tree invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// A structural invariant that does not hold. Nodes are named by their arena slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("root node {node} is red")]
    RedRoot { node: usize },

    #[error("root node {node} has a parent link")]
    RootHasParent { node: usize },

    #[error("red node {node} has a red child {child}")]
    RedChildOfRed { node: usize, child: usize },

    #[error("black height differs below node {node}: left {left}, right {right}")]
    BlackHeightMismatch { node: usize, left: usize, right: usize },

    #[error("in-order walk is not strictly increasing at node {node}")]
    OutOfOrder { node: usize },

    #[error("child {child} does not point back to its parent {node}")]
    BrokenParentLink { node: usize, child: usize },

    #[error("len is {len} but {counted} nodes are reachable")]
    LenMismatch { len: usize, counted: usize },

    #[error("len is {len} but the arena holds {live} nodes")]
    ArenaLenMismatch { len: usize, live: usize },
}

/// A `Result` whose error is [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(Error::MissingComparator.to_string(), "an ordered map cannot be built without a comparator");
        let err: Error = InvariantViolation::LenMismatch {
            len: 3,
            counted: 2,
        }
        .into();
        assert_eq!(err.to_string(), "tree invariant violated: len is 3 but 2 nodes are reachable");
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("a graph needs at least one node (the root)")]
    EmptyGraph,

    #[error("solver was built for {expected} nodes but the cost matrix has {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("expected {expected} backward-star entries, found {found}")]
    BadCostLength { expected: usize, found: usize },

    #[error("arc ({tail}, {head}) uses the reserved cost value")]
    ReservedCost { tail: usize, head: usize },

    #[error("arc ({tail}, {head}) is out of range for a graph with {nodes} nodes")]
    ArcOutOfRange {
        tail: usize,
        head: usize,
        nodes: usize,
    },

    #[error("self-loop on node {node} is not an arc")]
    SelfLoop { node: usize },

    #[error("arc from {tail} enters the root")]
    ArcIntoRoot { tail: usize },

    #[error("node {node} does not reach the root through its predecessors")]
    PredecessorCycle { node: usize },

    #[error("objective {reported} differs from the tree cost {recomputed}")]
    ObjectiveMismatch { reported: i64, recomputed: i64 },

    #[error("objective {reported} differs from the dual sum {dual_sum}")]
    DualMismatch { reported: i64, dual_sum: i64 },
}

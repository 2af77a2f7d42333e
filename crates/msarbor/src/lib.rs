#![forbid(unsafe_code)]

//! Minimum spanning arborescence on complete directed graphs.
//!
//! `msarbor` implements the ARBOR algorithm of Fischetti and Toth (ORSA J. on Computing 5(4),
//! 1993): a Chu-Liu/Edmonds style contraction scheme tuned for dense graphs, running in O(n^2).
//! Nodes are numbered `0..n`, and the root is always node `n - 1`.
//!
//! ```
//! use msarbor::{CostMatrix, Solver};
//!
//! // n = 3, root = 2.
//! let costs = CostMatrix::from_fn(3, |tail, head| match (tail, head) {
//!     (1, 0) => Some(5),
//!     (2, 0) => Some(4),
//!     (0, 1) => Some(2),
//!     (2, 1) => Some(3),
//!     _ => None,
//! })?;
//!
//! let mut solver = Solver::new(3)?;
//! assert_eq!(solver.solve(&costs)?, 6);
//! assert_eq!(solver.predecessors(), &[2, 0]);
//! # Ok::<(), msarbor::Error>(())
//! ```

pub mod cost;
pub mod error;
pub mod solver;

pub use cost::{CostMatrix, ReducedCosts};
pub use error::{Error, Result};
pub use solver::Solver;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Arc cost.
pub type Cost = i32;

/// Objective values, dual values and reduced costs.
///
/// Must hold `n * Cost::MAX`; callers with larger instances own the overflow risk.
pub type Objective = i64;

/// Value reserved by the sentinel-coded input format. Never a valid arc cost.
pub const RESERVED_COST: Cost = Cost::MAX;

/// Sentinel for a missing arc in the sentinel-coded input format.
///
/// This is also the nominal cost charged to the objective when a missing arc has to be used.
pub const NO_ARC: Cost = RESERVED_COST - 1;

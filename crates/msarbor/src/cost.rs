//! Dense cost storage in backward-star layout.
//!
//! Both containers store `n - 1` backward stars (one per non-root head), each holding `n`
//! entries indexed by tail. The diagonal slot of each star exists but is never an arc.

use crate::{Cost, Error, NO_ARC, Objective, RESERVED_COST, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    n: usize,
    stars: Vec<Option<Cost>>,
}

impl CostMatrix {
    /// A matrix on `n` nodes with every arc missing.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::EmptyGraph);
        }
        Ok(Self {
            n,
            stars: vec![None; n * (n - 1)],
        })
    }

    /// Builds a matrix by asking `cost(tail, head)` for every arc not entering the root.
    pub fn from_fn(n: usize, mut cost: impl FnMut(usize, usize) -> Option<Cost>) -> Result<Self> {
        let mut m = Self::new(n)?;
        for head in 0..m.root() {
            for tail in 0..n {
                if tail != head {
                    m.stars[head * n + tail] = cost(tail, head);
                }
            }
        }
        Ok(m)
    }

    /// Builds a matrix from `n - 1` backward stars of `n` entries each.
    ///
    /// Entry `head * n + tail` is the cost of `(tail, head)`; diagonal entries are ignored.
    pub fn from_backward_stars(n: usize, stars: &[Option<Cost>]) -> Result<Self> {
        let mut m = Self::new(n)?;
        if stars.len() != m.stars.len() {
            return Err(Error::BadCostLength {
                expected: m.stars.len(),
                found: stars.len(),
            });
        }
        m.stars.copy_from_slice(stars);
        for head in 0..m.root() {
            m.stars[head * n + head] = None;
        }
        Ok(m)
    }

    /// Same layout as [`CostMatrix::from_backward_stars`], with missing arcs coded as values at
    /// or above [`NO_ARC`].
    ///
    /// [`RESERVED_COST`] off the diagonal is rejected.
    pub fn from_raw_backward_stars(n: usize, stars: &[Cost]) -> Result<Self> {
        let mut m = Self::new(n)?;
        if stars.len() != m.stars.len() {
            return Err(Error::BadCostLength {
                expected: m.stars.len(),
                found: stars.len(),
            });
        }
        for head in 0..m.root() {
            for tail in 0..n {
                if tail == head {
                    continue;
                }
                let raw = stars[head * n + tail];
                if raw == RESERVED_COST {
                    return Err(Error::ReservedCost { tail, head });
                }
                m.stars[head * n + tail] = (raw < NO_ARC).then_some(raw);
            }
        }
        Ok(m)
    }

    pub fn node_count(&self) -> usize {
        self.n
    }

    pub fn root(&self) -> usize {
        self.n - 1
    }

    /// Cost of `(tail, head)`, or `None` when the arc is missing or not a valid arc.
    pub fn get(&self, tail: usize, head: usize) -> Option<Cost> {
        if tail >= self.n || head >= self.root() || tail == head {
            return None;
        }
        self.stars[head * self.n + tail]
    }

    pub fn set(&mut self, tail: usize, head: usize, cost: Option<Cost>) -> Result<()> {
        if tail >= self.n || head >= self.n {
            return Err(Error::ArcOutOfRange {
                tail,
                head,
                nodes: self.n,
            });
        }
        if tail == head {
            return Err(Error::SelfLoop { node: tail });
        }
        if head == self.root() {
            return Err(Error::ArcIntoRoot { tail });
        }
        self.stars[head * self.n + tail] = cost;
        Ok(())
    }

    /// All entries for arcs entering `head`, indexed by tail.
    pub fn backward_star(&self, head: usize) -> &[Option<Cost>] {
        let start = head * self.n;
        &self.stars[start..start + self.n]
    }

    /// Present arcs as `(tail, head, cost)`, head-major.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize, Cost)> + '_ {
        let n = self.n;
        self.stars
            .iter()
            .enumerate()
            .filter_map(move |(ix, c)| c.map(|c| (ix % n, ix / n, c)))
    }
}

/// Reduced costs of the last solve, in the same layout as [`CostMatrix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedCosts {
    n: usize,
    stars: Vec<Option<Objective>>,
}

impl ReducedCosts {
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::EmptyGraph);
        }
        Ok(Self {
            n,
            stars: vec![None; n * (n - 1)],
        })
    }

    pub fn node_count(&self) -> usize {
        self.n
    }

    pub fn root(&self) -> usize {
        self.n - 1
    }

    /// Reduced cost of `(tail, head)`; `None` for missing arcs and non-arcs.
    pub fn get(&self, tail: usize, head: usize) -> Option<Objective> {
        if tail >= self.n || head >= self.root() || tail == head {
            return None;
        }
        self.stars[head * self.n + tail]
    }

    pub fn backward_star(&self, head: usize) -> &[Option<Objective>] {
        let start = head * self.n;
        &self.stars[start..start + self.n]
    }

    pub(crate) fn stars_mut(&mut self) -> &mut [Option<Objective>] {
        &mut self.stars
    }
}

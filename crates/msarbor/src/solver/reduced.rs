//! Reduced costs from the dual solution.
//!
//! The reduced cost of `(tail, head)` is its cost minus the duals of every auxiliary-tree
//! ancestor of `head` strictly below the lowest common ancestor of `tail` and `head`. Each arc
//! walks both ancestor chains, so the whole computation is O(n^3) in the worst case.

use super::Solver;
use crate::cost::{CostMatrix, ReducedCosts};
use crate::{Objective, Result};

impl Solver {
    /// Fills `out` with the reduced costs of the last solve. `costs` must be the solved matrix.
    ///
    /// Diagonal entries and missing arcs are `None`.
    pub fn compute_reduced_costs(
        &mut self,
        costs: &CostMatrix,
        out: &mut ReducedCosts,
    ) -> Result<()> {
        self.check_size(costs.node_count())?;
        self.check_size(out.node_count())?;

        let n = self.n;
        let stars = out.stars_mut();
        for head in 0..self.root {
            for tail in 0..n {
                let slot = head * n + tail;
                stars[slot] = costs
                    .get(tail, head)
                    .map(|cost| Objective::from(cost) - self.separating_duals(tail, head));
            }
        }
        Ok(())
    }

    fn separating_duals(&mut self, tail: usize, head: usize) -> Objective {
        // depth[k] is the 1-based position of k on the head's chain, 0 when off it.
        self.path.clear();
        let mut j = head;
        loop {
            self.path.push(j);
            self.depth[j] = self.path.len();
            match self.nodes.parent[j] {
                Some(p) => j = p,
                None => break,
            }
        }

        let mut i = tail;
        while self.depth[i] == 0 {
            match self.nodes.parent[i] {
                Some(p) => i = p,
                None => break,
            }
        }
        let below_lca = match self.depth[i] {
            0 => self.path.len(),
            d => d - 1,
        };

        let sum: Objective = self.path[..below_lca]
            .iter()
            .map(|&k| self.nodes.dual[k])
            .sum();
        for &k in &self.path {
            self.depth[k] = 0;
        }
        sum
    }
}

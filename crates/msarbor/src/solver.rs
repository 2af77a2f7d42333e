//! The arborescence solver.
//!
//! A [`Solver`] owns every working buffer for a fixed node count and reuses them across calls to
//! [`Solver::solve`]. One solve runs three phases over shared state:
//!
//! - contraction (`contract`): stage-by-stage minimum entering arc selection, shrinking every
//!   cycle it closes into a supernode and recording dual values; this builds the auxiliary tree.
//! - extraction (`extract`): a single descending pass over the auxiliary tree producing the
//!   predecessor function.
//! - reduced costs (`reduced`, opt-in): dual sums along auxiliary-tree paths.
//!
//! Auxiliary-tree node ids `0..n` are the original nodes; supernodes are numbered from `n`
//! upwards in creation order, so every supernode id is greater than the ids of its members.

use crate::cost::{CostMatrix, ReducedCosts};
use crate::{Error, NO_ARC, Objective, Result};

mod active;
mod contract;
mod extract;
mod reduced;

use active::ActiveSet;
use contract::{CostLines, Weight};

/// Per auxiliary-tree node state, indexed by node id.
#[derive(Debug, Clone)]
struct AuxNodes {
    /// Enclosing supernode; `None` for children of the virtual root.
    parent: Vec<Option<usize>>,
    dual: Vec<Objective>,
    /// Dual values before charging, used to reduce arcs entering a shrunk cycle.
    dual_weight: Vec<Weight>,
    /// Original `(tail, head)` arc chosen to enter the node.
    arc: Vec<Option<(usize, usize)>>,
    /// Whether the chosen entering arc is missing from the cost matrix.
    forced: Vec<bool>,
    /// Stage in which the node was labeled; 0 = never.
    label: Vec<usize>,
    /// Cost line (row and column of the working matrix) the node currently owns.
    line: Vec<usize>,
}

impl AuxNodes {
    fn with_capacity(cap: usize) -> Self {
        Self {
            parent: vec![None; cap],
            dual: vec![0; cap],
            dual_weight: vec![Weight::ZERO; cap],
            arc: vec![None; cap],
            forced: vec![false; cap],
            label: vec![0; cap],
            line: (0..cap).collect(),
        }
    }

    fn reset(&mut self) {
        self.parent.fill(None);
        self.dual.fill(0);
        self.dual_weight.fill(Weight::ZERO);
        self.arc.fill(None);
        self.forced.fill(false);
        self.label.fill(0);
        for (id, line) in self.line.iter_mut().enumerate() {
            *line = id;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Solver {
    n: usize,
    root: usize,
    /// Highest auxiliary-tree node id in use.
    last_node: usize,
    objective: Objective,

    nodes: AuxNodes,
    lines: CostLines,
    active: ActiveSet,
    /// Nodes chased during the current stage, oldest first.
    chain: Vec<usize>,

    /// Predecessor of every non-root original node.
    pred: Vec<usize>,
    missing_heads: Vec<usize>,

    // Scratch buffers for extraction and reduced costs.
    resolved: Vec<bool>,
    depth: Vec<usize>,
    path: Vec<usize>,
}

impl Solver {
    /// Allocates a solver for graphs with `n` nodes (root `n - 1`).
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::EmptyGraph);
        }
        let root = n - 1;
        // Originals plus at most n - 2 supernodes.
        let cap = (2 * n - 2).max(n);
        Ok(Self {
            n,
            root,
            last_node: root,
            objective: 0,
            nodes: AuxNodes::with_capacity(cap),
            lines: CostLines::new(n),
            active: ActiveSet::new(n, cap),
            chain: Vec::with_capacity(n),
            pred: vec![root; root],
            missing_heads: Vec::new(),
            resolved: vec![false; cap],
            depth: vec![0; cap],
            path: Vec::with_capacity(cap),
        })
    }

    pub fn node_count(&self) -> usize {
        self.n
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Solves the instance and returns the optimal objective.
    ///
    /// No feasibility check is made. When missing arcs cannot be avoided, the tree uses as few
    /// of them as possible, each charged [`NO_ARC`], and is the cheapest such tree otherwise;
    /// see [`Solver::is_feasible`].
    pub fn solve(&mut self, costs: &CostMatrix) -> Result<Objective> {
        self.check_size(costs.node_count())?;
        self.reset(costs);
        self.contract();
        self.extract();

        if !self.missing_heads.is_empty() {
            tracing::warn!(
                heads = ?self.missing_heads,
                "no arborescence avoids missing arcs; using them"
            );
        }
        tracing::debug!(
            n = self.n,
            objective = self.objective,
            supernodes = self.last_node - self.root,
            "solved"
        );
        Ok(self.objective)
    }

    /// [`Solver::solve`] followed by [`Solver::compute_reduced_costs`].
    pub fn solve_with_reduced_costs(
        &mut self,
        costs: &CostMatrix,
        reduced: &mut ReducedCosts,
    ) -> Result<Objective> {
        self.check_size(reduced.node_count())?;
        let objective = self.solve(costs)?;
        self.compute_reduced_costs(costs, reduced)?;
        Ok(objective)
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Predecessor of each node `0..n - 1`; the root has no entry.
    pub fn predecessors(&self) -> &[usize] {
        &self.pred
    }

    pub fn predecessor(&self, node: usize) -> Option<usize> {
        self.pred.get(node).copied()
    }

    /// Number of auxiliary-tree nodes (original nodes plus supernodes) of the last solve.
    pub fn aux_node_count(&self) -> usize {
        self.last_node + 1
    }

    pub fn aux_parents(&self) -> &[Option<usize>] {
        &self.nodes.parent[..=self.last_node]
    }

    /// Dual value of each auxiliary-tree node.
    pub fn duals(&self) -> &[Objective] {
        &self.nodes.dual[..=self.last_node]
    }

    /// Original arc that entered auxiliary-tree node `node`; `None` for the root.
    pub fn aux_arc(&self, node: usize) -> Option<(usize, usize)> {
        if node > self.last_node {
            return None;
        }
        self.nodes.arc[node]
    }

    /// Heads whose predecessor arc is missing from the cost matrix, ascending.
    pub fn missing_arc_heads(&self) -> &[usize] {
        &self.missing_heads
    }

    pub fn is_feasible(&self) -> bool {
        self.missing_heads.is_empty()
    }

    /// Re-checks the last solve against `costs`.
    ///
    /// Missing predecessor arcs count [`NO_ARC`] towards the tree cost.
    pub fn verify(&self, costs: &CostMatrix) -> Result<()> {
        self.check_size(costs.node_count())?;

        for node in 0..self.root {
            let mut j = node;
            let mut hops = 0;
            while j != self.root {
                j = self.pred[j];
                hops += 1;
                if hops > self.root {
                    return Err(Error::PredecessorCycle { node });
                }
            }
        }

        let dual_sum: Objective = self.duals().iter().sum();
        if dual_sum != self.objective {
            return Err(Error::DualMismatch {
                reported: self.objective,
                dual_sum,
            });
        }

        let recomputed: Objective = self
            .pred
            .iter()
            .enumerate()
            .map(|(head, &tail)| {
                costs
                    .get(tail, head)
                    .map_or(Objective::from(NO_ARC), Objective::from)
            })
            .sum();
        if recomputed != self.objective {
            return Err(Error::ObjectiveMismatch {
                reported: self.objective,
                recomputed,
            });
        }
        Ok(())
    }

    fn check_size(&self, found: usize) -> Result<()> {
        if found != self.n {
            return Err(Error::SizeMismatch {
                expected: self.n,
                found,
            });
        }
        Ok(())
    }

    fn reset(&mut self, costs: &CostMatrix) {
        self.last_node = self.root;
        self.objective = 0;
        self.nodes.reset();
        self.lines.load(costs);
        self.active.reset();
        self.chain.clear();
        self.pred.fill(self.root);
        self.missing_heads.clear();
    }
}

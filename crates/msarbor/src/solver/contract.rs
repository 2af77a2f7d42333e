//! Contraction phase: builds the auxiliary tree and the dual values.
//!
//! A stage starts at the first unlabeled original node and follows minimum entering arcs
//! backwards. Each chosen arc either reaches a fresh node (pushed on the chain), closes a cycle
//! on the chain (shrunk into a supernode that becomes the new chain head), or reaches a node
//! labeled in an earlier stage, which is already connected to the root and ends the stage.

use super::Solver;
use crate::cost::CostMatrix;
use crate::{NO_ARC, Objective};

/// Working arc weight, compared lexicographically: the number of missing arcs it stands for,
/// then the cost of the present ones.
///
/// Behaves as `missing * NO_ARC + value` with an unbounded `NO_ARC`: one missing arc outweighs
/// any present cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct Weight {
    missing: i64,
    value: Objective,
}

impl Weight {
    pub(super) const ZERO: Weight = Weight {
        missing: 0,
        value: 0,
    };

    const MISSING: Weight = Weight {
        missing: 1,
        value: 0,
    };

    fn present(value: Objective) -> Self {
        Weight { missing: 0, value }
    }

    fn reduced_by(self, dual: Weight) -> Self {
        Weight {
            missing: self.missing - dual.missing,
            value: self.value - dual.value,
        }
    }

    /// Amount charged to the objective when this weight is chosen.
    fn charge(self) -> Objective {
        self.missing * Objective::from(NO_ARC) + self.value
    }
}

/// Working costs between cost lines, plus the original arc behind every entry.
///
/// Each live auxiliary-tree node owns one line; a new supernode takes over the line of the
/// first node of its cycle. Entry `(head_line, tail_line)` is the (reduced) cost of the
/// cheapest arc from the tail's node into the head's node.
#[derive(Debug, Clone)]
pub(super) struct CostLines {
    n: usize,
    weight: Vec<Weight>,
    origin: Vec<(usize, usize)>,
    /// Original arcs absent from the cost matrix, indexed like `weight` before any shrinking.
    absent: Vec<bool>,
}

impl CostLines {
    pub(super) fn new(n: usize) -> Self {
        let len = n * (n - 1);
        Self {
            n,
            weight: vec![Weight::MISSING; len],
            origin: vec![(0, 0); len],
            absent: vec![true; len],
        }
    }

    pub(super) fn load(&mut self, costs: &CostMatrix) {
        let n = self.n;
        for head in 0..n - 1 {
            for (tail, cost) in costs.backward_star(head).iter().enumerate() {
                let ix = head * n + tail;
                let cost = (*cost).filter(|_| tail != head);
                self.weight[ix] =
                    cost.map_or(Weight::MISSING, |c| Weight::present(Objective::from(c)));
                self.origin[ix] = (tail, head);
                self.absent[ix] = cost.is_none();
            }
        }
    }

    fn weight(&self, head_line: usize, tail_line: usize) -> Weight {
        self.weight[head_line * self.n + tail_line]
    }

    fn origin(&self, head_line: usize, tail_line: usize) -> (usize, usize) {
        self.origin[head_line * self.n + tail_line]
    }

    /// Whether the original arc `(tail, head)` is absent from the loaded matrix.
    fn is_absent(&self, tail: usize, head: usize) -> bool {
        self.absent[head * self.n + tail]
    }

    /// Stores `weight` at `to`, inheriting the original arc of `from`.
    fn assign(&mut self, to: (usize, usize), weight: Weight, from: (usize, usize)) {
        let to = to.0 * self.n + to.1;
        self.weight[to] = weight;
        self.origin[to] = self.origin[from.0 * self.n + from.1];
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Tail never labeled: extend the chain.
    Scan,
    /// Tail labeled in this stage: a cycle closed.
    Loop,
    /// Tail labeled in an earlier stage: connected to the root.
    RootConnected,
}

impl Outcome {
    fn classify(label: usize, stage: usize) -> Self {
        if label == 0 {
            Outcome::Scan
        } else if label == stage {
            Outcome::Loop
        } else {
            Outcome::RootConnected
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entering {
    tail: usize,
    tail_line: usize,
    weight: Weight,
    outcome: Outcome,
}

impl Entering {
    /// Keeps the cheaper arc. Among equal costs a root-connected tail wins unless the current
    /// pick is the root itself (this maximizes the root's out-degree), then an unlabeled tail
    /// beats one that would close a cycle.
    fn challenge(self, other: Entering, root: usize) -> Entering {
        if other.weight != self.weight {
            return if other.weight < self.weight { other } else { self };
        }
        match other.outcome {
            Outcome::RootConnected if self.tail != root => other,
            Outcome::Scan if self.outcome == Outcome::Loop => other,
            _ => self,
        }
    }
}

impl Solver {
    pub(super) fn contract(&mut self) {
        let mut stage = 1;
        self.nodes.label[self.root] = stage;
        let mut unlabeled = self.root;

        while unlabeled > 0 {
            stage += 1;
            let Some(start) = self.active.first_unlabeled(&self.nodes.label) else {
                break;
            };
            tracing::debug!(stage, start, active = self.active.len(), "stage");

            self.chain.clear();
            self.chain.push(start);
            while let Some(&v) = self.chain.last() {
                self.nodes.label[v] = stage;
                if v < self.root {
                    unlabeled -= 1;
                }

                let Some(entering) = self.min_entering(v, stage) else {
                    break;
                };
                self.record(v, entering);

                match entering.outcome {
                    Outcome::Scan => self.chain.push(entering.tail),
                    Outcome::Loop => self.shrink(entering.tail),
                    Outcome::RootConnected => break,
                }
            }
        }
    }

    /// Cheapest arc entering `v` from the current graph, with the tie-break of
    /// [`Entering::challenge`] applied in active-set order.
    fn min_entering(&self, v: usize, stage: usize) -> Option<Entering> {
        let head_line = self.nodes.line[v];
        let mut best: Option<Entering> = None;
        for i in self.active.iter() {
            if i == v {
                continue;
            }
            let tail_line = self.nodes.line[i];
            let candidate = Entering {
                tail: i,
                tail_line,
                weight: self.lines.weight(head_line, tail_line),
                outcome: Outcome::classify(self.nodes.label[i], stage),
            };
            best = Some(match best {
                None => candidate,
                Some(b) => b.challenge(candidate, self.root),
            });
        }
        best
    }

    fn record(&mut self, v: usize, entering: Entering) {
        let (tail, head) = self.lines.origin(self.nodes.line[v], entering.tail_line);
        let dual = entering.weight.charge();
        self.nodes.arc[v] = Some((tail, head));
        self.nodes.forced[v] = self.lines.is_absent(tail, head);
        self.nodes.dual_weight[v] = entering.weight;
        self.nodes.dual[v] = dual;
        self.objective += dual;
        tracing::trace!(node = v, tail, head, dual, "entering arc");
    }

    /// Shrinks the chain suffix starting at `t` into a new supernode, which replaces the suffix
    /// as chain head.
    fn shrink(&mut self, t: usize) {
        let from = self
            .chain
            .iter()
            .position(|&c| c == t)
            .expect("a tail labeled in the current stage lies on the chain");
        self.last_node += 1;
        let m = self.last_node;

        for &c in &self.chain[from..] {
            self.active.remove(c);
            self.nodes.parent[c] = Some(m);
        }

        let cycle = &self.chain[from..];
        let merged = self.nodes.line[cycle[0]];

        // Arcs into the cycle pay the dual already charged to the member they enter.
        for i in self.active.iter() {
            let tail_line = self.nodes.line[i];
            let mut best: Option<(Weight, usize)> = None;
            for &v in cycle {
                let line = self.nodes.line[v];
                let w = self.lines.weight(line, tail_line).reduced_by(self.nodes.dual_weight[v]);
                if best.is_none_or(|(b, _)| w < b) {
                    best = Some((w, line));
                }
            }
            if let Some((w, line)) = best {
                self.lines.assign((merged, tail_line), w, (line, tail_line));
            }
        }

        // Arcs out of the cycle keep their cost. The root has no entering arcs.
        for i in self.active.iter() {
            if i == self.root {
                continue;
            }
            let head_line = self.nodes.line[i];
            let mut best: Option<(Weight, usize)> = None;
            for &v in cycle {
                let line = self.nodes.line[v];
                let w = self.lines.weight(head_line, line);
                if best.is_none_or(|(b, _)| w < b) {
                    best = Some((w, line));
                }
            }
            if let Some((w, line)) = best {
                self.lines.assign((head_line, merged), w, (head_line, line));
            }
        }

        tracing::debug!(supernode = m, members = cycle.len(), "shrunk cycle");

        self.nodes.line[m] = merged;
        self.chain.truncate(from);
        self.chain.push(m);
        self.active.push(m);
    }
}

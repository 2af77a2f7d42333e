//! Extraction phase: auxiliary tree -> predecessor function.

use super::Solver;

impl Solver {
    /// Visits auxiliary-tree nodes from the newest supernode down to the original nodes. The arc
    /// that entered a node is used unless an enclosing supernode's arc already enters the node,
    /// and using it marks every node between its head and the node as resolved.
    pub(super) fn extract(&mut self) {
        self.resolved[..=self.last_node].fill(false);
        self.resolved[self.root] = true;

        for node in (0..=self.last_node).rev() {
            if self.resolved[node] {
                continue;
            }
            let Some((tail, head)) = self.nodes.arc[node] else {
                continue;
            };
            self.pred[head] = tail;
            if self.nodes.forced[node] {
                self.missing_heads.push(head);
            }

            let mut i = head;
            while i != node {
                self.resolved[i] = true;
                match self.nodes.parent[i] {
                    Some(p) => i = p,
                    None => break,
                }
            }
        }
        self.missing_heads.sort_unstable();
    }
}

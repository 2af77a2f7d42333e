//! Nodes of the current (contracted) graph.
//!
//! Slots `bottom..=root` hold the original nodes that are still uncontracted and slots
//! `root + 1..=top` hold live supernodes. The root never moves from slot `root`. Removal swaps
//! the last element of the node's region into its slot, so both membership updates are O(1).

#[derive(Debug, Clone)]
pub(super) struct ActiveSet {
    root: usize,
    slots: Vec<usize>,
    /// Node id -> slot.
    pos: Vec<usize>,
    bottom: usize,
    top: usize,
    /// Every original in `bottom..cursor` is labeled.
    cursor: usize,
}

impl ActiveSet {
    pub(super) fn new(n: usize, cap: usize) -> Self {
        let mut set = Self {
            root: n - 1,
            slots: vec![0; cap],
            pos: vec![0; cap],
            bottom: 0,
            top: n - 1,
            cursor: 0,
        };
        set.reset();
        set
    }

    pub(super) fn reset(&mut self) {
        for i in 0..=self.root {
            self.slots[i] = i;
            self.pos[i] = i;
        }
        self.bottom = 0;
        self.top = self.root;
        self.cursor = 0;
    }

    /// Live nodes in slot order. Scan order decides ties between equal-cost arcs.
    pub(super) fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots[self.bottom..=self.top].iter().copied()
    }

    pub(super) fn len(&self) -> usize {
        self.top + 1 - self.bottom
    }

    pub(super) fn push(&mut self, supernode: usize) {
        debug_assert!(supernode > self.root);
        self.top += 1;
        self.slots[self.top] = supernode;
        self.pos[supernode] = self.top;
    }

    pub(super) fn remove(&mut self, node: usize) {
        debug_assert_ne!(node, self.root, "the root is never contracted");
        let k = self.pos[node];
        if node > self.root {
            let moved = self.slots[self.top];
            self.slots[k] = moved;
            self.pos[moved] = k;
            self.top -= 1;
        } else {
            let moved = self.slots[self.bottom];
            self.slots[k] = moved;
            self.pos[moved] = k;
            self.bottom += 1;
        }
    }

    /// First live original node with `label == 0`, in slot order.
    pub(super) fn first_unlabeled(&mut self, label: &[usize]) -> Option<usize> {
        if self.cursor < self.bottom {
            self.cursor = self.bottom;
        }
        while self.cursor < self.root && label[self.slots[self.cursor]] != 0 {
            self.cursor += 1;
        }
        (self.cursor < self.root).then(|| self.slots[self.cursor])
    }
}

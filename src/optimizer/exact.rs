//! Depth-first branch-and-bound over piece-to-bar assignments.
//!
//! Only worth running on small profiles: the search is bounded by a node
//! budget and gives up (returns `None`) rather than stalling a caller.

use super::packing::{Packer, EPS};
use tracing::debug;

pub const NODE_BUDGET: usize = 100_000;

struct Search<'a> {
    packer: &'a Packer,
    sizes: Vec<f64>,
    suffix: Vec<f64>,
    best_count: usize,
    best: Option<Vec<usize>>,
    nodes: usize,
}

/// Looks for an assignment using strictly fewer than `upper_bound` bars.
/// `pieces` must be sorted longest first and all placeable.
pub fn improve(packer: &Packer, pieces: &[f64], upper_bound: usize) -> Option<Vec<usize>> {
    if pieces.is_empty() || upper_bound <= packer.lower_bound(pieces) {
        return None;
    }

    let sizes: Vec<f64> = pieces.iter().map(|p| p + packer.kerf).collect();
    let mut suffix = vec![0.0; sizes.len() + 1];
    for i in (0..sizes.len()).rev() {
        suffix[i] = suffix[i + 1] + sizes[i];
    }

    let mut search = Search {
        packer,
        sizes,
        suffix,
        best_count: upper_bound,
        best: None,
        nodes: 0,
    };

    let mut free = Vec::with_capacity(upper_bound);
    let mut assign = vec![0usize; pieces.len()];
    search.recurse(0, &mut free, &mut assign);

    debug!(
        "Exact search: {} pieces, {} nodes, bars {} -> {}",
        pieces.len(),
        search.nodes,
        upper_bound,
        search.best_count
    );
    search.best
}

impl Search<'_> {
    fn recurse(&mut self, idx: usize, free: &mut Vec<f64>, assign: &mut Vec<usize>) {
        self.nodes += 1;
        if self.nodes > NODE_BUDGET {
            return;
        }

        if idx == self.sizes.len() {
            if free.len() < self.best_count {
                self.best_count = free.len();
                self.best = Some(assign.clone());
            }
            return;
        }

        if free.len() >= self.best_count {
            return;
        }

        // Demand that cannot go into the open bars needs fresh ones.
        let open_free: f64 = free.iter().sum();
        let overflow = (self.suffix[idx] - open_free).max(0.0);
        let lower = free.len() + ((overflow / self.packer.capacity) - EPS).ceil().max(0.0) as usize;
        if lower >= self.best_count {
            return;
        }

        let size = self.sizes[idx];
        let mut tried: Vec<f64> = Vec::new();
        for b in 0..free.len() {
            let room = free[b];
            if size > room + EPS || tried.iter().any(|t| (t - room).abs() < EPS) {
                continue;
            }
            tried.push(room);

            free[b] -= size;
            assign[idx] = b;
            self.recurse(idx + 1, free, assign);
            free[b] += size;
        }

        if free.len() + 1 < self.best_count && size <= self.packer.capacity + EPS {
            free.push(self.packer.capacity - size);
            assign[idx] = free.len() - 1;
            self.recurse(idx + 1, free, assign);
            free.pop();
        }
    }
}

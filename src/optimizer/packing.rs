use crate::plan::BarCut;

/// Tolerance for length comparisons, in mm.
pub const EPS: f64 = 1e-6;

/// A bar being filled. Every cut consumes its length plus one kerf, except
/// a piece that runs to the bar end when the packer allows it.
#[derive(Debug, Clone, PartialEq)]
pub struct StockBar {
    pub capacity: f64,
    pub remaining: f64,
    pub cuts: Vec<f64>,
}

impl StockBar {
    pub fn new(capacity: f64) -> Self {
        Self {
            capacity,
            remaining: capacity,
            cuts: Vec::new(),
        }
    }

    #[inline]
    pub fn fits(&self, piece: f64, kerf: f64, free_end: bool) -> bool {
        piece + kerf <= self.remaining + EPS || (free_end && piece <= self.remaining + EPS)
    }

    /// A piece placed in the last `kerf` mm of the bar leaves nothing behind.
    #[inline]
    pub fn place(&mut self, piece: f64, kerf: f64) {
        self.remaining = (self.remaining - piece - kerf).max(0.0);
        self.cuts.push(piece);
    }

    /// Freezes the bar. Rounding noise below `EPS` is clamped to zero waste.
    pub fn into_cut(self, index: usize) -> BarCut {
        let waste_mm = if self.remaining.abs() < EPS {
            0.0
        } else {
            self.remaining
        };
        BarCut {
            index,
            cuts: self.cuts,
            waste_mm,
        }
    }
}

/// Packs pieces onto bars of one capacity with one kerf.
///
/// With `free_end` set, a piece that reaches the end of its bar needs no
/// cut of its own, so it only has to fit the remaining length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packer {
    pub capacity: f64,
    pub kerf: f64,
    pub free_end: bool,
}

impl Packer {
    pub fn new(capacity: f64, kerf: f64) -> Self {
        Self {
            capacity,
            kerf,
            free_end: false,
        }
    }

    pub fn with_free_end(mut self, free_end: bool) -> Self {
        self.free_end = free_end;
        self
    }

    /// Whether a fresh bar can take the piece at all.
    #[inline]
    pub fn can_hold(&self, piece: f64) -> bool {
        piece > 0.0 && StockBar::new(self.capacity).fits(piece, self.kerf, self.free_end)
    }

    /// Fewest bars any packing could need, from total consumed length.
    pub fn lower_bound(&self, pieces: &[f64]) -> usize {
        if self.capacity <= 0.0 || pieces.is_empty() {
            return 0;
        }
        // A free bar end saves at most one kerf per bar.
        let room = if self.free_end {
            self.capacity + self.kerf
        } else {
            self.capacity
        };
        let total: f64 = pieces.iter().map(|p| p + self.kerf).sum();
        ((total / room) - EPS).ceil().max(1.0) as usize
    }

    /// Classic first-fit: the earliest opened bar that still has room.
    /// Pieces must already be placeable (see [`Packer::can_hold`]).
    pub fn first_fit(&self, pieces: &[f64]) -> Vec<StockBar> {
        let mut bars: Vec<StockBar> = Vec::new();
        for &piece in pieces {
            match bars.iter_mut().find(|b| b.fits(piece, self.kerf, self.free_end)) {
                Some(bar) => bar.place(piece, self.kerf),
                None => {
                    let mut bar = StockBar::new(self.capacity);
                    bar.place(piece, self.kerf);
                    bars.push(bar);
                }
            }
        }
        bars
    }

    /// Best-fit: the bar left with the smallest remainder. Ties go to the earlier bar.
    pub fn best_fit(&self, pieces: &[f64]) -> Vec<StockBar> {
        let mut bars: Vec<StockBar> = Vec::new();
        for &piece in pieces {
            let mut best: Option<(usize, f64)> = None;
            for (i, bar) in bars.iter().enumerate() {
                if !bar.fits(piece, self.kerf, self.free_end) {
                    continue;
                }
                let slack = (bar.remaining - piece - self.kerf).max(0.0);
                if best.map_or(true, |(_, s)| slack < s - EPS) {
                    best = Some((i, slack));
                }
            }

            match best {
                Some((i, _)) => bars[i].place(piece, self.kerf),
                None => {
                    let mut bar = StockBar::new(self.capacity);
                    bar.place(piece, self.kerf);
                    bars.push(bar);
                }
            }
        }
        bars
    }

    /// Rebuilds bars from a piece-to-bar assignment, preserving piece order on each bar.
    pub fn from_assignment(&self, pieces: &[f64], assignment: &[usize]) -> Vec<StockBar> {
        let bar_count = assignment.iter().map(|&b| b + 1).max().unwrap_or(0);
        let mut bars = vec![StockBar::new(self.capacity); bar_count];
        for (&piece, &bar) in pieces.iter().zip(assignment) {
            bars[bar].place(piece, self.kerf);
        }
        bars
    }
}

//! Dense three-channel cost matrix.
//!
//! # Layout
//!
//! ```text
//! values[(channel * n + from) * n + to]
//! ```
//!
//! Channel order is [`Channel::Cost`], [`Channel::Distance`], [`Channel::Time`].
//! Unreachable pairs hold `+inf` on every channel.

use rc_core::standardise;

use crate::output::CellValues;

/// Fixed per-matrix overhead charged by [`CostMatrix::size_in_bytes`].
const MATRIX_OVERHEAD_BYTES: usize = 64;
/// Per-id overhead on top of the string bytes.
const ID_OVERHEAD_BYTES: usize = 40;

/// One of the three values stored per ordered pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Cost     = 0,
    Distance = 1,
    Time     = 2,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Cost, Channel::Distance, Channel::Time];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Cost     => "travel-cost",
            Channel::Distance => "distance",
            Channel::Time     => "time",
        }
    }
}

/// Immutable N×N matrix of cost, distance and time between ordered points.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    ids:    Vec<String>,
    keys:   Vec<String>,
    n:      usize,
    values: Vec<f64>,
}

impl CostMatrix {
    /// A zero-filled matrix over `ids`, to be filled with [`set`](Self::set).
    ///
    /// `ids` must already be in standard-form order (as from a `PointSet`).
    pub(crate) fn zeroed(ids: Vec<String>) -> Self {
        let n = ids.len();
        let keys = ids.iter().map(|id| standardise(id)).collect();
        Self { ids, keys, n, values: vec![0.0; 3 * n * n] }
    }

    pub(crate) fn set(&mut self, from: usize, to: usize, cell: CellValues) {
        let nn = self.n * self.n;
        let at = from * self.n + to;
        self.values[at] = cell.cost;
        self.values[nn + at] = cell.distance;
        self.values[2 * nn + at] = cell.time;
    }

    /// Number of points.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Point ids in row/column order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Row/column index of `id` (any spelling with the same standard form).
    pub fn index_of(&self, id: &str) -> Option<usize> {
        let key = standardise(id);
        self.keys.binary_search(&key).ok()
    }

    /// Value of `channel` from row `from` to column `to`.
    ///
    /// # Panics
    ///
    /// If either index is out of range.
    #[inline]
    pub fn get(&self, from: usize, to: usize, channel: Channel) -> f64 {
        assert!(from < self.n && to < self.n, "matrix index out of range");
        self.values[(channel as usize * self.n + from) * self.n + to]
    }

    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.get(from, to, Channel::Cost)
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.get(from, to, Channel::Distance)
    }

    pub fn time(&self, from: usize, to: usize) -> f64 {
        self.get(from, to, Channel::Time)
    }

    /// Estimated in-memory footprint, used for cache accounting.
    pub fn size_in_bytes(&self) -> u64 {
        let grid = 3 * (self.n as u64) * (self.n as u64) * 8;
        let ids: u64 = self
            .ids
            .iter()
            .zip(&self.keys)
            .map(|(id, key)| (id.len() + key.len() + ID_OVERHEAD_BYTES) as u64)
            .sum();
        grid + ids + MATRIX_OVERHEAD_BYTES as u64
    }
}

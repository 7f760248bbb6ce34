//! Bounded branch-and-bound fill of a single bar.
//!
//! A bar of usable length `U` with kerf `k` holds a multiset of parts when
//! `sum(len) + k * (n - 1) <= U`, which is the knapsack constraint
//! `sum(len + k) <= U + k`. The search walks part lengths longest first,
//! trying the largest count first, so its first leaf is the greedy fill.
//! The used length is maximised and the walk stops early on a bar filled
//! to capacity.

use std::time::{Duration, Instant};

use crate::bin::LENGTH_TOLERANCE;

/// Nodes explored between two clock reads.
const CLOCK_CHECK_INTERVAL: u64 = 1024;

/// Time and node budget shared by every fill of a packing run.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    deadline: Option<Instant>,
    node_limit: usize,
    nodes: u64,
    expired: bool,
}

impl SearchBudget {
    /// Starts the clock. `node_limit` applies to each fill separately.
    pub fn new(time_limit_ms: u64, node_limit: usize) -> Self {
        Self {
            deadline: Instant::now().checked_add(Duration::from_millis(time_limit_ms)),
            node_limit,
            nodes: 0,
            expired: time_limit_ms == 0,
        }
    }

    /// Reads the clock and returns true once the deadline has passed.
    pub fn check(&mut self) -> bool {
        if !self.expired {
            if let Some(deadline) = self.deadline {
                self.expired = Instant::now() >= deadline;
            }
        }
        self.expired
    }

    /// Returns true if the deadline passed at the last clock read.
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Total nodes explored so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn tick(&mut self) -> bool {
        self.nodes += 1;
        if self.nodes % CLOCK_CHECK_INTERVAL == 0 {
            self.check()
        } else {
            self.expired
        }
    }
}

/// A distinct part length and how many boxes of it remain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillItem {
    pub length: f64,
    pub available: usize,
}

/// Chooses how many boxes of each item go onto one bar.
///
/// `items` must be sorted by decreasing length. Returns one count per item.
/// An expired budget yields the greedy fill.
pub fn best_fill(
    items: &[FillItem],
    usable: f64,
    kerf: f64,
    budget: &mut SearchBudget,
) -> Vec<usize> {
    let capacity = usable + kerf;
    let tolerance = LENGTH_TOLERANCE * capacity.abs().max(1.0);

    let mut search = Search {
        items,
        kerf,
        capacity,
        tolerance,
        suffix: suffix_lengths(items),
        counts: vec![0; items.len()],
        best: greedy_fill(items, capacity, kerf, tolerance),
        best_value: 0.0,
        nodes: 0,
        node_limit: budget.node_limit,
        stopped: false,
    };
    search.best_value = value_of(items, &search.best);

    if capacity <= 0.0 || budget.is_expired() || search.is_full(search.best_value) {
        return search.best;
    }

    search.descend(0, 0.0, 0.0, budget);
    log::debug!(
        "Bar fill: usable {:.3}, value {:.3}, {} nodes{}",
        usable,
        search.best_value,
        search.nodes,
        if search.stopped { " (budget hit)" } else { "" }
    );
    search.best
}

struct Search<'a> {
    items: &'a [FillItem],
    kerf: f64,
    capacity: f64,
    tolerance: f64,
    /// `suffix[i]` is the total length of every box from item `i` on.
    suffix: Vec<f64>,
    counts: Vec<usize>,
    best: Vec<usize>,
    best_value: f64,
    nodes: usize,
    node_limit: usize,
    stopped: bool,
}

impl Search<'_> {
    fn descend(&mut self, index: usize, weight: f64, value: f64, budget: &mut SearchBudget) {
        self.nodes += 1;
        if budget.tick() || self.nodes >= self.node_limit {
            self.stopped = true;
            return;
        }
        if value > self.best_value + self.tolerance {
            self.best_value = value;
            self.best.clone_from(&self.counts);
        }
        if index == self.items.len() || self.is_full(self.best_value) {
            return;
        }

        let room = self.capacity - weight;
        let bound = value + self.suffix[index].min(room);
        if bound <= self.best_value + self.tolerance {
            return;
        }

        let item = self.items[index];
        let step = item.length + self.kerf;
        let fit = if step > 0.0 {
            ((room + self.tolerance) / step).floor() as usize
        } else {
            item.available
        };
        for take in (0..=fit.min(item.available)).rev() {
            self.counts[index] = take;
            let n = take as f64;
            self.descend(index + 1, weight + n * step, value + n * item.length, budget);
            if self.stopped || self.is_full(self.best_value) {
                break;
            }
        }
        self.counts[index] = 0;
    }

    /// Nothing can be added once the used length reaches what is left after
    /// the mandatory kerfs.
    fn is_full(&self, value: f64) -> bool {
        value >= self.suffix[0].min(self.capacity - self.kerf) - self.tolerance
    }
}

fn suffix_lengths(items: &[FillItem]) -> Vec<f64> {
    let mut suffix = vec![0.0; items.len() + 1];
    for i in (0..items.len()).rev() {
        suffix[i] = suffix[i + 1] + items[i].length * items[i].available as f64;
    }
    suffix
}

fn value_of(items: &[FillItem], counts: &[usize]) -> f64 {
    items
        .iter()
        .zip(counts)
        .map(|(item, &n)| item.length * n as f64)
        .sum()
}

/// Takes as many boxes of each item as still fit, longest first.
fn greedy_fill(items: &[FillItem], capacity: f64, kerf: f64, tolerance: f64) -> Vec<usize> {
    let mut room = capacity;
    items
        .iter()
        .map(|item| {
            let step = item.length + kerf;
            if step <= 0.0 || room < step - tolerance {
                return 0;
            }
            let take = (((room + tolerance) / step).floor() as usize).min(item.available);
            room -= take as f64 * step;
            take
        })
        .collect()
}

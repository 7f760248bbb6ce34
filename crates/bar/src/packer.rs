//! 1D bar packer.
//!
//! Boxes are placed on scrap bars first, longest scrap first, each one
//! filled as much as the search allows. The rest goes onto new bars, where
//! a sequential maximal fill competes with best-fit decreasing.

use std::collections::VecDeque;
use std::time::Instant;

use u_cutlist_core::{Error, Result};

use crate::bin::{fits, BinKind, StockBin, LENGTH_TOLERANCE};
use crate::config::{PackingConfig, StockConfig};
use crate::fill::{best_fill, FillItem, SearchBudget};
use crate::part::{expand, PartBox, PartRequest};
use crate::report::PackingReport;
use crate::result::{PackingResult, PackingStatus, PackingWarning, UnplacedPart};

/// Largest kerf or trim allowed, as a share of the longest bar.
pub const MAX_ALLOWANCE_RATIO: f64 = 0.25;

/// Boxes placed by best-fit decreasing between two clock reads.
const BEST_FIT_CHECK_INTERVAL: usize = 16;

/// 1D bar packing solver.
#[derive(Debug, Clone)]
pub struct BarPacker {
    config: PackingConfig,
}

impl BarPacker {
    /// Creates a new packer with the given configuration.
    pub fn new(config: PackingConfig) -> Self {
        Self { config }
    }

    /// Creates a packer with default configuration.
    pub fn default_config() -> Self {
        Self::new(PackingConfig::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PackingConfig {
        &self.config
    }

    /// Arranges a result for display using this packer's presentation settings.
    pub fn report(&self, result: &PackingResult) -> PackingReport {
        PackingReport::build(result, &self.config)
    }

    /// Packs the requested parts onto the configured stock.
    pub fn pack(&self, parts: &[PartRequest]) -> Result<PackingResult> {
        let start = Instant::now();
        self.validate(parts)?;

        let config = &self.config;
        let (kerf, trim) = (config.kerf, config.trim);
        let mut budget = SearchBudget::new(config.time_limit_ms, config.node_limit);
        let mut result = PackingResult::new(kerf, trim);

        let largest_usable = config.usable(config.stock.largest());
        let (placeable, mut unplaced): (Vec<PartBox>, Vec<PartBox>) =
            expand(parts, config.length_increase)
                .into_iter()
                .partition(|b| fits(b.length, 1, largest_usable, kerf));
        let mut pool = Pool::new(placeable);

        let mut scraps: Vec<f64> = config
            .stock
            .scrap_lengths
            .iter()
            .copied()
            .filter(|&l| config.usable(l) > 0.0)
            .collect();
        scraps.sort_by(|a, b| b.total_cmp(a));
        for scrap in scraps {
            if pool.is_empty() {
                break;
            }
            let chosen = pool.take_fill(config.usable(scrap), kerf, &mut budget);
            if !chosen.is_empty() {
                result
                    .bins
                    .push(StockBin::layout(scrap, BinKind::Scrap, chosen, kerf, trim));
            }
        }
        log::debug!(
            "Scrap phase: {} scrap bars used, {} boxes left",
            result.bins.len(),
            pool.len()
        );

        let usable = config.usable(config.stock.bar_length);
        if config.stock.has_new_stock() && usable > 0.0 {
            unplaced.extend(pool.split_off_longer(usable, kerf));
            let bars = self.fill_new_bars(pool, usable, &mut budget);
            result.bins.extend(bars.into_iter().map(|boxes| {
                StockBin::layout(config.stock.bar_length, BinKind::New, boxes, kerf, trim)
            }));
        } else {
            unplaced.extend(pool.into_boxes());
        }

        result.unplaced = aggregate_unplaced(unplaced, parts);
        let unplaced_count = result.unplaced_count();
        if unplaced_count > 0 {
            log::warn!("{} parts could not be placed on any bar", unplaced_count);
            result.warnings.push(PackingWarning::UnplacedParts {
                count: unplaced_count,
            });
        }
        if config.length_increase > 0.0 {
            result.warnings.push(PackingWarning::CuttingLengthIncreased {
                increase: config.length_increase,
            });
        }

        result.status = if budget.is_expired() {
            log::warn!("Time limit of {} ms reached, greedy placement used", config.time_limit_ms);
            PackingStatus::TimeExceeded
        } else if unplaced_count > 0 {
            PackingStatus::Partial
        } else {
            PackingStatus::Success
        };
        result.computation_time_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "Packed {} parts on {} bars ({} scrap), {} unplaced, efficiency {:.1}%, {} nodes, {} ms",
            result.placed_count(),
            result.bins.len(),
            result.bins_of_kind(BinKind::Scrap),
            unplaced_count,
            result.efficiency() * 100.0,
            budget.nodes(),
            result.computation_time_ms
        );
        Ok(result)
    }

    /// Checks parameters in a fixed order: values, parts, stock, allowances.
    pub fn validate(&self, parts: &[PartRequest]) -> Result<()> {
        let config = &self.config;
        check_length("kerf", config.kerf)?;
        check_length("trim", config.trim)?;
        check_length("length increase", config.length_increase)?;
        check_length("bar length", config.stock.bar_length)?;
        for &scrap in &config.stock.scrap_lengths {
            check_length("scrap length", scrap)?;
        }
        for part in parts {
            if !part.length.is_finite() || part.length <= 0.0 {
                return Err(Error::InvalidParameters(format!(
                    "part {} has invalid length {}",
                    part.id, part.length
                )));
            }
        }

        if parts.iter().all(|p| p.count == 0) {
            return Err(Error::NoPartsRequested);
        }

        let largest = config.stock.largest();
        if largest <= 0.0 {
            return Err(Error::NoStockAvailable);
        }

        let max_allowance = MAX_ALLOWANCE_RATIO * largest;
        if config.kerf > max_allowance {
            return Err(Error::InvalidParameters(format!(
                "kerf {} exceeds {} (a quarter of the longest bar)",
                config.kerf, max_allowance
            )));
        }
        if config.trim > max_allowance {
            return Err(Error::InvalidParameters(format!(
                "trim {} exceeds {} (a quarter of the longest bar)",
                config.trim, max_allowance
            )));
        }

        if config.usable(largest) <= 0.0 {
            return Err(Error::NoStockAvailable);
        }
        Ok(())
    }

    /// Places every pooled box on new bars of the given usable length.
    ///
    /// Best-fit decreasing only competes while the time budget lasts.
    fn fill_new_bars(
        &self,
        pool: Pool,
        usable: f64,
        budget: &mut SearchBudget,
    ) -> Vec<Vec<PartBox>> {
        let kerf = self.config.kerf;
        let boxes = pool.boxes();

        let Some(sequential) = sequential_fill(pool, usable, kerf, budget) else {
            return best_fit_decreasing(&boxes, usable, kerf, None).unwrap_or_default();
        };
        if budget.check() {
            log::debug!("Time limit reached, best fit skipped");
            return sequential;
        }
        let Some(best_fit) = best_fit_decreasing(&boxes, usable, kerf, Some(budget)) else {
            log::debug!("Time limit reached during best fit, sequential fill kept");
            return sequential;
        };

        let seq_leftover = max_leftover(&sequential, usable, kerf);
        let bfd_leftover = max_leftover(&best_fit, usable, kerf);
        let tolerance = LENGTH_TOLERANCE * usable.max(1.0);
        let use_best_fit = best_fit.len() < sequential.len()
            || (best_fit.len() == sequential.len() && bfd_leftover > seq_leftover + tolerance);

        log::debug!(
            "New bars: sequential {} (max leftover {:.3}), best fit {} (max leftover {:.3})",
            sequential.len(),
            seq_leftover,
            best_fit.len(),
            bfd_leftover
        );
        if use_best_fit {
            best_fit
        } else {
            sequential
        }
    }
}

/// Packs parts onto `stock` with the default search budget.
pub fn pack(
    stock: &StockConfig,
    kerf: f64,
    trim: f64,
    parts: &[PartRequest],
) -> Result<PackingResult> {
    let config = PackingConfig::default()
        .with_stock(stock.clone())
        .with_kerf(kerf)
        .with_trim(trim);
    BarPacker::new(config).pack(parts)
}

fn check_length(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameters(format!(
            "{} must be finite and non-negative, got {}",
            name, value
        )))
    }
}

/// Remaining boxes grouped by exact length, longest first.
///
/// Boxes of one length keep their expansion order.
#[derive(Debug, Clone, Default)]
struct Pool {
    groups: Vec<(f64, VecDeque<PartBox>)>,
}

impl Pool {
    /// `boxes` must be sorted by decreasing length.
    fn new(boxes: Vec<PartBox>) -> Self {
        let mut groups: Vec<(f64, VecDeque<PartBox>)> = Vec::new();
        for b in boxes {
            match groups.last_mut() {
                Some((length, group)) if length.to_bits() == b.length.to_bits() => {
                    group.push_back(b)
                }
                _ => groups.push((b.length, VecDeque::from([b]))),
            }
        }
        Self { groups }
    }

    fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn len(&self) -> usize {
        self.groups.iter().map(|(_, g)| g.len()).sum()
    }

    fn items(&self) -> Vec<FillItem> {
        self.groups
            .iter()
            .map(|(length, group)| FillItem {
                length: *length,
                available: group.len(),
            })
            .collect()
    }

    /// Removes `counts[i]` boxes from group `i`.
    fn take(&mut self, counts: &[usize]) -> Vec<PartBox> {
        let mut taken = Vec::with_capacity(counts.iter().sum());
        for ((_, group), &n) in self.groups.iter_mut().zip(counts) {
            taken.extend(group.drain(..n.min(group.len())));
        }
        self.groups.retain(|(_, g)| !g.is_empty());
        taken
    }

    /// Fills one bar as well as the budget allows.
    fn take_fill(&mut self, usable: f64, kerf: f64, budget: &mut SearchBudget) -> Vec<PartBox> {
        let counts = best_fill(&self.items(), usable, kerf, budget);
        self.take(&counts)
    }

    /// Removes the boxes too long for a bar of `usable` length.
    fn split_off_longer(&mut self, usable: f64, kerf: f64) -> Vec<PartBox> {
        let split = self
            .groups
            .iter()
            .position(|(length, _)| fits(*length, 1, usable, kerf))
            .unwrap_or(self.groups.len());
        self.groups
            .drain(..split)
            .flat_map(|(_, group)| group)
            .collect()
    }

    fn boxes(&self) -> Vec<PartBox> {
        self.groups
            .iter()
            .flat_map(|(_, group)| group.iter().cloned())
            .collect()
    }

    fn into_boxes(self) -> Vec<PartBox> {
        self.groups.into_iter().flat_map(|(_, g)| g).collect()
    }
}

/// Fills new bars one after the other until the pool is empty.
///
/// Returns None if a bar could not take any box.
fn sequential_fill(
    mut pool: Pool,
    usable: f64,
    kerf: f64,
    budget: &mut SearchBudget,
) -> Option<Vec<Vec<PartBox>>> {
    let mut bars = Vec::new();
    while !pool.is_empty() {
        let chosen = pool.take_fill(usable, kerf, budget);
        if chosen.is_empty() {
            log::warn!("Sequential fill stalled with {} boxes left", pool.len());
            return None;
        }
        bars.push(chosen);
    }
    Some(bars)
}

/// Puts each box on the open bar it leaves the least room on.
///
/// `boxes` must be sorted by decreasing length and each must fit alone.
/// Returns None once `budget` expires.
fn best_fit_decreasing(
    boxes: &[PartBox],
    usable: f64,
    kerf: f64,
    mut budget: Option<&mut SearchBudget>,
) -> Option<Vec<Vec<PartBox>>> {
    // (sum of lengths, boxes) per bar
    let mut bars: Vec<(f64, Vec<PartBox>)> = Vec::new();
    for (index, b) in boxes.iter().enumerate() {
        if index % BEST_FIT_CHECK_INTERVAL == 0
            && budget.as_deref_mut().is_some_and(SearchBudget::check)
        {
            return None;
        }
        let target = bars
            .iter()
            .enumerate()
            .filter(|(_, (total, parts))| fits(total + b.length, parts.len() + 1, usable, kerf))
            .map(|(i, (total, parts))| (i, room(*total, parts.len(), usable, kerf) - b.length))
            .min_by(|x, y| x.1.total_cmp(&y.1))
            .map(|(i, _)| i);
        match target {
            Some(i) => {
                bars[i].0 += b.length;
                bars[i].1.push(b.clone());
            }
            None => bars.push((b.length, vec![b.clone()])),
        }
    }
    Some(bars.into_iter().map(|(_, parts)| parts).collect())
}

fn room(total: f64, count: usize, usable: f64, kerf: f64) -> f64 {
    usable - total - kerf * count.saturating_sub(1) as f64
}

fn max_leftover(bars: &[Vec<PartBox>], usable: f64, kerf: f64) -> f64 {
    bars.iter()
        .map(|parts| {
            let total: f64 = parts.iter().map(|p| p.length).sum();
            room(total, parts.len(), usable, kerf)
        })
        .fold(0.0, f64::max)
}

/// Counts unplaced boxes per request, in request order.
fn aggregate_unplaced(boxes: Vec<PartBox>, parts: &[PartRequest]) -> Vec<UnplacedPart> {
    let mut counts = vec![0usize; parts.len()];
    for b in &boxes {
        counts[b.request] += 1;
    }
    parts
        .iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(part, count)| UnplacedPart {
            id: part.id.clone(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn boxes(lengths: &[f64]) -> Vec<PartBox> {
        lengths
            .iter()
            .enumerate()
            .map(|(i, &length)| PartBox {
                request: 0,
                id: format!("P{}", i),
                length,
            })
            .collect()
    }

    #[test]
    fn test_pool_groups_equal_lengths() {
        let pool = Pool::new(boxes(&[800.0, 800.0, 700.0]));
        assert_eq!(pool.groups.len(), 2);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.items()[0].available, 2);
    }

    #[test]
    fn test_pool_take_keeps_order() {
        let mut pool = Pool::new(boxes(&[800.0, 800.0, 700.0]));
        let taken = pool.take(&[1, 1]);
        assert_eq!(taken[0].id, "P0");
        assert_eq!(taken[1].id, "P2");
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.groups.len(), 1);
    }

    #[test]
    fn test_split_off_longer() {
        let mut pool = Pool::new(boxes(&[1500.0, 900.0, 400.0]));
        let long = pool.split_off_longer(1000.0, 3.0);
        assert_eq!(long.len(), 1);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_best_fit_decreasing() {
        let bars =
            best_fit_decreasing(&boxes(&[600.0, 500.0, 400.0, 300.0]), 1000.0, 0.0, None).unwrap();
        assert_eq!(bars.len(), 2);
        // 400 goes with 600, 300 with 500
        assert_eq!(bars[0].len(), 2);
        assert_relative_eq!(bars[1].iter().map(|b| b.length).sum::<f64>(), 800.0);
    }

    #[test]
    fn test_best_fit_stops_on_expired_budget() {
        let mut budget = SearchBudget::new(0, 10_000);
        let parts = boxes(&[600.0, 500.0, 400.0, 300.0]);
        assert!(best_fit_decreasing(&parts, 1000.0, 0.0, Some(&mut budget)).is_none());
    }

    #[test]
    fn test_expired_budget_keeps_sequential_fill() {
        let packer = BarPacker::new(PackingConfig::new(1000.0).with_time_limit(0));
        let pool = Pool::new(boxes(&[600.0, 500.0, 400.0, 300.0]));
        let mut budget = SearchBudget::new(0, 10_000);
        let bars = packer.fill_new_bars(pool, 1000.0, &mut budget);
        // greedy: 600+400, 500+300
        assert_eq!(bars.len(), 2);
        assert_eq!(bars.iter().map(Vec::len).sum::<usize>(), 4);
    }

    #[test]
    fn test_sequential_fill() {
        let mut budget = SearchBudget::new(1000, 10_000);
        let bars = sequential_fill(
            Pool::new(boxes(&[600.0, 500.0, 500.0, 400.0])),
            1000.0,
            0.0,
            &mut budget,
        )
        .unwrap();
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn test_max_leftover() {
        let bars = vec![boxes(&[600.0, 300.0]), boxes(&[500.0])];
        assert_relative_eq!(max_leftover(&bars, 1000.0, 5.0), 500.0);
    }

    #[test]
    fn test_validation_order() {
        let packer = BarPacker::new(PackingConfig::default().with_kerf(f64::NAN));
        assert!(matches!(packer.validate(&[]), Err(Error::InvalidParameters(_))));

        let packer = BarPacker::new(PackingConfig::new(1000.0));
        assert_eq!(packer.validate(&[]), Err(Error::NoPartsRequested));

        let part = [PartRequest::new("A", 100.0, 1)];
        let packer = BarPacker::default_config();
        assert_eq!(packer.validate(&part), Err(Error::NoStockAvailable));

        let packer = BarPacker::new(PackingConfig::new(1000.0).with_trim(300.0));
        assert!(matches!(packer.validate(&part), Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn test_aggregate_unplaced() {
        let parts = vec![
            PartRequest::new("A", 100.0, 2),
            PartRequest::new("B", 200.0, 1),
        ];
        let mut left = boxes(&[100.0, 100.0]);
        left[1].request = 1;
        let unplaced = aggregate_unplaced(left, &parts);
        assert_eq!(unplaced.len(), 2);
        assert_eq!(unplaced[1].id, "B");
        assert_eq!(unplaced[1].count, 1);
    }
}

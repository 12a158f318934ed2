use crate::config::ViewerConfig;
use crate::frame::RatingTable;
use crate::hierarchy::HierarchyStats;
use crate::kde::{self, epanechnikov, EvaluationGrid};

/// Axis bounds for a table that shipped without precomputed stats.
///
/// The rating range is padded on both sides and the density bound is the
/// highest all-federation peak over every month.
pub fn derive(table: &RatingTable, config: &ViewerConfig) -> Option<HierarchyStats> {
    let (lo, hi) = table.rating_range()?;
    let min_rating = lo - config.grid_padding;
    let max_rating = hi + config.grid_padding;
    let grid = EvaluationGrid::linspace(min_rating, max_rating, config.grid_size);
    let kernel = epanechnikov(config.bandwidth);

    let _span = tracing::info_span!("derive_stats", months = table.months().len()).entered();
    let max_density = table
        .months()
        .iter()
        .map(|month| {
            let ratings: Vec<f64> = table.month(month).iter().map(|r| r.rating).collect();
            kde::peak(&kde::estimate(kernel, &grid, &ratings))
        })
        .fold(0.0, f64::max);

    log::info!(
        "derived stats: ratings {min_rating}..{max_rating}, peak density {max_density:.6}"
    );
    Some(HierarchyStats {
        min_rating,
        max_rating,
        max_density,
    })
}

//! Kernel density estimation over a fixed evaluation grid.

/// Evenly spaced evaluation points across the rating axis.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationGrid {
    points: Vec<f64>,
}

impl EvaluationGrid {
    /// `count` points from `min` to `max`, both ends included.
    pub fn linspace(min: f64, max: f64, count: usize) -> Self {
        let points = match count {
            0 => Vec::new(),
            1 => vec![min],
            _ => {
                let step = (max - min) / (count - 1) as f64;
                let mut points: Vec<f64> = (0..count).map(|i| min + step * i as f64).collect();
                points[count - 1] = max;
                points
            }
        };
        Self { points }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min(&self) -> Option<f64> {
        self.points.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.points.last().copied()
    }
}

/// Epanechnikov kernel with bandwidth `k`: `0.75 * (1 - u²) / k` with
/// `u = v / k`, zero outside `|u| <= 1`.
pub fn epanechnikov(k: f64) -> impl Fn(f64) -> f64 + Copy {
    move |v: f64| {
        let u = v / k;
        if u.abs() <= 1.0 {
            0.75 * (1.0 - u * u) / k
        } else {
            0.0
        }
    }
}

/// Density at every grid point: the mean of `kernel(x - sample)`.
///
/// Returns zero densities for an empty sample.
pub fn estimate(kernel: impl Fn(f64) -> f64, grid: &EvaluationGrid, samples: &[f64]) -> Vec<[f64; 2]> {
    let n = samples.len();
    grid.points()
        .iter()
        .map(|&x| {
            if n == 0 {
                return [x, 0.0];
            }
            let sum: f64 = samples.iter().map(|&s| kernel(x - s)).sum();
            [x, sum / n as f64]
        })
        .collect()
}

/// Highest density of a curve, zero for an empty one.
pub fn peak(curve: &[[f64; 2]]) -> f64 {
    curve.iter().map(|p| p[1]).fold(0.0, f64::max)
}

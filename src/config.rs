use std::time::Duration;

/// Id of the implicit root of the region tree. Selecting it means "every
/// record of the month" and never goes through the index.
pub const WORLD_ID: &str = "World";

pub const MAX_SELECTION: usize = 6;

/// Tuning values for the viewer. Defaults match the ones the data
/// artifacts were preprocessed with.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    /// Epanechnikov kernel bandwidth, in rating points.
    pub bandwidth: f64,
    /// Number of evaluation points across the rating axis.
    pub grid_size: usize,
    /// The y-axis tops out at `max_density * density_buffer`.
    pub density_buffer: f64,
    /// A frame entry needs strictly more samples than this.
    pub min_samples: usize,
    pub tick_interval: Duration,
    pub max_selection: usize,
    /// Padding added on both sides of the observed rating range when stats
    /// have to be derived from the data.
    pub grid_padding: f64,
    /// Fade and tween duration for plot elements, in seconds.
    pub fade_seconds: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            bandwidth: 40.0,
            grid_size: 60,
            density_buffer: 3.5,
            min_samples: 20,
            tick_interval: Duration::from_millis(150),
            max_selection: MAX_SELECTION,
            grid_padding: 100.0,
            fade_seconds: 0.3,
        }
    }
}

impl ViewerConfig {
    pub fn bandwidth(mut self, bandwidth: f64) -> Self {
        if bandwidth > 0.0 {
            self.bandwidth = bandwidth;
        }
        self
    }

    pub fn grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size.max(2);
        self
    }

    pub fn min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_preprocessing_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.bandwidth, 40.0);
        assert_eq!(config.grid_size, 60);
        assert_eq!(config.density_buffer, 3.5);
        assert_eq!(config.min_samples, 20);
        assert_eq!(config.tick_interval, Duration::from_millis(150));
        assert_eq!(config.max_selection, 6);
    }

    #[test]
    fn builders_reject_degenerate_values() {
        let config = ViewerConfig::default()
            .bandwidth(-1.0)
            .grid_size(0)
            .tick_interval(Duration::ZERO);
        assert_eq!(config.bandwidth, 40.0);
        assert_eq!(config.grid_size, 2);
        assert_eq!(config.tick_interval, Duration::from_millis(1));
    }
}

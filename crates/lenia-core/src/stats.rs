//! Field statistics, per step and aggregated over a run.

use serde::{Deserialize, Serialize};

/// Cells above this value count as active
pub const DEFAULT_ACTIVE_THRESHOLD: f32 = 0.1;

/// Summary of a single field state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Sum of all activations
    pub mass: f64,
    pub mean: f32,
    pub min: f32,
    pub max: f32,
    /// Number of cells above the active threshold
    pub active_cells: usize,
    /// Activation-weighted centre of mass, `None` for an empty field
    pub centroid: Option<(f32, f32)>,
}

impl FieldStats {
    /// Compute statistics over row-major `cells` of the given width
    pub fn from_cells(width: usize, cells: &[f32], active_threshold: f32) -> Self {
        if cells.is_empty() || width == 0 {
            return Self::default();
        }

        let mut mass = 0.0f64;
        let mut sum_x = 0.0f64;
        let mut sum_y = 0.0f64;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut active_cells = 0;

        for (i, &v) in cells.iter().enumerate() {
            let x = (i % width) as f64;
            let y = (i / width) as f64;
            mass += v as f64;
            sum_x += x * v as f64;
            sum_y += y * v as f64;
            min = min.min(v);
            max = max.max(v);
            if v > active_threshold {
                active_cells += 1;
            }
        }

        let centroid = if mass > 0.0 {
            Some(((sum_x / mass) as f32, (sum_y / mass) as f32))
        } else {
            None
        };

        Self {
            mass,
            mean: (mass / cells.len() as f64) as f32,
            min,
            max,
            active_cells,
            centroid,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mass <= 0.0
    }
}

/// Statistics aggregated across the steps of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub steps_observed: u64,
    pub min_mass: f64,
    pub peak_mass: f64,
    pub mean_mass: f64,
    pub final_stats: FieldStats,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one step's statistics into the aggregate
    pub fn update(&mut self, stats: &FieldStats) {
        let n = self.steps_observed as f64;

        if self.steps_observed == 0 {
            self.min_mass = stats.mass;
            self.peak_mass = stats.mass;
        } else {
            self.min_mass = self.min_mass.min(stats.mass);
            self.peak_mass = self.peak_mass.max(stats.mass);
        }

        // Incremental mean
        self.mean_mass = (self.mean_mass * n + stats.mass) / (n + 1.0);
        self.final_stats = *stats;
        self.steps_observed += 1;
    }

    /// True when the field ended the run with no activation at all
    pub fn went_extinct(&self) -> bool {
        self.steps_observed > 0 && self.final_stats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_stats() {
        // 3x2 field, mass concentrated on the right column
        let cells = [0.0, 0.0, 0.5, 0.0, 0.0, 0.5];
        let stats = FieldStats::from_cells(3, &cells, DEFAULT_ACTIVE_THRESHOLD);

        assert!((stats.mass - 1.0).abs() < 1e-9);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.5);
        assert_eq!(stats.active_cells, 2);
        assert_eq!(stats.centroid, Some((2.0, 0.5)));
        assert!((stats.mean - 1.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_field_has_no_centroid() {
        let stats = FieldStats::from_cells(4, &[0.0; 16], DEFAULT_ACTIVE_THRESHOLD);
        assert!(stats.is_empty());
        assert_eq!(stats.centroid, None);
        assert_eq!(stats.active_cells, 0);
    }

    #[test]
    fn test_run_stats_update() {
        let mut run = RunStats::new();

        let a = FieldStats { mass: 10.0, ..Default::default() };
        let b = FieldStats { mass: 30.0, ..Default::default() };
        let c = FieldStats { mass: 0.0, ..Default::default() };

        run.update(&a);
        run.update(&b);
        assert_eq!(run.steps_observed, 2);
        assert_eq!(run.mean_mass, 20.0);
        assert_eq!(run.peak_mass, 30.0);
        assert_eq!(run.min_mass, 10.0);
        assert!(!run.went_extinct());

        run.update(&c);
        assert_eq!(run.min_mass, 0.0);
        assert!(run.went_extinct());
    }
}

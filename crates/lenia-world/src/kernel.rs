//! Radial convolution kernel.
//!
//! Weights follow the polynomial bump `(4r(1 - r))⁴` over the normalized
//! distance `r = |(dx, dy)| / R`, zero outside the unit disc, and are scaled
//! to sum to one.

use lenia_core::MAX_KERNEL_RADIUS;
use serde::{Deserialize, Serialize};

/// Polynomial bump on `[0, 1]`, peaking at `r = 0.5`
#[inline]
pub fn bump(r: f32) -> f32 {
    let base = (4.0 * r * (1.0 - r)).max(0.0);
    base.powi(4)
}

/// One non-zero kernel weight and its offset from the centre cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tap {
    pub dx: isize,
    pub dy: isize,
    pub weight: f32,
}

/// Precomputed normalized kernel, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    radius: f32,
    r_int: usize,
    size: usize,
    weights: Vec<f32>,
    taps: Vec<Tap>,
    degenerate: bool,
}

impl Kernel {
    /// The square is capped at `MAX_KERNEL_RADIUS`; configuration rejects
    /// larger radii before they reach here.
    pub fn new(radius: f32) -> Self {
        let r_int = radius.floor().clamp(0.0, MAX_KERNEL_RADIUS) as usize;
        let size = 2 * r_int + 1;
        let reach = r_int as isize;

        let mut weights = vec![0.0f32; size * size];
        let mut sum = 0.0f64;

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let rr = ((dx * dx + dy * dy) as f32).sqrt() / radius;
                let w = if rr <= 1.0 { bump(rr) } else { 0.0 };
                weights[(dy + reach) as usize * size + (dx + reach) as usize] = w;
                sum += w as f64;
            }
        }

        // Degenerate kernels keep their zero weights
        let degenerate = sum <= 0.0;
        if !degenerate {
            for w in &mut weights {
                *w = (*w as f64 / sum) as f32;
            }
        }

        let taps = weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0.0)
            .map(|(i, &w)| Tap {
                dx: (i % size) as isize - reach,
                dy: (i / size) as isize - reach,
                weight: w,
            })
            .collect();

        Self {
            radius,
            r_int,
            size,
            weights,
            taps,
            degenerate,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// `floor(R)`
    pub fn r_int(&self) -> usize {
        self.r_int
    }

    /// Side length, `2 * floor(R) + 1`
    pub fn size(&self) -> usize {
        self.size
    }

    /// Weight at offset `(dx, dy)`; zero outside the kernel square
    pub fn weight(&self, dx: isize, dy: isize) -> f32 {
        let reach = self.r_int as isize;
        if dx.abs() > reach || dy.abs() > reach {
            return 0.0;
        }
        self.weights[(dy + reach) as usize * self.size + (dx + reach) as usize]
    }

    /// Row-major weights, addressed `(dy + r_int) * size + (dx + r_int)`
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Non-zero weights in row-major order
    pub fn taps(&self) -> &[Tap] {
        &self.taps
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().map(|&w| w as f64).sum()
    }

    /// True when every weight is zero and the kernel produces no dynamics
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}

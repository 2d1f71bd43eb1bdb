//! Polynomial growth function.
//!
//! Maps a convolution response to a signed rate of change in `[-1, 1]`:
//! a smooth bump of height 1 centred at `m`, falling to -1 once `|n - m| >= 3s`.

use crate::GrowthParams;

/// `2 * max(1 - (n - m)² / (9 s²), 0)⁴ - 1`
#[inline]
pub fn growth(n: f32, m: f32, s: f32) -> f32 {
    let diff = n - m;
    let inner = (1.0 - (diff * diff) / (9.0 * s * s)).max(0.0);
    2.0 * inner.powi(4) - 1.0
}

impl GrowthParams {
    #[inline]
    pub fn growth(&self, n: f32) -> f32 {
        growth(n, self.m, self.s)
    }

    /// Signed change applied to a cell for neighbourhood sum `n`
    #[inline]
    pub fn delta(&self, n: f32) -> f32 {
        self.dt * self.growth(n)
    }
}

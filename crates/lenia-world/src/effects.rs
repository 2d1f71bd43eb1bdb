//! Optional post-step transforms.
//!
//! None of these are part of the Lenia update rule. Each is toggled on its own
//! through [`EffectsConfig`] and runs after the convolution step has been
//! committed. Shifts and rotations only move existing values around, and fuel
//! clamps to the upper bound, so the field stays within its bounds.

use crate::field::Field;
use lenia_core::{Bounds, DriftConfig, EffectsConfig, FuelConfig, Shift};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single jitter move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JitterMove {
    Shift(Shift),
    /// Rotation in degrees, positive is counter-clockwise
    Rotate(f32),
}

impl JitterMove {
    /// Pick one of the six moves uniformly
    pub fn random(rng: &mut ChaCha8Rng, degrees: f32) -> Self {
        match rng.gen_range(0..6) {
            0 => JitterMove::Shift(Shift::Up),
            1 => JitterMove::Shift(Shift::Down),
            2 => JitterMove::Shift(Shift::Left),
            3 => JitterMove::Shift(Shift::Right),
            4 => JitterMove::Rotate(degrees),
            _ => JitterMove::Rotate(-degrees),
        }
    }

    pub fn apply(&self, field: &mut Field) {
        *field = match *self {
            JitterMove::Shift(shift) => {
                let (dx, dy) = shift.to_delta();
                field.shifted(dx, dy)
            }
            JitterMove::Rotate(degrees) => field.rotated(degrees.to_radians()),
        };
    }
}

/// What happened during one post-step pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedEffects {
    pub fueled: bool,
    pub drifted: bool,
    pub jitter: Option<JitterMove>,
}

/// Boost every cell near the activation centroid. Returns false when the
/// field is empty and there is no centroid to boost around.
pub fn inject_fuel(field: &mut Field, fuel: &FuelConfig, bounds: Bounds) -> bool {
    let Some((cx, cy)) = field.stats(0.0).centroid else {
        return false;
    };

    let width = field.width();
    for (i, cell) in field.cells_mut().iter_mut().enumerate() {
        let dx = (i % width) as f32 - cx;
        let dy = (i / width) as f32 - cy;
        if (dx * dx + dy * dy).sqrt() < fuel.radius {
            *cell = (*cell + fuel.boost).min(bounds.upper);
        }
    }
    true
}

/// Translate the field one cell in the drift direction
pub fn drift(field: &mut Field, drift: &DriftConfig) {
    let (dx, dy) = drift.direction.to_delta();
    *field = field.shifted(dx, dy);
}

/// Run every enabled effect for the step that just completed.
///
/// `step` is the post-increment step count, so periodic effects fire on
/// steps `every`, `2 * every`, ...
pub fn apply(
    field: &mut Field,
    config: &EffectsConfig,
    step: u64,
    bounds: Bounds,
    rng: &mut ChaCha8Rng,
) -> AppliedEffects {
    let mut applied = AppliedEffects::default();

    if let Some(fuel) = &config.fuel {
        applied.fueled = inject_fuel(field, fuel, bounds);
    }

    if let Some(cfg) = &config.drift {
        if step % cfg.every == 0 {
            drift(field, cfg);
            applied.drifted = true;
            debug!(step, direction = ?cfg.direction, "Field drifted");
        }
    }

    if let Some(cfg) = &config.jitter {
        if step % cfg.every == 0 {
            let jitter = JitterMove::random(rng, cfg.degrees);
            jitter.apply(field);
            applied.jitter = Some(jitter);
            debug!(step, jitter = ?jitter, "Field jittered");
        }
    }

    applied
}

//! Configuration types for the simulator.

use crate::{Error, Result, Shift};
use serde::{Deserialize, Serialize};

/// Largest accepted kernel radius. Taps beyond the grid only wrap again,
/// and the kernel square grows with the square of the radius.
pub const MAX_KERNEL_RADIUS: f32 = 1024.0;

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the field in cells
    pub width: usize,
    /// Height of the field in cells
    pub height: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 36,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Validation(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > i32::MAX as usize || self.height > i32::MAX as usize {
            return Err(Error::Validation(format!(
                "grid {}x{} exceeds addressable size",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Growth function parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParams {
    /// Growth centre: the neighbourhood sum with maximal growth
    pub m: f32,
    /// Growth width
    pub s: f32,
    /// Time step applied to the growth delta
    pub dt: f32,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            m: 0.3,
            s: 0.05,
            dt: 0.05,
        }
    }
}

impl GrowthParams {
    pub fn validate(&self) -> Result<()> {
        if !self.m.is_finite() {
            return Err(Error::Validation(format!("growth centre m must be finite, got {}", self.m)));
        }
        if !self.s.is_finite() || self.s <= 0.0 {
            return Err(Error::Validation(format!("growth width s must be positive, got {}", self.s)));
        }
        if !self.dt.is_finite() {
            return Err(Error::Validation(format!("time step dt must be finite, got {}", self.dt)));
        }
        Ok(())
    }
}

/// Clamp range applied to every cell after a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub lower: f32,
    pub upper: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
        }
    }
}

impl Bounds {
    pub fn new(lower: f32, upper: f32) -> Self {
        Self { lower, upper }
    }

    /// `[0, 0.95]`, leaving room at the top for trail rendering
    pub fn headroom() -> Self {
        Self::new(0.0, 0.95)
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.lower, self.upper)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower > self.upper {
            return Err(Error::Validation(format!(
                "invalid clamp bounds [{}, {}]",
                self.lower, self.upper
            )));
        }
        Ok(())
    }
}

/// Initial field content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeedPattern {
    /// Nothing; every cell at the lower bound
    Empty,
    /// Filled disc at the grid centre
    Disc { radius: f32, value: f32 },
    /// Soft Orbium-like blob of `size x size` cells at the grid centre
    SoftBlob { size: usize },
    /// Randomly placed fading bubbles
    Bubbles {
        min_count: usize,
        max_count: usize,
        min_radius: f32,
        max_radius: f32,
    },
}

impl Default for SeedPattern {
    fn default() -> Self {
        SeedPattern::Disc {
            radius: 16.0,
            value: 0.8,
        }
    }
}

impl SeedPattern {
    pub fn validate(&self) -> Result<()> {
        match *self {
            SeedPattern::Empty => Ok(()),
            SeedPattern::Disc { radius, value } => {
                if !radius.is_finite() || radius < 0.0 || !value.is_finite() {
                    return Err(Error::Validation(format!(
                        "invalid disc seed radius={} value={}",
                        radius, value
                    )));
                }
                Ok(())
            }
            SeedPattern::SoftBlob { size } => {
                if size == 0 {
                    return Err(Error::Validation("soft blob size must be positive".to_string()));
                }
                Ok(())
            }
            SeedPattern::Bubbles {
                min_count,
                max_count,
                min_radius,
                max_radius,
            } => {
                if min_count > max_count {
                    return Err(Error::Validation(format!(
                        "bubble count range {}..={} is inverted",
                        min_count, max_count
                    )));
                }
                if !min_radius.is_finite()
                    || !max_radius.is_finite()
                    || min_radius <= 0.0
                    || min_radius > max_radius
                {
                    return Err(Error::Validation(format!(
                        "bubble radius range {}..{} is invalid",
                        min_radius, max_radius
                    )));
                }
                Ok(())
            }
        }
    }
}

/// The parameter set swapped out as a unit by reseeding and randomization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeniaParams {
    /// Kernel radius R in cells
    pub kernel_radius: f32,
    pub growth: GrowthParams,
    pub seed: SeedPattern,
}

impl Default for LeniaParams {
    fn default() -> Self {
        Self {
            kernel_radius: 7.0,
            growth: GrowthParams::default(),
            seed: SeedPattern::default(),
        }
    }
}

impl LeniaParams {
    pub fn validate(&self) -> Result<()> {
        if !self.kernel_radius.is_finite() || self.kernel_radius <= 0.0 {
            return Err(Error::Validation(format!(
                "kernel radius must be positive, got {}",
                self.kernel_radius
            )));
        }
        if self.kernel_radius > MAX_KERNEL_RADIUS {
            return Err(Error::Validation(format!(
                "kernel radius {} exceeds the maximum of {}",
                self.kernel_radius, MAX_KERNEL_RADIUS
            )));
        }
        self.growth.validate()?;
        self.seed.validate()
    }
}

/// Energy boost around the activation centroid after each step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelConfig {
    /// Cells closer than this to the centroid are boosted
    pub radius: f32,
    /// Amount added per step
    pub boost: f32,
}

impl Default for FuelConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            boost: 0.02,
        }
    }
}

/// Periodic one-cell translation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Drift every N steps
    pub every: u64,
    pub direction: Shift,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            every: 4,
            direction: Shift::Right,
        }
    }
}

/// Periodic random shift or small rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    /// Jitter every N steps
    pub every: u64,
    /// Rotation magnitude in degrees
    pub degrees: f32,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            every: 20,
            degrees: 2.0,
        }
    }
}

/// Optional post-step transforms. All disabled by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub fuel: Option<FuelConfig>,
    pub drift: Option<DriftConfig>,
    pub jitter: Option<JitterConfig>,
}

impl EffectsConfig {
    pub fn any_enabled(&self) -> bool {
        self.fuel.is_some() || self.drift.is_some() || self.jitter.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(fuel) = self.fuel {
            if !fuel.radius.is_finite() || !fuel.boost.is_finite() || fuel.boost < 0.0 {
                return Err(Error::Validation(format!(
                    "invalid fuel radius={} boost={}",
                    fuel.radius, fuel.boost
                )));
            }
        }
        if let Some(drift) = self.drift {
            if drift.every == 0 {
                return Err(Error::Validation("drift period must be positive".to_string()));
            }
        }
        if let Some(jitter) = self.jitter {
            if jitter.every == 0 || !jitter.degrees.is_finite() {
                return Err(Error::Validation(format!(
                    "invalid jitter every={} degrees={}",
                    jitter.every, jitter.degrees
                )));
            }
        }
        Ok(())
    }
}

/// Half-open sampling range `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value < self.max
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(Error::Validation(format!(
                "{} range [{}, {}) is empty",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Ranges used when randomizing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizeRanges {
    pub kernel_radius: ParamRange,
    pub m: ParamRange,
    pub s: ParamRange,
    pub dt: ParamRange,
    /// Only applies to disc seeds
    pub seed_radius: ParamRange,
}

impl Default for RandomizeRanges {
    fn default() -> Self {
        Self {
            kernel_radius: ParamRange::new(10.0, 18.0),
            m: ParamRange::new(0.10, 0.20),
            s: ParamRange::new(0.010, 0.025),
            dt: ParamRange::new(0.05, 0.10),
            seed_radius: ParamRange::new(15.0, 25.0),
        }
    }
}

impl RandomizeRanges {
    pub fn validate(&self) -> Result<()> {
        self.kernel_radius.validate("kernel_radius")?;
        self.m.validate("m")?;
        self.s.validate("s")?;
        self.dt.validate("dt")?;
        self.seed_radius.validate("seed_radius")?;
        if self.kernel_radius.min <= 0.0 || self.s.min <= 0.0 {
            return Err(Error::Validation(
                "kernel_radius and s ranges must be positive".to_string(),
            ));
        }
        if self.kernel_radius.max > MAX_KERNEL_RADIUS {
            return Err(Error::Validation(format!(
                "kernel_radius range exceeds the maximum of {}",
                MAX_KERNEL_RADIUS
            )));
        }
        Ok(())
    }
}

/// Full simulator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the simulator RNG (bubbles, jitter, randomization)
    pub rng_seed: u64,
    pub world: WorldConfig,
    pub params: LeniaParams,
    pub bounds: Bounds,
    pub effects: EffectsConfig,
    pub randomize: RandomizeRanges,
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        self.world.validate()?;
        self.params.validate()?;
        self.bounds.validate()?;
        self.effects.validate()?;
        self.randomize.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = SimConfig::default();
        assert_eq!(config.world.width, 64);
        assert_eq!(config.world.height, 36);
        assert_eq!(config.params.kernel_radius, 7.0);
        assert_eq!(config.params.growth.m, 0.3);
        assert_eq!(config.params.growth.s, 0.05);
        assert_eq!(config.params.growth.dt, 0.05);
        assert_eq!(config.bounds, Bounds::new(0.0, 1.0));
        assert!(!config.effects.any_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"world": {"width": 128}, "effects": {"drift": {}}}"#;
        let config: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.world.width, 128);
        assert_eq!(config.world.height, 36);
        assert_eq!(config.effects.drift, Some(DriftConfig::default()));
        assert!(config.effects.fuel.is_none());
    }

    #[test]
    fn test_seed_pattern_serialization() {
        let seed = SeedPattern::Bubbles {
            min_count: 5,
            max_count: 15,
            min_radius: 5.0,
            max_radius: 20.0,
        };
        let json = serde_json::to_string(&seed).unwrap();
        assert!(json.contains("\"type\":\"bubbles\""));
        let back: SeedPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seed);
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = SimConfig {
            world: WorldConfig { width: 0, height: 10 },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_rejects_bad_params() {
        let mut params = LeniaParams::default();
        params.kernel_radius = 0.0;
        assert!(params.validate().is_err());

        let mut params = LeniaParams::default();
        params.kernel_radius = 1.0e10;
        assert!(matches!(params.validate(), Err(Error::Validation(_))));

        let mut params = LeniaParams::default();
        params.kernel_radius = MAX_KERNEL_RADIUS;
        assert!(params.validate().is_ok());

        let mut params = LeniaParams::default();
        params.growth.s = 0.0;
        assert!(params.validate().is_err());

        let mut params = LeniaParams::default();
        params.growth.dt = f32::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_tiny_radius_is_valid() {
        // An empty kernel is a modelling problem, not a configuration error
        let params = LeniaParams {
            kernel_radius: 0.5,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_bounds() {
        assert!(Bounds::new(1.0, 0.0).validate().is_err());
        let headroom = Bounds::headroom();
        assert_eq!(headroom.clamp(1.0), 0.95);
        assert_eq!(headroom.clamp(-0.5), 0.0);
        assert!(headroom.contains(0.5));
    }

    #[test]
    fn test_effect_periods_must_be_positive() {
        let effects = EffectsConfig {
            drift: Some(DriftConfig {
                every: 0,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(effects.validate().is_err());
    }

    #[test]
    fn test_randomize_ranges() {
        assert!(RandomizeRanges::default().validate().is_ok());
        let ranges = RandomizeRanges {
            m: ParamRange::new(0.2, 0.1),
            ..Default::default()
        };
        assert!(ranges.validate().is_err());

        let ranges = RandomizeRanges {
            kernel_radius: ParamRange::new(10.0, 1.0e9),
            ..Default::default()
        };
        assert!(ranges.validate().is_err());
    }
}

//! Simulation engine: owns the field buffers and the kernel, and advances
//! the field one atomic step at a time.

use crate::effects::{self, AppliedEffects};
use crate::field::Field;
use crate::kernel::Kernel;
use crate::seed;
use crate::snapshot::Snapshot;
use lenia_core::{
    Bounds, FieldStats, GrowthParams, LeniaParams, ParamRange, Phase, Result,
    RunId, RunStats, SeedPattern, SimConfig, WorldConfig, DEFAULT_ACTIVE_THRESHOLD,
};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};

/// Weighted neighbourhood sum around `(x, y)`, wrapping at the edges
#[inline]
pub fn neighbourhood(field: &Field, kernel: &Kernel, x: usize, y: usize) -> f32 {
    let mut n = 0.0f32;
    for tap in kernel.taps() {
        n += tap.weight * field.wrapped(x as isize + tap.dx, y as isize + tap.dy);
    }
    n
}

/// One Lenia update from `src` into `out`. Both fields must share dimensions.
pub fn convolve_into(
    src: &Field,
    kernel: &Kernel,
    growth: &GrowthParams,
    bounds: Bounds,
    out: &mut Field,
) {
    let width = src.width();
    let height = src.height();
    let input = src.cells();
    let output = out.cells_mut();

    for y in 0..height {
        for x in 0..width {
            let n = neighbourhood(src, kernel, x, y);
            let i = y * width + x;
            output[i] = bounds.clamp(input[i] + growth.delta(n));
        }
    }
}

pub struct Simulator {
    config: SimConfig,
    field: Field,
    back: Field,
    kernel: Kernel,
    rng: ChaCha8Rng,
    run_id: RunId,
    step: u64,
    generation: u64,
    phase: Phase,
    last_effects: AppliedEffects,
}

impl Simulator {
    /// Validate `config`, build the kernel and seed the field
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let WorldConfig { width, height } = config.world;

        let mut sim = Self {
            kernel: Kernel::new(config.params.kernel_radius),
            field: Field::new(width, height),
            back: Field::new(width, height),
            rng,
            run_id: RunId::new(),
            step: 0,
            generation: 0,
            phase: Phase::Reinitializing,
            last_effects: AppliedEffects::default(),
            config,
        };
        sim.seed_field();
        sim.phase = Phase::Seeded;

        info!(
            run_id = %sim.run_id,
            width,
            height,
            kernel_radius = sim.config.params.kernel_radius,
            m = sim.config.params.growth.m,
            s = sim.config.params.growth.s,
            dt = sim.config.params.growth.dt,
            "Simulator created"
        );

        Ok(sim)
    }

    /// Resume from a snapshot.
    ///
    /// Grid size, parameters, bounds and RNG state come from the snapshot;
    /// effects and randomize ranges come from `config`.
    pub fn restore(mut config: SimConfig, snapshot: Snapshot) -> Result<Self> {
        snapshot.validate()?;

        config.world = WorldConfig {
            width: snapshot.field.width(),
            height: snapshot.field.height(),
        };
        config.params = snapshot.params;
        config.bounds = snapshot.bounds;
        config.validate()?;

        let kernel = Kernel::new(config.params.kernel_radius);
        if kernel.is_degenerate() {
            warn!(kernel_radius = kernel.radius(), "Restored kernel is empty; the field will not evolve");
        }

        info!(
            run_id = %snapshot.run_id,
            step = snapshot.step,
            generation = snapshot.generation,
            "Simulator restored from snapshot"
        );

        Ok(Self {
            back: Field::new(config.world.width, config.world.height),
            field: snapshot.field,
            kernel,
            rng: snapshot.rng,
            run_id: snapshot.run_id,
            step: snapshot.step,
            generation: snapshot.generation,
            phase: Phase::Seeded,
            last_effects: AppliedEffects::default(),
            config,
        })
    }

    /// Advance the field by one step.
    ///
    /// The whole new field is computed into the back buffer before the swap,
    /// so readers never see a partially updated step.
    pub fn step(&mut self) {
        convolve_into(
            &self.field,
            &self.kernel,
            &self.config.params.growth,
            self.config.bounds,
            &mut self.back,
        );
        std::mem::swap(&mut self.field, &mut self.back);
        self.step += 1;

        self.last_effects = if self.config.effects.any_enabled() {
            effects::apply(
                &mut self.field,
                &self.config.effects,
                self.step,
                self.config.bounds,
                &mut self.rng,
            )
        } else {
            AppliedEffects::default()
        };

        trace!(step = self.step, "Step complete");
    }

    /// Run `steps` steps and return aggregate statistics
    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub fn run(&mut self, steps: u64) -> RunSummary {
        info!("Running simulation for {} steps", steps);

        let mut stats = RunStats::new();
        for i in 0..steps {
            self.step();
            let field_stats = self.stats();
            stats.update(&field_stats);

            if (i + 1) % 1000 == 0 {
                info!(
                    step = self.step,
                    mass = field_stats.mass,
                    active_cells = field_stats.active_cells,
                    "Step {}/{}",
                    i + 1,
                    steps
                );
            }
        }

        let summary = RunSummary {
            run_id: self.run_id,
            steps_run: steps,
            final_step: self.step,
            generation: self.generation,
            stats,
        };
        summary.log();
        summary
    }

    /// Clear both buffers, rebuild the kernel and re-apply the seed pattern
    pub fn reseed(&mut self) {
        self.phase = Phase::Reinitializing;

        self.kernel = Kernel::new(self.config.params.kernel_radius);
        self.back.fill(self.config.bounds.lower);
        self.seed_field();
        self.step = 0;
        self.generation += 1;
        self.last_effects = AppliedEffects::default();

        self.phase = Phase::Seeded;

        let stats = self.stats();
        info!(
            generation = self.generation,
            kernel_radius = self.config.params.kernel_radius,
            mass = stats.mass,
            "Field reseeded"
        );
    }

    /// Install new parameters and reseed
    pub fn reseed_with(&mut self, params: LeniaParams) -> Result<()> {
        params.validate()?;
        self.config.params = params;
        self.reseed();
        Ok(())
    }

    /// Draw fresh parameters from the configured ranges and reseed.
    ///
    /// Only a disc seed has its radius redrawn; other patterns keep their shape.
    pub fn randomize(&mut self) -> LeniaParams {
        let ranges = self.config.randomize;
        let mut params = self.config.params.clone();

        params.kernel_radius = sample(&mut self.rng, ranges.kernel_radius);
        params.growth = GrowthParams {
            m: sample(&mut self.rng, ranges.m),
            s: sample(&mut self.rng, ranges.s),
            dt: sample(&mut self.rng, ranges.dt),
        };
        if let SeedPattern::Disc { value, .. } = params.seed {
            params.seed = SeedPattern::Disc {
                radius: sample(&mut self.rng, ranges.seed_radius),
                value,
            };
        }

        info!(
            kernel_radius = params.kernel_radius,
            m = params.growth.m,
            s = params.growth.s,
            dt = params.growth.dt,
            seed = ?params.seed,
            "Parameters randomized"
        );

        self.config.params = params.clone();
        self.reseed();
        params
    }

    /// Capture the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            self.run_id,
            self.step,
            self.generation,
            self.config.params.clone(),
            self.config.bounds,
            self.field.clone(),
            self.rng.clone(),
        )
    }

    fn seed_field(&mut self) {
        if self.kernel.is_degenerate() {
            warn!(
                kernel_radius = self.kernel.radius(),
                "Kernel is empty; the field will not evolve"
            );
        }
        seed::apply(
            &mut self.field,
            &self.config.params.seed,
            self.config.bounds,
            &mut self.rng,
        );
        debug!(seed = ?self.config.params.seed, "Field seeded");
    }

    pub fn value_at(&self, x: usize, y: usize) -> f32 {
        self.field.value_at(x, y)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn params(&self) -> &LeniaParams {
        &self.config.params
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        self.config.bounds
    }

    pub fn width(&self) -> usize {
        self.field.width()
    }

    pub fn height(&self) -> usize {
        self.field.height()
    }

    /// Steps since construction or the last reseed
    pub fn step_count(&self) -> u64 {
        self.step
    }

    /// Number of reseeds since construction
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Effects applied by the most recent step
    pub fn last_effects(&self) -> AppliedEffects {
        self.last_effects
    }

    pub fn stats(&self) -> FieldStats {
        self.field.stats(DEFAULT_ACTIVE_THRESHOLD)
    }
}

fn sample(rng: &mut ChaCha8Rng, range: ParamRange) -> f32 {
    rng.gen_range(range.min..range.max)
}

/// Outcome of [`Simulator::run`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub steps_run: u64,
    pub final_step: u64,
    pub generation: u64,
    pub stats: RunStats,
}

impl RunSummary {
    pub fn log(&self) {
        info!(
            event = "run_summary",
            run_id = %self.run_id,
            steps_run = self.steps_run,
            final_step = self.final_step,
            generation = self.generation,
            min_mass = self.stats.min_mass,
            peak_mass = self.stats.peak_mass,
            mean_mass = self.stats.mean_mass,
            final_mass = self.stats.final_stats.mass,
            active_cells = self.stats.final_stats.active_cells,
            "Run complete"
        );

        if self.stats.went_extinct() {
            warn!(event = "extinction", final_step = self.final_step, "Field decayed to zero");
        }
    }
}

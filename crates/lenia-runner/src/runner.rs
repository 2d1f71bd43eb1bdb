//! Blocking simulation loop with periodic frame and snapshot output.

use crate::config::RunnerConfig;
use anyhow::{Context, Result};
use lenia_core::RunStats;
use lenia_world::{Palette, RunSummary, Simulator, Snapshot, TrailBuffer};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, instrument};

pub struct Runner {
    config: RunnerConfig,
    sim: Simulator,
    palette: Palette,
    trail: TrailBuffer,
    steps_run: u64,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Result<Self> {
        let sim = match &config.restore_from {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("reading snapshot {}", path.display()))?;
                let snapshot = Snapshot::from_bytes(&bytes)?;
                info!(
                    step = snapshot.step,
                    generation = snapshot.generation,
                    "Restoring from {}",
                    path.display()
                );
                Simulator::restore(config.sim.clone(), snapshot)?
            }
            None => Simulator::new(config.sim.clone())?,
        };

        let palette = Palette::from_kind(config.palette);
        let trail = TrailBuffer::new(sim.field().len() * 3, config.trail_keep);

        Ok(Self {
            config,
            sim,
            palette,
            trail,
            steps_run: 0,
        })
    }

    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    /// Step until `num_steps` is reached or `shutdown` is raised
    #[instrument(skip_all, fields(run_id = %self.sim.run_id()))]
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<RunSummary> {
        let start = Instant::now();
        let limit = self.config.num_steps;
        info!(
            num_steps = limit,
            width = self.sim.width(),
            height = self.sim.height(),
            "Simulation loop started"
        );

        let mut stats = RunStats::new();
        while limit == 0 || self.steps_run < limit {
            if shutdown.load(Ordering::Relaxed) {
                info!(steps_run = self.steps_run, "Shutdown requested, stopping");
                break;
            }

            self.sim.step();
            self.steps_run += 1;

            let field_stats = self.sim.stats();
            stats.update(&field_stats);

            if self.steps_run % self.config.log_interval == 0 {
                info!(
                    step = self.sim.step_count(),
                    generation = self.sim.generation(),
                    mass = field_stats.mass,
                    active_cells = field_stats.active_cells,
                    "Progress {}",
                    self.steps_run
                );
            }

            if due(self.config.frame_interval, self.steps_run) {
                self.write_frame()?;
            }
            if due(self.config.snapshot_interval, self.steps_run) {
                self.write_snapshot()?;
            }
            if due(self.config.randomize_interval, self.steps_run) {
                self.sim.randomize();
                self.trail.clear();
            }
        }

        let summary = RunSummary {
            run_id: self.sim.run_id(),
            steps_run: self.steps_run,
            final_step: self.sim.step_count(),
            generation: self.sim.generation(),
            stats,
        };
        summary.log();
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "Simulation loop finished");
        Ok(summary)
    }

    /// Render the field through the palette and trail into `frame_<n>.png`
    pub fn write_frame(&mut self) -> Result<PathBuf> {
        let pixels = self.palette.render(self.sim.field());
        let blended = if self.config.trail_keep > 0.0 {
            self.trail.blend(&pixels).to_vec()
        } else {
            pixels
        };

        let (width, height) = (self.sim.width() as u32, self.sim.height() as u32);
        let image = image::RgbImage::from_raw(width, height, blended)
            .context("frame buffer does not match field dimensions")?;

        let path = output_path(&self.config.frame_dir, "frame", self.steps_run, "png")?;
        image
            .save(&path)
            .with_context(|| format!("writing frame {}", path.display()))?;
        debug!("Frame written to {}", path.display());
        Ok(path)
    }

    /// Serialize the simulator state into `snapshot_<n>.bin`
    pub fn write_snapshot(&self) -> Result<PathBuf> {
        let bytes = self.sim.snapshot().to_bytes()?;
        let path = output_path(&self.config.snapshot_dir, "snapshot", self.steps_run, "bin")?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        debug!("Snapshot written to {}", path.display());
        Ok(path)
    }
}

fn due(interval: Option<u64>, steps_run: u64) -> bool {
    matches!(interval, Some(every) if every > 0 && steps_run % every == 0)
}

fn output_path(dir: &Path, prefix: &str, steps_run: u64, ext: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    Ok(dir.join(format!("{}_{:08}.{}", prefix, steps_run, ext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lenia_core::{SimConfig, WorldConfig};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lenia-runner-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn small_config(num_steps: u64) -> RunnerConfig {
        RunnerConfig {
            sim: SimConfig {
                world: WorldConfig {
                    width: 32,
                    height: 24,
                },
                ..Default::default()
            },
            num_steps,
            log_interval: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_runs_requested_steps() {
        let mut runner = Runner::new(small_config(12)).unwrap();
        let summary = runner.run(&AtomicBool::new(false)).unwrap();

        assert_eq!(summary.steps_run, 12);
        assert_eq!(summary.final_step, 12);
        assert_eq!(summary.stats.steps_observed, 12);
        assert_eq!(runner.simulator().step_count(), 12);
    }

    #[test]
    fn test_shutdown_flag_stops_loop() {
        let mut runner = Runner::new(small_config(0)).unwrap();
        let summary = runner.run(&AtomicBool::new(true)).unwrap();

        assert_eq!(summary.steps_run, 0);
        assert_eq!(runner.simulator().step_count(), 0);
    }

    #[test]
    fn test_writes_frames_and_snapshots() {
        let frames = temp_dir("frames");
        let snapshots = temp_dir("snapshots");
        let config = RunnerConfig {
            frame_interval: Some(5),
            frame_dir: frames.clone(),
            snapshot_interval: Some(5),
            snapshot_dir: snapshots.clone(),
            ..small_config(10)
        };

        let mut runner = Runner::new(config).unwrap();
        runner.run(&AtomicBool::new(false)).unwrap();

        assert!(frames.join("frame_00000005.png").exists());
        assert!(frames.join("frame_00000010.png").exists());
        let frame = image::open(frames.join("frame_00000010.png")).unwrap();
        assert_eq!((frame.width(), frame.height()), (32, 24));

        let bytes = std::fs::read(snapshots.join("snapshot_00000010.bin")).unwrap();
        let snapshot = Snapshot::from_bytes(&bytes).unwrap();
        assert_eq!(snapshot.step, 10);
        assert_eq!(snapshot.field, *runner.simulator().field());

        let _ = std::fs::remove_dir_all(frames);
        let _ = std::fs::remove_dir_all(snapshots);
    }

    #[test]
    fn test_restore_continues_identically() {
        let snapshots = temp_dir("restore");
        let config = RunnerConfig {
            snapshot_interval: Some(6),
            snapshot_dir: snapshots.clone(),
            ..small_config(6)
        };
        let mut first = Runner::new(config.clone()).unwrap();
        first.run(&AtomicBool::new(false)).unwrap();

        let mut straight = Runner::new(small_config(10)).unwrap();
        straight.run(&AtomicBool::new(false)).unwrap();

        let resumed_config = RunnerConfig {
            restore_from: Some(snapshots.join("snapshot_00000006.bin")),
            ..small_config(4)
        };
        let mut resumed = Runner::new(resumed_config).unwrap();
        resumed.run(&AtomicBool::new(false)).unwrap();

        assert_eq!(resumed.simulator().step_count(), 10);
        assert_eq!(resumed.simulator().field(), straight.simulator().field());

        let _ = std::fs::remove_dir_all(snapshots);
    }

    #[test]
    fn test_randomize_interval_bumps_generation() {
        let config = RunnerConfig {
            randomize_interval: Some(4),
            ..small_config(8)
        };
        let mut runner = Runner::new(config).unwrap();
        let summary = runner.run(&AtomicBool::new(false)).unwrap();

        assert_eq!(summary.generation, 2);
        assert_eq!(runner.simulator().step_count(), 0);
    }

    #[test]
    fn test_due() {
        assert!(!due(None, 10));
        assert!(due(Some(5), 10));
        assert!(!due(Some(3), 10));
    }
}

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

mod config;
mod runner;
mod telemetry;

use config::RunnerConfig;
use runner::Runner;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let config = RunnerConfig::load()?;
    info!(
        width = config.sim.world.width,
        height = config.sim.world.height,
        num_steps = config.num_steps,
        "Starting Lenia runner"
    );

    let mut runner = Runner::new(config)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let signal_flag = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_flag.store(true, Ordering::Relaxed);
    });

    let summary = tokio::task::spawn_blocking(move || runner.run(&shutdown)).await??;

    info!(
        steps_run = summary.steps_run,
        generation = summary.generation,
        "Lenia runner stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

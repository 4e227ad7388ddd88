//! newton: control-core worker of the ptracks air-traffic simulator.
//!
//! Loads the worker configuration and fix table, then runs the real-time
//! control loop until a Terminate message arrives or Ctrl-C is pressed.
//!
//! ```bash
//! newton --config apps/newton/newton.toml --fixes apps/newton/fixes.csv
//! RUST_LOG=debug newton -c newton.toml -f fixes.csv --ticks 50
//! ```

mod world;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trk_control::{ControlConfig, ControlLoopBuilder, LoopObserver, LoopState};
use trk_coords::{CoordinateEngine, load_fixes_csv};
use trk_core::Tick;
use trk_group::LocalGroup;
use trk_net::MessageKind;
use trk_perf::{PerformanceTable, load_performance_json};

use world::PositionReports;

#[derive(Parser, Debug)]
#[command(name = "newton")]
#[command(version, about = "Real-time control core of a simulation worker", long_about = None)]
struct Args {
    /// Worker configuration (TOML)
    #[arg(short, long)]
    config: PathBuf,

    /// Fix table (CSV: id,indicator,lat,lng,valid)
    #[arg(short, long)]
    fixes: PathBuf,

    /// Aircraft performance document (JSON), checked at startup
    #[arg(short, long)]
    performance: Option<PathBuf>,

    /// Stop after this many ticks instead of running until terminated
    #[arg(long)]
    ticks: Option<u64>,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs a progress line every `every` ticks and counts overruns.
struct ProgressLog {
    every:  u64,
    behind: u64,
    tracks: usize,
}

impl LoopObserver for ProgressLog {
    fn on_state_change(&mut self, from: LoopState, to: LoopState) {
        info!(%from, %to, "loop state");
    }

    fn on_tick_end(&mut self, tick: Tick, work: usize) {
        self.tracks += work;
        if self.every > 0 && tick.0 % self.every == 0 {
            info!(%tick, tracks = self.tracks, behind = self.behind, "progress");
        }
    }

    fn on_behind_schedule(&mut self, _tick: Tick, _overrun: std::time::Duration) {
        self.behind += 1;
    }

    fn on_message(&mut self, kind: MessageKind, handled: bool) {
        if !handled {
            warn!(%kind, "control message ignored");
        }
    }
}

// ── Startup checks ────────────────────────────────────────────────────────────

/// Load and validate the performance document so a bad file fails the
/// worker before the loop starts.  The table itself belongs to the
/// trajectory stepper, which loads its own copy; nothing here keeps it.
fn check_performance(path: &Path) -> Result<()> {
    let doc = load_performance_json(path).with_context(|| format!("loading {}", path.display()))?;
    let (table, report) = PerformanceTable::from_document(&doc)?;
    let inconsistent = table.iter().filter(|r| !r.validate().is_empty()).count();
    info!(
        aircraft = table.len(),
        skipped = report.skipped.len(),
        replaced = report.replaced.len(),
        inconsistent,
        version = table.version().unwrap_or("-"),
        "performance document checked"
    );
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // 1. Configuration and static data.
    let config = ControlConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let frame = config.reference_frame()?;
    let fixes = load_fixes_csv(&args.fixes)
        .with_context(|| format!("loading {}", args.fixes.display()))?;

    if let Some(path) = &args.performance {
        check_performance(path)?;
    }

    // 2. Control loop.
    let engine = CoordinateEngine::new(Arc::new(frame), Arc::new(fixes));
    let mut control = ControlLoopBuilder::new(config)
        .world(PositionReports::new(engine))
        .group(LocalGroup::new())
        .build()?;

    let token = control.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received");
            token.cancel();
        }
    });

    // 3. Run.
    let mut observer = ProgressLog { every: 100, behind: 0, tracks: 0 };
    let started = Instant::now();
    match args.ticks {
        Some(n) => {
            control.run_ticks(n, &mut observer).await?;
            if control.state() == LoopState::Running {
                control.shutdown_token().cancel();
                control.run(&mut observer).await?;
            }
        }
        None => control.run(&mut observer).await?,
    }

    info!(
        ticks = control.ticks(),
        tracks = observer.tracks,
        behind = observer.behind,
        dropped = control.dropped_track_reports(),
        elapsed = ?started.elapsed(),
        "newton finished"
    );
    Ok(())
}

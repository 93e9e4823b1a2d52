//! resource-manager: runs a workload file under the FIFO (opportunistic)
//! and banker's resource managers and prints one statistics table per run.
//!
//! ```text
//! resource-manager inputs/input-01.txt
//! resource-manager --verbose --manager fifo inputs/input-02.txt
//! resource-manager --csv-dir output/run1 --snapshot-interval 1 inputs/input-03.txt
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use rm_core::SimConfig;
use rm_output::{CsvWriter, ReportObserver, ReportWriter, TextWriter};
use rm_sim::{ManagerKind, NoopObserver, RunReport, run_simulation};
use rm_workload::{Workload, load_workload_path};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "resource-manager")]
#[command(about = "Simulate FIFO and banker's resource managers over a workload file", long_about = None)]
struct Cli {
    /// Workload file
    path: PathBuf,

    /// Trace every step, block, deadlock and abort
    #[arg(short, long)]
    verbose: bool,

    /// Which manager to run: fifo, banker, or both
    #[arg(short, long, default_value = "both")]
    manager: String,

    /// Also write task_stats.csv, cycle_summaries.csv and
    /// resource_snapshots.csv to this directory
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Give up on a run after this many cycles
    #[arg(long, default_value_t = SimConfig::DEFAULT_MAX_CYCLES)]
    max_cycles: u64,

    /// Record resource snapshots every N cycles (0 = never; needs --csv-dir)
    #[arg(long, default_value_t = 0)]
    snapshot_interval: u64,
}

impl Cli {
    fn managers(&self) -> Result<Vec<ManagerKind>> {
        if self.manager.eq_ignore_ascii_case("both") {
            return Ok(ManagerKind::ALL.to_vec());
        }
        Ok(vec![self.manager.parse::<ManagerKind>()?])
    }

    fn config(&self) -> SimConfig {
        SimConfig {
            max_cycles:               self.max_cycles,
            snapshot_interval_cycles: self.snapshot_interval,
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let workload = load_workload_path(&cli.path)
        .with_context(|| format!("cannot load workload {}", cli.path.display()))?;
    info!(
        tasks     = workload.task_count(),
        resources = workload.resource_count(),
        steps     = workload.program.len(),
        "workload loaded"
    );

    let managers = cli.managers()?;
    let config = cli.config();
    config.validate()?;

    let mut csv = match &cli.csv_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create {}", dir.display()))?;
            Some(CsvWriter::new(dir)?)
        }
        None => None,
    };

    let mut text = TextWriter::new(io::stdout().lock());
    for kind in managers {
        let report = run_one(kind, &workload, &config, csv.as_mut())?;
        text.write_report(&report)?;
    }
    text.finish()?;

    if let Some(writer) = csv.as_mut() {
        writer.finish()?;
    }
    Ok(())
}

fn run_one(
    kind:     ManagerKind,
    workload: &Workload,
    config:   &SimConfig,
    csv:      Option<&mut CsvWriter>,
) -> Result<RunReport> {
    let Some(writer) = csv else {
        return run_simulation(kind, workload, config, &mut NoopObserver)
            .with_context(|| format!("{kind} run failed"));
    };

    let mut obs = ReportObserver::new(writer, kind);
    let report = run_simulation(kind, workload, config, &mut obs)
        .with_context(|| format!("{kind} run failed"))?;
    if let Some(e) = obs.take_error() {
        return Err(e).context("cannot write CSV output");
    }
    Ok(report)
}

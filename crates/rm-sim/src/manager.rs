//! Manager selection and the one-call run entry point.

use std::fmt;
use std::str::FromStr;

use rm_core::SimConfig;
use rm_workload::Workload;

use crate::{Banker, EngineBuilder, Opportunistic, RunReport, SimError, SimObserver, SimResult};

/// The two resource managers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ManagerKind {
    /// First-come grants with deadlock recovery.
    Opportunistic,
    /// Banker's algorithm.
    Banker,
}

impl ManagerKind {
    /// Report order.
    pub const ALL: [ManagerKind; 2] = [ManagerKind::Opportunistic, ManagerKind::Banker];

    /// Report heading.
    pub fn label(self) -> &'static str {
        match self {
            ManagerKind::Opportunistic => "FIFO",
            ManagerKind::Banker        => "BANKER'S",
        }
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ManagerKind {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" | "opportunistic" => Ok(ManagerKind::Opportunistic),
            "banker" | "bankers" | "banker's" => Ok(ManagerKind::Banker),
            _ => Err(SimError::UnknownManager(s.to_owned())),
        }
    }
}

/// Build a fresh state for `kind` over `workload` and run it to completion.
pub fn run_simulation<O: SimObserver>(
    kind:     ManagerKind,
    workload: &Workload,
    config:   &SimConfig,
    observer: &mut O,
) -> SimResult<RunReport> {
    match kind {
        ManagerKind::Opportunistic => EngineBuilder::new(workload, Opportunistic)
            .config(config.clone())
            .build()?
            .run(observer),
        ManagerKind::Banker => EngineBuilder::new(workload, Banker::new(workload))
            .config(config.clone())
            .build()?
            .run(observer),
    }
}

//! Fluent builder for constructing an [`Engine`].

use rm_core::SimConfig;
use rm_workload::Workload;

use crate::{AdmissionPolicy, Engine, SimResult};

/// Fluent builder for [`Engine<P>`].
///
/// # Required inputs
///
/// - a validated [`Workload`]
/// - `P: AdmissionPolicy`, e.g. [`Opportunistic`][crate::Opportunistic]
///
/// # Optional inputs
///
/// | Method        | Default                |
/// |---------------|------------------------|
/// | `.config(c)`  | `SimConfig::default()` |
///
/// # Example
///
/// ```rust,ignore
/// let workload = load_workload_path(path)?;
/// let mut engine = EngineBuilder::new(&workload, Opportunistic)
///     .config(config)
///     .build()?;
/// let report = engine.run(&mut NoopObserver)?;
/// ```
pub struct EngineBuilder<'w, P: AdmissionPolicy> {
    workload: &'w Workload,
    policy:   P,
    config:   SimConfig,
}

impl<'w, P: AdmissionPolicy> EngineBuilder<'w, P> {
    pub fn new(workload: &'w Workload, policy: P) -> Self {
        Self { workload, policy, config: SimConfig::default() }
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and build a fresh run state.
    pub fn build(self) -> SimResult<Engine<'w, P>> {
        self.config.validate()?;
        Ok(Engine::from_parts(self.workload, self.policy, self.config))
    }
}

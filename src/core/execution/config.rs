//! Configuration for pulse simulation and analysis
//!
//! Names the entry point of a press, bounds a single press and the sink
//! analysis, and selects how batches of independent networks are executed.

use crate::core::types::ModuleId;
use serde::{Deserialize, Serialize};

/// Enumeration of supported concurrency modes for batch analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Networks are analysed one after another on the calling thread
    #[default]
    Sequential,
    /// Networks are analysed concurrently on a Rayon thread pool
    Rayon,
}

/// Which scalar an analysis produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// LOW count times HIGH count over `presses` triggers
    PulseProduct { presses: u64 },
    /// First press at which `sink` receives a LOW pulse
    FirstLowAtSink { sink: ModuleId },
}

/// Configuration for simulation execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Module receiving the button pulse
    pub entry_module: ModuleId,
    /// Source name stamped on the button pulse
    pub button_source: ModuleId,
    /// Presses used for the pulse product when none are given
    pub default_presses: u64,
    /// Upper bound on presses spent detecting feeder periods
    pub max_presses: u64,
    /// Pulses a single press may dispatch before it is abandoned
    pub max_pulses_per_press: usize,
    /// The concurrency mode to use for batches
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel execution
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl SimulationConfig {
    pub const DEFAULT_ENTRY: &'static str = "broadcaster";
    pub const DEFAULT_BUTTON: &'static str = "button";
    pub const DEFAULT_PRESSES: u64 = 1000;
    pub const DEFAULT_MAX_PRESSES: u64 = 100_000;
    pub const DEFAULT_MAX_PULSES_PER_PRESS: usize = 1_000_000;

    /// Create a new simulation configuration with default values
    pub fn new() -> Self {
        Self {
            entry_module: Self::DEFAULT_ENTRY.to_string(),
            button_source: Self::DEFAULT_BUTTON.to_string(),
            default_presses: Self::DEFAULT_PRESSES,
            max_presses: Self::DEFAULT_MAX_PRESSES,
            max_pulses_per_press: Self::DEFAULT_MAX_PULSES_PER_PRESS,
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
        }
    }

    pub fn with_entry_module(mut self, name: impl Into<ModuleId>) -> Self {
        self.entry_module = name.into();
        self
    }

    pub fn with_button_source(mut self, name: impl Into<ModuleId>) -> Self {
        self.button_source = name.into();
        self
    }

    pub fn with_default_presses(mut self, presses: u64) -> Self {
        self.default_presses = presses;
        self
    }

    /// Set the press budget for the sink analysis
    pub fn with_max_presses(mut self, presses: u64) -> Self {
        self.max_presses = presses;
        self
    }

    /// Set how many pulses one press may dispatch
    pub fn with_max_pulses_per_press(mut self, pulses: usize) -> Self {
        self.max_pulses_per_press = pulses;
        self
    }

    /// Set the concurrency mode for batch analysis
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

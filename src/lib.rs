pub mod core;

// Re-export commonly used types
pub use crate::core::builder::{parse_declarations, Destination, ModuleDeclaration, Network};
pub use crate::core::components::{Module, ModuleKind};
pub use crate::core::errors::{Result, SimError};
pub use crate::core::event::Pulse;
pub use crate::core::execution::{
    analyze, run_batch, AnalysisMode, Analyzer, ConcurrencyMode, PulseObserver, PulseTally,
    SimulationConfig, Simulator, Trigger,
};
pub use crate::core::types::{Level, ModuleId};

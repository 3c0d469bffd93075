pub mod analyzer;
pub mod batch;
pub mod config;
pub mod simulation_engine;

// Re-export commonly used types
pub use analyzer::{Analyzer, PulseTally};
pub use batch::{analyze, run_batch};
pub use config::{AnalysisMode, ConcurrencyMode, SimulationConfig};
pub use simulation_engine::{PulseObserver, Simulator, Trigger};

use thiserror::Error;

/// Errors surfaced by parsing, network construction and analysis
#[derive(Error, Debug)]
pub enum SimError {
    #[error("line {line}: malformed module declaration '{text}'")]
    MalformedDeclaration { line: usize, text: String },

    #[error("line {line}: unknown module kind prefix '{prefix}'")]
    UnknownModuleKind { line: usize, prefix: char },

    #[error("duplicate module name: {0}")]
    DuplicateModuleName(String),

    #[error("broadcast modules {0:?} declared, only one is allowed")]
    MultipleBroadcast(Vec<String>),

    #[error("modules {0:?} form a cycle without a flip-flop")]
    UngatedCycle(Vec<String>),

    #[error("press {press} exceeded the budget of {budget} pulses")]
    PulseBudgetExceeded { press: u64, budget: usize },

    #[error("pulse product overflows u64 ({low} low, {high} high)")]
    PulseCountOverflow { low: u64, high: u64 },

    #[error("cannot compute first low pulse at '{sink}': {reason}")]
    UnresolvableCycleAssumption { sink: String, reason: String },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    pub(crate) fn unresolvable(sink: &str, reason: impl Into<String>) -> Self {
        SimError::UnresolvableCycleAssumption {
            sink: sink.to_string(),
            reason: reason.into(),
        }
    }
}

use super::analyzer::Analyzer;
use super::config::{AnalysisMode, ConcurrencyMode, SimulationConfig};
use super::simulation_engine::Simulator;
use crate::core::builder::Network;
use crate::core::errors::Result;
use log::debug;
use rayon::prelude::*;

/// Analyse one network with its own simulator
pub fn analyze(network: Network, mode: &AnalysisMode, config: &SimulationConfig) -> Result<u64> {
    let mut simulator = Simulator::new(network, config.clone());
    Analyzer::new(&mut simulator).run(mode)
}

/// Analyse independent networks, each owned by exactly one worker.
///
/// Results are returned in input order. The outer error only reports a
/// failure to set up the thread pool.
pub fn run_batch(
    networks: Vec<Network>,
    mode: &AnalysisMode,
    config: &SimulationConfig,
) -> Result<Vec<Result<u64>>> {
    debug!(
        "Analysing {} networks in {:?} mode",
        networks.len(),
        config.concurrency_mode
    );

    match config.concurrency_mode {
        ConcurrencyMode::Sequential => Ok(networks
            .into_iter()
            .map(|network| analyze(network, mode, config))
            .collect()),
        ConcurrencyMode::Rayon => {
            let mut builder = rayon::ThreadPoolBuilder::new();
            if let Some(size) = config.thread_pool_size {
                builder = builder.num_threads(size);
            }
            let pool = builder.build()?;
            Ok(pool.install(|| {
                networks
                    .into_par_iter()
                    .map(|network| analyze(network, mode, config))
                    .collect()
            }))
        }
    }
}

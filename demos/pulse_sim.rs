use log::info;
use pulsim::{Analyzer, Network, SimulationConfig, Simulator};

/// Usage: pulse_sim <declarations-file> [sink]
fn main() -> Result<(), String> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| "usage: pulse_sim <declarations-file> [sink]".to_string())?;
    let sink = args.next().unwrap_or_else(|| "rx".to_string());

    let input = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
    let network = Network::parse(&input).map_err(|e| e.to_string())?;
    info!("Loaded {} modules from {}", network.len(), path);

    let config = SimulationConfig::default();
    let mut sim = Simulator::new(network, config);

    let product = Analyzer::new(&mut sim)
        .default_pulse_product()
        .map_err(|e| e.to_string())?;
    println!(
        "Pulse product after {} presses: {}",
        sim.config().default_presses,
        product
    );

    sim.reset();
    match Analyzer::new(&mut sim).presses_until_sink_low(&sink) {
        Ok(presses) => println!("First low pulse at '{}' after {} presses", sink, presses),
        Err(e) => println!("First low pulse at '{}' unavailable: {}", sink, e),
    }

    Ok(())
}

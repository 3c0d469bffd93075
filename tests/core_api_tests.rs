use pulsim::{
    analyze, parse_declarations, run_batch, AnalysisMode, Analyzer, ConcurrencyMode, Level,
    ModuleDeclaration, ModuleKind, Network, PulseTally, SimError, SimulationConfig, Simulator,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FIRST_EXAMPLE: &str = "
broadcaster -> a, b, c
%a -> b
%b -> c
%c -> inv
&inv -> a
";

const SECOND_EXAMPLE: &str = "
broadcaster -> a
%a -> inv, con
&inv -> b
%b -> con
&con -> output
";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fresh(input: &str) -> Simulator {
    Simulator::new(Network::parse(input).unwrap(), SimulationConfig::default())
}

fn press_tallies(sim: &mut Simulator, presses: u64) -> Vec<PulseTally> {
    (0..presses)
        .map(|_| {
            let mut tally = PulseTally::default();
            sim.trigger().for_each(|p| tally.record(p.level));
            tally
        })
        .collect()
}

fn reversed_outputs(input: &str) -> Vec<ModuleDeclaration> {
    parse_declarations(input)
        .unwrap()
        .into_iter()
        .map(|mut decl| {
            decl.outputs.reverse();
            decl
        })
        .collect()
}

#[test]
fn test_first_example_pulse_product() {
    init_logging();
    let mut sim = fresh(FIRST_EXAMPLE);
    let tally = Analyzer::new(&mut sim).tally_presses(1000).unwrap();
    assert_eq!(tally, PulseTally { low: 8000, high: 4000 });
    assert_eq!(tally.product().unwrap(), 32_000_000);
}

#[test]
fn test_second_example_pulse_product() {
    init_logging();
    let mut sim = fresh(SECOND_EXAMPLE);
    let tally = Analyzer::new(&mut sim).tally_presses(1000).unwrap();
    assert_eq!(tally, PulseTally { low: 4250, high: 2750 });
    assert_eq!(tally.product().unwrap(), 11_687_500);
}

#[test]
fn test_output_order_does_not_change_tallies() {
    for input in [FIRST_EXAMPLE, SECOND_EXAMPLE] {
        let mut original = fresh(input);
        let mut reversed = Simulator::new(
            Network::build(reversed_outputs(input)).unwrap(),
            SimulationConfig::default(),
        );
        assert_eq!(
            press_tallies(&mut original, 1000),
            press_tallies(&mut reversed, 1000)
        );
    }
}

#[test]
fn test_output_order_changes_interleaving() {
    let mut original = fresh(FIRST_EXAMPLE);
    let mut reversed = Simulator::new(
        Network::build(reversed_outputs(FIRST_EXAMPLE)).unwrap(),
        SimulationConfig::default(),
    );
    let a: Vec<String> = original.trigger().map(|p| p.to_string()).collect();
    let b: Vec<String> = reversed.trigger().map(|p| p.to_string()).collect();
    assert_ne!(a, b);
    assert_eq!(a[1], "broadcaster -low-> a");
    assert_eq!(b[1], "broadcaster -low-> c");
}

/// Random acyclic networks: every module only feeds modules declared after it
fn random_network(rng: &mut StdRng, size: usize) -> Vec<ModuleDeclaration> {
    let names: Vec<String> = (0..size).map(|i| format!("m{i}")).collect();
    let mut decls = vec![ModuleDeclaration {
        kind: ModuleKind::Broadcast,
        name: "broadcaster".to_string(),
        outputs: names.iter().filter(|_| rng.gen_bool(0.3)).cloned().collect(),
    }];

    for (i, name) in names.iter().enumerate() {
        let kind = if rng.gen_bool(0.5) {
            ModuleKind::FlipFlop
        } else {
            ModuleKind::Conjunction
        };
        let mut outputs: Vec<String> = names[i + 1..]
            .iter()
            .filter(|_| rng.gen_bool(0.25))
            .cloned()
            .collect();
        if rng.gen_bool(0.2) {
            outputs.push("out".to_string());
        }
        decls.push(ModuleDeclaration {
            kind,
            name: name.clone(),
            outputs,
        });
    }
    decls
}

#[test]
fn test_random_networks_drain_every_press() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(20);

    for _ in 0..50 {
        let size = rng.gen_range(2..16);
        let network = Network::build(random_network(&mut rng, size)).unwrap();
        let mut sim = Simulator::new(network, SimulationConfig::default());

        for _ in 0..10 {
            let mut trigger = sim.trigger();
            let yielded = trigger.by_ref().count();
            assert!(yielded >= 1);
            assert_eq!(yielded, trigger.dispatched());
        }
    }
}

#[test]
fn test_independent_networks_stay_independent() {
    let mut first = fresh(SECOND_EXAMPLE);
    let mut second = Simulator::new(first.network().clone(), SimulationConfig::default());

    first.trigger().for_each(drop);
    assert_eq!(first.network().get("a").unwrap().is_on(), Some(true));
    assert_eq!(second.network().get("a").unwrap().is_on(), Some(false));

    let pulses: Vec<_> = second.trigger().collect();
    assert_eq!(pulses[0].level, Level::Low);
    assert_eq!(second.presses(), 1);
}

#[test]
fn test_batch_modes_agree() {
    init_logging();
    let networks = || {
        vec![
            Network::parse(FIRST_EXAMPLE).unwrap(),
            Network::parse(SECOND_EXAMPLE).unwrap(),
            Network::parse(FIRST_EXAMPLE).unwrap(),
        ]
    };
    let mode = AnalysisMode::PulseProduct { presses: 1000 };

    let sequential = run_batch(networks(), &mode, &SimulationConfig::default()).unwrap();
    let parallel_config = SimulationConfig::default()
        .with_concurrency(ConcurrencyMode::Rayon)
        .with_thread_pool_size(2);
    let parallel = run_batch(networks(), &mode, &parallel_config).unwrap();

    let sequential: Vec<u64> = sequential.into_iter().map(Result::unwrap).collect();
    let parallel: Vec<u64> = parallel.into_iter().map(Result::unwrap).collect();
    assert_eq!(sequential, vec![32_000_000, 11_687_500, 32_000_000]);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_batch_reports_per_network_errors() {
    let networks = vec![
        Network::parse(SECOND_EXAMPLE).unwrap(),
        Network::parse("broadcaster -> inv\n&inv -> hub\n&hub -> rx\n").unwrap(),
    ];
    let mode = AnalysisMode::FirstLowAtSink {
        sink: "rx".to_string(),
    };
    let results = run_batch(networks, &mode, &SimulationConfig::default()).unwrap();

    assert!(matches!(
        results[0],
        Err(SimError::UnresolvableCycleAssumption { .. })
    ));
    assert_eq!(results[1].as_ref().unwrap(), &1);
}

#[test]
fn test_analyze_single_network() {
    let network = Network::parse(SECOND_EXAMPLE).unwrap();
    let product = analyze(
        network,
        &AnalysisMode::PulseProduct { presses: 1000 },
        &SimulationConfig::default(),
    )
    .unwrap();
    assert_eq!(product, 11_687_500);
}

#[test]
fn test_parse_errors_surface_before_simulation() {
    assert!(matches!(
        Network::parse("broadcaster -> a\n%a b\n"),
        Err(SimError::MalformedDeclaration { line: 2, .. })
    ));
    assert!(matches!(
        Network::parse("broadcaster -> a\n!a -> b\n"),
        Err(SimError::UnknownModuleKind { line: 2, prefix: '!' })
    ));
    assert!(matches!(
        Network::parse("broadcaster -> a\n%a -> b\n&a -> c\n"),
        Err(SimError::DuplicateModuleName(_))
    ));
    assert!(matches!(
        Network::parse("broadcaster -> a\nfoo -> b\n"),
        Err(SimError::MultipleBroadcast(_))
    ));
}

#[test]
fn test_runaway_network_reports_budget_through_analysis() {
    init_logging();
    let input = "broadcaster -> a\n%a -> n1, n2\n&n1 -> a\n&n2 -> a\n";
    let config = SimulationConfig::default().with_max_pulses_per_press(10_000);
    let mut sim = Simulator::new(Network::parse(input).unwrap(), config.clone());

    assert!(matches!(
        Analyzer::new(&mut sim).tally_presses(3),
        Err(SimError::PulseBudgetExceeded { press: 1, budget: 10_000 })
    ));

    let results = run_batch(
        vec![Network::parse(input).unwrap()],
        &AnalysisMode::PulseProduct { presses: 1 },
        &config,
    )
    .unwrap();
    assert!(matches!(
        results[0],
        Err(SimError::PulseBudgetExceeded { .. })
    ));
}

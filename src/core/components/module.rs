use crate::core::event::Pulse;
use crate::core::types::{Level, ModuleId};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The three behavioural variants a module can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Broadcast,
    FlipFlop,
    Conjunction,
}

impl ModuleKind {
    /// Declaration prefix for this kind (`None` for broadcast)
    pub fn prefix(self) -> Option<char> {
        match self {
            ModuleKind::Broadcast => None,
            ModuleKind::FlipFlop => Some('%'),
            ModuleKind::Conjunction => Some('&'),
        }
    }
}

/// Variant-specific state of a module
#[derive(Debug, Clone, PartialEq, Eq)]
enum ModuleState {
    Broadcast,
    FlipFlop { on: bool },
    /// Last level received from every wired input
    Conjunction { inputs: HashMap<ModuleId, Level> },
}

impl ModuleState {
    fn initial(kind: ModuleKind) -> Self {
        match kind {
            ModuleKind::Broadcast => ModuleState::Broadcast,
            ModuleKind::FlipFlop => ModuleState::FlipFlop { on: false },
            ModuleKind::Conjunction => ModuleState::Conjunction {
                inputs: HashMap::new(),
            },
        }
    }
}

/// A named node of the network together with its outputs and state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: ModuleId,
    outputs: Vec<ModuleId>,
    state: ModuleState,
}

impl Module {
    /// Create a module in its initial state
    pub fn new(kind: ModuleKind, name: impl Into<ModuleId>, outputs: Vec<ModuleId>) -> Self {
        Self {
            name: name.into(),
            outputs,
            state: ModuleState::initial(kind),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn outputs(&self) -> &[ModuleId] {
        &self.outputs
    }

    pub fn kind(&self) -> ModuleKind {
        match self.state {
            ModuleState::Broadcast => ModuleKind::Broadcast,
            ModuleState::FlipFlop { .. } => ModuleKind::FlipFlop,
            ModuleState::Conjunction { .. } => ModuleKind::Conjunction,
        }
    }

    /// Flip-flop state, `None` for other kinds
    pub fn is_on(&self) -> Option<bool> {
        match self.state {
            ModuleState::FlipFlop { on } => Some(on),
            _ => None,
        }
    }

    /// Remembered input levels of a conjunction, `None` for other kinds
    pub fn input_levels(&self) -> Option<&HashMap<ModuleId, Level>> {
        match &self.state {
            ModuleState::Conjunction { inputs } => Some(inputs),
            _ => None,
        }
    }

    /// Register `source` as a conjunction input at LOW.
    ///
    /// Only used while wiring the network; does nothing for other kinds.
    pub(crate) fn register_input(&mut self, source: &str) {
        if let ModuleState::Conjunction { inputs } = &mut self.state {
            inputs.insert(source.to_string(), Level::Low);
        }
    }

    /// Apply the module's transition rule to an incoming pulse.
    ///
    /// Returns the level sent to every output, or `None` when the pulse is
    /// absorbed without any emission.
    pub fn receive(&mut self, level: Level, from: &str) -> Option<Level> {
        match &mut self.state {
            ModuleState::Broadcast => Some(level),
            ModuleState::FlipFlop { on } => match level {
                Level::High => None,
                Level::Low => {
                    *on = !*on;
                    Some(Level::from(*on))
                }
            },
            ModuleState::Conjunction { inputs } => {
                match inputs.get_mut(from) {
                    Some(remembered) => *remembered = level,
                    None => warn!(
                        "conjunction '{}' ignoring pulse from unwired input '{}'",
                        self.name, from
                    ),
                }
                // NAND over the remembered inputs
                let all_high = inputs.values().all(|l| l.is_high());
                Some(Level::from(!all_high))
            }
        }
    }

    /// Pulses produced by emitting `level`, in output order
    pub fn fan_out(&self, level: Level) -> impl Iterator<Item = Pulse> + '_ {
        self.outputs
            .iter()
            .map(move |output| Pulse::new(level, self.name.clone(), output.clone()))
    }

    /// Return to the freshly-wired state, keeping conjunction input keys
    pub fn reset(&mut self) {
        match &mut self.state {
            ModuleState::Broadcast => {}
            ModuleState::FlipFlop { on } => *on = false,
            ModuleState::Conjunction { inputs } => {
                inputs.values_mut().for_each(|l| *l = Level::Low);
            }
        }
    }
}

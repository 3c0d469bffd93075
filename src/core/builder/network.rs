use super::cycle_check::find_ungated_cycle;
use super::parser::{parse_declarations, ModuleDeclaration};
use crate::core::components::{Module, ModuleKind};
use crate::core::errors::{Result, SimError};
use crate::core::types::ModuleId;
use log::debug;
use std::collections::{BTreeSet, HashMap};

/// Where a pulse ends up once its destination name is resolved
#[derive(Debug)]
pub enum Destination<'a> {
    Module(&'a mut Module),
    /// No module carries the name; the pulse is observed and dropped
    Sink,
}

/// Immutable-after-construction wiring of named modules.
///
/// The network owns every module; module state is mutated in place by the
/// simulator, the structure never changes after [`Network::build`].
#[derive(Debug, Clone)]
pub struct Network {
    modules: HashMap<ModuleId, Module>,
}

impl Network {
    /// Build a network from declarations and wire every conjunction input.
    ///
    /// Fails on a repeated module name, on more than one broadcast module, and
    /// on a cycle of broadcast and conjunction modules only. Cycles through a
    /// flip-flop are accepted even though some of them never drain; those are
    /// caught at run time by the per-press pulse budget.
    pub fn build(declarations: impl IntoIterator<Item = ModuleDeclaration>) -> Result<Self> {
        let mut modules = HashMap::new();
        for decl in declarations {
            if modules.contains_key(&decl.name) {
                return Err(SimError::DuplicateModuleName(decl.name));
            }
            let module = Module::new(decl.kind, decl.name.clone(), decl.outputs);
            modules.insert(decl.name, module);
        }

        let mut broadcasts: Vec<ModuleId> = modules
            .values()
            .filter(|m| m.kind() == ModuleKind::Broadcast)
            .map(|m| m.name().to_string())
            .collect();
        if broadcasts.len() > 1 {
            broadcasts.sort_unstable();
            return Err(SimError::MultipleBroadcast(broadcasts));
        }

        if let Some(cycle) = find_ungated_cycle(&modules) {
            return Err(SimError::UngatedCycle(cycle));
        }

        let mut network = Self { modules };
        network.init_conjunction_inputs();
        debug!(
            "Built network with {} modules and {} sinks",
            network.len(),
            network.sinks().len()
        );
        Ok(network)
    }

    /// Parse the text declaration format and build the network
    pub fn parse(input: &str) -> Result<Self> {
        Self::build(parse_declarations(input)?)
    }

    /// Register every module as a LOW input of each conjunction it feeds.
    ///
    /// Runs once, from `build`, before any pulse can be dispatched.
    fn init_conjunction_inputs(&mut self) {
        let edges: Vec<(ModuleId, ModuleId)> = self
            .modules
            .values()
            .flat_map(|module| {
                module
                    .outputs()
                    .iter()
                    .map(move |output| (module.name().to_string(), output.clone()))
            })
            .collect();

        for (source, target) in edges {
            if let Some(module) = self.modules.get_mut(&target) {
                module.register_input(&source);
            }
        }
    }

    /// Resolve a destination name for dispatch
    pub fn resolve(&mut self, name: &str) -> Destination<'_> {
        match self.modules.get_mut(name) {
            Some(module) => Destination::Module(module),
            None => Destination::Sink,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module names in sorted order
    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Output names that do not resolve to any module
    pub fn sinks(&self) -> Vec<&str> {
        self.modules
            .values()
            .flat_map(|module| module.outputs().iter())
            .filter(|output| !self.modules.contains_key(output.as_str()))
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Names of modules listing `name` among their outputs, sorted
    pub fn feeders_of(&self, name: &str) -> Vec<&str> {
        let mut feeders: Vec<&str> = self
            .modules
            .values()
            .filter(|module| module.outputs().iter().any(|o| o == name))
            .map(Module::name)
            .collect();
        feeders.sort_unstable();
        feeders
    }

    /// Put every module back into its freshly-wired state
    pub fn reset(&mut self) {
        self.modules.values_mut().for_each(Module::reset);
    }
}

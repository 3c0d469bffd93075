use crate::core::components::{Module, ModuleKind};
use crate::core::types::ModuleId;
use std::collections::{HashMap, HashSet};

/// Find modules that lie on a cycle containing no flip-flop.
///
/// Broadcast and conjunction modules emit on every pulse they receive, so a
/// pulse entering such a cycle circulates forever. Flip-flops absorb HIGH
/// pulses and are left out of the graph. Uses Kahn's algorithm from both
/// ends to drop everything upstream or downstream of all cycles, then keeps
/// only the survivors that can reach themselves, since a module bridging two
/// cycles also survives peeling. Returns the sorted cycle members, or `None`
/// when there are none.
pub fn find_ungated_cycle(modules: &HashMap<ModuleId, Module>) -> Option<Vec<ModuleId>> {
    let gated = |name: &str| {
        modules
            .get(name)
            .map_or(true, |m| m.kind() == ModuleKind::FlipFlop)
    };

    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut predecessors: HashMap<&str, Vec<&str>> = HashMap::new();
    for module in modules.values().filter(|m| !gated(m.name())) {
        successors.entry(module.name()).or_default();
        predecessors.entry(module.name()).or_default();
    }
    for module in modules.values().filter(|m| !gated(m.name())) {
        for output in module.outputs().iter().filter(|o| !gated(o.as_str())) {
            successors.entry(module.name()).or_default().push(output.as_str());
            predecessors.entry(output.as_str()).or_default().push(module.name());
        }
    }

    let forward = peel(&successors, &predecessors);
    let backward = peel(&predecessors, &successors);

    let survivors: HashSet<&str> = successors
        .keys()
        .copied()
        .filter(|name| !forward.contains(name) && !backward.contains(name))
        .collect();
    let mut remaining: Vec<ModuleId> = survivors
        .iter()
        .filter(|name| reaches_itself(name, &successors, &survivors))
        .map(|name| name.to_string())
        .collect();
    if remaining.is_empty() {
        return None;
    }
    remaining.sort_unstable();
    Some(remaining)
}

/// Depth-first walk from `start` within `within`, true when it comes back
fn reaches_itself(
    start: &str,
    successors: &HashMap<&str, Vec<&str>>,
    within: &HashSet<&str>,
) -> bool {
    let mut seen = HashSet::new();
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        for next in successors.get(node).into_iter().flatten() {
            if *next == start {
                return true;
            }
            if within.contains(next) && seen.insert(*next) {
                stack.push(*next);
            }
        }
    }
    false
}

/// Kahn's algorithm: every node reachable by repeatedly removing nodes with no
/// incoming edges
fn peel<'a>(
    edges: &HashMap<&'a str, Vec<&'a str>>,
    reverse: &HashMap<&'a str, Vec<&'a str>>,
) -> HashSet<&'a str> {
    let mut in_degree: HashMap<&str, usize> =
        reverse.iter().map(|(node, from)| (*node, from.len())).collect();
    let mut ready: Vec<&str> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(node, _)| *node)
        .collect();
    let mut removed = HashSet::new();

    while let Some(node) = ready.pop() {
        removed.insert(node);
        for next in edges.get(node).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(*next);
                }
            }
        }
    }

    removed
}

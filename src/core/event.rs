use super::types::{Level, ModuleId};

/// A single signal travelling from one module to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pulse {
    pub level: Level,
    pub source: ModuleId,
    pub destination: ModuleId,
}

impl Pulse {
    pub fn new(level: Level, source: impl Into<ModuleId>, destination: impl Into<ModuleId>) -> Self {
        Self {
            level,
            source: source.into(),
            destination: destination.into(),
        }
    }
}

impl std::fmt::Display for Pulse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -{}-> {}", self.source, self.level, self.destination)
    }
}

use crate::core::components::ModuleKind;
use crate::core::errors::{Result, SimError};
use crate::core::types::ModuleId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One parsed `<prefix><name> -> <outputs>` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub kind: ModuleKind,
    pub name: ModuleId,
    pub outputs: Vec<ModuleId>,
}

impl ModuleDeclaration {
    pub fn new(kind: ModuleKind, name: impl Into<ModuleId>, outputs: &[&str]) -> Self {
        Self {
            kind,
            name: name.into(),
            outputs: outputs.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for ModuleDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(prefix) = self.kind.prefix() {
            write!(f, "{}", prefix)?;
        }
        write!(f, "{} -> {}", self.name, self.outputs.join(", "))
    }
}

impl FromStr for ModuleDeclaration {
    type Err = SimError;

    fn from_str(line: &str) -> Result<Self> {
        parse_line(line, 1)
    }
}

/// Parse every declaration in `input`, skipping blank and `#` comment lines
pub fn parse_declarations(input: &str) -> Result<Vec<ModuleDeclaration>> {
    input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| parse_line(line, line_no))
        .collect()
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn parse_line(line: &str, line_no: usize) -> Result<ModuleDeclaration> {
    let malformed = || SimError::MalformedDeclaration {
        line: line_no,
        text: line.to_string(),
    };

    let line = line.trim();
    let (head, tail) = line.split_once("->").ok_or_else(malformed)?;
    let head = head.trim();

    let mut chars = head.chars();
    let (kind, name) = match chars.next() {
        Some('%') => (ModuleKind::FlipFlop, chars.as_str()),
        Some('&') => (ModuleKind::Conjunction, chars.as_str()),
        Some(c) if is_name_char(c) => (ModuleKind::Broadcast, head),
        Some(c) => {
            return Err(SimError::UnknownModuleKind {
                line: line_no,
                prefix: c,
            })
        }
        None => return Err(malformed()),
    };

    if name.is_empty() || !name.chars().all(is_name_char) {
        return Err(malformed());
    }

    let tail = tail.trim();
    let outputs = if tail.is_empty() {
        Vec::new()
    } else {
        tail.split(',')
            .map(|output| {
                let output = output.trim();
                if output.is_empty() || !output.chars().all(is_name_char) {
                    Err(malformed())
                } else {
                    Ok(output.to_string())
                }
            })
            .collect::<Result<Vec<_>>>()?
    };

    Ok(ModuleDeclaration {
        kind,
        name: name.to_string(),
        outputs,
    })
}

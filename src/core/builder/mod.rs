pub mod cycle_check;
pub mod network;
pub mod parser;

pub use network::{Destination, Network};
pub use parser::{parse_declarations, ModuleDeclaration};

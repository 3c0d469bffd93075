pub mod module;

pub use module::{Module, ModuleKind};

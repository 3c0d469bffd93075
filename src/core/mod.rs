pub mod builder;
pub mod components;
pub mod errors;
pub mod event;
pub mod event_scheduler;
pub mod execution;
pub mod types;

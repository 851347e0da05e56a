//! Domain traits - Abstractions for infrastructure implementations

pub mod hooks;

pub use hooks::{EventHooks, LogHooks};

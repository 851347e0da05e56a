//! Application services - Business logic orchestration

pub mod registrar;

pub use registrar::Registrar;

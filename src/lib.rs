//! salut-bot - A minimal Discord greeting bot
//!
//! Layers:
//! - Domain: core business objects and abstractions
//! - Application: command registration, dispatch, and errors
//! - Infrastructure: configuration and the Discord gateway adapter

pub mod application;
pub mod domain;
pub mod infrastructure;

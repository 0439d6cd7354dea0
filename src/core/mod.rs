//! Core logic: argument parsing, settings, and the secret store adapters.

pub mod client;
pub mod memory;
pub mod pairs;
pub mod settings;

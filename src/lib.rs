//! Seed a Vault KV v2 secret from the command line.
//!
//! Parses `key=value` arguments, authenticates with a token, writes the
//! pairs to one secret path and reads every key back to confirm the write.
//!
//! ## Modules
//! - `cli` — Argument definitions and the seeding sequence
//! - `core` — Pair parsing, settings, Vault and in-memory stores
//! - `models` — Data structures
//! - `util` — Logging and journald forwarding

pub mod cli;
pub mod constants;
pub mod core;
pub mod error;
pub mod models;
pub mod util;

//! Data structures.

pub mod kv;
pub mod token;
pub mod vault_config;

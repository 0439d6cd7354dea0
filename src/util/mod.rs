//! Utility modules for logging and journald forwarding.

pub mod journald;
pub mod logging;

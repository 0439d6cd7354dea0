//! Authenticate, write the pairs, then read every key back.

use crate::core::client::SecretStore;
use crate::models::kv::KeyValueSet;
use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use tracing::{debug, info, warn};

/// Outcome of one seeding run. Holds keys only, never values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub path: String,
    pub written: Vec<String>,
    pub verified: Vec<String>,
    pub failed: Vec<String>,
}

impl SeedReport {
    pub fn is_fully_verified(&self) -> bool {
        self.failed.is_empty()
    }

    /// One-line JSON summary for journald.
    pub fn summary_line(&self) -> String {
        json!({
            "action": "seed",
            "path": self.path,
            "keys": self.written,
            "verified": self.verified.len(),
            "failed": self.failed,
        })
        .to_string()
    }
}

/// Run the seeding flow against an already connected store.
///
/// Authentication and write failures abort the run. Each read-back failure
/// is logged and the loop moves on to the next key.
pub fn run<S, W>(
    store: &mut S,
    token: &str,
    path: &str,
    data: &KeyValueSet,
    out: &mut W,
) -> Result<SeedReport>
where
    S: SecretStore,
    W: Write,
{
    let token_info = store.authenticate(token)?;
    debug!(
        display_name = token_info.display_name(),
        policies = ?token_info.policies,
        "authenticated"
    );
    writeln!(out, "Successfully authenticated to Vault.")?;

    store.write_secret(path, data)?;
    writeln!(out, "Data written to {} successfully!", path)?;

    let mut report = SeedReport {
        path: path.to_string(),
        written: data.keys().map(str::to_string).collect(),
        ..SeedReport::default()
    };

    for key in data.keys() {
        match store.read_secret(path, key) {
            Ok(value) => {
                writeln!(out, "k: {}  val: {}", key, value)?;
                report.verified.push(key.to_string());
            }
            Err(e) if e.is_read_failure() => {
                warn!("{}", e);
                report.failed.push(key.to_string());
            }
            Err(e) => return Err(e.into()),
        }
    }

    if report.is_fully_verified() {
        info!(path, verified = report.verified.len(), "read-back complete");
    } else {
        warn!(
            path,
            verified = report.verified.len(),
            failed = ?report.failed,
            "read-back incomplete"
        );
    }
    Ok(report)
}

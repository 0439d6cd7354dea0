//! CLI arguments and top-level run sequence.

use crate::cli::seed::SeedReport;
use crate::constants;
use crate::core::client::{SecretStore, Session};
use crate::core::pairs;
use crate::core::settings::{Overrides, Settings};
use crate::util::journald;
use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

pub mod seed;

#[derive(Parser, Debug)]
#[command(
    name = "stormsync-vault",
    version,
    about = "Write key/value pairs to a Vault KV v2 path and read them back"
)]
pub struct Cli {
    /// Vault server address
    #[arg(long, env = "VAULT_ADDR", value_name = "URL")]
    pub address: Option<String>,

    /// Vault token used for every request
    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Vault Enterprise namespace
    #[arg(long, env = "VAULT_NAMESPACE")]
    pub namespace: Option<String>,

    /// KV v2 secret path (e.g. secret/data/app/env)
    #[arg(long = "path", env = "STORMSYNC_VAULT_PATH", value_name = "PATH")]
    pub secret_path: Option<String>,

    /// HTTP timeout for Vault requests
    #[arg(
        long,
        env = "VAULT_HTTP_TIMEOUT_SECS",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..=constants::MAX_HTTP_TIMEOUT_SECS)
    )]
    pub timeout_secs: Option<u64>,

    /// TOML settings file
    #[arg(long, env = "STORMSYNC_VAULT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Forward a run summary (keys only) to journald
    #[arg(long, env = "STORMSYNC_VAULT_JOURNALD")]
    pub journald: bool,

    /// Pairs to write
    #[arg(value_name = "KEY=VALUE")]
    pub pairs: Vec<String>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with(
            |settings| {
                Ok(Session::connect(
                    &settings.address,
                    settings.namespace.as_deref(),
                    settings.timeout,
                )?)
            },
            &mut out,
        )?;
        Ok(())
    }

    /// Run the whole sequence with `connect` producing the store.
    ///
    /// Pairs are parsed before settings are loaded or `connect` is called.
    pub fn run_with<S, F, W>(self, connect: F, out: &mut W) -> Result<SeedReport>
    where
        S: SecretStore,
        F: FnOnce(&Settings) -> Result<S>,
        W: Write,
    {
        let data = pairs::parse_pairs(&program_name(), &self.pairs)?;

        let settings = Settings::resolve(self.overrides(), self.config.as_deref())?;
        debug!(?settings, "resolved settings");
        info!(
            address = %settings.address,
            path = %settings.secret_path,
            keys = data.len(),
            "seeding secret"
        );

        let mut store = connect(&settings)?;
        let report = seed::run(
            &mut store,
            &settings.token,
            &settings.secret_path,
            &data,
            out,
        )?;

        if settings.journald
            && !journald::forward_line(constants::JOURNALD_TAG, &report.summary_line())
        {
            debug!("run summary not forwarded to journald");
        }
        Ok(report)
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            address: self.address.clone(),
            token: self.token.clone(),
            namespace: self.namespace.clone(),
            secret_path: self.secret_path.clone(),
            timeout_secs: self.timeout_secs,
            journald: self.journald,
        }
    }
}

/// Invocation name for the usage message.
fn program_name() -> String {
    std::env::args_os()
        .next()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stormsync-vault".to_string())
}

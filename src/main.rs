use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    stormsync_vault::util::logging::init();
    let cli = stormsync_vault::cli::Cli::parse();
    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

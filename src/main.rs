//! Binary entry point for the kedge CLI.

use std::io::{self, Write};
use std::process;

use camino::Utf8Path;
use clap::Parser;
use thiserror::Error;

use kedge::context::{EXIT_FAILED, Operation, OperationContext, OperationReport, run_operation};
use kedge::telemetry;
use kedge::{
    ConfigError, ContextError, LoggingConfig, ScalewayConfig, ScalewayProvider, VolumeLifecycle,
};

mod cli;

use cli::{Cli, ContextArgs};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("context error: {0}")]
    Context(#[from] ContextError),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            EXIT_FAILED
        }
    };

    process::exit(exit_code);
}

fn split(cli: Cli) -> (Operation, ContextArgs) {
    match cli {
        Cli::Validate(args) => (Operation::Validate, args),
        Cli::Create(args) => (Operation::Create, args),
        Cli::Delete(args) => (Operation::Delete, args),
        Cli::Attach(args) => (Operation::Attach, args),
        Cli::Detach(args) => (Operation::Detach, args),
    }
}

async fn dispatch(cli: Cli) -> Result<i32, CliError> {
    let (operation, args) = split(cli);

    let logging = LoggingConfig::load_without_cli_args()?;
    telemetry::init(&logging).map_err(|err| CliError::Config(err.to_string()))?;

    let mut context = OperationContext::load(args.context.as_deref().map(Utf8Path::new))?;

    let scaleway_config = ScalewayConfig::load_without_cli_args()?;
    let provider =
        ScalewayProvider::new(scaleway_config).map_err(|err| CliError::Provider(err.to_string()))?;
    let lifecycle = VolumeLifecycle::new(provider);

    let report = run_operation(&lifecycle, operation, &mut context).await;
    write_report(io::stdout(), &report)?;
    Ok(report.exit_code())
}

fn write_report(mut target: impl Write, report: &OperationReport) -> Result<(), CliError> {
    let json = serde_json::to_string(report).map_err(io::Error::other)?;
    writeln!(target, "{json}")?;
    Ok(())
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
mod main_tests;

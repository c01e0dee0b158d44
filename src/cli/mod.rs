//! Command-line interface definitions for the `kedge` binary.
//!
//! The parser lives here so the build script can reuse it when generating
//! the manual page.

use clap::{Args, Parser};

/// Top-level CLI for the `kedge` binary.
#[derive(Debug, Parser)]
#[command(
    name = "kedge",
    about = "Run one block-volume lifecycle operation for an orchestrator",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Check a volume declaration against the provider.
    #[command(name = "validate", about = "Check a volume declaration against the provider")]
    Validate(ContextArgs),
    /// Create the volume, or adopt an external one.
    #[command(name = "create", about = "Create the volume, or adopt an external one")]
    Create(ContextArgs),
    /// Delete the volume unless it is persistent or external.
    #[command(name = "delete", about = "Delete the volume unless it is persistent or external")]
    Delete(ContextArgs),
    /// Attach the source volume to the target instance.
    #[command(name = "attach", about = "Attach the source volume to the target instance")]
    Attach(ContextArgs),
    /// Detach the source volume from the target instance.
    #[command(name = "detach", about = "Detach the source volume from the target instance")]
    Detach(ContextArgs),
}

/// Arguments shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct ContextArgs {
    /// Path to the JSON context document. Reads standard input when omitted
    /// or `-`.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub(crate) context: Option<String>,
}

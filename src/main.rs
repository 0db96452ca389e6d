//! Main entry point for the popfreq CLI.

use clap::{command, Args, Parser, Subcommand};
use popfreq::{annotate, common, library};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Population allele frequency annotation of variant tables"
)]
struct Cli {
    /// Commonly used arguments
    #[command(flatten)]
    common: common::Args,

    /// The sub command to run
    #[command(subcommand)]
    command: Commands,
}

/// Enum supporting the parsing of top-level commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Reference library related commands.
    Library(Library),
    /// Annotate a variant table.
    Annotate(annotate::Args),
}

/// Parsing of "library *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Library {
    /// The sub command to run
    #[command(subcommand)]
    command: LibraryCommands,
}

/// Enum supporting the parsing of "library *" sub commands.
#[derive(Debug, Subcommand)]
enum LibraryCommands {
    Build(library::build::Args),
    Rehash(library::manifest::RehashArgs),
    Check(library::manifest::CheckArgs),
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Build a tracing subscriber according to the configuration in `cli.common`.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(match cli.common.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::INFO,
        })
        .compact()
        .finish();

    // Install collector and go into sub commands.
    tracing::subscriber::with_default(collector, || {
        tracing::info!("popfreq {} startup", common::version());

        match &cli.command {
            Commands::Library(library) => match &library.command {
                LibraryCommands::Build(args) => library::build::run(&cli.common, args)?,
                LibraryCommands::Rehash(args) => library::manifest::run_rehash(&cli.common, args)?,
                LibraryCommands::Check(args) => library::manifest::run_check(&cli.common, args)?,
            },
            Commands::Annotate(args) => annotate::run(&cli.common, args)?,
        }

        tracing::info!("All done. Have a nice day!");

        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}

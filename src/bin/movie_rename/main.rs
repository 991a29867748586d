//! movierename - Rename movie release directories to "Title (Year)".
//!
//! Names with an embedded year are rewritten directly.
//! Other names are cleaned of release tags and the year is looked up from OMDb.

mod config;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use movie_rename::movie_name::{MovieRename, OmdbClient};

/// Rename movie directories to "Title (Year)".
///
/// Requires an OMDb API key in the `OMNIAPIKEY` environment variable.
/// Runs in dryrun mode by default: pass `--dryrun=false` to actually rename.
#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Rename movie directories to \"Title (Year)\""
)]
pub struct Args {
    /// Optional input directory, defaults to the current directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Only print changes without renaming [default: true]
    #[arg(
        short = 'p',
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    dryrun: Option<bool>,

    /// Report directories that already have the correct name
    #[arg(short = 'n', long)]
    noop: bool,

    /// Skip the confirmation prompt in dryrun mode
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print shell completion script
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completion {
        clap_complete::generate(shell, &mut Args::command(), env!("CARGO_BIN_NAME"), &mut io::stdout());
        return Ok(());
    }

    let path = movie_rename::resolve_root_directory(args.path.as_deref())?;
    let config = config::from_args(args)?;
    let lookup = OmdbClient::new(&config)?;
    MovieRename::new(path, config, lookup).run().await?;
    Ok(())
}

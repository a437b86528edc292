//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands. Options
//! fall back to `MODGRAPH_*` environment variables when not given on the
//! command line.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use crate::manifest::DEFAULT_FILE_NAME;

/// Load, validate and render module dependency graphs.
#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the modules file to load.
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_FILE_NAME,
        env = "MODGRAPH_FILE"
    )]
    pub file: Utf8PathBuf,

    /// Run as if started in this directory.
    ///
    /// Relative `--file` and `--emit` paths resolve against it.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<Utf8PathBuf>,

    /// Enable verbose diagnostic logging.
    #[arg(short, long, env = "MODGRAPH_VERBOSE")]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `check` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Apply the default command if none was specified.
    ///
    /// ```rust
    /// use clap::Parser;
    /// use modgraph::cli::{Cli, Commands};
    ///
    /// let cli = Cli::parse_from(["modgraph"]).with_default_command();
    /// assert_eq!(cli.command, Some(Commands::Check));
    /// ```
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Check);
        }
        self
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            file: Utf8PathBuf::from(DEFAULT_FILE_NAME),
            directory: None,
            verbose: false,
            command: None,
        }
        .with_default_command()
    }
}

/// Destination for rendered output.
#[derive(Debug, Args, PartialEq, Eq, Clone, Default)]
pub struct EmitArgs {
    /// Write the output to this path instead of stdout.
    #[arg(long, value_name = "FILE")]
    pub emit: Option<Utf8PathBuf>,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Validate the modules file and print a summary with its fingerprint.
    Check,

    /// Print the module graph in Graphviz DOT format.
    Graph(EmitArgs),

    /// Print the module graph as JSON.
    Json {
        /// Output destination.
        #[command(flatten)]
        output: EmitArgs,

        /// Indent the JSON output.
        #[arg(long)]
        pretty: bool,
    },
}

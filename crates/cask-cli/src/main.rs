//! Cask CLI
//!
//! Command-line interface for parsing, printing, checking and editing
//! Dockerfile-style build scripts without disturbing their formatting.

mod commands;
mod output;

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use colored::*;

#[derive(Parser)]
#[command(name = "cask")]
#[command(about = "Cask: lossless parser and printer for Dockerfile build scripts")]
#[command(version = cask_core::VERSION)]
#[command(
    long_about = "Cask parses Dockerfile-style build scripts into a lossless syntax tree.\n\
Printing an unmodified tree reproduces the file byte for byte; edits change only the edited span.\n\
\n\
Examples:\n  \
cask parse Dockerfile                     # Outline stages and instructions\n  \
cask print Dockerfile                     # Parse and print back\n  \
cask check .                              # Round-trip every build script under .\n  \
cask stages Dockerfile                    # List stages and their base images\n  \
cask retag Dockerfile --stage build --tag 1.23 --write\n  \
cask config init                          # Create a .cask.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.cask.toml/cask.yaml/cask.json)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a build script and show its syntax tree
    Parse {
        /// Build script to parse
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "outline", help = "Output format for the tree")]
        format: ParseFormat,
    },

    /// Parse a build script and print it back
    Print {
        /// Build script to print
        file: PathBuf,
    },

    /// Verify that build scripts round-trip byte for byte
    Check {
        /// Files or directories to check
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Include patterns (glob syntax)
        #[arg(
            long,
            help = "Include files matching pattern (can be used multiple times)"
        )]
        include: Vec<String>,

        /// Exclude patterns (glob syntax)
        #[arg(
            long,
            help = "Exclude files matching pattern (can be used multiple times)"
        )]
        exclude: Vec<String>,
    },

    /// List the stages of a build script
    Stages {
        /// Build script to inspect
        file: PathBuf,
    },

    /// Change the base image tag or digest of one stage
    Retag {
        /// Build script to edit
        file: PathBuf,

        /// Stage alias or zero-based index
        #[arg(long, help = "Stage alias or zero-based index")]
        stage: String,

        /// New tag
        #[arg(long, conflicts_with = "digest", required_unless_present = "digest")]
        tag: Option<String>,

        /// New digest, e.g. sha256:...
        #[arg(long)]
        digest: Option<String>,

        /// Write the result back to the file instead of stdout
        #[arg(long, help = "Write the edited file in place")]
        write: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Create a configuration file in the current directory
    Init {
        /// Configuration file format
        #[arg(short, long, default_value = "toml", help = "Configuration file format")]
        format: ConfigFormat,

        /// Overwrite existing configuration
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ParseFormat {
    /// Stage and instruction outline
    Outline,
    /// Full typed tree as JSON
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ConfigFormat {
    /// TOML configuration format
    Toml,
    /// YAML configuration format
    Yaml,
    /// JSON configuration format
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return;
    }

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    cask_core::init_tracing(&format!("cask={level},cask_core={level}"));

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        eprintln!("{} Failed to set thread pool size: {e}", "error:".red().bold());
        std::process::exit(1);
    }

    if let Err(e) = run_command(cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Parse { file, format }) => {
            commands::parse_command(file, format, cli.config)
        }

        Some(Commands::Print { file }) => commands::print_command(file, cli.config),

        Some(Commands::Check {
            paths,
            include,
            exclude,
        }) => {
            let paths = if paths.is_empty() {
                vec![PathBuf::from(".")]
            } else {
                paths
            };
            commands::check::check_command(paths, include, exclude, cli.config)
        }

        Some(Commands::Stages { file }) => commands::stages_command(file, cli.config),

        Some(Commands::Retag {
            file,
            stage,
            tag,
            digest,
            write,
        }) => commands::retag::retag_command(file, stage, tag, digest, write, cli.config),

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => commands::config::init_command(format, force),
            ConfigAction::Show => commands::config::show_command(cli.config),
        },

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}

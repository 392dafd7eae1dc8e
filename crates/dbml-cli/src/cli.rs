use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Lexer, parser and inspector for DBML schema files.
///
/// Reads `.dbml` documents, reports lexical and syntax errors with source
/// highlighting, and prints the resolved project, tables and enums.
#[derive(Parser)]
#[command(
    name = "dbml",
    version,
    about = "Lexer, parser and inspector for DBML schema files",
    after_help = "Use 'dbml <command> --help' for more information about a command.",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Global options available to all subcommands.
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file path [env: DBML_CONFIG]
    #[arg(short = 'c', long = "config", global = true, env = "DBML_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: human (default), json, plain
    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = ["human", "json", "plain"]
    )]
    pub format: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output [env: NO_COLOR]
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse and validate .dbml files
    Parse(ParseArgs),

    /// Dump the token stream of a .dbml file
    Tokens(TokensArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

/// Arguments for `dbml parse`.
#[derive(Args)]
pub struct ParseArgs {
    /// Files or directories to parse (default: the configured schema directory)
    pub paths: Vec<PathBuf>,

    /// Print the parsed documents back as canonical DBML (JSON: "printed" field)
    #[arg(long = "print")]
    pub print: bool,
}

/// Arguments for `dbml tokens`.
#[derive(Args)]
pub struct TokensArgs {
    /// File to scan
    pub file: PathBuf,
}

/// Arguments for `dbml completions`.
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_parser = ["bash", "zsh", "fish", "powershell", "elvish"])]
    pub shell: String,
}

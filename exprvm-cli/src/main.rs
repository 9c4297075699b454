//! exprvm CLI - compile, inspect and run member-access expressions

#![warn(missing_docs)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod vars;

use vars::{parse_var, VarArg};

#[derive(Parser)]
#[command(name = "exprvm")]
#[command(about = "Expression compiler and bytecode VM", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an expression to bytecode
    Compile {
        /// Expression source
        expression: String,

        /// Bytecode output file (prints the disassembly when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Variable as name:Type or name=value
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<VarArg>,

        /// Allow access to private members
        #[arg(long)]
        allow_private: bool,

        /// Print the static type hints as JSON
        #[arg(long)]
        hints: bool,
    },

    /// Execute a bytecode file
    Run {
        /// Path to the bytecode file
        file: PathBuf,

        /// Variable as name=value
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<VarArg>,

        /// Allow access to private members
        #[arg(long)]
        allow_private: bool,
    },

    /// Print the instructions of a bytecode file
    Disasm {
        /// Path to the bytecode file
        file: PathBuf,
    },

    /// Compile and execute an expression
    Eval {
        /// Expression source
        expression: String,

        /// Variable as name=value
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<VarArg>,

        /// Allow access to private members
        #[arg(long)]
        allow_private: bool,

        /// Print the compiled program before running it
        #[arg(long)]
        disasm: bool,
    },

    /// Show the effective configuration
    Config {
        /// Save it to ~/.exprvm/config.toml
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::load_config(cli.config)?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Compile {
            expression,
            output,
            vars,
            allow_private,
            hints,
        } => commands::compile::compile_expression(
            &expression,
            output.as_deref(),
            &vars,
            allow_private,
            hints,
            &config,
        ),
        Commands::Run {
            file,
            vars,
            allow_private,
        } => commands::run::run_file(&file, &vars, allow_private, &config),
        Commands::Disasm { file } => commands::disasm::disassemble(&file),
        Commands::Eval {
            expression,
            vars,
            allow_private,
            disasm,
        } => commands::eval::eval_expression(&expression, &vars, allow_private, disasm, &config),
        Commands::Config { write } => commands::config::show_config(&config, write),
    }
}

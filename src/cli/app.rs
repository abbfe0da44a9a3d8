//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{entity, search, stats, xref_cmd};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "kbx")]
#[command(author, version, about = "Cross-reference knowledge-base content")]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new knowledge base
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage procedures
    #[command(subcommand)]
    Procedure(entity::ProcedureCommands),

    /// Manage the system registry
    #[command(subcommand)]
    System(entity::SystemCommands),

    /// Manage conversation scripts
    #[command(subcommand)]
    Script(entity::ScriptCommands),

    /// Manage knowledge-base articles
    #[command(subcommand)]
    Article(entity::ArticleCommands),

    /// Search all pools
    Search(search::SearchArgs),

    /// Show per-pool counts
    Stats,

    /// List the entities a text mentions
    Detect(xref_cmd::SourceArgs),

    /// List referenced items (type, id, title) for a text
    Refs(xref_cmd::SourceArgs),

    /// Link every mention of a known entity in a text
    Annotate(xref_cmd::SourceArgs),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format.into(),
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("kbx starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing knowledge base at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx("init", &format!("Created directory at: {}", project.kb_dir().display()));
            output.success(&format!("Initialized knowledge base at {}", project.root().display()));
        }

        Commands::Procedure(cmd) => entity::run_procedure(cmd, &output)?,
        Commands::System(cmd) => entity::run_system(cmd, &output)?,
        Commands::Script(cmd) => entity::run_script(cmd, &output)?,
        Commands::Article(cmd) => entity::run_article(cmd, &output)?,

        Commands::Search(args) => search::run(&output, &args)?,
        Commands::Stats => stats::run(&output)?,

        Commands::Detect(args) => xref_cmd::detect(&output, &args)?,
        Commands::Refs(args) => xref_cmd::refs(&output, &args)?,
        Commands::Annotate(args) => xref_cmd::annotate(&output, &args)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

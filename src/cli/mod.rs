//! Command-line interface for offer-pack
//!
//! Each invocation is one user interaction against the persisted workbench.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod files;
mod items;
mod packages;
mod utils;

/// Curate offer items and assemble them into documents and bundles
#[derive(Parser)]
#[command(name = "offer-pack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args, Clone)]
pub struct GlobalArgs {
    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file (offer-pack.toml or .offer-pack.yml)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding saved items, files and packages
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage backend: dir|sqlite
    #[arg(long, global = true, value_name = "BACKEND")]
    pub storage: Option<String>,

    /// Directory for downloads and exported bundles
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Always write JSON bundles instead of zip archives
    #[arg(long, global = true)]
    pub json_bundles: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List items with their selection state
    Items,

    /// Set a text field on an item
    Set(items::SetArgs),

    /// Toggle a slot (left=description, mid=link, right=file) on an item
    Toggle(items::ToggleArgs),

    /// Set an item's color
    Color(items::ColorArgs),

    /// Replace an item's tags
    Tags(items::TagsArgs),

    /// Set or borrow an item's base contract
    Contract(items::ContractArgs),

    /// Upload a file into an item
    Upload(items::UploadArgs),

    /// Attach an already stored file to an item
    Attach(items::AttachArgs),

    /// Clear every slot selection
    Clear,

    /// Print the text generated from the current selection
    Generate(items::GenerateArgs),

    /// Manage stored files
    #[command(subcommand)]
    Files(files::FilesCommand),

    /// Save, list and export packages
    #[command(subcommand)]
    Package(packages::PackageCommand),

    /// Export every item as CSV (the CSV is also stored as a file)
    Csv(packages::CsvArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let default_level = if cli.global.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let mut session = utils::Session::open(&cli.global)?;

    match cli.command {
        Commands::Items => items::list(&session),
        Commands::Set(args) => items::set(&mut session, args),
        Commands::Toggle(args) => items::toggle(&mut session, args),
        Commands::Color(args) => items::color(&mut session, args),
        Commands::Tags(args) => items::tags(&mut session, args),
        Commands::Contract(args) => items::contract(&mut session, args),
        Commands::Upload(args) => items::upload(&mut session, args),
        Commands::Attach(args) => items::attach(&mut session, args),
        Commands::Clear => items::clear(&mut session),
        Commands::Generate(args) => items::generate(&session, args),
        Commands::Files(cmd) => files::run(&mut session, cmd),
        Commands::Package(cmd) => packages::run(&mut session, cmd),
        Commands::Csv(args) => packages::csv(&mut session, args),
    }
}

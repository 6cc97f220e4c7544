//! Package and CSV export commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;
use std::path::PathBuf;

use super::utils::{confirm, resolve_id, write_output, Session};
use crate::domain::SavedPackage;
use crate::error::EngineError;

#[derive(Subcommand)]
pub enum PackageCommand {
    /// Save the current selection as a package
    Save(SaveArgs),

    /// List saved packages, newest first
    List,

    /// Show a package's details and text
    Show(ShowArgs),

    /// Delete a saved package
    Rm(RmArgs),

    /// Export a package as a zip archive (or JSON bundle)
    Export(ExportArgs),
}

#[derive(Args)]
pub struct SaveArgs {
    /// Package name (defaults to a timestamp)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Use this (possibly hand-edited) text instead of regenerating it
    #[arg(long, value_name = "FILE")]
    pub text_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Package id (or unique prefix)
    #[arg(value_name = "PACKAGE_ID")]
    pub id: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Package id (or unique prefix)
    #[arg(value_name = "PACKAGE_ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Package id (or unique prefix)
    #[arg(value_name = "PACKAGE_ID")]
    pub id: String,

    /// Output directory (default: configured output_dir)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct CsvArgs {
    /// Also write the CSV into this directory
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

pub fn run(session: &mut Session, cmd: PackageCommand) -> Result<()> {
    match cmd {
        PackageCommand::Save(args) => save(session, args),
        PackageCommand::List => {
            for package in session.workbench.packages().list() {
                println!("{}", describe_package(package));
            }
            Ok(())
        }
        PackageCommand::Show(args) => {
            let id = lookup(session, &args.id)?;
            let Some(package) = session.workbench.packages().get(&id) else {
                anyhow::bail!("Package not found: {id}");
            };
            print_package(session, package);
            Ok(())
        }
        PackageCommand::Rm(args) => {
            let id = lookup(session, &args.id)?;
            if !confirm(&format!("Delete package {id}?"), args.yes)? {
                println!("Aborted.");
                return Ok(());
            }
            let removed = session.workbench.delete_package(&id)?;
            println!("Deleted {} ({})", removed.id, removed.name);
            Ok(())
        }
        PackageCommand::Export(args) => export(session, args),
    }
}

fn save(session: &mut Session, args: SaveArgs) -> Result<()> {
    let text = match &args.text_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed reading {}", path.display()))?,
        None => session.workbench.generate(),
    };
    match session.workbench.save_package(args.name.as_deref(), &text) {
        Ok(package) => {
            println!("{}", package.id);
            Ok(())
        }
        Err(err) => Err(report_rejection(err, "Package not saved")),
    }
}

fn export(session: &mut Session, args: ExportArgs) -> Result<()> {
    let id = lookup(session, &args.id)?;
    let bundle = match session.workbench.export_package(&id) {
        Ok(bundle) => bundle,
        Err(err) => return Err(report_rejection(err, "Package not exported")),
    };
    let dir = session.output_dir(args.out.as_deref());
    let path = write_output(&dir, &bundle.file_name, &bundle.bytes)?;
    println!("{}", path.display());
    Ok(())
}

pub fn csv(session: &mut Session, args: CsvArgs) -> Result<()> {
    let export = session.workbench.export_csv()?;
    match &args.out {
        Some(dir) => {
            let path = write_output(dir, &export.file_name, export.content.as_bytes())?;
            eprintln!("Stored as file {}; written to {}", export.file_id, path.display());
        }
        None => {
            eprintln!("Stored as file {}", export.file_id);
            print!("{}", export.content);
        }
    }
    Ok(())
}

/// Print validation failures prominently; other errors pass through unchanged.
fn report_rejection(err: EngineError, outcome: &str) -> anyhow::Error {
    if !matches!(err, EngineError::Validation(_) | EngineError::NothingSelected) {
        return err.into();
    }
    let message = match &err {
        EngineError::Validation(validation) => style(validation.to_string()).red(),
        _ => style(err.to_string()),
    };
    eprintln!("{} {}", style("✗").red().bold(), message);
    anyhow::anyhow!("{outcome}")
}

fn lookup(session: &Session, wanted: &str) -> Result<String> {
    let packages = session.workbench.packages();
    resolve_id(packages.list().iter().map(|p| p.id.as_str()), wanted, "package")
}

fn describe_package(package: &SavedPackage) -> String {
    let items = package
        .selected_indices
        .iter()
        .map(|i| (i + 1).to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{}  {}  {}  items: {}  files: {}",
        package.id,
        package.created_at.format("%Y-%m-%d %H:%M:%S"),
        package.name,
        items,
        package.file_ids.len()
    )
}

fn print_package(session: &Session, package: &SavedPackage) {
    println!("{}", style(&package.name).bold());
    println!("  id:      {}", package.id);
    println!("  created: {}", package.created_at.to_rfc3339());
    for file_id in &package.file_ids {
        match session.workbench.files().get(file_id) {
            Some(file) => println!("  file:    {} ({})", file.name, file.id),
            None => println!("  file:    {} {}", file_id, style("(missing)").yellow()),
        }
    }
    println!();
    println!("{}", package.generated_text);
}

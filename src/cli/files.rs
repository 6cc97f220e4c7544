//! Stored file commands

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::utils::{confirm, resolve_id, write_output, Session};
use crate::domain::SavedFile;

#[derive(Subcommand)]
pub enum FilesCommand {
    /// List stored files, newest first
    List,

    /// Write a stored file to disk
    Get(GetArgs),

    /// Delete a stored file (items and packages keep dangling references)
    Rm(RmArgs),
}

#[derive(Args)]
pub struct GetArgs {
    /// File id (or unique prefix)
    #[arg(value_name = "FILE_ID")]
    pub id: String,

    /// Output directory (default: configured output_dir)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct RmArgs {
    /// File id (or unique prefix)
    #[arg(value_name = "FILE_ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

pub fn run(session: &mut Session, cmd: FilesCommand) -> Result<()> {
    match cmd {
        FilesCommand::List => {
            for file in session.workbench.files().list() {
                println!("{}", describe_file(file));
            }
            Ok(())
        }
        FilesCommand::Get(args) => {
            let id = lookup(session, &args.id)?;
            let dir = session.output_dir(args.out.as_deref());
            let Some(file) = session.workbench.files().get(&id) else {
                anyhow::bail!("File not found: {id}");
            };
            let path = write_output(&dir, &file.name, &file.content)?;
            println!("{}", path.display());
            Ok(())
        }
        FilesCommand::Rm(args) => {
            let id = lookup(session, &args.id)?;
            if !confirm(&format!("Delete file {id}?"), args.yes)? {
                println!("Aborted.");
                return Ok(());
            }
            let removed = session.workbench.remove_file(&id)?;
            println!("Deleted {} ({})", removed.id, removed.name);
            Ok(())
        }
    }
}

fn lookup(session: &Session, wanted: &str) -> Result<String> {
    let files = session.workbench.files();
    resolve_id(files.list().iter().map(|f| f.id.as_str()), wanted, "file")
}

fn describe_file(file: &SavedFile) -> String {
    format!(
        "{}  {}  {:>9} B  {}  {}",
        file.id,
        file.created_at.format("%Y-%m-%d %H:%M:%S"),
        file.size(),
        file.mime_type,
        file.name
    )
}

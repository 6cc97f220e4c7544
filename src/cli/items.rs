//! Item editing and selection commands

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;

use super::utils::{parse_csv, parse_item_number, resolve_id, write_output, Session};
use crate::domain::{InteractionMode, Item, ItemColor, ItemField, Slot};
use crate::validate::satisfies_contract_rule;

#[derive(Args)]
pub struct SetArgs {
    /// Item number (1-based)
    #[arg(value_name = "ITEM", value_parser = parse_item_number)]
    pub item: usize,

    /// Field to set: label|description|link|file-name
    #[arg(value_name = "FIELD")]
    pub field: ItemField,

    /// New value (labels are cut to 30 characters)
    #[arg(value_name = "VALUE")]
    pub value: String,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Item number (1-based)
    #[arg(value_name = "ITEM", value_parser = parse_item_number)]
    pub item: usize,

    /// Slot: left|mid|right (or description|link|file)
    #[arg(value_name = "SLOT")]
    pub slot: Slot,

    /// Toggle in editing mode (never downloads the attached file)
    #[arg(long)]
    pub editing: bool,

    /// Where a downloaded file is written (default: configured output_dir)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct ColorArgs {
    /// Item number (1-based)
    #[arg(value_name = "ITEM", value_parser = parse_item_number)]
    pub item: usize,

    /// blue|green|amber
    #[arg(value_name = "COLOR")]
    pub color: ItemColor,
}

#[derive(Args)]
pub struct TagsArgs {
    /// Item number (1-based)
    #[arg(value_name = "ITEM", value_parser = parse_item_number)]
    pub item: usize,

    /// Comma-separated tags; empty clears them
    #[arg(value_name = "TAGS", default_value = "")]
    pub tags: String,
}

#[derive(Args)]
pub struct ContractArgs {
    /// Item number (1-based)
    #[arg(value_name = "ITEM", value_parser = parse_item_number)]
    pub item: usize,

    /// Mark the item as carrying its own base contract
    #[arg(long, conflicts_with = "unset")]
    pub set: bool,

    /// Clear the item's own base contract
    #[arg(long)]
    pub unset: bool,

    /// Borrow the base contract of another item (1-based)
    #[arg(long = "ref", value_name = "ITEM", value_parser = parse_item_number, conflicts_with = "no_ref")]
    pub reference: Option<usize>,

    /// Drop the base contract reference
    #[arg(long)]
    pub no_ref: bool,
}

#[derive(Args)]
pub struct UploadArgs {
    /// Item number (1-based)
    #[arg(value_name = "ITEM", value_parser = parse_item_number)]
    pub item: usize,

    /// File to upload
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// MIME type (guessed from the extension when omitted)
    #[arg(long, value_name = "TYPE")]
    pub mime: Option<String>,
}

#[derive(Args)]
pub struct AttachArgs {
    /// Item number (1-based)
    #[arg(value_name = "ITEM", value_parser = parse_item_number)]
    pub item: usize,

    /// Stored file id (or unique prefix)
    #[arg(value_name = "FILE_ID", required_unless_present = "detach")]
    pub file_id: Option<String>,

    /// Remove the file reference from the item instead
    #[arg(long, conflicts_with = "file_id")]
    pub detach: bool,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Also write the text to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn list(session: &Session) -> Result<()> {
    let workbench = &session.workbench;
    let tag = workbench.contract_tag();
    let items = workbench.items().items();
    for (index, item) in items.iter().enumerate() {
        println!("{}", describe_item(items, index, item, tag));
    }
    Ok(())
}

fn describe_item(items: &[Item], index: usize, item: &Item, tag: &str) -> String {
    let mark = |slot: Slot| if item.has_slot(slot) { "x" } else { " " };
    let label = if item.label().is_empty() { "(no label)" } else { item.label() };
    let mut line = format!(
        "{:>2}. [{}|{}|{}] {} ({})",
        index + 1,
        mark(Slot::Left),
        mark(Slot::Mid),
        mark(Slot::Right),
        style(label).bold(),
        item.color.as_str()
    );
    if !item.tags.is_empty() {
        line.push_str(&format!(" tags: {}", item.tags.join(", ")));
    }
    // Only references to an item that actually holds a contract count as borrowed.
    let borrowed = item
        .base_contract_ref
        .filter(|&target| items.get(target).is_some_and(|referenced| referenced.has_base_contract));
    if item.has_base_contract {
        line.push_str(" [base contract]");
    } else if let Some(target) = borrowed {
        line.push_str(&format!(" [contract from item {}]", target + 1));
    } else if !satisfies_contract_rule(items, item, tag) {
        line.push_str(&format!(" {}", style("[needs base contract]").yellow()));
    }
    if !item.file_name.is_empty() {
        let state = if item.file_id.is_some() { "" } else { " (not stored)" };
        line.push_str(&format!("\n      file: {}{}", item.file_name, state));
    }
    line
}

pub fn set(session: &mut Session, args: SetArgs) -> Result<()> {
    session.workbench.set_field(args.item, args.field, &args.value)?;
    Ok(())
}

pub fn toggle(session: &mut Session, args: ToggleArgs) -> Result<()> {
    let mode = if args.editing { InteractionMode::Editing } else { InteractionMode::Selecting };
    let download = session.workbench.toggle_slot(args.item, args.slot, mode)?;
    if let Some(file) = download {
        let dir = session.output_dir(args.out.as_deref());
        let path = write_output(&dir, &file.name, &file.content)?;
        println!("Downloaded {}", path.display());
    }
    Ok(())
}

pub fn color(session: &mut Session, args: ColorArgs) -> Result<()> {
    session.workbench.set_color(args.item, args.color)?;
    Ok(())
}

pub fn tags(session: &mut Session, args: TagsArgs) -> Result<()> {
    session.workbench.set_tags(args.item, parse_csv(&args.tags))?;
    Ok(())
}

pub fn contract(session: &mut Session, args: ContractArgs) -> Result<()> {
    if !(args.set || args.unset || args.reference.is_some() || args.no_ref) {
        anyhow::bail!("Nothing to change: pass --set, --unset, --ref ITEM or --no-ref");
    }
    if args.set || args.unset {
        session.workbench.set_base_contract(args.item, args.set)?;
    }
    if args.reference.is_some() || args.no_ref {
        session.workbench.set_base_contract_ref(args.item, args.reference)?;
    }
    Ok(())
}

pub fn upload(session: &mut Session, args: UploadArgs) -> Result<()> {
    let stored = session.workbench.upload_path(args.item, &args.path, args.mime.as_deref())?;
    match stored {
        Some(id) => println!("{id}"),
        None => eprintln!(
            "{} Could not read {}; item {} keeps the name without a stored file",
            style("!").yellow().bold(),
            args.path.display(),
            args.item + 1
        ),
    }
    Ok(())
}

pub fn attach(session: &mut Session, args: AttachArgs) -> Result<()> {
    if args.detach {
        session.workbench.detach_file(args.item)?;
        return Ok(());
    }
    let wanted = args.file_id.unwrap_or_default();
    let files = session.workbench.files();
    let file_id = resolve_id(files.list().iter().map(|f| f.id.as_str()), &wanted, "file")?;
    session.workbench.attach_file(args.item, &file_id)?;
    Ok(())
}

pub fn clear(session: &mut Session) -> Result<()> {
    session.workbench.clear_all_selections()?;
    Ok(())
}

pub fn generate(session: &Session, args: GenerateArgs) -> Result<()> {
    let text = session.workbench.generate();
    if let Some(path) = &args.output {
        std::fs::write(path, &text)
            .with_context(|| format!("Failed writing {}", path.display()))?;
    }
    println!("{text}");
    Ok(())
}

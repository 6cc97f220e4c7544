//! Single-owner facade over the entity store, repositories and export service.
//!
//! Every user interaction is one `&mut self` call. Each call mutates exactly
//! the repositories it names and commits them before returning; files are
//! always committed before anything can reference them.

use crate::bundle::{Bundle, BundleContents, ExportService};
use crate::domain::{
    Config, InteractionMode, ItemColor, ItemField, SavedFile, SavedPackage, Slot,
    DEFAULT_CONTRACT_TAG, DEFAULT_ITEM_COUNT,
};
use crate::error::{EngineError, Result};
use crate::render::{generate, render_csv};
use crate::storage::items::{commit_items, load_items};
use crate::storage::packages::new_package;
use crate::storage::{FileRepository, KeyValueStore, PackageRepository};
use crate::store::EntityStore;
use crate::utils::guess_mime_type;
use crate::validate::validate_selection;
use chrono::Utc;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct WorkbenchOptions {
    pub item_count: usize,
    pub archive_bundles: bool,
    pub contract_tag: String,
}

impl Default for WorkbenchOptions {
    fn default() -> Self {
        Self {
            item_count: DEFAULT_ITEM_COUNT,
            archive_bundles: true,
            contract_tag: DEFAULT_CONTRACT_TAG.to_string(),
        }
    }
}

impl From<&Config> for WorkbenchOptions {
    fn from(config: &Config) -> Self {
        Self {
            item_count: config.item_count,
            archive_bundles: config.archive_bundles,
            contract_tag: config.contract_tag.clone(),
        }
    }
}

/// CSV export result; the CSV also lives in the file repository under `file_id`.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_id: String,
    pub file_name: String,
    pub content: String,
}

pub struct Workbench {
    store: Box<dyn KeyValueStore>,
    items: EntityStore,
    files: FileRepository,
    packages: PackageRepository,
    export: ExportService,
    contract_tag: String,
}

impl Workbench {
    /// Rehydrate all state from `store`.
    pub fn open(store: Box<dyn KeyValueStore>, options: WorkbenchOptions) -> Self {
        let items = load_items(store.as_ref(), options.item_count);
        let files = FileRepository::load(store.as_ref());
        let packages = PackageRepository::load(store.as_ref());
        tracing::debug!(
            "Workbench ready: {} items, {} files, {} packages ({} storage)",
            items.len(),
            files.len(),
            packages.len(),
            store.backend_name()
        );
        Self {
            store,
            items,
            files,
            packages,
            export: ExportService::detect(options.archive_bundles),
            contract_tag: options.contract_tag,
        }
    }

    pub fn with_export_service(mut self, export: ExportService) -> Self {
        self.export = export;
        self
    }

    pub fn items(&self) -> &EntityStore {
        &self.items
    }

    pub fn files(&self) -> &FileRepository {
        &self.files
    }

    pub fn packages(&self) -> &PackageRepository {
        &self.packages
    }

    pub fn contract_tag(&self) -> &str {
        &self.contract_tag
    }

    fn persist_items(&mut self) -> Result<()> {
        commit_items(self.store.as_mut(), &self.items).map_err(EngineError::Storage)
    }

    fn persist_files(&mut self) -> Result<()> {
        self.files.commit(self.store.as_mut()).map_err(EngineError::Storage)
    }

    fn persist_packages(&mut self) -> Result<()> {
        self.packages.commit(self.store.as_mut()).map_err(EngineError::Storage)
    }

    // --- entity store ---

    pub fn set_field(&mut self, index: usize, field: ItemField, value: &str) -> Result<()> {
        self.items.set_field(index, field, value)?;
        self.persist_items()
    }

    /// Toggle a slot. Selecting the file slot while in selecting mode hands back
    /// the attached file as a download, when it still resolves.
    pub fn toggle_slot(
        &mut self,
        index: usize,
        slot: Slot,
        mode: InteractionMode,
    ) -> Result<Option<SavedFile>> {
        let selected = self.items.toggle_slot(index, slot)?;
        self.persist_items()?;

        if slot != Slot::Right || mode != InteractionMode::Selecting || !selected {
            return Ok(None);
        }
        let Some(file_id) = self.items.get(index).and_then(|item| item.file_id.clone()) else {
            return Ok(None);
        };
        let download = self.files.get(&file_id).cloned();
        if download.is_none() {
            tracing::warn!("Item {} references missing file {}; nothing to download", index + 1, file_id);
        }
        Ok(download)
    }

    pub fn set_color(&mut self, index: usize, color: ItemColor) -> Result<()> {
        self.items.set_color(index, color)?;
        self.persist_items()
    }

    pub fn set_tags(&mut self, index: usize, tags: Vec<String>) -> Result<()> {
        self.items.set_tags(index, tags)?;
        self.persist_items()
    }

    pub fn set_base_contract(&mut self, index: usize, has_base_contract: bool) -> Result<()> {
        self.items.set_base_contract(index, has_base_contract)?;
        self.persist_items()
    }

    pub fn set_base_contract_ref(&mut self, index: usize, target: Option<usize>) -> Result<()> {
        self.items.set_base_contract_ref(index, target)?;
        self.persist_items()
    }

    pub fn clear_all_selections(&mut self) -> Result<()> {
        self.items.clear_all_selections();
        self.persist_items()
    }

    // --- files ---

    /// Apply a finished upload read to the file repository and the item.
    ///
    /// A failed read still records the display name, but no file reference.
    /// Returns the new file id on success.
    pub fn complete_upload(
        &mut self,
        index: usize,
        file_name: &str,
        mime_type: &str,
        read: std::io::Result<Vec<u8>>,
    ) -> Result<Option<String>> {
        self.items.check_index(index)?;

        let file_id = match read {
            Ok(content) => {
                let id = self.files.store(file_name, content, mime_type);
                if let Err(e) = self.persist_files() {
                    self.files.remove(&id);
                    return Err(e);
                }
                Some(id)
            }
            Err(e) => {
                tracing::warn!("Failed reading upload '{}' for item {}: {}", file_name, index + 1, e);
                None
            }
        };

        self.items.attach_file(index, file_id.clone(), file_name)?;
        self.persist_items()?;
        Ok(file_id)
    }

    /// Upload a file from disk into item `index`.
    pub fn upload_path(&mut self, index: usize, path: &Path, mime_type: Option<&str>) -> Result<Option<String>> {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("upload").to_string();
        let mime_type = mime_type.unwrap_or_else(|| guess_mime_type(&file_name)).to_string();
        let read = std::fs::read(path);
        self.complete_upload(index, &file_name, &mime_type, read)
    }

    /// Reuse an already stored file on item `index`.
    pub fn attach_file(&mut self, index: usize, file_id: &str) -> Result<()> {
        let name = self
            .files
            .get(file_id)
            .map(|f| f.name.clone())
            .ok_or_else(|| EngineError::FileNotFound(file_id.to_string()))?;
        self.items.attach_file(index, Some(file_id.to_string()), &name)?;
        self.persist_items()
    }

    pub fn detach_file(&mut self, index: usize) -> Result<()> {
        self.items.detach_file(index)?;
        self.persist_items()
    }

    /// Remove a stored file. Items and packages keep their now-dangling references.
    pub fn remove_file(&mut self, file_id: &str) -> Result<SavedFile> {
        let removed = self
            .files
            .remove(file_id)
            .ok_or_else(|| EngineError::FileNotFound(file_id.to_string()))?;
        if let Err(e) = self.persist_files() {
            self.files = FileRepository::load(self.store.as_ref());
            return Err(e);
        }
        tracing::debug!("Removed file {} ('{}')", removed.id, removed.name);
        Ok(removed)
    }

    // --- generation & packages ---

    pub fn generate(&self) -> String {
        generate(self.items.items())
    }

    /// Snapshot the current selection as a package.
    ///
    /// `generated_text` is whatever the caller currently holds, possibly hand-edited.
    pub fn save_package(&mut self, name: Option<&str>, generated_text: &str) -> Result<SavedPackage> {
        let selected = self.items.selected_indices();
        if selected.is_empty() {
            return Err(EngineError::NothingSelected);
        }
        validate_selection(self.items.items(), &selected, &self.contract_tag)?;

        let file_ids: Vec<String> = selected
            .iter()
            .filter_map(|&i| self.items.get(i))
            .filter(|item| item.has_slot(Slot::Right))
            .filter_map(|item| item.file_id.as_deref())
            .filter(|id| self.files.contains(id))
            .map(str::to_string)
            .collect();

        let package = new_package(name, Utc::now(), selected, generated_text, file_ids);
        self.packages.insert(package.clone());
        if let Err(e) = self.persist_packages() {
            self.packages.remove(&package.id);
            return Err(e);
        }
        tracing::info!(
            "Saved package '{}' ({} items, {} files)",
            package.name,
            package.selected_indices.len(),
            package.file_ids.len()
        );
        Ok(package)
    }

    pub fn delete_package(&mut self, package_id: &str) -> Result<SavedPackage> {
        let removed = self
            .packages
            .remove(package_id)
            .ok_or_else(|| EngineError::PackageNotFound(package_id.to_string()))?;
        if let Err(e) = self.persist_packages() {
            self.packages = PackageRepository::load(self.store.as_ref());
            return Err(e);
        }
        Ok(removed)
    }

    /// Build a bundle for a saved package.
    ///
    /// The selection is re-validated against the current items, so edits made
    /// after saving can block an export. Files deleted since saving are skipped.
    pub fn export_package(&self, package_id: &str) -> Result<Bundle> {
        let package = self
            .packages
            .get(package_id)
            .ok_or_else(|| EngineError::PackageNotFound(package_id.to_string()))?;
        validate_selection(self.items.items(), &package.selected_indices, &self.contract_tag)?;

        let files: Vec<Option<&SavedFile>> =
            package.file_ids.iter().map(|id| self.files.get(id)).collect();
        let missing = files.iter().filter(|f| f.is_none()).count();
        if missing > 0 {
            tracing::warn!("Package '{}': skipping {} unresolved file(s)", package.name, missing);
        }

        let contents = BundleContents { package, files };
        let bundle = self.export.build(&contents).map_err(EngineError::Bundle)?;
        tracing::info!(
            "Exported package '{}' as {} ({} bytes)",
            package.name,
            bundle.file_name,
            bundle.bytes.len()
        );
        Ok(bundle)
    }

    /// Serialize every item as CSV and keep a copy in the file repository.
    pub fn export_csv(&mut self) -> Result<CsvExport> {
        let content = render_csv(self.items.items());
        let file_name = format!("items-{}.csv", Utc::now().format("%Y%m%d-%H%M%S"));
        let file_id = self.files.store(&file_name, content.clone().into_bytes(), "text/csv");
        if let Err(e) = self.persist_files() {
            self.files.remove(&file_id);
            return Err(e);
        }
        Ok(CsvExport { file_id, file_name, content })
    }
}

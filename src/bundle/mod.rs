//! Bundle construction for exported packages.
//!
//! Two writers implement [`BundleWriter`]: a zip archive and a single JSON
//! document. [`ExportService`] picks the primary writer once at startup and
//! falls back to JSON whenever the primary fails.

use crate::domain::{BundleFormat, SavedFile, SavedPackage, MANIFEST_SCHEMA_VERSION};
use crate::utils::sanitize_file_name;
use anyhow::Result;
use serde_json::{json, Value};

pub mod archive;
pub mod json;

pub use self::archive::ZipBundleWriter;
pub use self::json::{FallbackBundle, JsonBundleWriter};

/// A package plus its file references resolved against the file repository.
pub struct BundleContents<'a> {
    pub package: &'a SavedPackage,
    /// Aligned with `package.file_ids`; `None` where the id no longer resolves.
    pub files: Vec<Option<&'a SavedFile>>,
}

impl<'a> BundleContents<'a> {
    pub fn resolved_files(&self) -> impl Iterator<Item = &'a SavedFile> + '_ {
        self.files.iter().filter_map(|f| *f)
    }

    /// Base name shared by the text entry and the bundle file.
    pub fn base_name(&self) -> String {
        sanitize_file_name(&self.package.name, "package")
    }
}

/// A finished bundle ready to be written out.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub file_name: String,
    pub format: BundleFormat,
    pub bytes: Vec<u8>,
}

/// A bundle serialization capability.
pub trait BundleWriter {
    fn format(&self) -> BundleFormat;

    fn write(&self, contents: &BundleContents<'_>) -> Result<Vec<u8>>;
}

/// Manifest describing a bundle's package and the files it carries.
pub fn manifest(contents: &BundleContents<'_>) -> Value {
    let files: Vec<Value> = contents
        .resolved_files()
        .map(|f| {
            json!({
                "id": f.id,
                "name": f.name,
                "mimeType": f.mime_type,
                "size": f.size(),
                "sha256": f.sha256(),
            })
        })
        .collect();

    json!({
        "schemaVersion": MANIFEST_SCHEMA_VERSION,
        "id": contents.package.id,
        "name": contents.package.name,
        "createdAt": contents.package.created_at.to_rfc3339(),
        "selectedIndices": contents.package.selected_indices,
        "files": files,
    })
}

pub struct ExportService {
    primary: Box<dyn BundleWriter>,
    fallback: JsonBundleWriter,
}

impl ExportService {
    /// Use the archive writer when enabled and a probe archive can be built.
    pub fn detect(archive_bundles: bool) -> Self {
        if !archive_bundles {
            tracing::debug!("Archive bundles disabled; using JSON bundles");
            return Self::with_primary(Box::new(JsonBundleWriter));
        }
        match ZipBundleWriter::probe() {
            Ok(()) => Self::with_primary(Box::new(ZipBundleWriter)),
            Err(e) => {
                tracing::warn!("Zip archives unavailable, using JSON bundles: {:#}", e);
                Self::with_primary(Box::new(JsonBundleWriter))
            }
        }
    }

    pub fn with_primary(primary: Box<dyn BundleWriter>) -> Self {
        Self { primary, fallback: JsonBundleWriter }
    }

    pub fn primary_format(&self) -> BundleFormat {
        self.primary.format()
    }

    pub fn build(&self, contents: &BundleContents<'_>) -> Result<Bundle> {
        let (format, bytes) = match self.primary.write(contents) {
            Ok(bytes) => (self.primary.format(), bytes),
            Err(e) if self.primary.format() != BundleFormat::Json => {
                tracing::warn!("Archive construction failed, writing JSON bundle instead: {:#}", e);
                (BundleFormat::Json, self.fallback.write(contents)?)
            }
            Err(e) => return Err(e),
        };

        Ok(Bundle {
            file_name: format!("{}.{}", contents.base_name(), format.extension()),
            format,
            bytes,
        })
    }
}

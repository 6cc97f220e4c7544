//! Zip archive bundles.

use super::{manifest, BundleContents, BundleWriter};
use crate::domain::BundleFormat;
use crate::utils::sanitize_file_name;
use anyhow::{anyhow, Result};
use std::io::{Cursor, Write};
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

pub const MANIFEST_ENTRY: &str = "manifest.json";

/// Writes `manifest.json`, `<package-name>.txt` and one entry per resolved file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipBundleWriter;

impl ZipBundleWriter {
    /// Build a throwaway archive to confirm archive support works.
    pub fn probe() -> Result<()> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("probe", FileOptions::default().compression_method(CompressionMethod::Deflated))?;
        zip.write_all(b"ok")?;
        zip.finish()?;
        Ok(())
    }
}

impl BundleWriter for ZipBundleWriter {
    fn format(&self) -> BundleFormat {
        BundleFormat::Zip
    }

    fn write(&self, contents: &BundleContents<'_>) -> Result<Vec<u8>> {
        let text_entry = format!("{}.txt", contents.base_name());
        let manifest_bytes = serde_json::to_vec_pretty(&manifest(contents))?;

        let mut entries: Vec<(String, &[u8])> = vec![
            (MANIFEST_ENTRY.to_string(), manifest_bytes.as_slice()),
            (text_entry.clone(), contents.package.generated_text.as_bytes()),
        ];

        for file in contents.resolved_files() {
            let mut name = sanitize_file_name(&file.name, "file");
            // Uploaded files never replace the bundle's own entries.
            if name == MANIFEST_ENTRY || name == text_entry {
                name = format!("file-{name}");
            }
            // Same-named files: the last one wins.
            if let Some(pos) = entries.iter().skip(2).position(|(n, _)| *n == name) {
                tracing::debug!("Replacing duplicate archive entry '{}'", name);
                entries.remove(pos + 2);
            }
            entries.push((name, file.content.as_slice()));
        }

        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in &entries {
            zip.start_file(name.as_str(), options)
                .map_err(|e| anyhow!("Failed to start archive entry {}: {}", name, e))?;
            zip.write_all(bytes).map_err(|e| anyhow!("Failed to write {}: {}", name, e))?;
        }
        let cursor = zip.finish().map_err(|e| anyhow!("Failed to finalize archive: {}", e))?;
        Ok(cursor.into_inner())
    }
}

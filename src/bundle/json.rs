//! Single-document JSON bundles, used when archives are unavailable.

use super::{BundleContents, BundleWriter};
use crate::domain::{BundleFormat, SavedFile};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackMeta {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub selected_indices: Vec<usize>,
}

/// Everything an archive carries, with file contents inlined as base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackBundle {
    pub meta: FallbackMeta,
    pub generated_text: String,
    /// One record per package file id; `null` where the id did not resolve.
    pub files: Vec<Option<SavedFile>>,
}

impl FallbackBundle {
    pub fn from_contents(contents: &BundleContents<'_>) -> Self {
        let package = contents.package;
        Self {
            meta: FallbackMeta {
                id: package.id.clone(),
                name: package.name.clone(),
                created_at: package.created_at,
                selected_indices: package.selected_indices.clone(),
            },
            generated_text: package.generated_text.clone(),
            files: contents.files.iter().map(|f| (*f).cloned()).collect(),
        }
    }

    /// Parse a previously exported fallback bundle.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).context("Invalid fallback bundle")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBundleWriter;

impl BundleWriter for JsonBundleWriter {
    fn format(&self) -> BundleFormat {
        BundleFormat::Json
    }

    fn write(&self, contents: &BundleContents<'_>) -> Result<Vec<u8>> {
        let bundle = FallbackBundle::from_contents(contents);
        Ok(serde_json::to_vec_pretty(&bundle)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::tests::{sample_file, sample_package};

    #[test]
    fn unresolved_files_are_null() {
        let file = sample_file("f1", "owu.pdf", b"data");
        let package = sample_package(&["gone", "f1"]);
        let contents = BundleContents { package: &package, files: vec![None, Some(&file)] };

        let bytes = JsonBundleWriter.write(&contents).expect("json");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("value");

        assert_eq!(value["meta"]["name"], "Oferta/Q3");
        assert!(value["meta"]["createdAt"].is_string());
        assert_eq!(value["generatedText"], "Pakiet\nOpis");
        assert!(value["files"][0].is_null());
        assert_eq!(value["files"][1]["name"], "owu.pdf");
        assert_eq!(value["files"][1]["content"], "ZGF0YQ==");
    }

    #[test]
    fn bundle_recovers_file_bytes() {
        let file = sample_file("f1", "scan.png", &[0, 255, 1, 254]);
        let package = sample_package(&["f1"]);
        let contents = BundleContents { package: &package, files: vec![Some(&file)] };

        let bytes = JsonBundleWriter.write(&contents).expect("json");
        let parsed = FallbackBundle::from_slice(&bytes).expect("parse");

        assert_eq!(parsed.meta.selected_indices, vec![0, 2]);
        assert_eq!(parsed.files, vec![Some(file)]);
    }
}

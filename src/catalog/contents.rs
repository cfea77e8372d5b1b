//! Image-set installation for an asset catalog.
//!
//! Each image set directory holds a `Contents.json` whose `images` array lists one entry per
//! scale. Installing copies the rendered files into the directory and points every `1x`/`2x`
//! entry at them. Keys the writer does not know about are carried through untouched.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{IconStackError, IconStackResult};
use crate::pipeline::store::{normalize_rel_path, write_atomic};

/// One rendered file to place in an image set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogFile {
    /// 1 or 2.
    pub scale: u32,
    /// Name inside the image set.
    pub file_name: String,
    /// Rendered file to copy.
    pub source: PathBuf,
}

/// What [`install`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Files copied into the image set.
    pub copied: Vec<PathBuf>,
    /// Whether `Contents.json` was rewritten.
    pub manifest_updated: bool,
}

/// Copy `files` into `catalog_root/subpath` and update that image set's `Contents.json`.
///
/// A missing manifest, or one without a matching scale entry, leaves the manifest untouched and
/// returns [`IconStackError::ManifestUpdateSkipped`] alongside the copied files, so callers can
/// log it as a warning.
pub fn install(
    catalog_root: &Path,
    subpath: &str,
    files: &[CatalogFile],
) -> (InstallOutcome, Option<IconStackError>) {
    let mut outcome = InstallOutcome {
        copied: Vec::new(),
        manifest_updated: false,
    };
    let dir = match normalize_rel_path(subpath) {
        Ok(rel) => catalog_root.join(rel),
        Err(e) => return (outcome, Some(e)),
    };

    for file in files {
        match copy_into(&dir, file) {
            Ok(dest) => outcome.copied.push(dest),
            Err(e) => return (outcome, Some(e)),
        }
    }

    match update_manifest(&dir.join("Contents.json"), files) {
        Ok(()) => {
            outcome.manifest_updated = true;
            (outcome, None)
        }
        Err(e) => (outcome, Some(e)),
    }
}

fn copy_into(dir: &Path, file: &CatalogFile) -> IconStackResult<PathBuf> {
    let name = normalize_rel_path(&file.file_name)?;
    let bytes = std::fs::read(&file.source)
        .with_context(|| format!("read rendered file {}", file.source.display()))?;
    let dest = dir.join(name);
    write_atomic(&dest, &bytes)?;
    Ok(dest)
}

/// Point each `images[]` entry whose `scale` matches one of `files` at that file's name.
pub fn update_manifest(path: &Path, files: &[CatalogFile]) -> IconStackResult<()> {
    if !path.is_file() {
        return Err(IconStackError::manifest_update_skipped(format!(
            "{} does not exist",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let mut doc: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| IconStackError::serde(format!("{}: {e}", path.display())))?;

    let updated = apply_filenames(&mut doc, files);
    if updated == 0 {
        return Err(IconStackError::manifest_update_skipped(format!(
            "{} has no entry for the installed scales",
            path.display()
        )));
    }

    let mut out = serde_json::to_string_pretty(&doc)
        .map_err(|e| IconStackError::serde(format!("{}: {e}", path.display())))?;
    out.push('\n');
    write_atomic(path, out.as_bytes())?;
    tracing::debug!(path = %path.display(), updated, "catalog manifest updated");
    Ok(())
}

/// Set `filename` on matching entries of `doc["images"]`; returns how many entries changed.
pub fn apply_filenames(doc: &mut serde_json::Value, files: &[CatalogFile]) -> usize {
    let Some(images) = doc.get_mut("images").and_then(|v| v.as_array_mut()) else {
        return 0;
    };
    let mut updated = 0;
    for entry in images {
        let Some(scale) = entry.get("scale").and_then(|s| s.as_str()) else {
            continue;
        };
        let Some(file) = files.iter().find(|f| scale_tag(f.scale) == scale) else {
            continue;
        };
        if let Some(obj) = entry.as_object_mut() {
            obj.insert(
                "filename".to_owned(),
                serde_json::Value::String(file.file_name.clone()),
            );
            updated += 1;
        }
    }
    updated
}

fn scale_tag(scale: u32) -> String {
    format!("{scale}x")
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/contents.rs"]
mod tests;

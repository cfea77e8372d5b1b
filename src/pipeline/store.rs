use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{IconStackError, IconStackResult};

/// Read-only access to files under the source directory.
#[derive(Clone, Debug)]
pub struct InputStore {
    root: PathBuf,
}

impl InputStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for a validated relative source path.
    pub fn resolve(&self, rel: &str) -> IconStackResult<PathBuf> {
        let norm = normalize_rel_path(rel)?;
        Ok(self.root.join(norm))
    }

    /// Read a source file. A missing file is [`IconStackError::SourceNotFound`].
    pub fn read(&self, rel: &str) -> IconStackResult<Vec<u8>> {
        let path = self.resolve(rel)?;
        if !path.is_file() {
            return Err(IconStackError::source_not_found(path.display().to_string()));
        }
        let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        Ok(bytes)
    }
}

/// Output directory with all-or-nothing file writes.
#[derive(Clone, Debug)]
pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    /// Use `root`, creating it if needed.
    pub fn create(root: impl Into<PathBuf>) -> IconStackResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create output dir {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` to `file_name` via a temporary sibling and a rename.
    pub fn write(&self, file_name: &str, bytes: &[u8]) -> IconStackResult<PathBuf> {
        let rel = normalize_rel_path(file_name)?;
        let dest = self.root.join(&rel);
        write_atomic(&dest, bytes)?;
        Ok(dest)
    }
}

/// Write `bytes` to `dest` through `<dest>.tmp`, so readers never see a partial file.
pub(crate) fn write_atomic(dest: &Path, bytes: &[u8]) -> IconStackResult<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let mut tmp = dest.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, dest) {
        let _ = std::fs::remove_file(&tmp);
        return Err(anyhow::Error::new(e)
            .context(format!("rename {} -> {}", tmp.display(), dest.display()))
            .into());
    }
    Ok(())
}

/// Normalize a relative path: forward slashes, no `.` segments, no `..`, not absolute.
pub fn normalize_rel_path(source: &str) -> IconStackResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(IconStackError::validation("paths must be relative"));
    }
    if s.is_empty() {
        return Err(IconStackError::validation("path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(IconStackError::validation("paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(IconStackError::validation("path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/store.rs"]
mod tests;

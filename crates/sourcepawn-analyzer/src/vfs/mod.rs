use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::Url;

const BUILTIN_SCHEME: &str = "builtin://";

/// Stable identifier of a source file.
///
/// Files on disk are keyed by their normalized path. Includes that could not
/// be found anywhere are keyed by a synthesized `builtin://<path>` placeholder
/// so they can still be recorded and upgraded once the file shows up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(String);

impl FileId {
    pub fn from_path(path: &Path) -> Self {
        Self(normalized_path(path).display().to_string())
    }

    pub fn from_url(url: &Url) -> Self {
        if let Ok(path) = url.to_file_path() {
            return Self::from_path(&path);
        }
        Self(url.as_str().to_owned())
    }

    pub fn builtin(include_path: &str) -> Self {
        Self(format!("{BUILTIN_SCHEME}{include_path}"))
    }

    pub fn is_builtin(&self) -> bool {
        self.0.starts_with(BUILTIN_SCHEME)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_path(&self) -> Option<PathBuf> {
        if self.is_builtin() || self.0.contains("://") {
            return None;
        }
        Some(PathBuf::from(&self.0))
    }

    pub fn to_url(&self) -> Option<Url> {
        match self.to_path() {
            Some(path) => Url::from_file_path(path).ok(),
            None => Url::parse(&self.0).ok(),
        }
    }

    /// Last path component, e.g. `sourcemod.inc`.
    pub fn file_name(&self) -> &str {
        let trimmed = self.0.trim_end_matches(['/', '\\']);
        trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
    }

    /// File name without its extension, e.g. `sourcemod`.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    pub fn parent_dir(&self) -> Option<PathBuf> {
        self.to_path().and_then(|path| path.parent().map(Path::to_path_buf))
    }
}

impl std::fmt::Display for FileId {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn normalized_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[path = "../../tests/src/vfs/file_id_tests.rs"]
mod tests;

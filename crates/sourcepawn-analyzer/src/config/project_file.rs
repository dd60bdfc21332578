use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

const PROJECT_FILENAME: &str = "sourcepawn.toml";

/// Walks parent directories from `start` looking for `sourcepawn.toml`.
pub(crate) fn find_project_file(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    loop {
        let candidate = dir.join(PROJECT_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Project layout declared next to the sources.
///
/// ```toml
/// main_path = "scripting/plugin.sp"
/// include_dirs = ["scripting/include", "../shared"]
/// sdk_root = "/opt/sourcemod/addons/sourcemod/scripting"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectFile {
    pub main_path: Option<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    pub sdk_root: Option<PathBuf>,
}

impl ProjectFile {
    /// Reads `path`, resolving relative entries against its directory.
    /// `None` when the file cannot be read or parsed.
    pub(crate) fn load(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let mut project: ProjectFile = match toml::from_str(&content) {
            Ok(project) => project,
            Err(error) => {
                warn!("ignoring {}: {error}", path.display());
                return None;
            },
        };
        project.resolve_against(path.parent()?);
        Some(project)
    }

    fn resolve_against(
        &mut self,
        base: &Path,
    ) {
        let absolute = |path: &PathBuf| {
            if path.is_absolute() {
                path.clone()
            } else {
                base.join(path)
            }
        };
        self.main_path = self.main_path.as_ref().map(absolute);
        self.sdk_root = self.sdk_root.as_ref().map(absolute);
        self.include_dirs = self.include_dirs.iter().map(absolute).collect();
    }
}

/// The nearest `sourcepawn.toml` above `source`, loaded.
pub(crate) fn project_file_for(source: &Path) -> Option<ProjectFile> {
    let path = find_project_file(source)?;
    ProjectFile::load(&path)
}

#[cfg(test)]
#[path = "../../tests/src/config/project_file_tests.rs"]
mod tests;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    parser::{IncludeKind, IncludeRequest, IncludeResolver},
    symbols::Include,
    vfs::FileId,
};

use super::{ItemsRepository, RepositoryConfig};

const INCLUDE_EXTENSION: &str = "inc";

/// `path` with `.inc` appended when it names neither an include nor a plugin.
fn with_include_extension(path: &str) -> String {
    if path.ends_with(".inc") || path.ends_with(".sp") {
        path.to_string()
    } else {
        format!("{path}.{INCLUDE_EXTENSION}")
    }
}

/// Resolves include directives against the repository's known documents and
/// the file system.
pub(crate) struct RepositoryResolver<'a> {
    pub(crate) repository: &'a ItemsRepository,
    pub(crate) config: &'a RepositoryConfig,
}

impl RepositoryResolver<'_> {
    fn exists(
        &self,
        candidate: &Path,
    ) -> Option<FileId> {
        let id = FileId::from_path(candidate);
        if self.repository.is_known(&id) || candidate.is_file() {
            Some(id)
        } else {
            None
        }
    }

    fn resolve_angle(
        &self,
        path: &str,
    ) -> Option<(FileId, bool)> {
        let sdk = self.config.sdk_include_dir().map(|dir| (dir, true));
        let extra = self.config.include_dirs.iter().map(|dir| (dir.clone(), false));
        sdk.into_iter()
            .chain(extra)
            .find_map(|(dir, builtin)| self.exists(&dir.join(path)).map(|id| (id, builtin)))
    }

    fn resolve_quoted(
        &self,
        raw: &str,
        path: &str,
        from: &FileId,
    ) -> Option<FileId> {
        let dir = from.parent_dir()?;
        let sibling_plugin = format!("{}.sp", raw.trim_end_matches(".inc").trim_end_matches(".sp"));
        [dir.join(path), dir.join("include").join(path), dir.join(sibling_plugin)]
            .iter()
            .find_map(|candidate| self.exists(candidate))
    }
}

impl IncludeResolver for RepositoryResolver<'_> {
    fn resolve_include(
        &self,
        request: &IncludeRequest<'_>,
    ) -> Option<Include> {
        let path = with_include_extension(request.path);
        if path == request.from.file_name() || request.path == request.from.file_name() {
            debug!("ignoring self include of {}", request.from);
            return None;
        }

        let resolved = match request.kind {
            IncludeKind::Angle => self.resolve_angle(&path),
            IncludeKind::Quoted => self
                .resolve_quoted(request.path, &path, request.from)
                .map(|id| (id, request.builtin)),
        };
        let include = match resolved {
            Some((target, _)) if &target == request.from => return None,
            Some((target, builtin)) => Include::new(target, builtin || request.builtin),
            None => Include::new(FileId::builtin(&path), request.kind == IncludeKind::Angle || request.builtin),
        };
        Some(include)
    }
}

/// Directories searched for `#include` targets of `file`, nearest first.
pub(crate) fn include_folders(
    config: &RepositoryConfig,
    file: &FileId,
) -> Vec<PathBuf> {
    let mut folders = Vec::new();
    if let Some(dir) = file.parent_dir() {
        folders.push(dir.join("include"));
        folders.push(dir);
    }
    folders.extend(config.sdk_include_dir());
    folders.extend(config.include_dirs.iter().cloned());
    folders
}

#[cfg(test)]
#[path = "../../tests/src/repository/include_tests.rs"]
mod tests;

use std::sync::Arc;

use crate::{
    analysis::items_at_position,
    ide::navigation::{IdeLocation, IdePosition, IdeRange},
    repository::{ItemsRepository, RepositoryConfig},
    vfs::FileId,
};

/// Uses of constants, enum members, functions and macros.
pub struct ReferenceProvider {
    repository: Arc<ItemsRepository>,
}

impl ReferenceProvider {
    pub fn new(repository: Arc<ItemsRepository>) -> Self {
        Self {
            repository,
        }
    }

    /// Every recorded use of the symbols under the cursor, across all parsed
    /// files. The declarations come first when `include_declaration` is set.
    pub fn references(
        &self,
        file: &FileId,
        config: &RepositoryConfig,
        line: &str,
        position: IdePosition,
        include_declaration: bool,
    ) -> Vec<IdeLocation> {
        let items = self.repository.get_all_items(file, config);
        let mut locations = Vec::new();
        for symbol in items_at_position(&items, file, line, position) {
            if include_declaration && !symbol.file.is_builtin() {
                locations.push(IdeLocation::new(symbol.file.clone(), symbol.range));
            }
            if symbol.kind.tracks_references() {
                locations.extend(self.repository.uses_of(symbol));
            }
        }
        locations.dedup();
        locations
    }

    /// Uses of the symbols under the cursor inside `file`, declaration
    /// included.
    pub fn highlights(
        &self,
        file: &FileId,
        config: &RepositoryConfig,
        line: &str,
        position: IdePosition,
    ) -> Vec<IdeRange> {
        self.references(file, config, line, position, true)
            .into_iter()
            .filter(|location| &location.file == file)
            .map(|location| location.range)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src/definition/references_tests.rs"]
mod tests;

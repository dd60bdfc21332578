use std::sync::Arc;

use tracing::debug;

use crate::{
    analysis::{include_directive, items_at_position},
    ide::navigation::{IdeLocation, IdePosition, IdeRange, NavigationTarget},
    repository::{ItemsRepository, RepositoryConfig},
    text_pos::utf16_column_of_byte_offset,
    vfs::FileId,
};

/// Resolves the declaration a cursor position refers to.
pub struct DefinitionProvider {
    repository: Arc<ItemsRepository>,
}

impl DefinitionProvider {
    pub fn new(repository: Arc<ItemsRepository>) -> Self {
        Self {
            repository,
        }
    }

    /// Defining ranges of the symbols under the cursor. On an `#include`
    /// line, the start of the included file.
    ///
    /// `line` is the text of `position.line` in `file`.
    pub fn definition(
        &self,
        file: &FileId,
        config: &RepositoryConfig,
        line: &str,
        position: IdePosition,
    ) -> Option<NavigationTarget> {
        if let Some(target) = self.include_target(file, config, line, position) {
            return Some(target);
        }

        let items = self.repository.get_all_items(file, config);
        let locations: Vec<IdeLocation> = items_at_position(&items, file, line, position)
            .into_iter()
            .filter(|symbol| !symbol.file.is_builtin())
            .map(|symbol| IdeLocation::new(symbol.file.clone(), symbol.range))
            .collect();
        debug!("definition at {}:{} -> {} location(s)", file.file_name(), position.line, locations.len());
        NavigationTarget::from_locations(locations)
    }

    fn include_target(
        &self,
        file: &FileId,
        config: &RepositoryConfig,
        line: &str,
        position: IdePosition,
    ) -> Option<NavigationTarget> {
        let directive = include_directive(line)?;
        let start = utf16_column_of_byte_offset(line, directive.start);
        let end = utf16_column_of_byte_offset(line, directive.end);
        if position.character < start || position.character > end {
            return None;
        }
        let target = self.repository.resolve_include(file, &directive.path, directive.kind, config)?;
        Some(NavigationTarget::Single(IdeLocation::new(target, IdeRange::on_line(0, 0, 0))))
    }
}

#[cfg(test)]
#[path = "../../tests/src/definition/provider_tests.rs"]
mod tests;

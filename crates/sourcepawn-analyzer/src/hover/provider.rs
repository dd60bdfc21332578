use std::sync::Arc;

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position};

use crate::{
    analysis::{include_directive, items_at_position, word_at},
    ide::{
        IdeRange,
        lsp::{ide_range_to_lsp, lsp_position_to_ide},
    },
    repository::{ItemsRepository, RepositoryConfig},
    symbols::{Symbol, SymbolKind},
    text_pos::utf16_column_of_byte_offset,
    vfs::FileId,
};

use super::markdown::description_to_markdown;

const DOCUMENTATION_SITE: &str = "https://sourcemod.dev/#";

/// Hover cards for the symbol under the cursor.
pub struct HoverProvider {
    repository: Arc<ItemsRepository>,
}

impl HoverProvider {
    pub fn new(repository: Arc<ItemsRepository>) -> Self {
        Self {
            repository,
        }
    }

    /// `line` is the text of `position.line` in `file`.
    pub fn provide(
        &self,
        file: &FileId,
        config: &RepositoryConfig,
        line: &str,
        position: Position,
    ) -> Option<Hover> {
        if let Some(hover) = self.include_hover(file, config, line, position) {
            return Some(hover);
        }

        let items = self.repository.get_all_items(file, config);
        let position = lsp_position_to_ide(position);
        let symbol = items_at_position(&items, file, line, position).into_iter().next()?;
        let word = word_at(line, position.line, position.character)?;
        tracing::debug!("hover on {} ({:?})", symbol.name, symbol.kind);

        Some(markdown_hover(render_symbol(symbol), word.range))
    }

    /// Resolved path of the include under the cursor.
    fn include_hover(
        &self,
        file: &FileId,
        config: &RepositoryConfig,
        line: &str,
        position: Position,
    ) -> Option<Hover> {
        let directive = include_directive(line)?;
        let start = utf16_column_of_byte_offset(line, directive.start);
        let end = utf16_column_of_byte_offset(line, directive.end);
        if position.character < start || position.character > end {
            return None;
        }
        let target = self.repository.resolve_include(file, &directive.path, directive.kind, config)?;
        let path = target.to_path().map_or_else(|| target.to_string(), |path| path.display().to_string());
        Some(markdown_hover(format!("`{path}`"), IdeRange::on_line(position.line, start, end)))
    }
}

fn markdown_hover(
    value: String,
    range: IdeRange,
) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: Some(ide_range_to_lsp(range)),
    }
}

/// Declaration block, documentation link for built-ins, then the rendered
/// description.
pub fn render_symbol(symbol: &Symbol) -> String {
    let declaration = if symbol.detail.is_empty() {
        symbol.name.as_str()
    } else {
        symbol.detail.as_str()
    };
    let mut sections = vec![format!("```sourcepawn\n{declaration}\n```")];

    if symbol.builtin
        && let Some(link) = documentation_link(symbol)
    {
        sections.push(format!("[Online Documentation]({link})"));
    }

    let mut description = symbol.description.clone();
    if let Some(note) = &symbol.deprecated {
        description.push_str(&format!("\nDEPRECATED {note}"));
    }
    let description = description_to_markdown(&description);
    if !description.is_empty() {
        sections.push(description);
    }
    sections.join("\n\n")
}

fn documentation_link(symbol: &Symbol) -> Option<String> {
    let page = symbol.file.stem();
    match symbol.kind {
        SymbolKind::Function => Some(format!("{DOCUMENTATION_SITE}/{page}/function.{}", symbol.name)),
        SymbolKind::Methodmap => Some(format!("{DOCUMENTATION_SITE}/{page}/methodmap.{}", symbol.name)),
        SymbolKind::Method | SymbolKind::Constructor | SymbolKind::Property => Some(format!(
            "{DOCUMENTATION_SITE}/{page}/methodmap.{}/function.{}",
            symbol.parent, symbol.name
        )),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/src/hover/provider_tests.rs"]
mod tests;

use std::sync::Arc;

use tower_lsp::lsp_types::{DocumentSymbol, Location, SymbolInformation, SymbolTag};
use tracing::debug;

use crate::{
    ide::lsp::{document_symbol_kind, ide_range_to_lsp},
    repository::ItemsRepository,
    vfs::FileId,
};

use super::{FileTable, Symbol, SymbolKind};

const WORKSPACE_SYMBOL_LIMIT: usize = 100;

/// Outline and workspace symbol search over the repository's tables.
#[derive(Clone)]
pub struct SymbolProvider {
    repository: Arc<ItemsRepository>,
}

impl SymbolProvider {
    pub fn new(repository: Arc<ItemsRepository>) -> Self {
        Self {
            repository,
        }
    }

    /// Nested outline of `file`. Empty when the file was never parsed.
    pub fn document_symbols(
        &self,
        file: &FileId,
    ) -> Vec<DocumentSymbol> {
        match self.repository.table(file) {
            Some(table) => outline(&table),
            None => Vec::new(),
        }
    }

    /// Case-insensitive substring search over every parsed file.
    pub fn workspace_symbols(
        &self,
        query: &str,
    ) -> Vec<SymbolInformation> {
        let needle = query.to_lowercase();
        let mut tables = self.repository.all_tables();
        tables.sort_by(|a, b| a.file().cmp(b.file()));

        let mut results = Vec::new();
        for symbol in tables.iter().flat_map(|table| table.symbols().iter()) {
            if results.len() >= WORKSPACE_SYMBOL_LIMIT {
                break;
            }
            if matches!(symbol.kind, SymbolKind::Comment | SymbolKind::Keyword)
                || !symbol.name.to_lowercase().contains(&needle)
            {
                continue;
            }
            let Some(uri) = symbol.file.to_url() else {
                continue;
            };
            #[allow(deprecated)]
            results.push(SymbolInformation {
                name: symbol.name.clone(),
                kind: document_symbol_kind(symbol.kind),
                tags: tags(symbol),
                deprecated: None,
                location: Location {
                    uri,
                    range: ide_range_to_lsp(symbol.range),
                },
                container_name: (!symbol.is_global()).then(|| symbol.parent.clone()),
            });
        }
        debug!("[workspace-symbol] '{query}' matched {} symbols", results.len());
        results
    }
}

fn is_outline_root(symbol: &Symbol) -> bool {
    match symbol.kind {
        SymbolKind::Function
        | SymbolKind::Methodmap
        | SymbolKind::EnumStruct
        | SymbolKind::Enum
        | SymbolKind::Constant
        | SymbolKind::TypeDef
        | SymbolKind::TypeSet => true,
        SymbolKind::Variable => symbol.is_global(),
        _ => false,
    }
}

fn is_outline_child(
    symbol: &Symbol,
    root: &Symbol,
) -> bool {
    if symbol.parent != root.name {
        return false;
    }
    match symbol.kind {
        SymbolKind::Method | SymbolKind::Constructor | SymbolKind::Property => root.kind.is_container(),
        SymbolKind::EnumMember => root.kind == SymbolKind::Enum,
        // Locals of enum struct methods share their parent name with the method,
        // not with a top-level function.
        SymbolKind::Variable => root.kind == SymbolKind::Function && symbol.enum_struct.is_none(),
        _ => false,
    }
}

fn outline(table: &FileTable) -> Vec<DocumentSymbol> {
    let file = table.file();
    table
        .symbols()
        .iter()
        .filter(|symbol| !symbol.builtin && &symbol.file == file && is_outline_root(symbol))
        .map(|root| {
            let children: Vec<DocumentSymbol> = table
                .symbols()
                .iter()
                .filter(|symbol| is_outline_child(symbol, root))
                .map(|child| document_symbol(child, None))
                .collect();
            document_symbol(root, (!children.is_empty()).then_some(children))
        })
        .collect()
}

fn document_symbol(
    symbol: &Symbol,
    children: Option<Vec<DocumentSymbol>>,
) -> DocumentSymbol {
    let selection_range = ide_range_to_lsp(symbol.range);
    #[allow(deprecated)]
    DocumentSymbol {
        name: symbol.name.clone(),
        detail: (!symbol.detail.is_empty()).then(|| symbol.detail.clone()),
        kind: document_symbol_kind(symbol.kind),
        tags: tags(symbol),
        deprecated: None,
        range: symbol.full_range().map(ide_range_to_lsp).unwrap_or(selection_range),
        selection_range,
        children,
    }
}

fn tags(symbol: &Symbol) -> Option<Vec<SymbolTag>> {
    symbol.deprecated.as_ref().map(|_| vec![SymbolTag::DEPRECATED])
}

#[cfg(test)]
#[path = "../../tests/src/symbols/provider_tests.rs"]
mod tests;

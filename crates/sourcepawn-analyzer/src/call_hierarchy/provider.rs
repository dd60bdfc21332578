use std::sync::Arc;

use tower_lsp::lsp_types::{CallHierarchyIncomingCall, CallHierarchyItem, CallHierarchyOutgoingCall, Range, SymbolTag};

use crate::{
    analysis::items_at_position,
    ide::{
        IdeLocation, IdePosition,
        lsp::{document_symbol_kind, ide_range_to_lsp, lsp_range_to_ide},
    },
    repository::{ItemSet, ItemsRepository, RepositoryConfig},
    symbols::{Symbol, SymbolKind},
    vfs::FileId,
};

/// Call hierarchy built from recorded uses and function full ranges.
pub struct CallHierarchyProvider {
    repository: Arc<ItemsRepository>,
}

impl CallHierarchyProvider {
    pub fn new(repository: Arc<ItemsRepository>) -> Self {
        Self {
            repository,
        }
    }

    /// Functions and methods under the cursor.
    pub fn prepare(
        &self,
        file: &FileId,
        config: &RepositoryConfig,
        line: &str,
        position: IdePosition,
    ) -> Vec<CallHierarchyItem> {
        let items = self.repository.get_all_items(file, config);
        items_at_position(&items, file, line, position)
            .into_iter()
            .filter(|symbol| is_call_target(symbol.kind))
            .filter_map(hierarchy_item)
            .collect()
    }

    /// Callers of `item`, each with the ranges of its calls.
    pub fn incoming(
        &self,
        item: &CallHierarchyItem,
        config: &RepositoryConfig,
    ) -> Vec<CallHierarchyIncomingCall> {
        let file = FileId::from_url(&item.uri);
        let items = self.repository.get_all_items(&file, config);
        let Some(target) = resolve_item(&items, &file, item) else {
            return Vec::new();
        };
        let uses = self.repository.uses_of(target);

        let mut tables = self.repository.all_tables();
        tables.sort_by(|a, b| a.file().cmp(b.file()));
        tables
            .iter()
            .flat_map(|table| table.symbols().iter())
            .filter(|caller| is_caller(caller.kind))
            .filter_map(|caller| {
                let from_ranges = calls_inside(caller, &uses);
                if from_ranges.is_empty() {
                    return None;
                }
                Some(CallHierarchyIncomingCall {
                    from: hierarchy_item(caller)?,
                    from_ranges,
                })
            })
            .collect()
    }

    /// Functions and methods `item` calls, each with the ranges of the calls.
    pub fn outgoing(
        &self,
        item: &CallHierarchyItem,
        config: &RepositoryConfig,
    ) -> Vec<CallHierarchyOutgoingCall> {
        let file = FileId::from_url(&item.uri);
        let items = self.repository.get_all_items(&file, config);
        let Some(caller) = resolve_item(&items, &file, item) else {
            return Vec::new();
        };

        items
            .iter()
            .filter(|callee| is_call_target(callee.kind))
            .filter_map(|callee| {
                let uses = self.repository.uses_of(callee);
                let from_ranges = calls_inside(caller, &uses);
                if from_ranges.is_empty() {
                    return None;
                }
                Some(CallHierarchyOutgoingCall {
                    to: hierarchy_item(callee)?,
                    from_ranges,
                })
            })
            .collect()
    }
}

fn is_call_target(kind: SymbolKind) -> bool {
    matches!(kind, SymbolKind::Function | SymbolKind::Method)
}

fn is_caller(kind: SymbolKind) -> bool {
    matches!(kind, SymbolKind::Function | SymbolKind::Method | SymbolKind::Constructor)
}

/// The symbol an item handed out by [`CallHierarchyProvider::prepare`]
/// stands for.
fn resolve_item<'i>(
    items: &'i ItemSet,
    file: &FileId,
    item: &CallHierarchyItem,
) -> Option<&'i Symbol> {
    let selection = lsp_range_to_ide(item.selection_range);
    items.iter().find(|symbol| {
        is_caller(symbol.kind) && &symbol.file == file && symbol.name == item.name && symbol.range == selection
    })
}

/// Ranges of `uses` inside the body of `caller`.
fn calls_inside(
    caller: &Symbol,
    uses: &[IdeLocation],
) -> Vec<Range> {
    let Some(body) = caller.full_range() else {
        return Vec::new();
    };
    uses.iter()
        .filter(|location| location.file == caller.file && body.contains_range(&location.range))
        .map(|location| ide_range_to_lsp(location.range))
        .collect()
}

/// `None` for symbols of placeholder files.
fn hierarchy_item(symbol: &Symbol) -> Option<CallHierarchyItem> {
    Some(CallHierarchyItem {
        name: symbol.name.clone(),
        kind: document_symbol_kind(symbol.kind),
        tags: symbol.deprecated.as_ref().map(|_| vec![SymbolTag::DEPRECATED]),
        detail: Some(symbol.detail.clone()).filter(|detail| !detail.is_empty()),
        uri: symbol.file.to_url()?,
        range: ide_range_to_lsp(symbol.full_range().unwrap_or(symbol.range)),
        selection_range: ide_range_to_lsp(symbol.range),
        data: None,
    })
}

#[cfg(test)]
#[path = "../../tests/src/call_hierarchy/provider_tests.rs"]
mod tests;

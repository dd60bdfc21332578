use crate::{
    ide::{IdePosition, IdeRange},
    repository::ItemSet,
    symbols::{GLOBAL_SCOPE, Symbol, SymbolKind},
    vfs::FileId,
};

/// Innermost function and innermost methodmap or enum struct around a
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnclosingScope {
    pub function: Option<String>,
    pub container: Option<String>,
    pub container_kind: Option<SymbolKind>,
}

impl EnclosingScope {
    /// Scope name locals of the enclosing function are recorded under.
    pub fn function_name(&self) -> &str {
        self.function.as_deref().unwrap_or(GLOBAL_SCOPE)
    }

    /// Whether a variable declared with `symbol`'s scope is visible here.
    pub fn sees_variable(
        &self,
        symbol: &Symbol,
    ) -> bool {
        if symbol.is_global() {
            return true;
        }
        if self.function.as_deref() != Some(symbol.parent.as_str()) {
            return false;
        }
        match &symbol.enum_struct {
            Some(enum_struct) => self.container.as_deref() == Some(enum_struct.as_str()),
            None => true,
        }
    }
}

/// Scans the callables and containers declared in `file` for the innermost
/// ones whose full range holds `position`.
pub fn resolve_enclosing_scope(
    items: &ItemSet,
    file: &FileId,
    position: IdePosition,
) -> EnclosingScope {
    let mut function: Option<(&Symbol, IdeRange)> = None;
    let mut container: Option<(&Symbol, IdeRange)> = None;

    for symbol in items.iter().filter(|symbol| &symbol.file == file) {
        let Some(full) = symbol.full_range() else {
            continue;
        };
        if !full.contains_inclusive(position) {
            continue;
        }
        let slot = match symbol.kind {
            SymbolKind::Function | SymbolKind::Method | SymbolKind::Constructor => &mut function,
            SymbolKind::Methodmap | SymbolKind::EnumStruct => &mut container,
            _ => continue,
        };
        if slot.is_none_or(|(_, best)| best.start <= full.start) {
            *slot = Some((symbol, full));
        }
    }

    EnclosingScope {
        function: function.map(|(symbol, _)| symbol.name.clone()),
        container: container.map(|(symbol, _)| symbol.name.clone()),
        container_kind: container.map(|(symbol, _)| symbol.kind),
    }
}

/// Whether `range` lies inside a comment recorded for `file`.
pub fn is_in_comment(
    items: &ItemSet,
    file: &FileId,
    range: IdeRange,
) -> bool {
    items
        .iter()
        .any(|symbol| symbol.kind == SymbolKind::Comment && &symbol.file == file && symbol.range.contains_range(&range))
}

/// Whether byte offset `end` of `line` falls inside a string or character
/// literal.
pub fn is_in_string(
    line: &str,
    end: usize,
) -> bool {
    let mut delimiter: Option<char> = None;
    let mut escaped = false;
    for (at, ch) in line.char_indices() {
        if at >= end {
            break;
        }
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' | '\'' => match delimiter {
                Some(open) if open == ch => delimiter = None,
                None => delimiter = Some(ch),
                Some(_) => {},
            },
            _ => {},
        }
    }
    delimiter.is_some()
}

#[cfg(test)]
#[path = "../../tests/src/analysis/scope_tests.rs"]
mod tests;

use std::{collections::HashSet, sync::Arc};

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionItemTag, CompletionTextEdit, Documentation, InsertTextFormat,
    MarkupContent, MarkupKind, Position, Range, TextEdit,
};

use crate::{
    analysis::{
        EnclosingScope, MemberExpression, is_word_char, parse_member_expression, resolve_enclosing_scope,
        resolve_expression_type, resolve_inheritance_chain, visible_members,
    },
    hover::description_to_markdown,
    ide::lsp::{completion_kind, lsp_position_to_ide},
    repository::{ItemSet, ItemsRepository, RepositoryConfig},
    symbols::{Symbol, SymbolKind},
    text_pos::byte_offset_of_utf16_column,
    vfs::FileId,
};

use super::{
    context::{CursorContext, detect_context},
    doc_comment::doc_skeleton,
    includes::include_completions,
};

/// One completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub file: &'a FileId,
    /// Configuration of the project `file` belongs to.
    pub config: &'a RepositoryConfig,
    /// Text of the line holding the cursor.
    pub line: &'a str,
    /// Text of the line below the cursor, if any.
    pub next_line: Option<&'a str>,
    pub position: Position,
    /// Character that triggered the request, if any.
    pub trigger: Option<&'a str>,
    /// Offer `$` callback snippets for forwards.
    pub snippets: bool,
}

/// Completion candidates drawn from the include closure of the edited file.
pub struct CompletionProvider {
    repository: Arc<ItemsRepository>,
}

impl CompletionProvider {
    pub fn new(repository: Arc<ItemsRepository>) -> Self {
        Self {
            repository,
        }
    }

    pub fn provide(
        &self,
        request: CompletionRequest<'_>,
    ) -> Vec<CompletionItem> {
        let prefix = &request.line[..byte_offset_of_utf16_column(request.line, request.position.character)];
        let context = detect_context(prefix, request.trigger);
        tracing::debug!("completion context {context:?}");

        let items = match &context {
            CursorContext::Include {
                kind,
                typed,
            } => return include_completions(&self.repository, request.file, request.config, typed, *kind),
            CursorContext::DocComment => {
                return request
                    .next_line
                    .and_then(|next_line| doc_skeleton(next_line, request.position))
                    .into_iter()
                    .collect();
            },
            CursorContext::Nothing => return Vec::new(),
            CursorContext::Snippet if !request.snippets => return Vec::new(),
            _ => self.repository.get_all_items(request.file, request.config),
        };
        let scope = resolve_enclosing_scope(&items, request.file, lsp_position_to_ide(request.position));

        match context {
            CursorContext::Snippet => forward_snippets(&items, request.position),
            CursorContext::Constructor {
                declared,
                target,
            } => constructor_completions(&items, &scope, declared, &target),
            CursorContext::MemberAccess(expression) => member_completions(&items, &scope, &expression),
            _ => general_completions(&items, &scope),
        }
    }
}

fn general_completions(
    items: &ItemSet,
    scope: &EnclosingScope,
) -> Vec<CompletionItem> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|symbol| {
            !symbol.kind.is_member() && !matches!(symbol.kind, SymbolKind::Comment | SymbolKind::Include)
        })
        // Anonymous enums have no name to complete.
        .filter(|symbol| !symbol.name.is_empty() && symbol.name.chars().all(is_word_char))
        .filter(|symbol| symbol.kind != SymbolKind::Variable || scope.sees_variable(symbol))
        .filter(|symbol| seen.insert((symbol.name.as_str(), symbol.kind)))
        .map(symbol_item)
        .collect()
}

/// Members of the receiver's type and its ancestors. A receiver naming a type
/// only sees static members, a value only sees instance members.
fn member_completions(
    items: &ItemSet,
    scope: &EnclosingScope,
    expression: &MemberExpression,
) -> Vec<CompletionItem> {
    let Some(resolved) = resolve_expression_type(expression, items, scope) else {
        return Vec::new();
    };
    let chain = resolve_inheritance_chain(items, &resolved.type_name);
    visible_members(items, &chain)
        .into_iter()
        .filter(|symbol| symbol.kind != SymbolKind::Constructor && symbol.is_static() == resolved.static_access)
        .map(symbol_item)
        .collect()
}

/// Every constructor, preselecting the one of the assigned variable's type.
fn constructor_completions(
    items: &ItemSet,
    scope: &EnclosingScope,
    declared: Option<String>,
    target: &str,
) -> Vec<CompletionItem> {
    let declared = declared.or_else(|| {
        let receiver = format!("{target}.");
        let expression = parse_member_expression(&receiver, receiver.len())?;
        resolve_expression_type(&expression, items, scope).map(|resolved| resolved.type_name)
    });
    items
        .iter()
        .filter(|symbol| symbol.kind == SymbolKind::Constructor)
        .map(|symbol| {
            let mut item = symbol_item(symbol);
            if declared.as_deref() == Some(symbol.name.as_str()) {
                item.preselect = Some(true);
            }
            item
        })
        .collect()
}

/// Callback skeletons for every `forward`, replacing the `$` before the cursor.
fn forward_snippets(
    items: &ItemSet,
    position: Position,
) -> Vec<CompletionItem> {
    let range = Range::new(Position::new(position.line, position.character.saturating_sub(1)), position);
    items
        .iter()
        .filter(|symbol| symbol.kind == SymbolKind::Function && is_forward(symbol))
        .map(|symbol| {
            let params = symbol
                .detail
                .find('(')
                .zip(symbol.detail.rfind(')'))
                .filter(|(open, close)| open < close)
                .map_or("", |(open, close)| &symbol.detail[open + 1..close]);
            let header = format!("{} {}", symbol.type_name, symbol.name);
            let body = format!("public {}({})\n{{\n\t$0\n}}", header.trim(), escape_snippet(params));
            CompletionItem {
                label: symbol.name.clone(),
                kind: Some(CompletionItemKind::SNIPPET),
                detail: Some(symbol.detail.clone()),
                filter_text: Some(format!("${}", symbol.name)),
                insert_text_format: Some(InsertTextFormat::SNIPPET),
                text_edit: Some(CompletionTextEdit::Edit(TextEdit::new(range, body))),
                ..Default::default()
            }
        })
        .collect()
}

fn is_forward(symbol: &Symbol) -> bool {
    symbol
        .detail
        .split('(')
        .next()
        .is_some_and(|head| head.split_whitespace().any(|word| word == "forward"))
}

fn escape_snippet(text: &str) -> String {
    text.replace('\\', "\\\\").replace('$', "\\$").replace('}', "\\}")
}

fn symbol_item(symbol: &Symbol) -> CompletionItem {
    let description = description_to_markdown(&symbol.description);
    CompletionItem {
        label: symbol.name.clone(),
        kind: Some(completion_kind(symbol.kind)),
        detail: (!symbol.detail.is_empty()).then(|| symbol.detail.clone()),
        documentation: (!description.is_empty()).then(|| {
            Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value: description,
            })
        }),
        tags: symbol.deprecated.as_ref().map(|_| vec![CompletionItemTag::DEPRECATED]),
        ..Default::default()
    }
}

#[cfg(test)]
#[path = "../../tests/src/completion/provider_tests.rs"]
mod tests;

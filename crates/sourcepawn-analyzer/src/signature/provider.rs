use std::sync::Arc;

use tower_lsp::lsp_types::{
    Documentation, MarkupContent, MarkupKind, ParameterInformation, ParameterLabel, Position, SignatureHelp,
    SignatureInformation,
};

use crate::{
    analysis::{
        parse_member_expression, resolve_enclosing_scope, resolve_expression_type, resolve_inheritance_chain,
        visible_members,
    },
    hover::description_to_markdown,
    ide::lsp::lsp_position_to_ide,
    parser::{CONTROL_KEYWORD, TRAILING_CALL, TRAILING_CONSTRUCTOR_CALL, TRAILING_METHOD_CALL},
    repository::{ItemSet, ItemsRepository, RepositoryConfig},
    symbols::{Symbol, SymbolKind},
    vfs::FileId,
};

use super::call_site::{CallSite, find_call_site};

/// Signature help for the call around the cursor.
pub struct SignatureHelpProvider {
    repository: Arc<ItemsRepository>,
}

impl SignatureHelpProvider {
    pub fn new(repository: Arc<ItemsRepository>) -> Self {
        Self {
            repository,
        }
    }

    /// `text` is the full content of `file`.
    pub fn provide(
        &self,
        file: &FileId,
        config: &RepositoryConfig,
        text: &str,
        position: Position,
    ) -> Option<SignatureHelp> {
        let lines: Vec<&str> = text.lines().collect();
        let site = find_call_site(&lines, position.line, position.character)?;
        let items = self.repository.get_all_items(file, config);

        let candidates = callees(&items, file, &site, position);
        if candidates.is_empty() {
            return None;
        }
        Some(SignatureHelp {
            signatures: candidates.into_iter().map(signature_information).collect(),
            active_signature: Some(0),
            active_parameter: Some(site.active_parameter),
        })
    }
}

fn callees<'i>(
    items: &'i ItemSet,
    file: &FileId,
    site: &CallSite,
    position: Position,
) -> Vec<&'i Symbol> {
    let callee = site.callee.as_str();

    if let Some(caps) = TRAILING_METHOD_CALL.captures(callee) {
        let scope = resolve_enclosing_scope(items, file, lsp_position_to_ide(position));
        let Some(resolved) = parse_member_expression(callee, callee.len())
            .and_then(|expression| resolve_expression_type(&expression, items, &scope))
        else {
            return Vec::new();
        };
        let chain = resolve_inheritance_chain(items, &resolved.type_name);
        return visible_members(items, &chain)
            .into_iter()
            .filter(|member| member.kind != SymbolKind::Constructor && member.name == caps[1])
            .collect();
    }

    if let Some(caps) = TRAILING_CONSTRUCTOR_CALL.captures(callee) {
        return items.iter().filter(|symbol| symbol.kind == SymbolKind::Constructor && symbol.name == caps[1]).collect();
    }

    let Some(caps) = TRAILING_CALL.captures(callee) else {
        return Vec::new();
    };
    let name = &caps[1];
    if CONTROL_KEYWORD.is_match(name) {
        return Vec::new();
    }
    let mut functions: Vec<&Symbol> = items
        .iter()
        .filter(|symbol| matches!(symbol.kind, SymbolKind::Function | SymbolKind::Macro) && symbol.name == name)
        .collect();
    // The best documented declaration first.
    functions.sort_by_key(|symbol| std::cmp::Reverse(symbol.description.len()));
    functions
}

fn signature_information(symbol: &Symbol) -> SignatureInformation {
    let description = description_to_markdown(&symbol.description);
    let parameters = symbol
        .params
        .iter()
        .map(|param| ParameterInformation {
            label: ParameterLabel::Simple(param.name.clone()),
            documentation: (!param.documentation.is_empty())
                .then(|| Documentation::String(param.documentation.clone())),
        })
        .collect();
    SignatureInformation {
        label: if symbol.detail.is_empty() {
            symbol.name.clone()
        } else {
            symbol.detail.clone()
        },
        documentation: (!description.is_empty()).then(|| {
            Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value: description,
            })
        }),
        parameters: Some(parameters),
        active_parameter: None,
    }
}

#[cfg(test)]
#[path = "../../tests/src/signature/provider_tests.rs"]
mod tests;

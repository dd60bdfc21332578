use tower_lsp::lsp_types::{SemanticTokenModifier, SemanticTokenType};

use crate::{
    semantic_tokens::{LEGEND_MODIFIERS, LEGEND_TYPES},
    symbols::{Symbol, SymbolKind},
};

/// Token for the name at a symbol's own declaration, if its kind gets one.
pub(crate) fn declaration_token(symbol: &Symbol) -> Option<(SemanticTokenType, Vec<SemanticTokenModifier>)> {
    let token_type = match symbol.kind {
        SymbolKind::Variable => SemanticTokenType::VARIABLE,
        SymbolKind::Function => SemanticTokenType::FUNCTION,
        SymbolKind::Method => SemanticTokenType::METHOD,
        SymbolKind::Methodmap | SymbolKind::EnumStruct => SemanticTokenType::CLASS,
        _ => return None,
    };
    Some((token_type, vec![SemanticTokenModifier::DECLARATION]))
}

/// Token for a use of `symbol`. Uses of deprecated callables are marked.
pub(crate) fn reference_token(symbol: &Symbol) -> Option<(SemanticTokenType, Vec<SemanticTokenModifier>)> {
    let (token_type, mut modifiers) = match symbol.kind {
        SymbolKind::Variable => (SemanticTokenType::VARIABLE, Vec::new()),
        SymbolKind::Constant => (SemanticTokenType::MACRO, vec![SemanticTokenModifier::READONLY]),
        SymbolKind::Macro => (SemanticTokenType::MACRO, Vec::new()),
        SymbolKind::EnumMember => (SemanticTokenType::ENUM_MEMBER, vec![SemanticTokenModifier::READONLY]),
        SymbolKind::Function => (SemanticTokenType::FUNCTION, Vec::new()),
        SymbolKind::Method => (SemanticTokenType::METHOD, Vec::new()),
        SymbolKind::Property => (SemanticTokenType::PROPERTY, Vec::new()),
        SymbolKind::Constructor | SymbolKind::Methodmap | SymbolKind::EnumStruct => {
            (SemanticTokenType::CLASS, Vec::new())
        },
        _ => return None,
    };
    if symbol.kind.is_callable() && symbol.deprecated.is_some() {
        modifiers.push(SemanticTokenModifier::DEPRECATED);
    }
    Some((token_type, modifiers))
}

pub(crate) fn get_token_type_index(token_type: &SemanticTokenType) -> u32 {
    LEGEND_TYPES.iter().position(|t| t == token_type).unwrap_or(0) as u32
}

pub(crate) fn get_modifier_bitset(modifiers: &[SemanticTokenModifier]) -> u32 {
    modifiers
        .iter()
        .filter_map(|modifier| LEGEND_MODIFIERS.iter().position(|m| m == modifier))
        .fold(0, |bits, index| bits | (1 << index))
}

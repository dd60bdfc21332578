//! Semantic tokens for declarations and recorded uses of symbols.

pub(crate) mod mapping;
pub(crate) mod provider;

use tower_lsp::lsp_types::{SemanticToken, SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};

pub use self::provider::SemanticTokenProvider;

pub const LEGEND_TYPES: &[SemanticTokenType] = &[
    SemanticTokenType::VARIABLE,
    SemanticTokenType::FUNCTION,
    SemanticTokenType::METHOD,
    SemanticTokenType::PROPERTY,
    SemanticTokenType::MACRO,
    SemanticTokenType::ENUM_MEMBER,
    SemanticTokenType::CLASS,
];

pub const LEGEND_MODIFIERS: &[SemanticTokenModifier] = &[
    SemanticTokenModifier::DECLARATION,
    SemanticTokenModifier::READONLY,
    SemanticTokenModifier::DEPRECATED,
];

pub fn get_legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: LEGEND_TYPES.into(),
        token_modifiers: LEGEND_MODIFIERS.into(),
    }
}

/// A raw token before delta encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawToken {
    pub(crate) line: u32,
    pub(crate) col: u32,
    pub(crate) length: u32,
    pub(crate) token_type: SemanticTokenType,
    pub(crate) modifiers: Vec<SemanticTokenModifier>,
}

/// Sort tokens and encode as LSP delta format. Of several tokens at one
/// position the first pushed wins.
pub(crate) fn encode_delta(mut tokens: Vec<RawToken>) -> Vec<SemanticToken> {
    tokens.sort_by(|a, b| a.line.cmp(&b.line).then(a.col.cmp(&b.col)));
    tokens.dedup_by(|a, b| a.line == b.line && a.col == b.col);

    let mut result = Vec::with_capacity(tokens.len());
    let mut prev_line = 0u32;
    let mut prev_col = 0u32;

    for tok in tokens {
        let delta_line = tok.line - prev_line;
        let delta_col = if delta_line == 0 {
            tok.col - prev_col
        } else {
            tok.col
        };

        result.push(SemanticToken {
            delta_line,
            delta_start: delta_col,
            length: tok.length,
            token_type: mapping::get_token_type_index(&tok.token_type),
            token_modifiers_bitset: mapping::get_modifier_bitset(&tok.modifiers),
        });

        prev_line = tok.line;
        prev_col = tok.col;
    }

    result
}

#[cfg(test)]
#[path = "../../tests/src/semantic_tokens/mod_tests.rs"]
mod tests;

use std::sync::Arc;

use tower_lsp::lsp_types::{SemanticToken, SemanticTokenModifier, SemanticTokenType};

use crate::{
    ide::IdeRange,
    repository::{ItemsRepository, RepositoryConfig},
    semantic_tokens::{
        RawToken, encode_delta,
        mapping::{declaration_token, reference_token},
    },
    symbols::Symbol,
    vfs::FileId,
};

/// Tokens for one file, drawn from the symbols of its include closure.
pub struct SemanticTokenProvider {
    repository: Arc<ItemsRepository>,
}

impl SemanticTokenProvider {
    pub fn new(repository: Arc<ItemsRepository>) -> Self {
        Self {
            repository,
        }
    }

    pub fn provide(
        &self,
        file: &FileId,
        config: &RepositoryConfig,
    ) -> Vec<SemanticToken> {
        let items = self.repository.get_all_items(file, config);
        let mut raw_tokens = Vec::new();

        // Declarations first so they win over a use at the same position.
        for symbol in items.iter().filter(|symbol| &symbol.file == file) {
            if let Some((token_type, modifiers)) = declaration_token(symbol) {
                push_token(&mut raw_tokens, symbol.range, token_type, modifiers);
            }
        }
        for symbol in items.iter().filter(|symbol| &symbol.file == file) {
            push_uses(&mut raw_tokens, symbol, &symbol.references);
        }

        if let Some(table) = self.repository.table(file) {
            for reference in table.outgoing_references() {
                let target = items.iter().find(|symbol| {
                    symbol.name == reference.name && symbol.file == reference.target && symbol.is_global()
                });
                if let Some(symbol) = target {
                    push_uses(&mut raw_tokens, symbol, std::slice::from_ref(&reference.range));
                }
            }
        }

        encode_delta(raw_tokens)
    }
}

fn push_uses(
    raw_tokens: &mut Vec<RawToken>,
    symbol: &Symbol,
    ranges: &[IdeRange],
) {
    let Some((token_type, modifiers)) = reference_token(symbol) else {
        return;
    };
    for range in ranges {
        push_token(raw_tokens, *range, token_type.clone(), modifiers.clone());
    }
}

/// Tokens cannot span lines.
fn push_token(
    raw_tokens: &mut Vec<RawToken>,
    range: IdeRange,
    token_type: SemanticTokenType,
    modifiers: Vec<SemanticTokenModifier>,
) {
    if range.start.line != range.end.line || range.end.character <= range.start.character {
        return;
    }
    raw_tokens.push(RawToken {
        line: range.start.line,
        col: range.start.character,
        length: range.end.character - range.start.character,
        token_type,
        modifiers,
    });
}

#[cfg(test)]
#[path = "../../tests/src/semantic_tokens/provider_tests.rs"]
mod tests;

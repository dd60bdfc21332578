use crate::{
    ide::{IdePosition, IdeRange},
    parser::{INCLUDE_ANGLE, INCLUDE_QUOTED, IncludeKind},
    repository::ItemSet,
    symbols::{Symbol, SymbolKind},
    text_pos::{byte_offset_of_utf16_column, utf16_column_of_byte_offset},
    vfs::FileId,
};

use super::{
    EnclosingScope, MemberExpression, find_member, is_in_comment, is_in_string, is_word_char, parse_member_expression,
    resolve_enclosing_scope, resolve_expression_type, resolve_inheritance_chain,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordAtPosition {
    pub word: String,
    pub range: IdeRange,
    /// Byte offsets of the word inside its line.
    pub start: usize,
    pub end: usize,
}

/// Identifier touching the UTF-16 column `character` of `line`.
pub fn word_at(
    line: &str,
    line_index: u32,
    character: u32,
) -> Option<WordAtPosition> {
    let cursor = byte_offset_of_utf16_column(line, character);
    let start = line[..cursor]
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_word_char(*ch))
        .last()
        .map_or(cursor, |(at, _)| at);
    let end = line[cursor..]
        .char_indices()
        .find(|(_, ch)| !is_word_char(*ch))
        .map_or(line.len(), |(at, _)| cursor + at);
    if start == end {
        return None;
    }
    Some(WordAtPosition {
        word: line[start..end].to_string(),
        range: IdeRange::on_line(
            line_index,
            utf16_column_of_byte_offset(line, start),
            utf16_column_of_byte_offset(line, end),
        ),
        start,
        end,
    })
}

/// How the word under the cursor is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessKind {
    /// `receiver.word` or `Type::word`.
    Member(MemberExpression),
    /// `new word`.
    Constructor,
    /// `word(`.
    Call,
    Bare,
}

pub fn classify_access(
    line: &str,
    word: &WordAtPosition,
) -> AccessKind {
    if let Some(expression) = parse_member_expression(line, word.start) {
        return AccessKind::Member(expression);
    }
    if follows_new(&line[..word.start]) {
        return AccessKind::Constructor;
    }
    if line[word.end..].trim_start().starts_with('(') {
        return AccessKind::Call;
    }
    AccessKind::Bare
}

fn follows_new(before: &str) -> bool {
    let trimmed = before.trim_end();
    trimmed.len() < before.len()
        && trimmed.strip_suffix("new").is_some_and(|rest| !rest.ends_with(is_word_char))
}

/// `#include` directive on a line, with the byte range of its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    pub kind: IncludeKind,
    pub path: String,
    pub start: usize,
    pub end: usize,
}

pub fn include_directive(line: &str) -> Option<IncludeDirective> {
    let (kind, caps) = match INCLUDE_ANGLE.captures(line) {
        Some(caps) => (IncludeKind::Angle, caps),
        None => (IncludeKind::Quoted, INCLUDE_QUOTED.captures(line)?),
    };
    let path = caps.get(1)?;
    Some(IncludeDirective {
        kind,
        path: path.as_str().to_string(),
        start: path.start(),
        end: path.end(),
    })
}

/// Symbols the identifier at `position` refers to.
///
/// `line` is the text of `position.line` in `file`. Words inside comments
/// and strings refer to nothing.
pub fn items_at_position<'i>(
    items: &'i ItemSet,
    file: &FileId,
    line: &str,
    position: IdePosition,
) -> Vec<&'i Symbol> {
    let Some(word) = word_at(line, position.line, position.character) else {
        return Vec::new();
    };
    if is_in_comment(items, file, word.range) || is_in_string(line, word.end) {
        return Vec::new();
    }

    // The cursor sits on a declaration.
    let declared: Vec<&Symbol> = items
        .iter()
        .filter(|symbol| {
            &symbol.file == file && symbol.range == word.range && !matches!(symbol.kind, SymbolKind::Comment)
        })
        .collect();
    if !declared.is_empty() {
        return declared;
    }

    let scope = resolve_enclosing_scope(items, file, position);
    match classify_access(line, &word) {
        AccessKind::Member(expression) => member_items(items, &scope, &expression, &word.word),
        AccessKind::Constructor => {
            let constructors: Vec<&Symbol> = items
                .iter()
                .filter(|symbol| symbol.kind == SymbolKind::Constructor && symbol.name == word.word)
                .collect();
            if constructors.is_empty() {
                named(items, &scope, &word.word, |kind| kind == SymbolKind::Methodmap)
            } else {
                constructors
            }
        },
        AccessKind::Call => {
            let callables = named(items, &scope, &word.word, |kind| kind.is_callable() && !kind.is_member());
            if callables.is_empty() {
                named(items, &scope, &word.word, |kind| !kind.is_member())
            } else {
                callables
            }
        },
        AccessKind::Bare => named(items, &scope, &word.word, |kind| !kind.is_member()),
    }
}

fn member_items<'i>(
    items: &'i ItemSet,
    scope: &EnclosingScope,
    expression: &MemberExpression,
    name: &str,
) -> Vec<&'i Symbol> {
    if let Some(resolved) = resolve_expression_type(expression, items, scope) {
        let chain = resolve_inheritance_chain(items, &resolved.type_name);
        if let Some(member) = find_member(items, &chain, name) {
            return vec![member];
        }
    }
    // Unknown receiver type: every member with that name.
    items.iter().filter(|symbol| symbol.kind.is_member() && symbol.name == name).collect()
}

fn named<'i>(
    items: &'i ItemSet,
    scope: &EnclosingScope,
    name: &str,
    accept: impl Fn(SymbolKind) -> bool,
) -> Vec<&'i Symbol> {
    let matches: Vec<&Symbol> = items
        .iter()
        .filter(|symbol| {
            symbol.name == name
                && accept(symbol.kind)
                && !matches!(symbol.kind, SymbolKind::Comment | SymbolKind::Keyword | SymbolKind::Include)
                && (symbol.kind != SymbolKind::Variable || scope.sees_variable(symbol))
        })
        .collect();

    // A visible local hides globals of the same name.
    if matches.iter().any(|symbol| symbol.kind == SymbolKind::Variable && !symbol.is_global()) {
        return matches
            .into_iter()
            .filter(|symbol| symbol.kind == SymbolKind::Variable && !symbol.is_global())
            .collect();
    }
    matches
}

#[cfg(test)]
#[path = "../../tests/src/analysis/lookup_tests.rs"]
mod tests;

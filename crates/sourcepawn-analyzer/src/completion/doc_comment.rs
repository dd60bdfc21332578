//! `/**` skeletons for the function declared on the line below the cursor.

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionTextEdit, InsertTextFormat, Position, Range, TextEdit,
};

use crate::parser::{CONTROL_KEYWORD, DOC_TARGET_HEADER, declared_params};

const DESCRIPTION_GAP: usize = 5;

/// A doc comment with one `@param` per parameter of the function header in
/// `next_line`. Replaces the line up to the cursor at `position`.
pub(crate) fn doc_skeleton(
    next_line: &str,
    position: Position,
) -> Option<CompletionItem> {
    let caps = DOC_TARGET_HEADER.captures(next_line)?;
    let name = caps.get(3).map_or("", |m| m.as_str());
    if CONTROL_KEYWORD.is_match(name) {
        return None;
    }
    let indent = caps.get(1).map_or("", |m| m.as_str());
    let return_type = caps.get(2).map(|m| m.as_str());
    let params: Vec<String> = declared_params(next_line).into_iter().map(|param| param.name).collect();

    let width = params.iter().map(String::len).max().unwrap_or(0) + DESCRIPTION_GAP;
    let mut snippet = format!("{indent}/**\n{indent} * ${{1:Description}}");
    let mut stop = 2;
    for param in &params {
        let pad = " ".repeat(width - param.len());
        snippet.push_str(&format!("\n{indent} * @param {param}{pad}${{{stop}:Param description}}"));
        stop += 1;
    }
    if return_type != Some("void") {
        let pad = " ".repeat(width);
        snippet.push_str(&format!("\n{indent} * @return{pad}${{{stop}:Return description}}"));
    }
    snippet.push_str(&format!("\n{indent} */"));

    Some(CompletionItem {
        label: "Generate docstring".to_string(),
        kind: Some(CompletionItemKind::TEXT),
        detail: Some(format!("Document {name}")),
        filter_text: Some("/*".to_string()),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        text_edit: Some(CompletionTextEdit::Edit(TextEdit {
            range: Range::new(Position::new(position.line, 0), position),
            new_text: snippet,
        })),
        ..Default::default()
    })
}

#[cfg(test)]
#[path = "../../tests/src/completion/doc_comment_tests.rs"]
mod tests;

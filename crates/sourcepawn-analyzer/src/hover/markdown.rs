//! Doc-comment prose rendered as Markdown.

use crate::parser::{
    MD_CALL, MD_DEPRECATED, MD_LEADING_STAR, MD_MEMBER_MARK, MD_PARAGRAPH, MD_PARAM, MD_SOFT_BREAK, MD_STAR_BREAK,
    MD_STAR_LINE, MD_TAG,
};

/// Converts a symbol description into Markdown.
///
/// Soft-wrapped lines are joined, blank lines become paragraph breaks, each
/// `@tag` starts its own paragraph in italics and `@param name` renders the
/// parameter name as code.
pub fn description_to_markdown(description: &str) -> String {
    let text = MD_MEMBER_MARK.replace(description.trim(), "");
    let text = MD_STAR_BREAK.replace_all(&text, "\n");
    let text = MD_STAR_LINE.replace_all(&text, "");
    let text = MD_LEADING_STAR.replace(&text, "");
    let text = text.replace('<', "\\<").replace('>', "\\>");

    let text = MD_PARAGRAPH
        .split(&text)
        .map(|paragraph| MD_SOFT_BREAK.replace_all(paragraph.trim(), " ").into_owned())
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let text = MD_TAG.replace_all(&text, "\n\n_${1}_ ");
    let text = MD_PARAM.replace_all(&text, "${1} `${2}` - ");
    let text = MD_CALL.replace_all(&text, "`${1}`");
    MD_DEPRECATED.replace_all(&text, "\n\n**DEPRECATED**").trim().to_string()
}

#[cfg(test)]
#[path = "../../tests/src/hover/markdown_tests.rs"]
mod tests;

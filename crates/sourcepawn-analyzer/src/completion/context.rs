use crate::{
    analysis::{MemberExpression, is_in_string, parse_member_expression},
    parser::{DOC_TRIGGER, IncludeKind, NEW_ASSIGNMENT, PARTIAL_INCLUDE_ANGLE, PARTIAL_INCLUDE_QUOTED},
};

/// What the text before the cursor asks to complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CursorContext {
    /// Inside `#include <…` or `#include "…`, with the path typed so far.
    Include {
        kind: IncludeKind,
        typed: String,
    },
    /// After `= new`. `declared` is the type written left of the variable,
    /// or the assigned expression when no type is written.
    Constructor {
        declared: Option<String>,
        target: String,
    },
    /// A `$` alone at the start of a line.
    Snippet,
    /// A lone `/*` or `/**` opening a doc comment.
    DocComment,
    MemberAccess(MemberExpression),
    /// Nothing sensible to offer here.
    Nothing,
    General,
}

/// Classifies the cursor from `prefix`, the line text before it.
/// `trigger` is the character that triggered the request, if any.
pub(crate) fn detect_context(
    prefix: &str,
    trigger: Option<&str>,
) -> CursorContext {
    if let Some(caps) = PARTIAL_INCLUDE_ANGLE.captures(prefix) {
        return CursorContext::Include {
            kind: IncludeKind::Angle,
            typed: caps[1].to_string(),
        };
    }
    if let Some(caps) = PARTIAL_INCLUDE_QUOTED.captures(prefix) {
        return CursorContext::Include {
            kind: IncludeKind::Quoted,
            typed: caps[1].to_string(),
        };
    }
    if let Some(caps) = NEW_ASSIGNMENT.captures(prefix) {
        let declared = caps.get(1).map(|m| m.as_str()).filter(|name| !name.is_empty());
        return CursorContext::Constructor {
            declared: declared.map(str::to_string),
            target: caps[2].to_string(),
        };
    }
    if prefix.trim_start() == "$" {
        return CursorContext::Snippet;
    }
    if DOC_TRIGGER.is_match(prefix) {
        return CursorContext::DocComment;
    }
    // A space only triggers constructor completion, a star only doc comments.
    if matches!(trigger, Some(" " | "*")) || prefix.ends_with(['"', '\'', '<', '/', '\\']) {
        return CursorContext::Nothing;
    }
    if prefix.ends_with(':') && !prefix.ends_with("::") {
        return CursorContext::Nothing;
    }
    if is_in_string(prefix, prefix.len()) {
        return CursorContext::Nothing;
    }
    match parse_member_expression(prefix, prefix.len()) {
        Some(expression) => CursorContext::MemberAccess(expression),
        None => CursorContext::General,
    }
}

#[cfg(test)]
#[path = "../../tests/src/completion/context_tests.rs"]
mod tests;

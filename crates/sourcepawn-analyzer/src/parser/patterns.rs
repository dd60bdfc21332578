//! Regular expressions used by the scanner and by editor queries.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    // Every pattern in this module is a literal checked by the unit tests.
    Regex::new(pattern).expect("scanner pattern must compile")
}

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        pub(crate) static $name: Lazy<Regex> = Lazy::new(|| compile($re));
    };
}

// Dispatch rules, in the order the scanner tries them.
pattern!(DEFINE, r"^\s*#define\s+(\w+)\s+(.+)");
pattern!(MACRO, r"^\s*#define\s+(\w+)\s*\(([^)]*)\)");
pattern!(INCLUDE_ANGLE, r"^\s*#include\s+<([A-Za-z0-9\-_/.]+)>");
pattern!(INCLUDE_QUOTED, r#"^\s*#include\s+"([A-Za-z0-9\-_/.]+)""#);
pattern!(ENUM_STRUCT, r"^\s*enum\s+struct\s+(\w*)\s*[^{]*");
pattern!(ENUM, r"^\s*enum\b(?:\s+(\w+))?\s*[^{]*");
pattern!(LOOP_VARIABLE, r"^\s*(?:for\s*\(\s*int\s+)([A-Za-z0-9_]*)");
pattern!(TYPEDEF, r"^\s*typedef\s+(\w+)\s*=\s*function\s+(\w+).*");
pattern!(TYPESET, r"^\s*typeset\s+(\w+)");
pattern!(
    VARIABLE,
    r"^\s*(?:(?:new|static|const|decl|public|stock)\s+)*\w+(?:\[\])?\s+(\w+\s*(?:\[[A-Za-z0-9 +\-*_]*\])*\s*(?:=\s*[^;,]+)?(?:,|;))"
);
pattern!(BLOCK_COMMENT_START, r"^\s*/\*");
pattern!(LINE_COMMENT_START, r"^\s*//");
pattern!(METHODMAP, r"^\s*methodmap\s+([a-zA-Z][a-zA-Z0-9_]*)(?:\s*<\s*([a-zA-Z][a-zA-Z0-9_]*))?");
pattern!(PROPERTY, r"^\s*property\s+([a-zA-Z]\w*)\s+([a-zA-Z]\w*)");
pattern!(CONTROL_STATEMENT, r"^\s*(\bwhile\b|\belse\b|\bif\b|\bswitch\b|\bcase\b|\bdo\b|\bfor\b)");
pattern!(
    FUNCTION,
    r"^\s*(?:(?:static|native|stock|public|forward)\s+)*(?:[a-zA-Z\-_0-9]:)?([^\s]+)\s*(\w*)\s*\(([^)]*(?:\)?))(?:\s*)(?:\{?)(?:\s*)(?:[^;\s]*);?\s*$"
);
pattern!(CLOSING_BRACE, r"^\s*\}");
pattern!(ELSE_CONTINUATION, r"^\s*\}\s*else\b");

// Helpers used while reassembling multi-line constructs.
pattern!(ENDS_WITH_SEMICOLON, r";\s*$");
pattern!(OPENS_BLOCK, r"\{\s*$");
pattern!(STARTS_BLOCK, r"^\s*\{");
pattern!(SINGLE_LINE_BODY, r"\{.*\}\s*$");
pattern!(CONTROL_KEYWORD, r"\b(?:if|for|while|case|switch|return)\b");
pattern!(FUNCTION_KEYWORD, r"\bfunction\b");
pattern!(NATIVE_OR_FORWARD, r"\bnative\b|\bforward\b");
pattern!(FUNCTION_END, r"(\{|;)\s*(?:(?://|/\*).*)?$");
pattern!(TRAILING_COMMA, r",\s*$");
pattern!(INITIALIZER_OPEN, r"=\s*\{");
pattern!(
    NEW_STYLE_FUNCTION,
    r"^\s*(?:(?:stock|public|native|forward|static)\s+)*(?:(\w*(?:\s*\[[\w +\-*]*\]\s*)?)\s+)?(\w*)\s*\((.*(?:\)|,|\{))?\s*"
);
pattern!(
    LEGACY_FUNCTION,
    r"^\s*(?:(?:static|native|stock|public|forward)\s+)*(?:(\w+)\s*:)?\s*(\w*)\s*\(([^)]*(?:\)?))(?:\s*)(?:\{?)(?:\s*)(?:[^;\s]*);?\s*$"
);
pattern!(WHITESPACE_RUN, r"\s+");
pattern!(
    PARAMETER,
    r"\s*(?:(?:const|static)\s+)?(?:(\w+)(?:\s*(?:\[(?:[A-Za-z_0-9+* ]*)\])?\s+|\s*:\s*))?(\w+)(?:\[(?:[A-Za-z_0-9+* ]*)\])?(?:\s*=\s*(?:[^,]+))?"
);
pattern!(PARENTHESISED, r"\((.+)\)");
pattern!(ENUM_MEMBER, r"^\s*(\w*)\s*.*");
pattern!(MEMBER_BLOCK_DOC, r"/\*\*<?\s*(.+?)\*/");
pattern!(MEMBER_LINE_DOC, r"//<?\s*(.*)");
pattern!(VARIABLE_NAME, r"^\s*(\w+)");
pattern!(DECLARATION_TYPE, r"^\s*(?:(?:new|static|const|decl|public|stock)\s+)*(\w+)(?:\[\])?\s+");

// Doc comments.
pattern!(DOC_OPENER, r"^\s*/\*\*\s*");
pattern!(DOC_STAR_PREFIX, r"^\s*\*\s+");
pattern!(DOC_SLASH_PREFIX, r"^\s*//\s+");
pattern!(DOC_PARAM, r"@param\s+([\w.]+)\s+(.*)");
pattern!(DOC_FLUSH_TAG, r"@(?:return|error)");
pattern!(DOC_CONTINUATION, r"\s*(?:\*|//)\s*(.*)");
pattern!(DOC_DEPRECATED, r"@deprecated\s*(.*)");

// Token scanner used for reference collection.
pattern!(REFERENCE_TOKEN, r#"(?:"|'|//|/\*|\*/|\w+)"#);

// Text before the cursor, for editor queries.
pattern!(PARTIAL_INCLUDE_ANGLE, r"^\s*#\s*include\s*<([^>]*)$");
pattern!(PARTIAL_INCLUDE_QUOTED, r#"^\s*#\s*include\s*"([^"]*)$"#);
pattern!(NEW_ASSIGNMENT, r"(\w*)\s+([\w.()]+)(?:\[[\w+ \d]*\])*\s*=\s*new\s+(\w*)$");
pattern!(TRAILING_METHOD_CALL, r"\.(\w+)$");
pattern!(TRAILING_CONSTRUCTOR_CALL, r"\bnew\s+(\w+)$");
pattern!(TRAILING_CALL, r"(\w+)$");
pattern!(DOC_TRIGGER, r"^\s*/\*\*?\s*$");
pattern!(
    DOC_TARGET_HEADER,
    r"^(\s*)(?:(?:stock|public|native|forward|static)\s+)*(?:(\w+(?:\[\])?)\s+)?(?:\w+:)?(\w+)\s*\("
);

// Rendering of doc comments as Markdown.
pattern!(MD_MEMBER_MARK, r"^\*<");
pattern!(MD_STAR_BREAK, r"\*\s*\r?\n\s*\*");
pattern!(MD_STAR_LINE, r"\r?\n\s*\*");
pattern!(MD_LEADING_STAR, r"^\*");
pattern!(MD_PARAGRAPH, r"[ \t]*(?:\r?\n[ \t]*){2,}");
pattern!(MD_SOFT_BREAK, r"[ \t]*\r?\n[ \t]*");
pattern!(MD_TAG, r"\s*(@[A-Za-z]+)\s+");
pattern!(MD_PARAM, r"(_@param_) ([A-Za-z0-9_.]+)\s*");
pattern!(MD_CALL, r"(\w+\([A-Za-z0-9_ :]*\))");
pattern!(MD_DEPRECATED, r"\s*DEPRECATED");

/// Byte offset of the first whole-word occurrence of `word` in `line`.
pub(crate) fn find_word(
    line: &str,
    word: &str,
) -> Option<usize> {
    if word.is_empty() {
        return None;
    }
    let bytes = line.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    let mut from = 0;
    while let Some(found) = line[from..].find(word) {
        let start = from + found;
        let end = start + word.len();
        let left_ok = start == 0 || !is_word(bytes[start - 1]);
        let right_ok = end >= bytes.len() || !is_word(bytes[end]);
        if left_ok && right_ok {
            return Some(start);
        }
        from = start + 1;
        while !line.is_char_boundary(from) {
            from += 1;
        }
    }
    None
}

/// Like [`find_word`], but the word must be followed by `(`.
pub(crate) fn find_call_name(
    line: &str,
    word: &str,
) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = find_word(&line[from..], word) {
        let start = from + found;
        let rest = line[start + word.len()..].trim_start();
        if rest.starts_with('(') {
            return Some(start);
        }
        from = start + word.len();
    }
    None
}

#[cfg(test)]
#[path = "../../tests/src/parser/patterns_tests.rs"]
mod tests;

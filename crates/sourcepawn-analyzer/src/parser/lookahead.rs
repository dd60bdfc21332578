//! Character-level helpers used when a construct spans several lines.

/// Lines inspected when looking for the end of a control statement header or
/// the body of an enum.
pub(crate) const CONTROL_LOOKAHEAD_CAP: usize = 100;
/// Lines consumed while reassembling a function header.
pub(crate) const FUNCTION_HEADER_CAP: usize = 20;
/// Lines consumed while reading a typeset body or a brace initializer.
pub(crate) const TYPESET_BODY_CAP: usize = 200;

/// Net `(` minus `)` on a line, strings included.
pub(crate) fn paren_balance(line: &str) -> i32 {
    line.chars().fold(0, |balance, ch| match ch {
        '(' => balance + 1,
        ')' => balance - 1,
        _ => balance,
    })
}

/// Net `(` minus `)` on a line, ignoring parentheses inside quotes.
pub(crate) fn paren_balance_outside_strings(line: &str) -> i32 {
    delimiter_balance(line, '(', ')')
}

/// Net `{` minus `}` on a line, ignoring braces inside quotes.
pub(crate) fn brace_balance_outside_strings(line: &str) -> i32 {
    delimiter_balance(line, '{', '}')
}

fn delimiter_balance(
    line: &str,
    open: char,
    close: char,
) -> i32 {
    let mut balance = 0;
    let mut in_string = false;
    for ch in line.chars() {
        match ch {
            '\'' | '"' => in_string = !in_string,
            ch if ch == open && !in_string => balance += 1,
            ch if ch == close && !in_string => balance -= 1,
            _ => {},
        }
    }
    balance
}

/// Byte spans of comments that follow code on the same line.
///
/// A `//` comment spans to the end of the line. A `/* */` comment spans up to
/// and including its terminator. Comments that start the line are handled by
/// the doc-comment reader instead.
pub(crate) fn trailing_comment_spans(line: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut seen_code = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        let next = bytes.get(i + 1).copied();
        match (b, next) {
            (b'/', Some(b'/')) => {
                if seen_code {
                    spans.push((i, line.len()));
                }
                break;
            },
            (b'/', Some(b'*')) => {
                let close = line[i + 2..].find("*/").map(|at| i + 2 + at + 2);
                match close {
                    Some(end) => {
                        if seen_code {
                            spans.push((i, end));
                        }
                        i = end;
                        continue;
                    },
                    None => {
                        if seen_code {
                            spans.push((i, line.len()));
                        }
                        break;
                    },
                }
            },
            (b'"' | b'\'', _) => {
                quote = Some(b);
                seen_code = true;
            },
            _ => {
                if !b.is_ascii_whitespace() {
                    seen_code = true;
                }
            },
        }
        i += 1;
    }
    spans
}

/// The line without a trailing `//` comment, for end-of-line tests.
pub(crate) fn code_portion(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => {
                i += 2;
                continue;
            },
            Some(q) if b == q => quote = None,
            Some(_) => {},
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'/' && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            None => {},
        }
        i += 1;
    }
    line
}

/// Splits `text` on commas that are not nested in brackets or quotes,
/// returning each piece with its byte offset in `text`.
pub(crate) fn split_top_level(text: &str) -> Vec<(usize, &str)> {
    let mut pieces = Vec::new();
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b',' if depth <= 0 => {
                pieces.push((start, &text[start..i]));
                start = i + 1;
            },
            _ => {},
        }
        i += 1;
    }
    pieces.push((start, &text[start.min(text.len())..]));
    pieces
}

#[cfg(test)]
#[path = "../../tests/src/parser/lookahead_tests.rs"]
mod tests;

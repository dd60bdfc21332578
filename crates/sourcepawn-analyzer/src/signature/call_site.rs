use crate::{analysis::is_in_string, text_pos::byte_offset_of_utf16_column};

/// The call whose argument list holds the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CallSite {
    /// Text of the line holding the opening parenthesis, up to it.
    pub(crate) callee: String,
    /// Line of the opening parenthesis.
    pub(crate) line: u32,
    /// Number of top-level commas between the parenthesis and the cursor.
    pub(crate) active_parameter: u32,
}

/// Walks back from the cursor, across lines if needed, to the unmatched `(`
/// of the enclosing call. `None` right after a closing `)` or when no call is
/// open.
pub(crate) fn find_call_site(
    lines: &[&str],
    line: u32,
    character: u32,
) -> Option<CallSite> {
    let current = lines.get(line as usize)?;
    let cursor = byte_offset_of_utf16_column(current, character);
    if current[..cursor].ends_with(')') {
        return None;
    }

    let mut depth = 0i32;
    let mut commas = 0u32;
    for index in (0..=line as usize).rev() {
        let text = lines[index];
        let end = if index == line as usize { cursor } else { text.len() };
        for (at, ch) in text[..end].char_indices().rev() {
            match ch {
                '(' if !is_in_string(text, at) => {
                    depth += 1;
                    if depth >= 1 {
                        return Some(CallSite {
                            callee: text[..at].trim_end().to_string(),
                            line: index as u32,
                            active_parameter: commas,
                        });
                    }
                },
                ')' if !is_in_string(text, at) => depth -= 1,
                ',' if depth == 0 && !is_in_string(text, at) && !in_array_literal(text, at) => commas += 1,
                _ => {},
            }
        }
    }
    None
}

/// Whether byte `at` of `line` sits inside an unclosed `{` literal.
fn in_array_literal(
    line: &str,
    at: usize,
) -> bool {
    let mut depth = 0i32;
    for (index, ch) in line[..at].char_indices() {
        match ch {
            '{' if !is_in_string(line, index) => depth += 1,
            '}' if !is_in_string(line, index) => depth -= 1,
            _ => {},
        }
    }
    depth > 0
}

#[cfg(test)]
#[path = "../../tests/src/signature/call_site_tests.rs"]
mod tests;

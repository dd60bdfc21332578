//! Second pass over a parsed file recording where its identifiers are used.

use std::collections::HashMap;

use crate::{
    ide::IdeRange,
    symbols::{FileTable, OutgoingReference},
    text_pos::utf16_column_of_byte_offset,
    vfs::FileId,
};

use super::patterns::REFERENCE_TOKEN;

/// Type keywords that are never references.
const IGNORED_WORDS: &[&str] = &["float", "bool", "char", "int"];

/// Records every use of a tracked symbol outside comments and strings.
///
/// Uses of symbols owned by `table` are attached to the symbol itself. Names
/// found in `external` are recorded as outgoing references to the file that
/// declares them.
pub(crate) fn collect_references(
    table: &mut FileTable,
    lines: &[&str],
    external: &HashMap<String, FileId>,
) {
    let mut in_block_comment = false;
    for (line_no, line) in lines.iter().enumerate() {
        let mut quote: Option<&str> = None;
        // Type of the last resolved identifier, for `a.b` and `A::b` chains.
        let mut previous_type: Option<String> = None;

        for token in REFERENCE_TOKEN.find_iter(line) {
            let text = token.as_str();
            if in_block_comment {
                if text == "*/" {
                    in_block_comment = false;
                }
                continue;
            }
            match (quote, text) {
                (Some(open), "\"" | "'") if open == text && !escaped(line, token.start()) => {
                    quote = None;
                    continue;
                },
                (Some(_), _) => continue,
                (None, "\"" | "'") => {
                    quote = Some(text);
                    continue;
                },
                (None, "//") => break,
                (None, "/*") => {
                    in_block_comment = true;
                    continue;
                },
                (None, "*/") => continue,
                _ => {},
            }
            if IGNORED_WORDS.contains(&text) || text.starts_with(|c: char| c.is_ascii_digit()) {
                previous_type = None;
                continue;
            }

            let start = utf16_column_of_byte_offset(line, token.start());
            let end = utf16_column_of_byte_offset(line, token.end());
            let range = IdeRange::on_line(line_no as u32, start, end);

            let member_access = token.start() > 0 && matches!(line.as_bytes()[token.start() - 1], b'.' | b':');
            let key = match (previous_type.take(), member_access) {
                (Some(parent), true) => format!("{text}{parent}"),
                (None, true) => continue,
                (_, false) => text.to_string(),
            };

            match table.get_mut(&key) {
                Some(symbol) if symbol.kind.is_container() => {
                    previous_type = Some(symbol.name.clone());
                },
                Some(symbol) if symbol.kind.tracks_references() || member_access => {
                    if symbol.range != range {
                        symbol.references.push(range);
                    }
                    previous_type = Some(symbol.type_name.clone()).filter(|ty| !ty.is_empty());
                },
                Some(_) => {},
                None => {
                    if let Some(target) = external.get(text) {
                        table.add_outgoing_reference(OutgoingReference {
                            name: text.to_string(),
                            target: target.clone(),
                            range,
                        });
                    }
                },
            }
        }
    }
}

fn escaped(
    line: &str,
    at: usize,
) -> bool {
    let backslashes = line.as_bytes()[..at].iter().rev().take_while(|&&b| b == b'\\').count();
    backslashes % 2 == 1
}

#[cfg(test)]
#[path = "../../tests/src/parser/references_tests.rs"]
mod tests;

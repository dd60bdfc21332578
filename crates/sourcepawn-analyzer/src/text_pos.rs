//! Conversions between byte offsets inside a line and LSP UTF-16 columns.

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

pub fn utf16_column_of_byte_offset(
    line: &str,
    byte_offset: usize,
) -> u32 {
    let mut end = byte_offset.min(line.len());
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    utf16_len(&line[..end])
}

/// Byte offset of a UTF-16 column, clamped to the end of the line.
pub fn byte_offset_of_utf16_column(
    line: &str,
    column: u32,
) -> usize {
    let mut utf16_offset = 0u32;
    for (byte_offset, ch) in line.char_indices() {
        if utf16_offset >= column {
            return byte_offset;
        }
        utf16_offset += ch.len_utf16() as u32;
    }
    line.len()
}

#[cfg(test)]
#[path = "../tests/src/text_pos_tests.rs"]
mod tests;

//! Function, method, native and forward declarations.

use regex::Captures;

use crate::{
    ide::{IdePosition, IdeRange},
    symbols::SymbolKind,
    text_pos::utf16_len,
};

use super::{
    declarations::declared_params,
    lookahead::{FUNCTION_HEADER_CAP, code_portion, paren_balance_outside_strings, split_top_level},
    patterns::{
        CONTROL_KEYWORD, ENDS_WITH_SEMICOLON, FUNCTION_END, FUNCTION_KEYWORD, LEGACY_FUNCTION, NATIVE_OR_FORWARD,
        NEW_STYLE_FUNCTION, PARAMETER, PARENTHESISED, SINGLE_LINE_BODY, TRAILING_COMMA, WHITESPACE_RUN,
        find_call_name, find_word,
    },
    scanner::{Flow, Parser},
    state::LexState,
};

/// A parameter found in a function header, waiting for the header to be
/// confirmed before it is registered.
struct PendingParam {
    name: String,
    type_name: String,
    line: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn read_function(
        &mut self,
        caps: &Captures<'_>,
        line: &str,
    ) -> Flow {
        if CONTROL_KEYWORD.is_match(line) || caps.get(1).is_some_and(|m| FUNCTION_KEYWORD.is_match(m.as_str())) {
            return Flow::Continue;
        }
        // Anything that looks like a declaration inside a body is a call.
        if self.states.contains(LexState::Function) {
            return Flow::Continue;
        }
        if self.states.top() == LexState::Property {
            if !ENDS_WITH_SEMICOLON.is_match(line) && !SINGLE_LINE_BODY.is_match(line) {
                self.states.push(LexState::Function);
            }
            return Flow::Continue;
        }

        let Some(header) = NEW_STYLE_FUNCTION.captures(line).or_else(|| LEGACY_FUNCTION.captures(line)) else {
            return Flow::Continue;
        };
        let name = header.get(2).map_or("", |m| m.as_str());
        if name.is_empty() {
            return Flow::Continue;
        }
        let return_type = header.get(1).map_or("", |m| m.as_str()).trim();

        if self.macros.contains(name) {
            if self.block_follows(line) {
                self.states.push(LexState::Macro);
            }
            return Flow::Continue;
        }

        let doc = self.take_doc();
        let start_index = self.index;
        let is_native = NATIVE_OR_FORWARD.is_match(header.get(0).map_or("", |m| m.as_str()));

        let mut current = line;
        let mut header_text = code_portion(line).to_string();
        let mut balance = paren_balance_outside_strings(code_portion(line));
        let mut scanned = 0;
        while !(balance <= 0 && header_terminator(current).is_some()) {
            if balance <= 0 && TRAILING_COMMA.is_match(code_portion(current)) {
                // An initializer list, not a header.
                return Flow::Continue;
            }
            if scanned >= FUNCTION_HEADER_CAP {
                return Flow::Continue;
            }
            scanned += 1;
            let Some(next) = self.next_line() else {
                return Flow::Continue;
            };
            current = next;
            if balance > 0 {
                let code = code_portion(next);
                balance += paren_balance_outside_strings(code);
                header_text.push(' ');
                header_text.push_str(code);
            }
        }
        let opens_body = header_terminator(current) == Some('{');
        if is_native == opens_body {
            // A native with a body is malformed; a plain declaration ending
            // in `;` is a call or a prototype.
            return Flow::Continue;
        }
        let in_body = opens_body && !SINGLE_LINE_BODY.is_match(code_portion(current));
        if in_body {
            self.states.push(LexState::Function);
        }

        let pending = self.header_params(&header_text, start_index);
        let detail = header_detail(&header_text);
        let params = if doc.params.is_empty() {
            declared_params(&detail)
        } else {
            doc.params
        };

        let def_line = self.line_at(start_index);
        let column = find_call_name(def_line, name).or_else(|| find_word(def_line, name));
        let range = self.range_on(start_index, column, name);

        let container = match self.states.contains(LexState::Methodmap) || self.states.contains(LexState::EnumStruct) {
            true => self.container.clone(),
            false => None,
        };
        let key = match &container {
            Some(container) => format!("{name}{container}"),
            None => name.to_string(),
        };
        let kind = match &container {
            Some(container) if container == name => SymbolKind::Constructor,
            Some(_) => SymbolKind::Method,
            None => SymbolKind::Function,
        };
        let redeclared = container.is_none()
            && self.table.get(&key).is_some_and(|existing| existing.kind == SymbolKind::Function);

        self.last_func_name = name.to_string();
        if !redeclared {
            let mut symbol = self.new_symbol(kind, name, range);
            symbol.type_name = return_type.to_string();
            symbol.detail = detail;
            symbol.description = doc.description;
            symbol.params = params;
            symbol.deprecated = doc.deprecated;
            if let Some(container) = &container {
                symbol.parent = container.clone();
            }
            self.table.insert(key.clone(), symbol);
        }

        self.open_function = (in_body && !redeclared).then(|| key.clone());
        if !in_body && !redeclared {
            let end_col = if start_index == self.index {
                utf16_len(current)
            } else {
                0
            };
            let full = IdeRange::new(
                IdePosition::new(start_index as u32, 0),
                IdePosition::new(self.index as u32, end_col),
            );
            if let Some(symbol) = self.table.get_mut(&key) {
                symbol.set_full_range(full);
            }
        }

        if !self.builtin {
            self.commit_params(pending, name);
        }
        Flow::Continue
    }

    fn range_on(
        &self,
        line_index: usize,
        byte_start: Option<usize>,
        name: &str,
    ) -> IdeRange {
        let line = self.line_at(line_index);
        let mut range = self.range_at(byte_start, name, line);
        range.start.line = line_index as u32;
        range.end.line = line_index as u32;
        range
    }

    /// Parameters declared in `header`, located on the header line that
    /// declares them.
    fn header_params(
        &self,
        header: &str,
        start_index: usize,
    ) -> Vec<PendingParam> {
        let Some(inner) = PARENTHESISED.captures(header).and_then(|caps| caps.get(1)) else {
            return Vec::new();
        };
        let mut pending = Vec::new();
        for (_, segment) in split_top_level(inner.as_str()) {
            let segment = segment.replace('&', " ");
            let Some(caps) = PARAMETER.captures(&segment) else {
                continue;
            };
            let Some(name) = caps.get(2).map(|m| m.as_str()).filter(|name| !name.is_empty()) else {
                continue;
            };
            let line = (start_index..=self.index)
                .find(|&index| find_word(self.line_at(index), name).is_some())
                .unwrap_or(start_index);
            pending.push(PendingParam {
                name: name.to_string(),
                type_name: caps.get(1).map_or("", |m| m.as_str()).to_string(),
                line,
            });
        }
        pending
    }

    fn commit_params(
        &mut self,
        pending: Vec<PendingParam>,
        func_name: &str,
    ) {
        let resume = self.index;
        for param in pending {
            self.index = param.line;
            let line = self.line_at(param.line);
            self.add_variable(&param.name, line, &param.type_name, Some(func_name), true);
        }
        self.index = resume;
    }
}

/// The `{` or `;` closing a function header on `line`, if any.
fn header_terminator(line: &str) -> Option<char> {
    if SINGLE_LINE_BODY.is_match(code_portion(line)) {
        return Some('{');
    }
    FUNCTION_END
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
}

/// Signature text of a function header, up to its body or terminator, with
/// whitespace collapsed.
pub(super) fn header_detail(header: &str) -> String {
    let mut depth = 0i32;
    let mut opened = false;
    let mut quote: Option<char> = None;
    let mut end = header.len();
    for (at, ch) in header.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' => {
                depth += 1;
                opened = true;
            },
            ')' => depth -= 1,
            '{' | ';' if opened && depth <= 0 => {
                end = at;
                break;
            },
            _ => {},
        }
    }
    WHITESPACE_RUN.replace_all(header[..end].trim(), " ").into_owned()
}

#[cfg(test)]
#[path = "../../tests/src/parser/function_tests.rs"]
mod tests;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{
    ide::{IdePosition, IdeRange},
    symbols::{FileTable, Symbol, SymbolKind},
    text_pos::{utf16_column_of_byte_offset, utf16_len},
    vfs::FileId,
};

use super::{
    ParseContext,
    doc_comment::{DocComment, parse_doc_comment},
    lookahead::{
        CONTROL_LOOKAHEAD_CAP, TYPESET_BODY_CAP, brace_balance_outside_strings, code_portion, paren_balance,
        trailing_comment_spans,
    },
    patterns::{
        BLOCK_COMMENT_START, CLOSING_BRACE, CONTROL_STATEMENT, DEFINE, ELSE_CONTINUATION, ENDS_WITH_SEMICOLON, ENUM,
        ENUM_STRUCT, FUNCTION, INCLUDE_ANGLE, INCLUDE_QUOTED, INITIALIZER_OPEN, LINE_COMMENT_START, LOOP_VARIABLE,
        MACRO, METHODMAP, OPENS_BLOCK, PROPERTY, STARTS_BLOCK, TYPEDEF, TYPESET, VARIABLE, find_word,
    },
    state::{LexState, StateStack},
};

/// What the dispatcher does after a rule handled a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// The line is fully handled.
    Done,
    /// Keep trying the remaining rules on the same line.
    Continue,
}

struct Rule {
    pattern: &'static Lazy<Regex>,
    applies: fn(&Parser<'_>, &str) -> bool,
    handler: fn(&mut Parser<'_>, &Captures<'_>, &str) -> Flow,
}

fn always(
    _: &Parser<'_>,
    _: &str,
) -> bool {
    true
}

static RULES: &[Rule] = &[
    Rule {
        pattern: &DEFINE,
        applies: always,
        handler: |p, caps, line| p.read_define(caps, line),
    },
    Rule {
        pattern: &MACRO,
        applies: always,
        handler: |p, caps, line| p.read_macro(caps, line),
    },
    Rule {
        pattern: &INCLUDE_ANGLE,
        applies: always,
        handler: |p, caps, _| p.read_include(caps, super::IncludeKind::Angle),
    },
    Rule {
        pattern: &INCLUDE_QUOTED,
        applies: always,
        handler: |p, caps, _| p.read_include(caps, super::IncludeKind::Quoted),
    },
    Rule {
        pattern: &ENUM_STRUCT,
        applies: always,
        handler: |p, caps, line| p.read_enum_struct(caps, line),
    },
    Rule {
        pattern: &ENUM,
        // `enum Foo;` style lines are forward declarations unless the body is inline.
        applies: |_, line| !ENDS_WITH_SEMICOLON.is_match(line) || line.contains('{'),
        handler: |p, caps, line| p.read_enum(caps, line),
    },
    Rule {
        pattern: &LOOP_VARIABLE,
        applies: always,
        handler: |p, caps, line| p.read_loop_variable(caps, line),
    },
    Rule {
        pattern: &TYPEDEF,
        applies: always,
        handler: |p, caps, line| p.read_typedef(caps, line),
    },
    Rule {
        pattern: &TYPESET,
        applies: always,
        handler: |p, caps, line| p.read_typeset(caps, line),
    },
    Rule {
        pattern: &VARIABLE,
        applies: |p, _| !p.builtin,
        handler: |p, caps, line| p.read_variable(caps, line),
    },
    Rule {
        pattern: &BLOCK_COMMENT_START,
        applies: always,
        handler: |p, _, line| p.consume_comment(line, false),
    },
    Rule {
        pattern: &LINE_COMMENT_START,
        applies: always,
        handler: |p, _, line| p.consume_comment(line, true),
    },
    Rule {
        pattern: &METHODMAP,
        applies: always,
        handler: |p, caps, line| p.read_methodmap(caps, line),
    },
    Rule {
        pattern: &PROPERTY,
        applies: always,
        handler: |p, caps, line| p.read_property(caps, line),
    },
    Rule {
        pattern: &CONTROL_STATEMENT,
        applies: always,
        handler: |p, _, line| p.read_control_statement(line),
    },
    Rule {
        pattern: &FUNCTION,
        applies: always,
        handler: |p, caps, line| p.read_function(caps, line),
    },
    Rule {
        pattern: &CLOSING_BRACE,
        applies: always,
        handler: |p, _, line| p.manage_state(line),
    },
];

/// Line-oriented state machine producing the symbol table of one file.
pub(crate) struct Parser<'a> {
    lines: &'a [&'a str],
    /// Index of the line currently being handled.
    pub(super) index: usize,
    pub(super) file: FileId,
    pub(super) builtin: bool,
    pub(super) context: &'a ParseContext<'a>,
    pub(super) table: FileTable,
    pub(super) states: StateStack,
    /// Name of the open methodmap or enum struct.
    pub(super) container: Option<String>,
    /// Buffered comment lines waiting to be attached to a declaration.
    pub(super) scratch: Vec<String>,
    pub(super) last_func_name: String,
    /// Table key of the function whose body is currently open.
    pub(super) open_function: Option<String>,
    /// Table key of the property whose accessor block is currently open.
    pub(super) open_property: Option<String>,
    pub(super) macros: HashSet<String>,
    pub(super) anonymous_enums: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        lines: &'a [&'a str],
        file: FileId,
        context: &'a ParseContext<'a>,
    ) -> Self {
        Self {
            lines,
            index: 0,
            table: FileTable::new(file.clone()),
            file,
            builtin: context.builtin,
            context,
            states: StateStack::new(),
            container: None,
            scratch: Vec::new(),
            last_func_name: String::new(),
            open_function: None,
            open_property: None,
            macros: context.macros.clone(),
            anonymous_enums: 0,
        }
    }

    pub(crate) fn run(&mut self) {
        while self.index < self.lines.len() {
            let line = self.lines[self.index];
            self.interp_line(line);
            self.index += 1;
        }
    }

    pub(crate) fn into_table(self) -> FileTable {
        self.table
    }

    fn interp_line(
        &mut self,
        line: &str,
    ) {
        self.record_trailing_comments(line);
        if !self.dispatch(line) {
            self.scratch.clear();
        }
        self.skip_initializer_body();
    }

    /// Runs the first rule that handles `line`. Returns whether one did.
    fn dispatch(
        &mut self,
        line: &str,
    ) -> bool {
        for rule in RULES {
            if !(rule.applies)(self, line) {
                continue;
            }
            let Some(caps) = rule.pattern.captures(line) else {
                continue;
            };
            if (rule.handler)(self, &caps, line) == Flow::Done {
                return true;
            }
        }
        false
    }

    /// Consumes the rest of a `= { ... }` initializer opened on the current
    /// line, so its closing `};` is not taken for the end of a scope.
    fn skip_initializer_body(&mut self) {
        let code = code_portion(self.current_line());
        if !INITIALIZER_OPEN.is_match(code) {
            return;
        }
        let mut balance = brace_balance_outside_strings(code);
        let mut scanned = 0;
        while balance > 0 && scanned < TYPESET_BODY_CAP {
            scanned += 1;
            let Some(next) = self.next_line() else {
                break;
            };
            balance += brace_balance_outside_strings(code_portion(next));
        }
    }

    // ── line cursor ─────────────────────────────────────────────────────

    /// Advances to the next line and returns it, or `None` at end of input.
    pub(super) fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.index + 1).copied()?;
        self.index += 1;
        Some(line)
    }

    /// Line `offset + 1` lines below the current one, without consuming it.
    pub(super) fn peek(
        &self,
        offset: usize,
    ) -> Option<&'a str> {
        self.lines.get(self.index + 1 + offset).copied()
    }

    pub(super) fn current_line(&self) -> &'a str {
        self.line_at(self.index)
    }

    pub(super) fn line_at(
        &self,
        index: usize,
    ) -> &'a str {
        self.lines.get(index).copied().unwrap_or("")
    }

    // ── symbol helpers ──────────────────────────────────────────────────

    pub(super) fn take_doc(&mut self) -> DocComment {
        let doc = parse_doc_comment(&self.scratch);
        self.scratch.clear();
        doc
    }

    /// Range of the first whole-word occurrence of `name` on the current line.
    pub(super) fn definition_range(
        &self,
        name: &str,
        line: &str,
    ) -> IdeRange {
        self.range_at(find_word(line, name), name, line)
    }

    pub(super) fn range_at(
        &self,
        byte_start: Option<usize>,
        name: &str,
        line: &str,
    ) -> IdeRange {
        let line_no = self.index as u32;
        match byte_start {
            Some(start) => {
                let start = utf16_column_of_byte_offset(line, start);
                IdeRange::on_line(line_no, start, start + utf16_len(name))
            },
            None => IdeRange::on_line(line_no, 0, 0),
        }
    }

    pub(super) fn new_symbol(
        &self,
        kind: SymbolKind,
        name: &str,
        range: IdeRange,
    ) -> Symbol {
        let mut symbol = Symbol::new(kind, name, self.file.clone(), range);
        symbol.builtin = self.builtin;
        symbol
    }

    /// Closes the declaration stored under `key` at the end of the current line.
    pub(super) fn add_full_range(
        &mut self,
        key: &str,
    ) {
        let end = IdePosition::new(self.index as u32, utf16_len(self.current_line()));
        if let Some(symbol) = self.table.get_mut(key) {
            let start = IdePosition::new(symbol.range.start.line, 0);
            symbol.set_full_range(IdeRange::new(start, end));
        }
    }

    // ── structural rules ────────────────────────────────────────────────

    /// Whether a statement starting on the current line opens a `{ }` block.
    ///
    /// Follows the header's parentheses across lines, then checks for a brace
    /// at the end of the header or at the start of the following line.
    pub(super) fn block_follows(
        &self,
        line: &str,
    ) -> bool {
        let mut balance = paren_balance(line);
        let mut current = line;
        let mut offset = 0;
        let mut iterations = 0;
        while balance != 0 && iterations < CONTROL_LOOKAHEAD_CAP {
            iterations += 1;
            let Some(next) = self.peek(offset) else {
                return false;
            };
            offset += 1;
            current = next;
            balance += paren_balance(next);
        }
        if OPENS_BLOCK.is_match(code_portion(current)) {
            return true;
        }
        self.peek(offset).is_some_and(|next| STARTS_BLOCK.is_match(next))
    }

    fn record_trailing_comments(
        &mut self,
        line: &str,
    ) {
        for (start, end) in trailing_comment_spans(line) {
            let range = IdeRange::on_line(
                self.index as u32,
                utf16_column_of_byte_offset(line, start),
                utf16_column_of_byte_offset(line, end),
            );
            let key = format!("comment:{}:{start}", self.index);
            let symbol = self.new_symbol(SymbolKind::Comment, "", range);
            self.table.insert(key, symbol);
        }
    }

    /// Buffers a comment block so the declaration below it can pick it up.
    fn consume_comment(
        &mut self,
        line: &str,
        line_comment: bool,
    ) -> Flow {
        let start_line = self.index as u32;
        let start_col = utf16_column_of_byte_offset(line, line.len() - line.trim_start().len());
        self.scratch.clear();
        self.scratch.push(line.to_string());

        if line_comment {
            while let Some(next) = self.peek(0) {
                if !LINE_COMMENT_START.is_match(next) {
                    break;
                }
                self.index += 1;
                self.scratch.push(next.to_string());
            }
        } else {
            let opener_end = line.find("/*").map_or(0, |at| at + 2);
            let mut closed = line[opener_end..].contains("*/");
            while !closed {
                let Some(next) = self.next_line() else {
                    break;
                };
                self.scratch.push(next.to_string());
                closed = next.contains("*/");
            }
        }

        let end_line = self.current_line();
        let end_col = match end_line.find("*/") {
            Some(at) if !line_comment => utf16_column_of_byte_offset(end_line, at + 2),
            _ => utf16_len(end_line),
        };
        let range =
            IdeRange::new(IdePosition::new(start_line, start_col), IdePosition::new(self.index as u32, end_col));
        let symbol = self.new_symbol(SymbolKind::Comment, "", range);
        self.table.insert(format!("comment:{start_line}:block"), symbol);
        Flow::Done
    }

    fn read_control_statement(
        &mut self,
        line: &str,
    ) -> Flow {
        if self.block_follows(line) {
            self.states.push(LexState::Loop);
        }
        Flow::Done
    }

    /// Handles a closing brace: pops the innermost scope and closes the
    /// declaration that owned it.
    fn manage_state(
        &mut self,
        line: &str,
    ) -> Flow {
        if ELSE_CONTINUATION.is_match(line) && self.block_follows(line) {
            return Flow::Done;
        }
        let Some(popped) = self.states.pop() else {
            return Flow::Done;
        };
        match popped {
            LexState::Function => {
                if let Some(key) = self.open_function.take() {
                    self.add_full_range(&key);
                }
            },
            LexState::Methodmap | LexState::EnumStruct => {
                if let Some(name) = self.container.take() {
                    self.add_full_range(&name);
                }
            },
            LexState::Property => {
                if let Some(key) = self.open_property.take() {
                    self.add_full_range(&key);
                }
            },
            LexState::Loop | LexState::Macro | LexState::Global => {},
        }
        Flow::Done
    }
}

#[cfg(test)]
#[path = "../../tests/src/parser/scanner_tests.rs"]
mod tests;

//! Handlers for every declaration form other than functions.

use regex::Captures;

use crate::symbols::{GLOBAL_SCOPE, ParamDoc, Symbol, SymbolKind};

use super::{
    IncludeKind, IncludeRequest,
    lookahead::{CONTROL_LOOKAHEAD_CAP, FUNCTION_HEADER_CAP, TYPESET_BODY_CAP, code_portion, split_top_level},
    patterns::{
        DECLARATION_TYPE, ENUM_MEMBER, MEMBER_BLOCK_DOC, MEMBER_LINE_DOC, PARAMETER, PARENTHESISED,
        SINGLE_LINE_BODY, TRAILING_COMMA, VARIABLE_NAME, find_word,
    },
    scanner::{Flow, Parser},
    state::LexState,
};

/// Words that look like a declaration type but start a statement instead.
const STATEMENT_WORDS: &[&str] = &["return", "delete", "case", "else", "goto", "throw", "sizeof", "view_as"];

/// Legacy declarators that carry no type.
const UNTYPED_DECLARATORS: &[&str] = &["new", "decl"];

fn group<'t>(
    caps: &Captures<'t>,
    index: usize,
) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

impl<'a> Parser<'a> {
    pub(super) fn read_define(
        &mut self,
        caps: &Captures<'_>,
        line: &str,
    ) -> Flow {
        let name = group(caps, 1);
        let value = code_portion(group(caps, 2)).trim();
        let doc = self.take_doc();
        let range = self.definition_range(name, line);
        let mut symbol = self.new_symbol(SymbolKind::Constant, name, range);
        symbol.detail = format!("#define {name} {value}");
        symbol.description = doc.description;
        symbol.value = Some(value.to_string());
        symbol.deprecated = doc.deprecated;
        self.table.insert(name, symbol);
        Flow::Done
    }

    pub(super) fn read_macro(
        &mut self,
        caps: &Captures<'_>,
        line: &str,
    ) -> Flow {
        let name = group(caps, 1);
        let doc = self.take_doc();
        let range = self.definition_range(name, line);
        let mut symbol = self.new_symbol(SymbolKind::Macro, name, range);
        symbol.detail = line.trim().to_string();
        symbol.description = doc.description;
        symbol.params = if doc.params.is_empty() {
            group(caps, 2)
                .split(',')
                .map(str::trim)
                .filter(|param| !param.is_empty())
                .map(|param| ParamDoc::new(param, ""))
                .collect()
        } else {
            doc.params
        };
        symbol.deprecated = doc.deprecated;
        self.table.insert(name, symbol);
        self.macros.insert(name.to_string());
        Flow::Done
    }

    pub(super) fn read_include(
        &mut self,
        caps: &Captures<'_>,
        kind: IncludeKind,
    ) -> Flow {
        let request = IncludeRequest {
            path: group(caps, 1),
            kind,
            from: &self.file,
            builtin: self.builtin,
        };
        if let Some(include) = self.context.includes.resolve_include(&request) {
            self.table.add_include(include);
        }
        self.scratch.clear();
        Flow::Done
    }

    pub(super) fn read_enum_struct(
        &mut self,
        caps: &Captures<'_>,
        line: &str,
    ) -> Flow {
        let name = group(caps, 1);
        let doc = self.take_doc();
        let range = self.definition_range(name, line);
        let mut symbol = self.new_symbol(SymbolKind::EnumStruct, name, range);
        symbol.detail = format!("enum struct {name}");
        symbol.description = doc.description;
        symbol.deprecated = doc.deprecated;
        self.table.insert(name, symbol);

        if SINGLE_LINE_BODY.is_match(line) {
            self.add_full_range(name);
        } else {
            self.states.push(LexState::EnumStruct);
            self.container = Some(name.to_string());
        }
        Flow::Done
    }

    /// Reads an enum and its members. Nothing is emitted when the closing
    /// brace is missing within the look-ahead cap.
    pub(super) fn read_enum(
        &mut self,
        caps: &Captures<'_>,
        line: &str,
    ) -> Flow {
        let doc = self.take_doc();
        let (name, key, range) = match caps.get(1).map(|m| m.as_str()).filter(|name| !name.is_empty()) {
            Some(name) => (name.to_string(), name.to_string(), self.definition_range(name, line)),
            None => {
                self.anonymous_enums += 1;
                let name = format!("Enum #{}", self.anonymous_enums);
                let key = format!("{}{}", self.anonymous_enums, self.file.file_name());
                (name, key, self.range_at(find_word(line, "enum"), "enum", line))
            },
        };
        let mut symbol = self.new_symbol(SymbolKind::Enum, &name, range);
        symbol.detail = name.clone();
        symbol.description = doc.description;
        symbol.deprecated = doc.deprecated;

        let mut members = Vec::new();
        let mut closed = false;
        if let Some(brace) = line.find('{') {
            let body = &line[brace + 1..];
            match body.find('}') {
                Some(close) => {
                    self.read_enum_members(&body[..close], line, brace + 1, &name, &mut members);
                    closed = true;
                },
                None => self.read_enum_members(body, line, brace + 1, &name, &mut members),
            }
        }

        let mut scanned = 0;
        while !closed && scanned < CONTROL_LOOKAHEAD_CAP {
            scanned += 1;
            let Some(next) = self.next_line() else {
                break;
            };
            match next.find('}') {
                Some(close) => {
                    self.read_enum_members(&next[..close], next, 0, &name, &mut members);
                    closed = true;
                },
                None => self.read_enum_members(next, next, 0, &name, &mut members),
            }
        }
        if !closed {
            return Flow::Done;
        }

        self.table.insert(key.clone(), symbol);
        for member in members {
            self.table.insert(member.name.clone(), member);
        }
        self.add_full_range(&key);
        Flow::Done
    }

    /// Collects one member per comma separated entry of `body`, a slice of
    /// `line` starting at byte `offset`.
    fn read_enum_members(
        &self,
        body: &str,
        line: &str,
        offset: usize,
        enum_name: &str,
        members: &mut Vec<Symbol>,
    ) {
        let description = MEMBER_BLOCK_DOC
            .captures(line)
            .or_else(|| MEMBER_LINE_DOC.captures(line))
            .map(|caps| group(&caps, 1).trim().to_string())
            .unwrap_or_default();
        let code = match body.find("//").into_iter().chain(body.find("/*")).min() {
            Some(comment) => &body[..comment],
            None => body,
        };
        for (start, segment) in split_top_level(code) {
            let Some(caps) = ENUM_MEMBER.captures(segment) else {
                continue;
            };
            let Some(ident) = caps.get(1) else {
                continue;
            };
            let member = ident.as_str();
            if member.is_empty() || !member.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
                continue;
            }
            let range = self.range_at(Some(offset + start + ident.start()), member, line);
            let mut symbol = self.new_symbol(SymbolKind::EnumMember, member, range);
            symbol.parent = enum_name.to_string();
            symbol.type_name = enum_name.to_string();
            symbol.detail = enum_name.to_string();
            symbol.description = description.clone();
            members.push(symbol);
        }
    }

    pub(super) fn read_loop_variable(
        &mut self,
        caps: &Captures<'_>,
        line: &str,
    ) -> Flow {
        if !self.builtin {
            let name = group(caps, 1);
            if !name.is_empty() {
                self.add_variable(name, line, "int", None, false);
            }
        }
        if self.block_follows(line) {
            self.states.push(LexState::Loop);
        }
        self.scratch.clear();
        Flow::Done
    }

    pub(super) fn read_typedef(
        &mut self,
        caps: &Captures<'_>,
        line: &str,
    ) -> Flow {
        let name = group(caps, 1);
        let doc = self.take_doc();
        let range = self.definition_range(name, line);
        let mut symbol = self.new_symbol(SymbolKind::TypeDef, name, range);
        symbol.detail = line.trim().to_string();
        symbol.type_name = group(caps, 2).to_string();
        symbol.description = doc.description;
        symbol.params = if doc.params.is_empty() {
            declared_params(line)
        } else {
            doc.params
        };
        symbol.deprecated = doc.deprecated;
        self.table.insert(name, symbol);
        Flow::Done
    }

    pub(super) fn read_typeset(
        &mut self,
        caps: &Captures<'_>,
        line: &str,
    ) -> Flow {
        let name = group(caps, 1);
        let doc = self.take_doc();
        let range = self.definition_range(name, line);
        let mut symbol = self.new_symbol(SymbolKind::TypeSet, name, range);
        symbol.description = doc.description;
        symbol.deprecated = doc.deprecated;

        let mut members = 0usize;
        let mut closed = line.contains('}');
        let mut scanned = 0;
        while !closed && scanned < TYPESET_BODY_CAP {
            scanned += 1;
            let Some(next) = self.next_line() else {
                break;
            };
            if next.trim_start().starts_with("function") {
                members += 1;
            }
            closed = next.trim_start().starts_with('}');
        }
        if !closed {
            return Flow::Done;
        }

        symbol.detail = format!("typeset {name} ({members} members)");
        self.table.insert(name, symbol);
        self.add_full_range(name);
        Flow::Done
    }

    pub(super) fn read_variable(
        &mut self,
        caps: &Captures<'_>,
        line: &str,
    ) -> Flow {
        let declared = DECLARATION_TYPE.captures(line).map(|caps| group(&caps, 1)).unwrap_or_default();
        if STATEMENT_WORDS.contains(&declared) {
            return Flow::Continue;
        }
        let type_name = if UNTYPED_DECLARATORS.contains(&declared) {
            ""
        } else {
            declared
        };
        let doc = self.take_doc();

        let Some(start) = caps.get(1).map(|m| m.start()) else {
            return Flow::Done;
        };
        let mut keys = self.declare_segments(&line[start..], line, type_name);

        let mut current = line;
        let mut continued = 0;
        while TRAILING_COMMA.is_match(current) && continued < FUNCTION_HEADER_CAP {
            continued += 1;
            let Some(next) = self.next_line() else {
                break;
            };
            current = next;
            keys.extend(self.declare_segments(next, next, type_name));
        }

        if let Some(symbol) = keys.first().and_then(|key| self.table.get_mut(key)) {
            symbol.description = doc.description;
            symbol.deprecated = doc.deprecated;
        }
        Flow::Done
    }

    /// Declares every comma separated declarator in `text`, a suffix of `line`.
    fn declare_segments(
        &mut self,
        text: &str,
        line: &str,
        type_name: &str,
    ) -> Vec<String> {
        let code = text.trim_end().trim_end_matches(';');
        let mut keys = Vec::new();
        for (_, segment) in split_top_level(code) {
            // Legacy `Tag:name` declarations carry their tag inline.
            let (tag, declarator) = match segment.split_once(':') {
                Some((tag, rest)) if !tag.contains('=') && !tag.contains('[') => (tag.trim(), rest),
                _ => ("", segment),
            };
            let Some(caps) = VARIABLE_NAME.captures(declarator) else {
                continue;
            };
            let name = group(&caps, 1);
            if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            let declared_type = if tag.is_empty() {
                type_name
            } else {
                tag
            };
            keys.push(self.add_variable(name, line, declared_type, None, false));
        }
        keys
    }

    pub(super) fn read_methodmap(
        &mut self,
        caps: &Captures<'_>,
        line: &str,
    ) -> Flow {
        let name = group(caps, 1);
        let parent = group(caps, 2);
        let doc = self.take_doc();
        let range = self.definition_range(name, line);
        let mut symbol = self.new_symbol(SymbolKind::Methodmap, name, range);
        symbol.type_name = parent.to_string();
        symbol.detail = if parent.is_empty() {
            format!("methodmap {name}")
        } else {
            format!("methodmap {name} < {parent}")
        };
        symbol.description = doc.description;
        symbol.deprecated = doc.deprecated;
        self.table.insert(name, symbol);

        if SINGLE_LINE_BODY.is_match(line) {
            self.add_full_range(name);
        } else {
            self.states.push(LexState::Methodmap);
            self.container = Some(name.to_string());
        }
        Flow::Done
    }

    pub(super) fn read_property(
        &mut self,
        caps: &Captures<'_>,
        line: &str,
    ) -> Flow {
        if self.states.top() != LexState::Methodmap {
            return Flow::Continue;
        }
        let Some(methodmap) = self.container.clone() else {
            return Flow::Continue;
        };
        let type_name = group(caps, 1);
        let name = group(caps, 2);
        let doc = self.take_doc();
        let range = self.definition_range(name, line);
        let mut symbol = self.new_symbol(SymbolKind::Property, name, range);
        symbol.parent = methodmap.clone();
        symbol.type_name = type_name.to_string();
        symbol.detail = format!("property {type_name} {name}");
        symbol.description = doc.description;
        symbol.deprecated = doc.deprecated;
        let key = format!("{name}{methodmap}");
        self.table.insert(key.clone(), symbol);

        if SINGLE_LINE_BODY.is_match(line) {
            self.add_full_range(&key);
        } else {
            self.open_property = Some(key);
            self.states.push(LexState::Property);
        }
        Flow::Done
    }

    /// Scope a variable declared now belongs to.
    fn variable_scope(
        &self,
        func_name: Option<&str>,
    ) -> String {
        match func_name {
            Some(name) => name.to_string(),
            None if self.states.contains(LexState::Function) => self.last_func_name.clone(),
            None => GLOBAL_SCOPE.to_string(),
        }
    }

    fn variable_key(
        &self,
        name: &str,
        scope: &str,
        in_function: bool,
    ) -> String {
        let enum_struct = match self.states.contains(LexState::EnumStruct) {
            true => self.container.as_deref().unwrap_or_default(),
            false => "",
        };
        let mut key = format!("{name}{scope}{enum_struct}");
        if self.in_container() && in_function {
            key.push_str(&self.last_func_name);
        }
        key
    }

    fn in_container(&self) -> bool {
        self.states.contains(LexState::EnumStruct) || self.states.contains(LexState::Methodmap)
    }

    /// Records a variable, a function parameter or an enum struct field and
    /// returns its table key.
    ///
    /// `func_name` names the function a parameter belongs to. Without it the
    /// scope comes from the function currently open, or the global scope.
    pub(super) fn add_variable(
        &mut self,
        name: &str,
        line: &str,
        type_name: &str,
        func_name: Option<&str>,
        is_param: bool,
    ) -> String {
        let scope = self.variable_scope(func_name);
        let in_function = self.states.contains(LexState::Function) || is_param;
        let key = self.variable_key(name, &scope, in_function);
        let range = self.definition_range(name, line);
        let enum_struct = self.states.contains(LexState::EnumStruct).then(|| self.container.clone()).flatten();

        let mut symbol = if self.in_container() && in_function {
            let mut symbol = self.new_symbol(SymbolKind::Variable, name, range);
            symbol.parent = scope;
            symbol.enum_struct = enum_struct;
            symbol
        } else if let Some(container) = enum_struct.filter(|_| !in_function) {
            let mut symbol = self.new_symbol(SymbolKind::Property, name, range);
            symbol.detail = format!("{type_name} {name}").trim().to_string();
            symbol.parent = container;
            symbol
        } else {
            let mut symbol = self.new_symbol(SymbolKind::Variable, name, range);
            symbol.parent = scope;
            symbol
        };
        symbol.type_name = type_name.to_string();
        if symbol.detail.is_empty() {
            symbol.detail = format!("{type_name} {name}").trim().to_string();
        }
        self.table.insert(key.clone(), symbol);
        key
    }
}

/// Parameter names declared between the parentheses of `line`.
pub(crate) fn declared_params(line: &str) -> Vec<ParamDoc> {
    let Some(inner) = PARENTHESISED.captures(line).map(|caps| group(&caps, 1).to_string()) else {
        return Vec::new();
    };
    split_top_level(&inner)
        .into_iter()
        .filter_map(|(_, segment)| {
            let segment = segment.replace('&', " ");
            let caps = PARAMETER.captures(&segment)?;
            let name = caps.get(2)?.as_str();
            (!name.is_empty() && name != "any").then(|| ParamDoc::new(name, ""))
        })
        .collect()
}

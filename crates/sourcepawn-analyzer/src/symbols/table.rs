use std::collections::HashMap;

use crate::vfs::FileId;

use super::types::{Include, OutgoingReference, Symbol, SymbolKind};

const SOURCEMOD_INCLUDE: &str = "sourcemod.inc";

const DEFAULT_CONSTANTS: &[&str] = &[
    "true",
    "false",
    "null",
    "EOS",
    "INVALID_HANDLE",
    "INVALID_FUNCTION",
    "MaxClients",
    "MAXPLAYERS",
    "NULL_STRING",
    "NULL_VECTOR",
    "cellbits",
    "cellmax",
    "cellmin",
    "charbits",
    "charmax",
    "charmin",
    "ucharmax",
    "__Pawn",
    "__LINE__",
    "__BINARY_PATH__",
    "__BINARY_NAME__",
];

const DEFAULT_KEYWORDS: &[&str] = &[
    "if",
    "else",
    "for",
    "while",
    "do",
    "switch",
    "case",
    "default",
    "return",
    "break",
    "continue",
    "new",
    "decl",
    "delete",
    "forward",
    "native",
    "public",
    "static",
    "stock",
    "const",
    "enum",
    "struct",
    "methodmap",
    "property",
    "typedef",
    "typeset",
    "function",
    "this",
    "view_as",
    "sizeof",
    "char",
    "float",
    "int",
    "bool",
    "void",
    "any",
];

/// Symbols and includes of a single file.
///
/// Symbols are stored in insertion order. Inserting with an existing key
/// replaces the symbol in place, keeping its original position.
#[derive(Debug, Clone)]
pub struct FileTable {
    file: FileId,
    symbols: Vec<Symbol>,
    keys: HashMap<String, usize>,
    includes: Vec<Include>,
    outgoing: Vec<OutgoingReference>,
}

impl FileTable {
    pub fn new(file: FileId) -> Self {
        let mut table = Self {
            file,
            symbols: Vec::new(),
            keys: HashMap::new(),
            includes: Vec::new(),
            outgoing: Vec::new(),
        };
        if table.file.file_name() == SOURCEMOD_INCLUDE {
            table.seed_language_defaults();
        }
        table
    }

    pub fn file(&self) -> &FileId {
        &self.file
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        symbol: Symbol,
    ) {
        let key = key.into();
        match self.keys.get(&key) {
            Some(&index) => self.symbols[index] = symbol,
            None => {
                self.keys.insert(key, self.symbols.len());
                self.symbols.push(symbol);
            },
        }
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&Symbol> {
        self.keys.get(key).map(|&index| &self.symbols[index])
    }

    pub fn get_mut(
        &mut self,
        key: &str,
    ) -> Option<&mut Symbol> {
        let index = *self.keys.get(key)?;
        self.symbols.get_mut(index)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn add_include(
        &mut self,
        include: Include,
    ) {
        self.includes.push(include);
    }

    pub fn includes(&self) -> &[Include] {
        &self.includes
    }

    pub fn add_outgoing_reference(
        &mut self,
        reference: OutgoingReference,
    ) {
        self.outgoing.push(reference);
    }

    pub fn outgoing_references(&self) -> &[OutgoingReference] {
        &self.outgoing
    }

    fn seed_language_defaults(&mut self) {
        for name in DEFAULT_CONSTANTS {
            let mut symbol = Symbol::new(SymbolKind::Constant, *name, self.file.clone(), Default::default());
            symbol.builtin = true;
            symbol.detail = (*name).to_string();
            self.insert(*name, symbol);
        }
        for name in DEFAULT_KEYWORDS {
            let mut symbol = Symbol::new(SymbolKind::Keyword, *name, self.file.clone(), Default::default());
            symbol.builtin = true;
            self.insert(*name, symbol);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/symbols/table_tests.rs"]
mod tests;

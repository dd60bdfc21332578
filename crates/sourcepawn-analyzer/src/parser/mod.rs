//! Line-oriented SourcePawn scanner.
//!
//! [`parse_text`] turns one file into a [`FileTable`]: every declaration the
//! scanner recognises, the includes it resolved, and the places where tracked
//! symbols are used. The scanner never fails. Constructs it cannot finish are
//! dropped and scanning resumes on the next line.

mod declarations;
mod doc_comment;
mod function;
mod lookahead;
mod patterns;
mod references;
mod scanner;
mod state;

use std::{
    collections::{HashMap, HashSet},
    panic::{AssertUnwindSafe, catch_unwind},
};

use crate::{
    symbols::{FileTable, Include},
    vfs::FileId,
};

pub(crate) use declarations::declared_params;
pub(crate) use patterns::{
    CONTROL_KEYWORD, DOC_TARGET_HEADER, DOC_TRIGGER, INCLUDE_ANGLE, INCLUDE_QUOTED, MD_CALL, MD_DEPRECATED,
    MD_LEADING_STAR, MD_MEMBER_MARK, MD_PARAGRAPH, MD_PARAM, MD_SOFT_BREAK, MD_STAR_BREAK, MD_STAR_LINE, MD_TAG,
    NEW_ASSIGNMENT, PARTIAL_INCLUDE_ANGLE, PARTIAL_INCLUDE_QUOTED, TRAILING_CALL, TRAILING_CONSTRUCTOR_CALL,
    TRAILING_METHOD_CALL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    /// `#include <name>`: searched in the include directories.
    Angle,
    /// `#include "name"`: searched next to the including file first.
    Quoted,
}

/// One `#include` directive waiting to be resolved to a file.
#[derive(Debug, Clone, Copy)]
pub struct IncludeRequest<'r> {
    pub path: &'r str,
    pub kind: IncludeKind,
    pub from: &'r FileId,
    /// Whether the including file is itself an SDK include.
    pub builtin: bool,
}

/// Maps include directives to files.
pub trait IncludeResolver {
    fn resolve_include(
        &self,
        request: &IncludeRequest<'_>,
    ) -> Option<Include>;
}

impl<F> IncludeResolver for F
where
    F: Fn(&IncludeRequest<'_>) -> Option<Include>,
{
    fn resolve_include(
        &self,
        request: &IncludeRequest<'_>,
    ) -> Option<Include> {
        self(request)
    }
}

/// Resolver that drops every include.
pub struct NoIncludes;

impl IncludeResolver for NoIncludes {
    fn resolve_include(
        &self,
        _request: &IncludeRequest<'_>,
    ) -> Option<Include> {
        None
    }
}

/// What the scanner knows about the rest of the workspace.
pub struct ParseContext<'r> {
    /// The file is an SDK include.
    pub builtin: bool,
    /// Macro names declared by files this one can see.
    pub macros: HashSet<String>,
    /// Reference-tracked names declared elsewhere, with their declaring file.
    pub external_references: HashMap<String, FileId>,
    pub includes: &'r dyn IncludeResolver,
}

impl<'r> ParseContext<'r> {
    pub fn new(includes: &'r dyn IncludeResolver) -> Self {
        Self {
            builtin: false,
            macros: HashSet::new(),
            external_references: HashMap::new(),
            includes,
        }
    }

    pub fn builtin(
        mut self,
        builtin: bool,
    ) -> Self {
        self.builtin = builtin;
        self
    }
}

#[derive(Debug)]
pub struct ParseOutput {
    pub table: FileTable,
    /// Set when scanning stopped early. The table then holds only the
    /// symbols found before that point.
    pub failure: Option<String>,
}

/// Scans `text` as the contents of `file`.
pub fn parse_text(
    text: &str,
    file: FileId,
    context: &ParseContext<'_>,
) -> ParseOutput {
    let lines: Vec<&str> = text.lines().collect();
    let mut parser = scanner::Parser::new(&lines, file, context);
    let outcome = catch_unwind(AssertUnwindSafe(|| parser.run()));
    let mut table = parser.into_table();

    let failure = match outcome {
        Ok(()) => {
            references::collect_references(&mut table, &lines, &context.external_references);
            None
        },
        Err(payload) => Some(
            payload
                .downcast_ref::<&str>()
                .map(|message| message.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "scanner panicked".to_string()),
        ),
    };
    ParseOutput {
        table,
        failure,
    }
}

#[cfg(test)]
#[path = "../../tests/src/parser/mod_tests.rs"]
mod tests;

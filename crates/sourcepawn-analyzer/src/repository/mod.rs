//! Owner of every parsed file's symbol table.

mod include;

use std::{
    collections::{HashMap, HashSet},
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
    sync::Arc,
};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::{
    ide::IdeLocation,
    parser::{self, IncludeKind, IncludeRequest, IncludeResolver, ParseContext},
    symbols::{FileTable, Symbol, SymbolKind},
    vfs::{FileId, normalized_path},
};

pub(crate) use include::include_folders;
use include::RepositoryResolver;

/// Search paths and project layout used when resolving includes.
///
/// Every parse and query takes the configuration of the document it was
/// started for, so documents of different projects never share one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// SourceMod `scripting` directory. Its `include/` folder holds the SDK.
    pub sdk_root: Option<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    /// Entry file whose include closure answers every query.
    pub main_path: Option<PathBuf>,
}

impl RepositoryConfig {
    pub fn sdk_include_dir(&self) -> Option<PathBuf> {
        self.sdk_root.as_ref().map(|root| root.join("include"))
    }

    fn is_sdk_file(
        &self,
        file: &FileId,
    ) -> bool {
        if file.is_builtin() {
            return true;
        }
        match (self.sdk_include_dir(), file.to_path()) {
            (Some(sdk), Some(path)) => path.starts_with(normalized_path(&sdk)) || path.starts_with(&sdk),
            _ => false,
        }
    }
}

#[derive(Debug)]
pub enum ParseError {
    Io {
        file: FileId,
        source: std::io::Error,
    },
    Panicked {
        file: FileId,
        message: String,
    },
}

impl Display for ParseError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Io {
                file,
                source,
            } => write!(f, "failed to read {file}: {source}"),
            Self::Panicked {
                file,
                message,
            } => write!(f, "scanner stopped early in {file}: {message}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io {
                source,
                ..
            } => Some(source),
            Self::Panicked {
                ..
            } => None,
        }
    }
}

/// The flattened symbols of an include closure.
#[derive(Debug, Clone, Default)]
pub struct ItemSet {
    tables: Vec<Arc<FileTable>>,
}

impl ItemSet {
    pub fn new(tables: Vec<Arc<FileTable>>) -> Self {
        Self {
            tables,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.tables.iter().flat_map(|table| table.symbols().iter())
    }

    pub fn tables(&self) -> &[Arc<FileTable>] {
        &self.tables
    }

    pub fn files(&self) -> impl Iterator<Item = &FileId> {
        self.tables.iter().map(|table| table.file())
    }

    pub fn len(&self) -> usize {
        self.tables.iter().map(|table| table.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct ItemsRepository {
    tables: DashMap<FileId, Arc<FileTable>>,
    documents: DashMap<FileId, ()>,
}

impl Default for ItemsRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemsRepository {
    pub fn new() -> Self {
        Self {
            tables: DashMap::new(),
            documents: DashMap::new(),
        }
    }

    // ── Known documents ──────────────────────────────────────────────────

    pub fn add_document(
        &self,
        file: FileId,
    ) {
        self.documents.insert(file, ());
    }

    pub fn is_known(
        &self,
        file: &FileId,
    ) -> bool {
        self.documents.contains_key(file)
    }

    pub fn known_documents(&self) -> Vec<FileId> {
        let mut documents: Vec<FileId> = self.documents.iter().map(|entry| entry.key().clone()).collect();
        documents.sort();
        documents
    }

    // ── Tables ───────────────────────────────────────────────────────────

    pub fn table(
        &self,
        file: &FileId,
    ) -> Option<Arc<FileTable>> {
        self.tables.get(file).map(|entry| Arc::clone(entry.value()))
    }

    pub fn all_tables(&self) -> Vec<Arc<FileTable>> {
        self.tables.iter().map(|entry| Arc::clone(entry.value())).collect()
    }

    pub fn remove_file(
        &self,
        file: &FileId,
    ) {
        self.tables.remove(file);
    }

    // ── Parsing ──────────────────────────────────────────────────────────

    /// Reads `path` from disk and parses it.
    pub fn parse_file(
        &self,
        path: &Path,
        config: &RepositoryConfig,
    ) -> Result<usize, ParseError> {
        let file = FileId::from_path(path);
        let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            file: file.clone(),
            source,
        })?;
        self.parse_text(&file, &text, config)
    }

    /// Parses `text` as the contents of `file`, replacing its table, then
    /// parses any include target that has no table yet.
    ///
    /// Returns the number of symbols stored for `file`.
    pub fn parse_text(
        &self,
        file: &FileId,
        text: &str,
        config: &RepositoryConfig,
    ) -> Result<usize, ParseError> {
        self.add_document(file.clone());

        let (macros, external) = self.visible_names(file);
        let result = self.parse_once(file, text, config, macros.clone(), external.clone());
        self.read_unscanned_imports(file, config);

        // On a first parse the includes were unknown, so names they declare
        // could not be told apart from plain identifiers.
        let (new_macros, new_external) = self.visible_names(file);
        if new_macros != macros || new_external != external {
            debug!("reparsing {} with names from its includes", file.file_name());
            return self.parse_once(file, text, config, new_macros, new_external);
        }
        result
    }

    fn parse_once(
        &self,
        file: &FileId,
        text: &str,
        config: &RepositoryConfig,
        macros: HashSet<String>,
        external: HashMap<String, FileId>,
    ) -> Result<usize, ParseError> {
        let resolver = RepositoryResolver {
            repository: self,
            config,
        };
        let mut context = ParseContext::new(&resolver).builtin(config.is_sdk_file(file));
        context.macros = macros;
        context.external_references = external;

        let output = parser::parse_text(text, file.clone(), &context);
        let count = output.table.len();
        self.tables.insert(file.clone(), Arc::new(output.table));

        match output.failure {
            None => Ok(count),
            Some(message) => {
                warn!("scanner stopped early in {}: {message}", file.file_name());
                Err(ParseError::Panicked {
                    file: file.clone(),
                    message,
                })
            },
        }
    }

    /// Parses every file reachable from `file` that has not been parsed yet.
    pub fn read_unscanned_imports(
        &self,
        file: &FileId,
        config: &RepositoryConfig,
    ) {
        let Some(table) = self.table(file) else {
            return;
        };
        for include in table.includes() {
            let target = self.upgrade_placeholder(&include.target).unwrap_or_else(|| include.target.clone());
            if self.tables.contains_key(&target) {
                continue;
            }
            let Some(path) = target.to_path() else {
                continue;
            };
            if let Err(error) = self.parse_file(&path, config) {
                warn!("{error}");
            }
        }
    }

    /// Known document matching an unresolved `builtin://` include, if one has
    /// appeared since the include was recorded.
    fn upgrade_placeholder(
        &self,
        target: &FileId,
    ) -> Option<FileId> {
        let include_path = target.as_str().strip_prefix("builtin://")?;
        let suffix = format!("/{}", include_path.replace('\\', "/"));
        self.documents
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|candidate| candidate.as_str().replace('\\', "/").ends_with(&suffix))
            .min()
    }

    /// Macro names and reference-tracked names declared in the include closure
    /// of `file`, excluding `file` itself.
    fn visible_names(
        &self,
        file: &FileId,
    ) -> (HashSet<String>, HashMap<String, FileId>) {
        let mut macros = HashSet::new();
        let mut external = HashMap::new();
        for table in self.include_closure_tables(file) {
            if table.file() == file {
                continue;
            }
            for symbol in table.symbols() {
                if symbol.kind == SymbolKind::Macro {
                    macros.insert(symbol.name.clone());
                }
                if symbol.kind.tracks_references() && symbol.is_global() {
                    external.entry(symbol.name.clone()).or_insert_with(|| table.file().clone());
                }
            }
        }
        (macros, external)
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// File an `#include` of `path` inside `from` refers to. `None` when it
    /// only resolves to a placeholder.
    pub fn resolve_include(
        &self,
        from: &FileId,
        path: &str,
        kind: IncludeKind,
        config: &RepositoryConfig,
    ) -> Option<FileId> {
        let resolver = RepositoryResolver {
            repository: self,
            config,
        };
        let request = IncludeRequest {
            path,
            kind,
            from,
            builtin: false,
        };
        let target = resolver.resolve_include(&request)?.target;
        if target.is_builtin() {
            return self.upgrade_placeholder(&target);
        }
        Some(target)
    }

    /// Files reachable from `file` through includes, `file` first, in
    /// depth-first order. Each file appears once, even on cyclic includes.
    pub fn include_closure(
        &self,
        file: &FileId,
    ) -> Vec<FileId> {
        self.include_closure_tables(file).iter().map(|table| table.file().clone()).collect()
    }

    fn include_closure_tables(
        &self,
        file: &FileId,
    ) -> Vec<Arc<FileTable>> {
        let mut visited = HashSet::new();
        let mut ordered = Vec::new();
        let mut stack = vec![file.clone()];
        while let Some(current) = stack.pop() {
            let current = self.upgrade_placeholder(&current).unwrap_or(current);
            if !visited.insert(current.clone()) {
                continue;
            }
            let Some(table) = self.table(&current) else {
                continue;
            };
            for include in table.includes().iter().rev() {
                if !visited.contains(&include.target) {
                    stack.push(include.target.clone());
                }
            }
            ordered.push(table);
        }
        ordered
    }

    /// Uses recorded on `symbol` itself plus outgoing references other files
    /// hold into its file, ordered by file.
    pub fn uses_of(
        &self,
        symbol: &Symbol,
    ) -> Vec<IdeLocation> {
        let mut uses: Vec<IdeLocation> =
            symbol.references.iter().map(|range| IdeLocation::new(symbol.file.clone(), *range)).collect();

        let mut tables = self.all_tables();
        tables.sort_by(|a, b| a.file().cmp(b.file()));
        for table in tables {
            uses.extend(
                table
                    .outgoing_references()
                    .iter()
                    .filter(|reference| reference.name == symbol.name && reference.target == symbol.file)
                    .map(|reference| IdeLocation::new(table.file().clone(), reference.range)),
            );
        }
        uses
    }

    /// Every symbol visible from `file`.
    ///
    /// With a main path configured, the closure starts from the main file.
    /// `file` is added when the main file does not include it.
    pub fn get_all_items(
        &self,
        file: &FileId,
        config: &RepositoryConfig,
    ) -> ItemSet {
        let entry = config.main_path.as_deref().map(FileId::from_path);
        let mut tables = match &entry {
            Some(main) if main != file => self.include_closure_tables(main),
            _ => self.include_closure_tables(file),
        };
        if !tables.iter().any(|table| table.file() == file)
            && let Some(table) = self.table(file)
        {
            tables.insert(0, table);
        }
        ItemSet::new(tables)
    }
}

#[cfg(test)]
#[path = "../../tests/src/repository/repository_tests.rs"]
mod tests;

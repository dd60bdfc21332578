use crate::{ide::IdeRange, vfs::FileId};

/// Scope name recorded on symbols declared outside of any function.
pub const GLOBAL_SCOPE: &str = "$GLOBAL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Method,
    Constructor,
    Variable,
    Constant,
    Enum,
    EnumMember,
    EnumStruct,
    Methodmap,
    Property,
    TypeDef,
    TypeSet,
    Macro,
    Keyword,
    Include,
    Comment,
}

impl SymbolKind {
    /// Members reachable through `.` or `::` on a methodmap or enum struct.
    pub fn is_member(self) -> bool {
        matches!(self, SymbolKind::Method | SymbolKind::Property | SymbolKind::Constructor)
    }

    pub fn is_callable(self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Method | SymbolKind::Constructor | SymbolKind::Macro)
    }

    /// Kinds whose full range delimits a scope a cursor can be inside of.
    pub fn is_container(self) -> bool {
        matches!(self, SymbolKind::Methodmap | SymbolKind::EnumStruct)
    }

    /// Kinds whose uses are tracked as reference locations.
    pub fn tracks_references(self) -> bool {
        matches!(self, SymbolKind::Constant | SymbolKind::EnumMember | SymbolKind::Function | SymbolKind::Macro)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParamDoc {
    pub name: String,
    pub documentation: String,
}

impl ParamDoc {
    pub fn new(
        name: impl Into<String>,
        documentation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            documentation: documentation.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: String,
    pub file: FileId,
    /// Range of the name token only.
    pub range: IdeRange,
    full_range: Option<IdeRange>,
    /// Enclosing scope: [`GLOBAL_SCOPE`], a function name, or a methodmap /
    /// enum struct name.
    pub parent: String,
    /// Declared type of a variable, return type of a function, or the parent
    /// of a methodmap.
    pub type_name: String,
    pub detail: String,
    pub description: String,
    pub params: Vec<ParamDoc>,
    /// Uses of this symbol inside its own file.
    pub references: Vec<IdeRange>,
    pub builtin: bool,
    /// Enum struct a local variable was declared in, if any.
    pub enum_struct: Option<String>,
    pub value: Option<String>,
    pub deprecated: Option<String>,
}

impl Symbol {
    pub fn new(
        kind: SymbolKind,
        name: impl Into<String>,
        file: FileId,
        range: IdeRange,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            file,
            range,
            full_range: None,
            parent: GLOBAL_SCOPE.to_string(),
            type_name: String::new(),
            detail: String::new(),
            description: String::new(),
            params: Vec::new(),
            references: Vec::new(),
            builtin: false,
            enum_struct: None,
            value: None,
            deprecated: None,
        }
    }

    pub fn full_range(&self) -> Option<IdeRange> {
        self.full_range
    }

    /// Records the full declaration range. Only the first call has an effect.
    pub fn set_full_range(
        &mut self,
        range: IdeRange,
    ) -> bool {
        if self.full_range.is_some() {
            return false;
        }
        self.full_range = Some(range);
        true
    }

    pub fn is_global(&self) -> bool {
        self.parent == GLOBAL_SCOPE
    }

    pub fn is_static(&self) -> bool {
        self.detail.split_whitespace().any(|word| word == "static")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Include {
    pub target: FileId,
    pub builtin: bool,
}

impl Include {
    pub fn new(
        target: FileId,
        builtin: bool,
    ) -> Self {
        Self {
            target,
            builtin,
        }
    }
}

/// A use, inside the owning table's file, of a symbol declared in another file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingReference {
    pub name: String,
    pub target: FileId,
    pub range: IdeRange,
}

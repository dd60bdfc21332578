use crate::vfs::FileId;

/// Zero-based line and UTF-16 column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IdePosition {
    pub line: u32,
    pub character: u32,
}

impl IdePosition {
    pub const fn new(
        line: u32,
        character: u32,
    ) -> Self {
        Self {
            line,
            character,
        }
    }
}

/// End-exclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IdeRange {
    pub start: IdePosition,
    pub end: IdePosition,
}

impl IdeRange {
    pub const fn new(
        start: IdePosition,
        end: IdePosition,
    ) -> Self {
        Self {
            start,
            end,
        }
    }

    /// Range on a single line.
    pub const fn on_line(
        line: u32,
        start: u32,
        end: u32,
    ) -> Self {
        Self::new(IdePosition::new(line, start), IdePosition::new(line, end))
    }

    pub fn contains(
        &self,
        position: IdePosition,
    ) -> bool {
        self.start <= position && position < self.end
    }

    /// Inclusive containment, used for scope lookups where the cursor may sit
    /// right on the closing brace.
    pub fn contains_inclusive(
        &self,
        position: IdePosition,
    ) -> bool {
        self.start <= position && position <= self.end
    }

    pub fn contains_range(
        &self,
        other: &IdeRange,
    ) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdeLocation {
    pub file: FileId,
    pub range: IdeRange,
}

impl IdeLocation {
    pub fn new(
        file: FileId,
        range: IdeRange,
    ) -> Self {
        Self {
            file,
            range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    Single(IdeLocation),
    Multiple(Vec<IdeLocation>),
}

impl NavigationTarget {
    pub fn from_locations(locations: Vec<IdeLocation>) -> Option<Self> {
        match locations.len() {
            0 => None,
            1 => locations.first().cloned().map(Self::Single),
            _ => Some(Self::Multiple(locations)),
        }
    }
}

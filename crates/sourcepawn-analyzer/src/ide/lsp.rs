use tower_lsp::lsp_types::{self, CompletionItemKind, GotoDefinitionResponse, Location, Position, Range};

use crate::{
    ide::navigation::{IdeLocation, IdePosition, IdeRange, NavigationTarget},
    symbols::SymbolKind,
};

pub fn lsp_position_to_ide(position: Position) -> IdePosition {
    IdePosition::new(position.line, position.character)
}

pub fn ide_position_to_lsp(position: IdePosition) -> Position {
    Position::new(position.line, position.character)
}

pub fn lsp_range_to_ide(range: Range) -> IdeRange {
    IdeRange::new(lsp_position_to_ide(range.start), lsp_position_to_ide(range.end))
}

pub fn ide_range_to_lsp(range: IdeRange) -> Range {
    Range::new(ide_position_to_lsp(range.start), ide_position_to_lsp(range.end))
}

/// `None` for placeholder files that have no location on disk.
pub fn ide_location_to_lsp(location: IdeLocation) -> Option<Location> {
    let uri = location.file.to_url()?;
    Some(Location {
        uri,
        range: ide_range_to_lsp(location.range),
    })
}

pub fn navigation_target_to_lsp(target: NavigationTarget) -> Option<GotoDefinitionResponse> {
    match target {
        NavigationTarget::Single(location) => ide_location_to_lsp(location).map(GotoDefinitionResponse::Scalar),
        NavigationTarget::Multiple(locations) => {
            let lsp_locations: Vec<Location> = locations.into_iter().filter_map(ide_location_to_lsp).collect();
            if lsp_locations.is_empty() {
                None
            } else if lsp_locations.len() == 1 {
                lsp_locations.into_iter().next().map(GotoDefinitionResponse::Scalar)
            } else {
                Some(GotoDefinitionResponse::Array(lsp_locations))
            }
        },
    }
}

pub fn completion_kind(kind: SymbolKind) -> CompletionItemKind {
    match kind {
        SymbolKind::Function => CompletionItemKind::FUNCTION,
        SymbolKind::Method => CompletionItemKind::METHOD,
        SymbolKind::Constructor => CompletionItemKind::CONSTRUCTOR,
        SymbolKind::Variable => CompletionItemKind::VARIABLE,
        SymbolKind::Constant => CompletionItemKind::CONSTANT,
        SymbolKind::Enum => CompletionItemKind::ENUM,
        SymbolKind::EnumMember => CompletionItemKind::ENUM_MEMBER,
        SymbolKind::EnumStruct => CompletionItemKind::STRUCT,
        SymbolKind::Methodmap => CompletionItemKind::CLASS,
        SymbolKind::Property => CompletionItemKind::PROPERTY,
        SymbolKind::TypeDef | SymbolKind::TypeSet => CompletionItemKind::TYPE_PARAMETER,
        SymbolKind::Macro => CompletionItemKind::FUNCTION,
        SymbolKind::Keyword => CompletionItemKind::KEYWORD,
        SymbolKind::Include => CompletionItemKind::FILE,
        SymbolKind::Comment => CompletionItemKind::TEXT,
    }
}

pub fn document_symbol_kind(kind: SymbolKind) -> lsp_types::SymbolKind {
    match kind {
        SymbolKind::Function | SymbolKind::Macro => lsp_types::SymbolKind::FUNCTION,
        SymbolKind::Method => lsp_types::SymbolKind::METHOD,
        SymbolKind::Constructor => lsp_types::SymbolKind::CONSTRUCTOR,
        SymbolKind::Variable => lsp_types::SymbolKind::VARIABLE,
        SymbolKind::Constant => lsp_types::SymbolKind::CONSTANT,
        SymbolKind::Enum => lsp_types::SymbolKind::ENUM,
        SymbolKind::EnumMember => lsp_types::SymbolKind::ENUM_MEMBER,
        SymbolKind::EnumStruct => lsp_types::SymbolKind::STRUCT,
        SymbolKind::Methodmap => lsp_types::SymbolKind::CLASS,
        SymbolKind::Property => lsp_types::SymbolKind::PROPERTY,
        SymbolKind::TypeDef | SymbolKind::TypeSet => lsp_types::SymbolKind::TYPE_PARAMETER,
        SymbolKind::Keyword => lsp_types::SymbolKind::KEY,
        SymbolKind::Include => lsp_types::SymbolKind::FILE,
        SymbolKind::Comment => lsp_types::SymbolKind::STRING,
    }
}

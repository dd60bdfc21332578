mod provider;
mod table;
mod types;

pub use provider::SymbolProvider;
pub use table::FileTable;
pub use types::{GLOBAL_SCOPE, Include, OutgoingReference, ParamDoc, Symbol, SymbolKind};

pub mod analysis;
pub mod call_hierarchy;
pub mod completion;
pub mod config;
pub mod definition;
pub mod document;
pub mod hover;
pub mod ide;
pub mod parser;
pub mod progress;
pub mod repository;
pub mod semantic_tokens;
pub mod server;
pub mod signature;
pub mod symbols;
pub mod text_pos;
pub mod vfs;

pub use call_hierarchy::CallHierarchyProvider;
pub use completion::CompletionProvider;
pub use config::ServerSettings;
pub use definition::{DefinitionProvider, ReferenceProvider};
pub use hover::HoverProvider;
pub use repository::{ItemSet, ItemsRepository, ParseError, RepositoryConfig};
pub use semantic_tokens::SemanticTokenProvider;
pub use server::SourcePawnLanguageServer;
pub use signature::SignatureHelpProvider;
pub use symbols::{FileTable, Symbol, SymbolKind, SymbolProvider};
pub use vfs::FileId;

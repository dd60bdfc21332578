//! Completion candidates for SourcePawn documents.

mod context;
mod doc_comment;
mod includes;
mod provider;

pub use provider::{CompletionProvider, CompletionRequest};

//! Go-to-definition, references and document highlights.

mod provider;
mod references;

pub use provider::DefinitionProvider;
pub use references::ReferenceProvider;

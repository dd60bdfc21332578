pub(crate) mod handler;
pub(crate) mod state;
pub(crate) mod workspace;

pub use state::SourcePawnLanguageServer;

mod call_site;
mod provider;

pub use provider::SignatureHelpProvider;

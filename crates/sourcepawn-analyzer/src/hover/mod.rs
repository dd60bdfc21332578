mod markdown;
mod provider;

pub use markdown::description_to_markdown;
pub use provider::{HoverProvider, render_symbol};

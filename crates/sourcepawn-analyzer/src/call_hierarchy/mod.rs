//! Incoming and outgoing calls of functions and methods.

mod provider;

pub use provider::CallHierarchyProvider;

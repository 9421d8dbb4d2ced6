//! Interactive chat module
//!
//! Provides a line-editor based interactive mode: one robot command per line.

mod repl;

pub use repl::ChatRepl;

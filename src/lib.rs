//! Language boilerplate generator for the crossbench benchmark DSL.
//!
//! Reads `languages.toml` and regenerates every language-support artifact in a
//! crossbench workspace: the DSL `Lang`/`TokenKind` enums and dispatch tables,
//! the tree-sitter grammar and injection queries, the runtime config structs,
//! the VS Code TextMate grammar, and the stdlib anvil module. Re-running is
//! idempotent - generated regions converge instead of duplicating.

pub mod dsl;
pub mod editor;
pub mod error;
pub mod grammar;
pub mod patch;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod scaffold;
pub mod stdlib;
pub mod sync;
pub mod syntax;
pub mod templates;
pub mod workspace;

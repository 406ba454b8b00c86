//! Scoped symbol table for the type checker.
//!
//! This module owns every declaration the checker sees:
//!
//! - Lexical scopes with frame offset allocation for locals and params
//! - Region (arena) depth tracking used by the escape rule
//! - Namespaces created by `import ... as ns`
//! - Thread capture state of spawned handles and their frozen arguments

pub mod symbol;
pub mod symbol_table;

pub use symbol::{Symbol, SymbolKind, ThreadState, ThreadStateError};
pub use symbol_table::{
    Scope, ScopeId, SymbolId, SymbolTable, CALLEE_SAVED_SPACE, LOCAL_BASE_OFFSET,
    OFFSET_ALIGNMENT, PARAM_BASE_OFFSET,
};

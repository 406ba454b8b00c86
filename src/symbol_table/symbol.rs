use std::fmt::Display;

use thiserror::Error;

use crate::ast::types::{FunctionModifier, Qualifier, Type};

use super::symbol_table::{ScopeId, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Global,
    Local,
    Param,
    Namespace,
    TypeAlias,
}

/// Capture state of a variable bound to a spawned thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadState {
    #[default]
    Normal,
    Pending,
    Synchronized,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThreadStateError {
    #[error("variable is not a pending thread handle")]
    NotPending,
    #[error("variable is already a pending thread handle")]
    AlreadyPending,
    #[error("thread handle has already been synchronized")]
    AlreadySynchronized,
    #[error("variable is not frozen")]
    NotFrozen,
    #[error("unknown variable {0:?}")]
    UnknownVariable(String),
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub kind: SymbolKind,
    /// Negative frame offset for locals and params, 0 for everything else.
    pub offset: i32,
    /// Region depth at the point of declaration.
    pub region_depth: u32,
    pub scope: ScopeId,
    pub qualifier: Qualifier,
    /// Effective modifier, the one the code generator honours.
    pub modifier: FunctionModifier,
    /// Modifier as written in source.
    pub declared_modifier: FunctionModifier,
    pub is_function: bool,
    pub thread_state: ThreadState,
    pub freeze_count: u32,
    /// Arguments frozen by the spawn bound to this symbol.
    pub frozen_args: Vec<SymbolId>,
    /// Members of a namespace symbol.
    pub members: Vec<SymbolId>,
}

impl Symbol {
    pub fn new(name: String, ty: Type, kind: SymbolKind, scope: ScopeId) -> Self {
        Symbol {
            name,
            ty,
            kind,
            offset: 0,
            region_depth: 0,
            scope,
            qualifier: Qualifier::Default,
            modifier: FunctionModifier::Default,
            declared_modifier: FunctionModifier::Default,
            is_function: false,
            thread_state: ThreadState::Normal,
            freeze_count: 0,
            frozen_args: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn is_namespace(&self) -> bool {
        self.kind == SymbolKind::Namespace
    }

    pub fn is_pending(&self) -> bool {
        self.thread_state == ThreadState::Pending
    }

    pub fn is_synchronized(&self) -> bool {
        self.thread_state == ThreadState::Synchronized
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_count > 0
    }

    /// `Normal -> Pending`. Any other starting state is rejected.
    pub fn mark_pending(&mut self) -> Result<(), ThreadStateError> {
        match self.thread_state {
            ThreadState::Normal => {
                self.thread_state = ThreadState::Pending;
                Ok(())
            }
            ThreadState::Pending => Err(ThreadStateError::AlreadyPending),
            ThreadState::Synchronized => Err(ThreadStateError::AlreadySynchronized),
        }
    }

    /// `Pending -> Synchronized`.
    pub fn mark_synchronized(&mut self) -> Result<(), ThreadStateError> {
        match self.thread_state {
            ThreadState::Pending => {
                self.thread_state = ThreadState::Synchronized;
                Ok(())
            }
            ThreadState::Normal => Err(ThreadStateError::NotPending),
            ThreadState::Synchronized => Err(ThreadStateError::AlreadySynchronized),
        }
    }

    /// `Synchronized -> Normal`, for a handle rebound to a new spawn.
    pub fn rebind(&mut self) -> Result<(), ThreadStateError> {
        match self.thread_state {
            ThreadState::Synchronized => {
                self.thread_state = ThreadState::Normal;
                self.frozen_args.clear();
                Ok(())
            }
            ThreadState::Normal => Ok(()),
            ThreadState::Pending => Err(ThreadStateError::AlreadyPending),
        }
    }

    pub fn freeze(&mut self) {
        self.freeze_count += 1;
    }

    pub fn unfreeze(&mut self) -> Result<(), ThreadStateError> {
        if self.freeze_count == 0 {
            return Err(ThreadStateError::NotFrozen);
        }
        self.freeze_count -= 1;
        Ok(())
    }

    pub fn set_frozen_args(&mut self, args: Vec<SymbolId>) {
        self.frozen_args = args;
    }
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Global => write!(f, "global"),
            SymbolKind::Local => write!(f, "local"),
            SymbolKind::Param => write!(f, "param"),
            SymbolKind::Namespace => write!(f, "namespace"),
            SymbolKind::TypeAlias => write!(f, "type"),
        }
    }
}

impl Display for ThreadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadState::Normal => write!(f, "normal"),
            ThreadState::Pending => write!(f, "pending"),
            ThreadState::Synchronized => write!(f, "synchronized"),
        }
    }
}

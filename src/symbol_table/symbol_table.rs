use std::fmt::Write;

use log::trace;

use crate::ast::types::{FunctionModifier, Qualifier, Type};

use super::symbol::{Symbol, SymbolKind, ThreadState, ThreadStateError};

pub const OFFSET_ALIGNMENT: i32 = 8;
pub const CALLEE_SAVED_SPACE: i32 = 40;
/// First free slot below the saved frame pointer and callee-saved registers.
pub const LOCAL_BASE_OFFSET: i32 = OFFSET_ALIGNMENT + CALLEE_SAVED_SPACE;
pub const PARAM_BASE_OFFSET: i32 = LOCAL_BASE_OFFSET;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

#[derive(Debug, Clone)]
pub struct Scope {
    /// In declaration order, later entries shadow earlier ones on lookup.
    pub symbols: Vec<SymbolId>,
    pub parent: Option<ScopeId>,
    pub next_local_offset: i32,
    pub next_param_offset: i32,
    /// Region depth at the point the scope was pushed.
    pub region_depth: u32,
    /// Lexical nesting level, the global scope is 0.
    pub depth: u32,
}

/// Lexically scoped symbol table backed by two arenas.
///
/// Scopes and symbols are never freed: popping a scope only moves `current`
/// back to the parent, so every `SymbolId` handed out stays valid for as
/// long as the table lives.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
    current: ScopeId,
    global: ScopeId,
    region_depth: u32,
}

fn align_up(size: usize) -> i32 {
    let alignment = OFFSET_ALIGNMENT as usize;
    (size.div_ceil(alignment) * alignment) as i32
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let global = Scope {
            symbols: Vec::new(),
            parent: None,
            next_local_offset: LOCAL_BASE_OFFSET,
            next_param_offset: PARAM_BASE_OFFSET,
            region_depth: 0,
            depth: 0,
        };

        SymbolTable {
            scopes: vec![global],
            symbols: Vec::new(),
            current: ScopeId(0),
            global: ScopeId(0),
            region_depth: 0,
        }
    }

    pub fn push_scope(&mut self) -> ScopeId {
        let enclosing = &self.scopes[self.current.0];
        let scope = Scope {
            symbols: Vec::new(),
            parent: Some(self.current),
            next_local_offset: enclosing.next_local_offset,
            next_param_offset: enclosing.next_param_offset,
            region_depth: self.region_depth,
            depth: enclosing.depth + 1,
        };

        let id = ScopeId(self.scopes.len());
        self.scopes.push(scope);
        self.current = id;

        trace!(
            "pushed scope {} (depth {}, region {})",
            id.0,
            self.scopes[id.0].depth,
            self.region_depth
        );
        id
    }

    /// Pushes a scope whose frame offsets restart at the base offsets.
    pub fn begin_function_scope(&mut self) -> ScopeId {
        let id = self.push_scope();
        let scope = &mut self.scopes[id.0];
        scope.next_local_offset = LOCAL_BASE_OFFSET;
        scope.next_param_offset = PARAM_BASE_OFFSET;
        id
    }

    /// Returns to the enclosing scope, which keeps the larger of its own and
    /// the popped scope's offset counters. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.current == self.global {
            return;
        }

        let popped = self.scopes[self.current.0].clone();
        let Some(parent) = popped.parent else {
            return;
        };

        let enclosing = &mut self.scopes[parent.0];
        enclosing.next_local_offset = enclosing.next_local_offset.max(popped.next_local_offset);
        enclosing.next_param_offset = enclosing.next_param_offset.max(popped.next_param_offset);
        self.current = parent;

        trace!("popped scope {}, back in scope {}", popped.depth, parent.0);
    }

    /// Starts the current scope's locals below its parameters.
    pub fn align_locals_after_params(&mut self) {
        let scope = &mut self.scopes[self.current.0];
        scope.next_local_offset = scope.next_param_offset;
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    pub fn global_scope(&self) -> ScopeId {
        self.global
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn is_global_scope(&self) -> bool {
        self.current == self.global
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }

    /// Declares `name` in the current scope.
    ///
    /// A name already declared in the current scope has its type replaced
    /// and keeps its id, offset and state.
    pub fn add_symbol(&mut self, name: &str, ty: Type, kind: SymbolKind) -> SymbolId {
        if let Some(existing) = self.lookup_current(name) {
            trace!("redeclaring '{}' in place as {}", name, ty);
            self.symbols[existing.0].ty = ty;
            return existing;
        }

        let size = align_up(ty.size_of());
        let scope = &mut self.scopes[self.current.0];
        let offset = match kind {
            SymbolKind::Param => {
                let offset = -scope.next_param_offset;
                scope.next_param_offset += size;
                offset
            }
            SymbolKind::Local => {
                let offset = -scope.next_local_offset;
                scope.next_local_offset += size;
                offset
            }
            SymbolKind::Global | SymbolKind::Namespace | SymbolKind::TypeAlias => 0,
        };

        let mut symbol = Symbol::new(name.to_string(), ty, kind, self.current);
        symbol.offset = offset;
        symbol.region_depth = self.region_depth;

        let id = SymbolId(self.symbols.len());
        self.symbols.push(symbol);
        self.scopes[self.current.0].symbols.push(id);

        trace!("added {} '{}' at offset {}", kind, name, offset);
        id
    }

    pub fn add_symbol_with_qualifier(
        &mut self,
        name: &str,
        ty: Type,
        kind: SymbolKind,
        qualifier: Qualifier,
    ) -> SymbolId {
        let id = self.add_symbol(name, ty, kind);
        self.symbols[id.0].qualifier = qualifier;
        id
    }

    /// Declares a function. Functions at the top level are globals, nested
    /// ones take a local slot for their closure pointer.
    pub fn add_function(
        &mut self,
        name: &str,
        ty: Type,
        modifier: FunctionModifier,
        declared_modifier: FunctionModifier,
    ) -> SymbolId {
        let kind = if self.is_global_scope() {
            SymbolKind::Global
        } else {
            SymbolKind::Local
        };

        let id = self.add_symbol(name, ty, kind);
        let symbol = &mut self.symbols[id.0];
        symbol.modifier = modifier;
        symbol.declared_modifier = declared_modifier;
        symbol.is_function = true;
        id
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            if let Some(found) = self.find_in_scope(id, name) {
                return Some(found);
            }
            scope = self.scopes[id.0].parent;
        }
        None
    }

    pub fn lookup_current(&self, name: &str) -> Option<SymbolId> {
        self.find_in_scope(self.current, name)
    }

    fn find_in_scope(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes[scope.0]
            .symbols
            .iter()
            .rev()
            .copied()
            .find(|id| self.symbols[id.0].name == name)
    }

    pub fn offset_of(&self, name: &str) -> Option<i32> {
        self.lookup(name).map(|id| self.symbols[id.0].offset)
    }

    /// Names visible from the current scope, innermost first.
    pub fn visible_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            for symbol in self.scopes[id.0].symbols.iter().rev() {
                names.push(self.symbols[symbol.0].name.as_str());
            }
            scope = self.scopes[id.0].parent;
        }
        names
    }

    /// Unlinks a non-namespace symbol from the global scope. The symbol
    /// itself stays in the arena.
    pub fn remove_from_global(&mut self, name: &str) -> bool {
        let symbols = &self.symbols;
        let global = &mut self.scopes[self.global.0];
        let position = global.symbols.iter().rposition(|id| {
            let symbol = &symbols[id.0];
            symbol.name == name && !symbol.is_namespace()
        });

        match position {
            Some(index) => {
                global.symbols.remove(index);
                trace!("removed '{}' from global scope", name);
                true
            }
            None => false,
        }
    }

    fn find_global_namespace(&self, name: &str) -> Option<SymbolId> {
        self.scopes[self.global.0]
            .symbols
            .iter()
            .copied()
            .find(|id| {
                let symbol = &self.symbols[id.0];
                symbol.is_namespace() && symbol.name == name
            })
    }

    /// Adds a namespace to the global scope. Returns `None` when the global
    /// scope already holds a symbol with that name.
    pub fn add_namespace(&mut self, name: &str) -> Option<SymbolId> {
        if self.find_in_scope(self.global, name).is_some() {
            trace!("namespace '{}' clashes with an existing global", name);
            return None;
        }

        let symbol = Symbol::new(
            name.to_string(),
            Type::Nil,
            SymbolKind::Namespace,
            self.global,
        );
        let id = SymbolId(self.symbols.len());
        self.symbols.push(symbol);
        self.scopes[self.global.0].symbols.push(id);

        trace!("added namespace '{}'", name);
        Some(id)
    }

    pub fn is_namespace(&self, name: &str) -> bool {
        self.find_global_namespace(name).is_some()
    }

    /// Adds `name` to an existing namespace, or updates its type if the
    /// namespace already has a member with that name.
    pub fn add_symbol_to_namespace(
        &mut self,
        namespace: &str,
        name: &str,
        ty: Type,
    ) -> Option<SymbolId> {
        let namespace_id = self.find_global_namespace(namespace)?;

        if let Some(existing) = self.lookup_in_namespace(namespace, name) {
            self.symbols[existing.0].ty = ty;
            return Some(existing);
        }

        let symbol = Symbol::new(name.to_string(), ty, SymbolKind::Global, self.global);
        let id = SymbolId(self.symbols.len());
        self.symbols.push(symbol);
        self.symbols[namespace_id.0].members.push(id);

        trace!("added '{}' to namespace '{}'", name, namespace);
        Some(id)
    }

    pub fn add_function_to_namespace(
        &mut self,
        namespace: &str,
        name: &str,
        ty: Type,
        modifier: FunctionModifier,
        declared_modifier: FunctionModifier,
    ) -> Option<SymbolId> {
        let id = self.add_symbol_to_namespace(namespace, name, ty)?;
        let symbol = &mut self.symbols[id.0];
        symbol.modifier = modifier;
        symbol.declared_modifier = declared_modifier;
        symbol.is_function = true;
        Some(id)
    }

    pub fn lookup_in_namespace(&self, namespace: &str, name: &str) -> Option<SymbolId> {
        let namespace_id = self.find_global_namespace(namespace)?;
        self.symbols[namespace_id.0]
            .members
            .iter()
            .copied()
            .find(|id| self.symbols[id.0].name == name)
    }

    pub fn enter_region(&mut self) {
        self.region_depth += 1;
        trace!("entered region, depth {}", self.region_depth);
    }

    pub fn exit_region(&mut self) {
        self.region_depth = self.region_depth.saturating_sub(1);
        trace!("exited region, depth {}", self.region_depth);
    }

    pub fn region_depth(&self) -> u32 {
        self.region_depth
    }

    /// Thread state of a visible variable, `Normal` if there is none.
    pub fn thread_state(&self, name: &str) -> ThreadState {
        self.lookup(name)
            .map(|id| self.symbols[id.0].thread_state)
            .unwrap_or_default()
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.lookup(name)
            .is_some_and(|id| self.symbols[id.0].is_pending())
    }

    pub fn is_frozen(&self, name: &str) -> bool {
        self.lookup(name)
            .is_some_and(|id| self.symbols[id.0].is_frozen())
    }

    /// Moves the handle `name` to `Synchronized` and releases every argument
    /// its spawn froze.
    pub fn sync_variable(&mut self, name: &str) -> Result<SymbolId, ThreadStateError> {
        let id = self
            .lookup(name)
            .ok_or_else(|| ThreadStateError::UnknownVariable(name.to_string()))?;

        self.symbols[id.0].mark_synchronized()?;

        let frozen = self.symbols[id.0].frozen_args.clone();
        for arg in frozen {
            if let Err(err) = self.symbols[arg.0].unfreeze() {
                trace!("'{}': {}", self.symbols[arg.0].name, err);
            }
        }

        trace!("synchronized '{}'", name);
        Ok(id)
    }

    /// Human readable listing of every scope and its symbols.
    pub fn dump(&self) -> String {
        let mut out = String::new();

        for (index, scope) in self.scopes.iter().enumerate() {
            let _ = writeln!(
                out,
                "scope {} (depth {}, region {}, locals {}, params {})",
                index,
                scope.depth,
                scope.region_depth,
                scope.next_local_offset,
                scope.next_param_offset
            );

            for id in &scope.symbols {
                self.dump_symbol(&mut out, *id, 1);
            }
        }

        out
    }

    fn dump_symbol(&self, out: &mut String, id: SymbolId, indent: usize) {
        let symbol = &self.symbols[id.0];
        let pad = "  ".repeat(indent);

        let _ = write!(
            out,
            "{}{:<16} {:<8} {:<24} offset {:>4}",
            pad,
            symbol.name,
            symbol.kind.to_string(),
            symbol.ty.to_string(),
            symbol.offset
        );
        if symbol.qualifier != Qualifier::Default {
            let _ = write!(out, " {}", symbol.qualifier);
        }
        if symbol.is_function {
            let _ = write!(
                out,
                " [{} / declared {}]",
                symbol.modifier, symbol.declared_modifier
            );
        }
        if symbol.thread_state != ThreadState::Normal {
            let _ = write!(out, " {}", symbol.thread_state);
        }
        if symbol.is_frozen() {
            let _ = write!(out, " frozen x{}", symbol.freeze_count);
        }
        let _ = writeln!(out);

        for member in &symbol.members {
            self.dump_symbol(out, *member, indent + 1);
        }
    }
}

use log::Level;

use crate::{
    ast::{
        ast::Module,
        expressions::Capture,
        types::{FunctionModifier, Type},
    },
    errors::errors::Error,
    symbol_table::{SymbolId, SymbolTable},
    CHECKER_LOG,
};

use super::{config::CheckerConfig, stmt::check_stmt};

/// Captures collected while checking the body of one lambda.
#[derive(Debug)]
pub struct LambdaFrame {
    /// Scope depth of the lambda's parameters. Symbols from shallower
    /// non-global scopes are captures.
    pub depth: u32,
    pub captures: Vec<Capture>,
}

#[derive(Debug)]
pub struct TypeChecker {
    pub table: SymbolTable,
    pub config: CheckerConfig,
    pub errors: Vec<Error>,
    pub builtins: Vec<SymbolId>,
    pub lambda_frames: Vec<LambdaFrame>,
    /// Nesting of namespaced imports being checked.
    pub import_depth: u32,
}

impl TypeChecker {
    pub fn new(config: CheckerConfig) -> Self {
        let mut type_checker = TypeChecker {
            table: SymbolTable::new(),
            config,
            errors: vec![],
            builtins: vec![],
            lambda_frames: vec![],
            import_depth: 0,
        };

        // Built in functions
        let print = type_checker.table.add_function(
            "print",
            Type::function(Type::Void, vec![Type::Any]),
            FunctionModifier::Default,
            FunctionModifier::Default,
        );
        type_checker.builtins.push(print);

        type_checker
    }

    /// Records a diagnostic and lets checking continue.
    pub fn type_error(&mut self, error: Error) {
        CHECKER_LOG!(
            self.config,
            Level::Debug,
            "type error at {}: {}",
            error.get_position().0,
            error
        );
        self.errors.push(error);
    }

    /// Reports the error of a failed check, if any.
    pub fn report<T>(&mut self, result: Result<T, Error>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.type_error(error);
                None
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn get_errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn within_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.table.push_scope();
        let result = f(self);
        self.table.pop_scope();
        result
    }

    /// Like [`TypeChecker::within_scope`], with frame offsets restarting at
    /// the base offsets.
    pub fn within_function_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.table.begin_function_scope();
        let result = f(self);
        self.table.pop_scope();
        result
    }

    /// Runs `f` one region deeper when `enabled`.
    pub fn within_region<T>(&mut self, enabled: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        if !enabled {
            return f(self);
        }

        self.table.enter_region();
        let result = f(self);
        self.table.exit_region();
        result
    }

    /// Looks `name` up and records it as a capture of every enclosing lambda
    /// it is declared outside of.
    pub fn resolve(&mut self, name: &str) -> Option<SymbolId> {
        let id = self.table.lookup(name)?;

        let symbol = self.table.symbol(id);
        if symbol.scope == self.table.global_scope() {
            return Some(id);
        }

        let depth = self.table.scope(symbol.scope).depth;
        for frame in self.lambda_frames.iter_mut() {
            if depth < frame.depth && !frame.captures.iter().any(|c| c.symbol == id) {
                frame.captures.push(Capture {
                    name: symbol.name.clone(),
                    capture_type: symbol.ty.clone(),
                    symbol: id,
                });
            }
        }

        Some(id)
    }

    pub fn is_builtin(&self, id: SymbolId) -> bool {
        self.builtins.contains(&id)
    }

    /// Closest visible name to `name`, innermost scope first on ties.
    pub fn suggest_name(&self, name: &str) -> Option<String> {
        closest_match(
            name,
            self.table.visible_names(),
            self.config.max_suggestion_distance,
        )
    }
}

/// First candidate with the smallest distance in `1..=max_distance` whose
/// length is within two of `name`.
pub fn closest_match<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max_distance: usize,
) -> Option<String> {
    let name_len = name.chars().count();
    let mut best: Option<(&str, usize)> = None;

    for candidate in candidates {
        if candidate.chars().count().abs_diff(name_len) > 2 {
            continue;
        }

        let distance = strsim::levenshtein(name, candidate);
        if distance == 0 || distance > max_distance {
            continue;
        }
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((candidate, distance));
        }
    }

    best.map(|(candidate, _)| candidate.to_string())
}

/// Type checks a whole module in place.
///
/// Every expression gets its resolved type and every declaration its
/// symbol id. The returned checker owns the symbol table those ids point
/// into and the collected diagnostics.
pub fn type_check(module: &mut Module, config: CheckerConfig) -> (TypeChecker, bool) {
    let mut type_checker = TypeChecker::new(config);

    CHECKER_LOG!(
        type_checker.config,
        Level::Debug,
        "type checking {} ({} statements)",
        module.filename,
        module.len()
    );

    for stmt in module.iter_mut() {
        check_stmt(&mut type_checker, stmt, &Type::Void);
    }

    let success = !type_checker.has_errors();
    CHECKER_LOG!(
        type_checker.config,
        Level::Debug,
        "finished with {} error(s)",
        type_checker.errors.len()
    );

    (type_checker, success)
}

//! Import resolution.
//!
//! Runs between parsing and type checking. A plain `import "m";` is replaced
//! by the statements of `m` (each module is merged at most once), while
//! `import "m" as ns;` keeps its statements on the import node so the type
//! checker can register them under the namespace.

use std::{collections::HashSet, rc::Rc};

use crate::{
    ast::statements::{ImportStmt, Stmt},
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
};

use super::parser::parse;

/// Source file name used in positions of an imported module.
pub fn module_file_name(module: &str) -> String {
    if module.ends_with(".sn") {
        module.to_string()
    } else {
        format!("{}.sn", module)
    }
}

/// Resolves every import in `statements`.
///
/// `reader` maps a module name, as written in the import, to its source
/// text. `None` means the module does not exist.
pub fn resolve_imports<F>(statements: Vec<Stmt>, reader: &mut F) -> Result<Vec<Stmt>, Error>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut merged = HashSet::new();
    let mut loading = Vec::new();
    resolve(statements, reader, &mut merged, &mut loading)
}

fn resolve<F>(
    statements: Vec<Stmt>,
    reader: &mut F,
    merged: &mut HashSet<String>,
    loading: &mut Vec<String>,
) -> Result<Vec<Stmt>, Error>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut resolved = Vec::with_capacity(statements.len());

    for stmt in statements {
        let import = match stmt {
            Stmt::Import(import) => import,
            other => {
                resolved.push(other);
                continue;
            }
        };

        // cyclic imports are cut at the second visit
        if loading.contains(&import.module) {
            log::debug!("skipping cyclic import of '{}'", import.module);
            continue;
        }

        if import.namespace.is_some() {
            let statements = load(&import, reader)?;
            loading.push(import.module.clone());
            let statements = resolve(statements, reader, &mut HashSet::new(), loading)?;
            loading.pop();

            resolved.push(Stmt::Import(ImportStmt {
                statements,
                ..import
            }));
            continue;
        }

        if !merged.insert(import.module.clone()) {
            log::trace!("module '{}' already merged", import.module);
            continue;
        }

        let statements = load(&import, reader)?;
        loading.push(import.module.clone());
        let statements = resolve(statements, reader, merged, loading)?;
        loading.pop();

        log::debug!(
            "merged {} statement(s) from '{}'",
            statements.len(),
            import.module
        );
        resolved.extend(statements);
    }

    Ok(resolved)
}

fn load<F>(import: &ImportStmt, reader: &mut F) -> Result<Vec<Stmt>, Error>
where
    F: FnMut(&str) -> Option<String>,
{
    let Some(source) = reader(&import.module) else {
        return Err(Error::new(
            ErrorImpl::ImportNotFound {
                module: import.module.clone(),
            },
            import.span.start.clone(),
        ));
    };

    let file = module_file_name(&import.module);
    let tokens = tokenize(source, Some(file.clone()))?;
    let (_, module) = parse(tokens, Rc::new(file));

    Ok(module?.statements)
}

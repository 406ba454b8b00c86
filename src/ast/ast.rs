use std::{
    rc::Rc,
    slice::{Iter, IterMut},
};

use super::statements::Stmt;

/// A parsed source file, the unit handed to the type checker.
#[derive(Debug, Clone)]
pub struct Module {
    pub statements: Vec<Stmt>,
    pub filename: Rc<String>,
}

impl Module {
    pub fn new(statements: Vec<Stmt>, filename: Rc<String>) -> Self {
        Module {
            statements,
            filename,
        }
    }

    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.statements.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, Stmt> {
        self.statements.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

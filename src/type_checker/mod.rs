//! Type checking and semantic analysis module.
//!
//! This module checks a parsed module in place. Along with ordinary type
//! correctness it enforces the memory rules of the language:
//!
//! - `as val` / `as ref` qualifiers and `shared` / `private` modifiers
//! - Region escape of heap values out of private blocks and loops
//! - Thread handle state across `&spawn()` and `handle!` sync points
//!
//! Diagnostics are collected on the [`TypeChecker`] so that one run reports
//! every independent error.

pub mod config;
pub mod expr;
pub mod stmt;
pub mod threads;
pub mod type_checker;
pub mod validator;

pub use config::CheckerConfig;
pub use type_checker::{closest_match, type_check, TypeChecker};

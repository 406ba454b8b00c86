//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the front end.
//! It includes:
//!
//! - Error structures with source position information
//! - One variant per lexer, parser and type checker diagnostic
//! - "Did you mean" suggestions surfaced as error tips

pub mod errors;

#[cfg(test)]
mod tests;

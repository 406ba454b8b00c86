#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod symbol_table;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Line number (1-based), line text and column (0-based) of a byte offset.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    let mut start = 0;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((index + 1, line.to_string(), pos - start));
        }

        start = end;
    }

    None
}

/// Renders a diagnostic with the offending line and a caret under it.
pub fn format_error(error: &Error, source: &str) -> String {
    /*
        Error: InitializerMismatch (Initializer type does not match variable type)
        -> main.sn
           |
        20 | var a: int = "x";
           | ----^
    */

    let position = error.get_position();
    let mut output = match error.get_tip() {
        ErrorTip::None => format!("Error: {} ({})\n", error.get_error_name(), error),
        tip => format!(
            "Error: {} ({})\nTip: {}\n",
            error.get_error_name(),
            error,
            tip
        ),
    };
    output.push_str(&format!("-> {}\n", position.1));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return output;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    output.push_str(&format!("{:>padding$}\n", "|"));
    output.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));
    output.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    output
}

pub fn display_error(error: &Error, source: &str) {
    eprint!("{}", format_error(error, source));
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let trimmed = string.trim_start_matches([' ', '\t']);
    (trimmed, string.len() - trimmed.len())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        errors::errors::{Error, ErrorImpl},
        Position,
    };

    const SOURCE: &str = "Hello, world!\n\nfoo\n    Testing { }\n";

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 31).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "    Testing { }\n");
        assert_eq!(line_pos, 12);

        assert!(super::get_line_at_position(SOURCE, 500).is_none());
    }

    #[test]
    fn test_format_error() {
        let error = Error::new(
            ErrorImpl::UndefinedVariable {
                name: String::from("Testng"),
                suggestion: Some(String::from("Testing")),
            },
            Position(23, Rc::new(String::from("main.sn"))),
        );

        let output = super::format_error(&error, SOURCE);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Error: UndefinedVariable (Undefined variable 'Testng')",
                "Tip: Did you mean 'Testing'?",
                "-> main.sn",
                "  |",
                "4 | Testing { }",
                "  | ^",
            ]
        );
    }
}

use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    /// Every reserved word of the language. Also consulted by the type
    /// checker, which refuses these as namespace names.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("fn", TokenKind::Fn);
        map.insert("var", TokenKind::Var);
        map.insert("return", TokenKind::Return);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("while", TokenKind::While);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("in", TokenKind::In);
        map.insert("import", TokenKind::Import);
        map.insert("nil", TokenKind::Nil);
        map.insert("int", TokenKind::Int);
        map.insert("long", TokenKind::Long);
        map.insert("double", TokenKind::Double);
        map.insert("char", TokenKind::Char);
        map.insert("str", TokenKind::Str);
        map.insert("bool", TokenKind::Bool);
        map.insert("byte", TokenKind::Byte);
        map.insert("void", TokenKind::Void);
        map.insert("shared", TokenKind::Shared);
        map.insert("private", TokenKind::Private);
        map.insert("as", TokenKind::As);
        map.insert("val", TokenKind::Val);
        map.insert("ref", TokenKind::Ref);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    LongNumber,
    CharLiteral,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,
    Ampersand, // & (thread spawn)

    Dot,
    DotDot,
    Semicolon,
    Colon,
    Comma,
    FatArrow, // =>

    PlusPlus,
    MinusMinus,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Fn,
    Var,
    Return,
    If,
    Else,
    For,
    While,
    Break,
    Continue,
    In,
    Import,
    Nil,
    Int,
    Long,
    Double,
    Char,
    Str,
    Bool,
    Byte,
    Void,
    Shared,
    Private,
    As,
    Val,
    Ref,
    True,
    False,
}

impl TokenKind {
    /// Keywords that name a built-in type.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Long
                | TokenKind::Double
                | TokenKind::Char
                | TokenKind::Str
                | TokenKind::Bool
                | TokenKind::Byte
                | TokenKind::Void
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    pub fn debug(&self) {
        if matches!(
            self.kind,
            TokenKind::String
                | TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::LongNumber
                | TokenKind::CharLiteral
        ) {
            println!("{} ({})", self.kind, self.value);
        } else {
            println!("{} ()", self.kind);
        }
    }
}

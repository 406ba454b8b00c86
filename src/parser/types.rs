//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Built-in types (`int`, `long`, `double`, `char`, `str`, `bool`, `byte`, `void`)
//! - Array types (`T[]`)
//! - Function types (`fn(T, U as ref): R`)
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers for parsing composite type expressions.

use std::collections::HashMap;

use crate::{
    ast::types::{FunctionType, Qualifier, Type},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, Type, BindingPower) -> Result<Type, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
pub fn create_token_type_lookups(parser: &mut Parser) {
    for kind in [
        TokenKind::Int,
        TokenKind::Long,
        TokenKind::Double,
        TokenKind::Char,
        TokenKind::Str,
        TokenKind::Bool,
        TokenKind::Byte,
        TokenKind::Void,
    ] {
        parser.type_nud(kind, parse_builtin_type);
    }
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::Fn, parse_function_type);
    parser.type_led(TokenKind::OpenBracket, BindingPower::Call, parse_array_type);
}

pub fn parse_builtin_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.advance().clone();
    match token.kind {
        TokenKind::Int => Ok(Type::Int),
        TokenKind::Long => Ok(Type::Long),
        TokenKind::Double => Ok(Type::Double),
        TokenKind::Char => Ok(Type::Char),
        TokenKind::Str => Ok(Type::String),
        TokenKind::Bool => Ok(Type::Bool),
        TokenKind::Byte => Ok(Type::Byte),
        TokenKind::Void => Ok(Type::Void),
        _ => Err(Error::new(
            ErrorImpl::UnknownType { type_: token.value },
            token.span.start,
        )),
    }
}

/// User-defined types do not exist, any other name is unknown.
pub fn parse_symbol_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Err(Error::new(
        ErrorImpl::UnknownType { type_: token.value },
        token.span.start,
    ))
}

/// Parses an optional `as val` / `as ref` suffix.
pub fn parse_qualifier(parser: &mut Parser) -> Result<Qualifier, Error> {
    if !parser.eat(TokenKind::As) {
        return Ok(Qualifier::Default);
    }

    match parser.current_token_kind() {
        TokenKind::Val => {
            parser.advance();
            Ok(Qualifier::AsVal)
        }
        TokenKind::Ref => {
            parser.advance();
            Ok(Qualifier::AsRef)
        }
        _ => Err(parser.unexpected("expected 'val' or 'ref' after 'as'")),
    }
}

pub fn parse_function_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Fn)?;
    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    let mut qualifiers = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        params.push(parse_type(parser, BindingPower::Default)?);
        qualifiers.push(parse_qualifier(parser)?);

        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.eat(TokenKind::Colon) {
        parse_type(parser, BindingPower::Default)?
    } else {
        Type::Void
    };

    let param_qualifiers = if qualifiers.iter().any(|q| *q != Qualifier::Default) {
        Some(qualifiers)
    } else {
        None
    };

    Ok(Type::Function(FunctionType {
        return_type: Box::new(return_type),
        params,
        param_qualifiers,
        is_variadic: false,
    }))
}

pub fn parse_array_type(
    parser: &mut Parser,
    left: Type,
    _bp: BindingPower,
) -> Result<Type, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Type::array(left))
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<Type, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected a type"),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_type_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_type_led_lookup().get(&token_kind).copied() else {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ));
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

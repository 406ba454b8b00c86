use crate::{
    ast::{
        expressions::{
            ArrayAccessExpr, AssignExpr, BinaryExpr, BinaryOperator, CallExpr, Expr, ExprKind,
            IndexAssignExpr, LambdaBody, LambdaExpr, LiteralValue, MemberExpr, Parameter,
            RangeExpr, ThreadSpawnExpr, ThreadSyncExpr, UnaryExpr, UnaryOperator,
        },
        types::FunctionModifier,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    lookups::BindingPower,
    parser::Parser,
    stmt::parse_block_body,
    types::{parse_qualifier, parse_type},
};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                left.get_span().start.clone(),
            ));
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let value = match token.kind {
        TokenKind::Number if token.value.contains('.') => {
            LiteralValue::Double(token.value.parse().map_err(|_| number_error(&token.value, parser))?)
        }
        TokenKind::Number => {
            LiteralValue::Int(token.value.parse().map_err(|_| number_error(&token.value, parser))?)
        }
        TokenKind::LongNumber => {
            LiteralValue::Long(token.value.parse().map_err(|_| number_error(&token.value, parser))?)
        }
        TokenKind::CharLiteral => match token.value.chars().next() {
            Some(ch) => LiteralValue::Char(ch),
            None => {
                return Err(Error::new(
                    ErrorImpl::InvalidCharLiteral { token: token.value },
                    parser.get_position(),
                ))
            }
        },
        TokenKind::String => LiteralValue::Str(token.value.clone()),
        TokenKind::True => LiteralValue::Bool(true),
        TokenKind::False => LiteralValue::Bool(false),
        TokenKind::Nil => LiteralValue::Nil,
        TokenKind::Identifier => {
            parser.advance();
            return Ok(Expr::new(ExprKind::Variable(token.value), token.span));
        }
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                parser.get_position(),
            ))
        }
    };

    parser.advance();
    Ok(Expr::new(ExprKind::Literal(value), token.span))
}

fn number_error(token: &str, parser: &Parser) -> Error {
    Error::new(
        ErrorImpl::NumberParseError {
            token: token.to_string(),
        },
        parser.get_position(),
    )
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Dash => Some(BinaryOperator::Subtract),
        TokenKind::Star => Some(BinaryOperator::Multiply),
        TokenKind::Slash => Some(BinaryOperator::Divide),
        TokenKind::Percent => Some(BinaryOperator::Modulo),
        TokenKind::Equals => Some(BinaryOperator::Equal),
        TokenKind::NotEquals => Some(BinaryOperator::NotEqual),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::LessEquals => Some(BinaryOperator::LessEqual),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::GreaterEquals => Some(BinaryOperator::GreaterEqual),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Or => Some(BinaryOperator::Or),
        _ => None,
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let Some(operator) = binary_operator(operator_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value,
            },
            operator_token.span.start,
        ));
    };

    let right = parse_expr(parser, bp)?;

    let span = Span {
        start: left.span.start.clone(),
        end: right.span.end.clone(),
    };
    Ok(Expr::new(
        ExprKind::Binary(BinaryExpr {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }),
        span,
    ))
}

pub fn parse_range_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::DotDot)?;
    let right = parse_expr(parser, bp)?;

    let span = Span {
        start: left.span.start.clone(),
        end: right.span.end.clone(),
    };
    Ok(Expr::new(
        ExprKind::Range(RangeExpr {
            start: Box::new(left),
            end: Box::new(right),
        }),
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Dash => UnaryOperator::Negate,
        _ => UnaryOperator::Not,
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;
    let span = Span {
        start: operator_token.span.start,
        end: operand.span.end.clone(),
    };

    Ok(Expr::new(
        ExprKind::Unary(UnaryExpr {
            operator,
            operand: Box::new(operand),
        }),
        span,
    ))
}

/// `name = value` or `array[index] = value`, right associative.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let value = parse_expr(parser, BindingPower::Comma)?;

    let span = Span {
        start: left.span.start.clone(),
        end: value.span.end.clone(),
    };

    let kind = match left.kind {
        ExprKind::Variable(name) => ExprKind::Assign(AssignExpr {
            name,
            value: Box::new(value),
        }),
        ExprKind::ArrayAccess(access) => ExprKind::IndexAssign(IndexAssignExpr {
            array: access.array,
            index: access.index,
            value: Box::new(value),
        }),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: operator_token.value,
                    message: String::from("invalid assignment target"),
                },
                operator_token.span.start,
            ))
        }
    };

    Ok(Expr::new(kind, span))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Comma separated expressions up to (and including) `close`.
fn parse_expr_list(parser: &mut Parser, close: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut items = vec![];

    while parser.current_token_kind() != close {
        items.push(parse_expr(parser, BindingPower::Comma)?);

        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    parser.expect(close)?;
    Ok(items)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    let span = parser.span_from(left.span.start.clone());
    Ok(Expr::new(
        ExprKind::Call(CallExpr {
            callee: Box::new(left),
            arguments,
        }),
        span,
    ))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    let span = parser.span_from(left.span.start.clone());
    Ok(Expr::new(
        ExprKind::ArrayAccess(ArrayAccessExpr {
            array: Box::new(left),
            index: Box::new(index),
        }),
        span,
    ))
}

pub fn parse_postfix_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let operator = parser.advance().clone();
    let span = Span {
        start: left.span.start.clone(),
        end: operator.span.end,
    };

    let kind = if operator.kind == TokenKind::PlusPlus {
        ExprKind::Increment(Box::new(left))
    } else {
        ExprKind::Decrement(Box::new(left))
    };

    Ok(Expr::new(kind, span))
}

/// `handle!`
pub fn parse_sync_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let bang = parser.expect(TokenKind::Not)?;
    let span = Span {
        start: left.span.start.clone(),
        end: bang.span.end,
    };

    Ok(Expr::new(
        ExprKind::ThreadSync(ThreadSyncExpr {
            handle: Box::new(left),
            is_array: false,
        }),
        span,
    ))
}

/// `[a, b, c]!`
pub fn parse_array_sync_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::OpenBracket)?.span.start;
    let handles = parse_expr_list(parser, TokenKind::CloseBracket)?;
    let list_span = parser.span_from(start.clone());

    let error = parser.unexpected("expected '!' after thread handle list");
    let bang = parser.expect_error(TokenKind::Not, Some(error))?;

    Ok(Expr::new(
        ExprKind::ThreadSync(ThreadSyncExpr {
            handle: Box::new(Expr::new(ExprKind::Array(handles), list_span)),
            is_array: true,
        }),
        Span {
            start,
            end: bang.span.end,
        },
    ))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::Dot)?;

    let error = parser.unexpected("expected member name after '.'");
    let member = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let span = Span {
        start: left.span.start.clone(),
        end: member.span.end,
    };
    Ok(Expr::new(
        ExprKind::Member(MemberExpr {
            object: Box::new(left),
            member: member.value,
        }),
        span,
    ))
}

/// `{1, 2, 3}`
pub fn parse_array_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;
    let elements = parse_expr_list(parser, TokenKind::CloseCurly)?;

    let span = parser.span_from(start);
    Ok(Expr::new(ExprKind::Array(elements), span))
}

/// `&call(args)`
pub fn parse_spawn_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::Ampersand)?.span.start;
    let call = parse_expr(parser, BindingPower::Unary)?;

    let span = Span {
        start,
        end: call.span.end.clone(),
    };
    Ok(Expr::new(
        ExprKind::ThreadSpawn(ThreadSpawnExpr {
            call: Box::new(call),
            mode: None,
        }),
        span,
    ))
}

/// Optional `shared` / `private` after a parameter list.
pub fn parse_function_modifier(parser: &mut Parser) -> FunctionModifier {
    if parser.eat(TokenKind::Shared) {
        FunctionModifier::Shared
    } else if parser.eat(TokenKind::Private) {
        FunctionModifier::Private
    } else {
        FunctionModifier::Default
    }
}

/// `(name[: type] [as val|as ref], ...)`
pub fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        let error = parser.unexpected("expected parameter name");
        let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

        let param_type = if parser.eat(TokenKind::Colon) {
            Some(parse_type(parser, BindingPower::Default)?)
        } else {
            None
        };
        let qualifier = parse_qualifier(parser)?;

        params.push(Parameter {
            span: parser.span_from(name.span.start.clone()),
            name: name.value,
            param_type,
            qualifier,
            symbol: None,
        });

        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(params)
}

/// `fn (params) [shared|private] [: type] => expr` or `... { body }`
pub fn parse_lambda_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::Fn)?.span.start;
    let params = parse_parameters(parser)?;
    let modifier = parse_function_modifier(parser);

    let return_type = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    let body = match parser.current_token_kind() {
        TokenKind::FatArrow => {
            parser.advance();
            LambdaBody::Expr(Box::new(parse_expr(parser, BindingPower::Comma)?))
        }
        TokenKind::OpenCurly => LambdaBody::Block(parse_block_body(parser)?),
        _ => return Err(parser.unexpected("expected '=>' or '{' after lambda signature")),
    };

    let span = parser.span_from(start);
    Ok(Expr::new(
        ExprKind::Lambda(LambdaExpr {
            params,
            return_type,
            body,
            modifier,
            captures: vec![],
        }),
        span,
    ))
}

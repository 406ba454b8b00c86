use crate::{
    ast::{
        statements::{
            BlockStmt, ExpressionStmt, FnDeclStmt, ForEachStmt, ForStmt, IfStmt, ImportStmt,
            ReturnStmt, Stmt, VarDeclStmt, WhileStmt,
        },
        types::{BlockModifier, Type},
    },
    errors::errors::Error,
    lexer::tokens::{TokenKind, RESERVED_LOOKUP},
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{
    expr::{parse_function_modifier, parse_parameters},
    parser::Parser,
    types::{parse_qualifier, parse_type},
};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let kind = parser.current_token_kind();

    // `fn (` starts a lambda expression, `fn name(` a declaration
    let is_lambda = kind == TokenKind::Fn && parser.peek_kind(1) == TokenKind::OpenParen;
    if !is_lambda {
        if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
            return handler(parser);
        }
    }

    parse_expression_stmt(parser)
}

fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let expression = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: expression.get_span().clone(),
        expression,
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Var)?.span.start;

    let error = parser.unexpected("expected identifier during variable declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let declared_type = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };
    let qualifier = parse_qualifier(parser)?;

    let initializer = if parser.eat(TokenKind::Assignment) {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        name,
        declared_type,
        initializer,
        qualifier,
        span: parser.span_from(start),
        symbol: None,
    }))
}

/// `import "module" [as namespace];`
///
/// The namespace name is taken verbatim from any word token so that a
/// reserved word used as a namespace is reported by the type checker.
pub fn parse_import_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Import)?.span.start;

    let error = parser.unexpected("expected module name string after 'import'");
    let module = parser.expect_error(TokenKind::String, Some(error))?.value;

    let namespace = if parser.eat(TokenKind::As) {
        let token = parser.current_token();
        let is_word =
            token.kind == TokenKind::Identifier || RESERVED_LOOKUP.contains_key(token.value.as_str());
        if !is_word {
            return Err(parser.unexpected("expected namespace name after 'as'"));
        }
        Some(parser.advance().value.clone())
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Import(ImportStmt {
        module,
        namespace,
        statements: vec![],
        span: parser.span_from(start),
    }))
}

/// `{ stmt* }`, returning the inner statements.
pub fn parse_block_body(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    let error = parser.unexpected("expected '{'");
    parser.expect_error(TokenKind::OpenCurly, Some(error))?;

    let mut body = vec![];
    while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(body)
}

fn parse_block(parser: &mut Parser, modifier: BlockModifier) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let body = parse_block_body(parser)?;

    Ok(Stmt::Block(BlockStmt {
        body,
        modifier,
        span: parser.span_from(start),
    }))
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parse_block(parser, BlockModifier::Default)
}

pub fn parse_private_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Private)?;
    parse_block(parser, BlockModifier::Private)
}

/// `shared { }`, `shared while`, `shared for`.
pub fn parse_shared_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Shared)?.span.start;

    let mut stmt = match parser.current_token_kind() {
        TokenKind::OpenCurly => return parse_block(parser, BlockModifier::Shared),
        TokenKind::While => parse_while_stmt(parser)?,
        TokenKind::For => parse_for_stmt(parser)?,
        _ => return Err(parser.unexpected("expected block, 'while' or 'for' after 'shared'")),
    };

    let span = parser.span_from(start);
    match &mut stmt {
        Stmt::While(stmt) => {
            stmt.is_shared = true;
            stmt.span = span;
        }
        Stmt::For(stmt) => {
            stmt.is_shared = true;
            stmt.span = span;
        }
        Stmt::ForEach(stmt) => {
            stmt.is_shared = true;
            stmt.span = span;
        }
        _ => {}
    }

    Ok(stmt)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::If)?.span.start;
    let condition = parse_expr(parser, BindingPower::Default)?;
    let then_branch = parse_block_stmt(parser)?;

    let else_branch = if parser.eat(TokenKind::Else) {
        let branch = if parser.current_token_kind() == TokenKind::If {
            parse_if_stmt(parser)?
        } else {
            parse_block_stmt(parser)?
        };
        Some(Box::new(branch))
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_branch: Box::new(then_branch),
        else_branch,
        span: parser.span_from(start),
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::While)?.span.start;
    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block_stmt(parser)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body: Box::new(body),
        is_shared: false,
        span: parser.span_from(start),
    }))
}

/// `for x in xs { }` or `for init; cond; step { }`, every clause optional.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::For)?.span.start;

    if parser.current_token_kind() == TokenKind::Identifier && parser.peek_kind(1) == TokenKind::In
    {
        let var_name = parser.advance().value.clone();
        parser.expect(TokenKind::In)?;
        let iterable = parse_expr(parser, BindingPower::Default)?;
        let body = parse_block_stmt(parser)?;

        return Ok(Stmt::ForEach(ForEachStmt {
            var_name,
            iterable,
            body: Box::new(body),
            is_shared: false,
            span: parser.span_from(start),
            symbol: None,
        }));
    }

    let initializer = match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            None
        }
        TokenKind::Var => Some(Box::new(parse_var_decl_stmt(parser)?)),
        _ => Some(Box::new(parse_expression_stmt(parser)?)),
    };

    let condition = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(TokenKind::Semicolon)?;

    let increment = if parser.current_token_kind() != TokenKind::OpenCurly {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let body = parse_block_stmt(parser)?;

    Ok(Stmt::For(ForStmt {
        initializer,
        condition,
        increment,
        body: Box::new(body),
        is_shared: false,
        span: parser.span_from(start),
    }))
}

/// `fn name(params) [shared|private] [: type] { body }`
pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Fn)?.span.start;

    let error = parser.unexpected("expected function name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let params = parse_parameters(parser)?;
    let modifier = parse_function_modifier(parser);

    let return_type = if parser.eat(TokenKind::Colon) {
        parse_type(parser, BindingPower::Default)?
    } else {
        Type::Void
    };

    let body = parse_block_body(parser)?;

    Ok(Stmt::Function(FnDeclStmt {
        name,
        params,
        return_type,
        body,
        modifier,
        effective_modifier: None,
        span: parser.span_from(start),
        symbol: None,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Return)?.span.start;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: parser.span_from(start),
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Break)?.span.start;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Break(parser.span_from(start)))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Continue)?.span.start;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Continue(parser.span_from(start)))
}

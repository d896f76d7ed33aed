use crate::{
    ast::{
        ast::{Declaration, FunctionDecl, Parameter, VariableDecl},
        statements::{AssignOp, Stmt, StmtKind},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{parser::Parser, types::parse_type};

fn starts_declaration(kind: TokenKind) -> bool {
    kind == TokenKind::Export || kind.is_type()
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let kind = parser.current_token_kind();
    if starts_declaration(kind) {
        return parse_declaration_stmt(parser);
    }

    if let Some(stmt_fn) = parser.get_stmt_lookup().get(&kind).copied() {
        return stmt_fn(parser);
    }

    parse_expression_stmt(parser)
}

fn assign_operator(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Assignment => AssignOp::Assign,
        TokenKind::PlusEquals => AssignOp::Add,
        TokenKind::MinusEquals => AssignOp::Sub,
        TokenKind::StarEquals => AssignOp::Mul,
        TokenKind::SlashEquals => AssignOp::Div,
        TokenKind::PercentEquals => AssignOp::Mod,
        TokenKind::AmpersandEquals => AssignOp::BitAnd,
        TokenKind::PipeEquals => AssignOp::BitOr,
        TokenKind::CaretEquals => AssignOp::Xor,
        _ => return None,
    })
}

/// An expression followed by an optional assignment, `++` or `--`.
pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let expr = parse_expr(parser, BindingPower::Default)?;

    let kind = match parser.current_token_kind() {
        TokenKind::PlusPlus => {
            parser.advance();
            StmtKind::Increment(expr)
        }
        TokenKind::MinusMinus => {
            parser.advance();
            StmtKind::Decrement(expr)
        }
        kind => match assign_operator(kind) {
            Some(operator) => {
                parser.advance();
                let value = parse_expr(parser, BindingPower::Default)?;
                StmtKind::Assign {
                    target: expr,
                    operator,
                    value,
                }
            }
            None => StmtKind::Expression(expr),
        },
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(kind, parser.span_from(start)))
}

pub fn parse_empty_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let span = parser.advance().span.clone();
    Ok(Stmt::new(StmtKind::Empty, span))
}

pub fn parse_declaration_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let declaration = parse_declaration(parser)?;

    Ok(Stmt::new(
        StmtKind::Declaration(declaration),
        parser.span_from(start),
    ))
}

/// `["export"] type IDENT ( "(" params ")" block | ";" | "=" expr ";" )`
pub fn parse_declaration(parser: &mut Parser) -> Result<Declaration, Error> {
    let start = parser.get_position();

    let exported = parser.current_token_kind() == TokenKind::Export;
    if exported {
        parser.advance();
    }

    let (declared_type, _) = parse_type(parser)?;

    let error = parser.unexpected("expected identifier in declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    match parser.current_token_kind() {
        TokenKind::OpenParen => {
            let parameters = parse_parameters(parser)?;
            let body = parse_block(parser)?;

            Ok(Declaration::Function(FunctionDecl {
                name,
                return_type: declared_type,
                parameters,
                body,
                exported,
                span: parser.span_from(start),
            }))
        }
        TokenKind::Semicolon => {
            parser.advance();

            Ok(Declaration::Variable(VariableDecl {
                name,
                var_type: declared_type,
                init: None,
                exported,
                span: parser.span_from(start),
            }))
        }
        TokenKind::Assignment => {
            parser.advance();
            let init = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Semicolon)?;

            Ok(Declaration::Variable(VariableDecl {
                name,
                var_type: declared_type,
                init: Some(init),
                exported,
                span: parser.span_from(start),
            }))
        }
        _ => Err(parser.unexpected("expected `(`, `=` or `;` after declaration name")),
    }
}

fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let (param_type, type_span) = parse_type(parser)?;

            let error = parser.unexpected("expected parameter name");
            let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

            parameters.push(Parameter {
                name,
                param_type,
                span: parser.span_from(type_span.start),
            });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(parameters)
}

/// `"{" {statement} "}"`, returning the inner statements.
fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected("expected `}` before end of file"));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(statements)
}

pub fn parse_compound_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let body = parse_block(parser)?;

    Ok(Stmt::new(StmtKind::Compound(body), parser.span_from(start)))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let error = parser.unexpected("expected `(` after `if`");
    parser.expect_error(TokenKind::OpenParen, Some(error))?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let then_body = parse_branch(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_branch(parser)?))
    } else {
        None
    };

    Ok(Stmt::new(
        StmtKind::If {
            condition,
            then_body: Box::new(then_body),
            else_body,
        },
        parser.span_from(start),
    ))
}

/// Body of `if` or `else`. A declaration here would have no scope of its own,
/// so it must be wrapped in a block.
fn parse_branch(parser: &mut Parser) -> Result<Stmt, Error> {
    if starts_declaration(parser.current_token_kind()) {
        return Err(parser.unexpected(
            "a declaration cannot be the body of `if` or `else`, wrap it in `{ }`",
        ));
    }

    parse_stmt(parser)
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Return(value), parser.span_from(start)))
}

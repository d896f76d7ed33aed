use crate::{
    ast::expressions::{BinaryOp, Expr, ExprKind, LogicalOp, UnaryOp},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud_fn(parser)?;

    // While the current token binds tighter than `bp`, keep extending the lhs
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ));
        };

        let token_bp = parser.current_binding_power();
        left = led_fn(parser, left, token_bp)?;
    }

    Ok(left)
}

fn parse_number(token: &Token) -> Result<i32, Error> {
    let value = token.value.as_str();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        // Hex literals spell a bit pattern, so 0xFFFFFFFF is -1.
        Some(digits) => u32::from_str_radix(digits, 16).map(|bits| bits as i32).ok(),
        None => value.parse::<i32>().ok(),
    };

    parsed.ok_or_else(|| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    })
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    let kind = match token.kind {
        TokenKind::Number => ExprKind::Number(parse_number(&token)?),
        TokenKind::True => ExprKind::Boolean(true),
        TokenKind::False => ExprKind::Boolean(false),
        TokenKind::Identifier => ExprKind::Symbol(token.value.clone()),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    Ok(Expr::new(kind, token.span))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Dash => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Equals => BinaryOp::Eq,
        TokenKind::NotEquals => BinaryOp::Ne,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::LessEquals => BinaryOp::Le,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::GreaterEquals => BinaryOp::Ge,
        TokenKind::Ampersand => BinaryOp::BitAnd,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::Xor,
        TokenKind::ShiftLeft => BinaryOp::Shl,
        TokenKind::ShiftRight => BinaryOp::Shr,
        _ => return None,
    })
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
    let span = Span::between(&left.span, &right.span);

    Ok(Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        },
        span,
    ))
}

pub fn parse_logical_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator = match parser.advance().kind {
        TokenKind::And => LogicalOp::And,
        _ => LogicalOp::Or,
    };

    let right = parse_expr(parser, bp)?;
    let span = Span::between(&left.span, &right.span);

    Ok(Expr::new(
        ExprKind::Logical {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        },
        span,
    ))
}

/// `cond ? a : b`, right associative.
pub fn parse_conditional_expr(
    parser: &mut Parser,
    condition: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    let then_expr = parse_expr(parser, BindingPower::Default)?;

    let error = parser.unexpected("expected `:` in conditional expression");
    parser.expect_error(TokenKind::Colon, Some(error))?;

    let else_expr = parse_expr(parser, BindingPower::Default)?;
    let span = Span::between(&condition.span, &else_expr.span);

    Ok(Expr::new(
        ExprKind::Conditional {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        },
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Dash => UnaryOp::Minus,
        TokenKind::Not => UnaryOp::Not,
        _ => UnaryOp::BitNot,
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;
    let span = Span::between(&operator_token.span, &operand.span);

    Ok(Expr::new(
        ExprKind::Unary {
            operator,
            operand: Box::new(operand),
        },
        span,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let mut arguments = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let span = parser.span_from(left.span.start.clone());
    Ok(Expr::new(
        ExprKind::Call {
            callee: Box::new(left),
            arguments,
        },
        span,
    ))
}

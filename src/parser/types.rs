//! Type annotation parsing.
//!
//! The language only has the builtin types `void`, `int` and `bool`, each
//! spelled by its keyword.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::{ast::types::Type, errors::errors::Error, lexer::tokens::TokenKind, Span};

use super::parser::Parser;

lazy_static! {
    static ref TYPE_LOOKUP: HashMap<TokenKind, Type> = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Void, Type::Void);
        map.insert(TokenKind::Int, Type::Int);
        map.insert(TokenKind::Bool, Type::Bool);
        map
    };
}

/// Parses a type keyword, returning the type and the keyword's span.
pub fn parse_type(parser: &mut Parser) -> Result<(Type, Span), Error> {
    match TYPE_LOOKUP.get(&parser.current_token_kind()).copied() {
        Some(parsed) => Ok((parsed, parser.advance().span.clone())),
        None => Err(parser.unexpected("expected a type")),
    }
}

//! Token construction helpers used by the lexer's pattern table.

/// `MK_TOKEN!(kind, value, span)` builds a `Token`.
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Handler for a token with fixed text: pushes `$kind` covering `$value`
/// and moves the lexer past it.
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let start = lexer.pos;
            lexer.push(MK_TOKEN!(
                $kind,
                String::from($value),
                Span {
                    start: Position(start as u32, Rc::clone(&lexer.file)),
                    end: Position((start + $value.len()) as u32, Rc::clone(&lexer.file)),
                }
            ));
            lexer.advance_n($value.len());
        }
    };
}

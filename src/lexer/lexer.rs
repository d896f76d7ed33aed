use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(regex).expect("token patterns are valid regular expressions"),
        handler,
    }
}

lazy_static! {
    // Order matters: longer operators must come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("^0[xX][0-9a-fA-F]+", number_handler),
        pattern("^[0-9]+", number_handler),
        pattern("^\\s+", skip_handler),
        pattern("^//[^\n]*", skip_handler),
        pattern("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern("^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern("^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern("^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("^<<", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft, "<<")),
        pattern("^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern("^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern("^>>", MK_DEFAULT_HANDLER!(TokenKind::ShiftRight, ">>")),
        pattern("^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("^\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern("^\\|=", MK_DEFAULT_HANDLER!(TokenKind::PipeEquals, "|=")),
        pattern("^\\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
        pattern("^&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern("^&=", MK_DEFAULT_HANDLER!(TokenKind::AmpersandEquals, "&=")),
        pattern("^&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
        pattern("^\\^=", MK_DEFAULT_HANDLER!(TokenKind::CaretEquals, "^=")),
        pattern("^\\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
        pattern("^~", MK_DEFAULT_HANDLER!(TokenKind::Tilde, "~")),
        pattern("^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern("^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern("^\\?", MK_DEFAULT_HANDLER!(TokenKind::Question, "?")),
        pattern("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern("^\\+\\+", MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++")),
        pattern("^\\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
        pattern("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("^--", MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--")),
        pattern("^-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
        pattern("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("^\\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
        pattern("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("^/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
        pattern("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("^%=", MK_DEFAULT_HANDLER!(TokenKind::PercentEquals, "%=")),
        pattern("^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn span(&self, len: usize) -> Span {
        Span {
            start: Position(self.pos as u32, Rc::clone(&self.file)),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let Some(matched) = regex.find(lexer.remainder()).map(|m| m.as_str().to_string()) else {
        return;
    };

    lexer.push(MK_TOKEN!(TokenKind::Number, matched.clone(), lexer.span(matched.len())));
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    if let Some(matched) = regex.find(lexer.remainder()).map(|m| m.end()) {
        lexer.advance_n(matched);
    }
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let Some(value) = regex.find(lexer.remainder()).map(|m| m.as_str().to_string()) else {
        return;
    };

    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, value.clone(), lexer.span(value.len())));
    lexer.advance_n(value.len());
}

/// Splits `source` into tokens, ending with a single `EOF` token.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let matched = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match matched {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex),
            None => {
                let token = lex.remainder().chars().next().unwrap_or_default().to_string();
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken { token },
                    Position(lex.pos as u32, Rc::clone(&lex.file)),
                ));
            }
        }
    }

    let eof_span = lex.span(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), eof_span));
    log::trace!("tokenized {} tokens from {}", lex.tokens.len(), lex.file);
    if log::log_enabled!(log::Level::Trace) {
        for token in &lex.tokens {
            log::trace!("  {} @ {}", token, token.span.start.0);
        }
    }
    Ok(lex.tokens)
}

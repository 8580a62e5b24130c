//! Token types produced by the [Lexer](crate::lexer::Lexer).

use std::fmt;

/// Classification of a [Token].
///
/// The first character of a token deterministically selects the scanner
/// that produces it; the mapping from characters to kinds is part of the
/// [LexerConfig](crate::lexer::LexerConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A scanning failure. The token value holds the error message, and no
    /// further tokens follow it.
    Error,
    /// A character without a configured kind, scanned one at a time.
    Unknown,
    /// A run of whitespace. Always consumed, only materialized as a token
    /// if the lexer is configured to include whitespace.
    Whitespace,
    /// A matched-delimiter comment span; the value excludes the delimiters.
    Comment,
    /// A run of symbol characters, e.g. an unquoted label.
    Symbol,
    /// A number of the form `[+-]digits[.digits][e[+-]digits]`.
    Number,
    /// A quoted string; the value is processed according to the configured
    /// quoting flags.
    String,
    /// A single bracket character.
    Bracket,
    /// A single operator character.
    Operator,
    /// A matched-delimiter tag span; the value excludes the delimiters.
    Tag,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Error => "Error",
            TokenKind::Unknown => "Unknown",
            TokenKind::Whitespace => "Whitespace",
            TokenKind::Comment => "Comment",
            TokenKind::Symbol => "Symbol",
            TokenKind::Number => "Number",
            TokenKind::String => "String",
            TokenKind::Bracket => "Bracket",
            TokenKind::Operator => "Operator",
            TokenKind::Tag => "Tag",
        };
        write!(f, "{}", name)
    }
}

/// One token of the input, with its source position for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    value: String,
    line: usize,
    column: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, value: String, line: usize, column: usize) -> Self {
        Token {
            kind,
            value,
            line,
            column,
        }
    }

    /// Returns the kind of this token.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the lexeme of this token (or the processed value for
    /// strings, comments, and tags, and the message for errors).
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the 1-based line at which this token starts.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 1-based column at which this token starts.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns `true` if this is an error token.
    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }

    /// Returns `true` if this is a bracket token.
    pub fn is_bracket(&self) -> bool {
        self.kind == TokenKind::Bracket
    }

    /// Returns `true` if this is an operator token with the given value.
    pub fn is_operator(&self, value: &str) -> bool {
        self.kind == TokenKind::Operator && self.value == value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{:03}:{:03} {:>10} : {}",
            self.line, self.column, self.kind, self.value
        )
    }
}

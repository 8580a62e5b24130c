//! Lexer configuration for the Newick format.

use crate::lexer::{Lexer, LexerConfig, TokenKind};

/// Returns the lexer configuration for Newick trees.
///
/// Comments are `[...]` spans, tags are `{...}` spans, parentheses are the
/// only brackets, and `,`/`;` are the only operators. Labels may be
/// unquoted symbol runs (digits included, so a label can start with a
/// digit) or single-quoted strings with doubled-quote escaping. The only
/// numbers in Newick are branch lengths, always introduced by a leading
/// colon, so `:` is the sole number starter.
pub fn newick_lexer_config() -> LexerConfig {
    let mut config = LexerConfig::new()
        .with_comment_span('[', ']')
        .with_tag_span('{', '}')
        .with_char_type(TokenKind::Bracket, "()")
        .with_char_type(TokenKind::Operator, ",;")
        .with_char_type(TokenKind::String, "'")
        .with_char_type(TokenKind::Number, ":")
        .with_char_type(TokenKind::Symbol, "0123456789")
        // all remaining graphic chars may appear in an unquoted label
        .with_char_type(TokenKind::Symbol, "!\"#$%&*+-./<=>?@\\^_`|~");

    config.include_whitespace = false;
    config.include_comments = true;
    config.include_tags = true;
    config.glue_sign_to_number = false;
    config.trim_quotation_marks = true;
    config.use_string_escape = false;
    config.use_string_doubled_quotes = true;

    config
}

/// Returns a [Lexer] configured for Newick trees.
pub fn newick_lexer() -> Lexer {
    Lexer::new(newick_lexer_config())
}

//! A configurable tokenizer for text-based tree formats.
//!
//! The [Lexer] turns a text buffer into a replayable sequence of typed
//! [Token]s. The first character of each token determines which scanner
//! runs; the mapping is configured through a [LexerConfig] dispatch table
//! rather than by deriving scanner subclasses, so a format like Newick is
//! described purely by configuration (see
//! [newick_lexer](crate::newick::lexer::newick_lexer)).
//!
//! Two processing modes are supported:
//! * [`process_string`](Lexer::process_string) scans the whole input at once.
//! * [`process_string_stepwise`](Lexer::process_string_stepwise) followed by
//!   repeated [`process_step`](Lexer::process_step) produces one token at a
//!   time, for parsers that interleave lookahead with their own work.
//!
//! Errors are reported in-band: a scanner failure appends a terminal
//! [TokenKind::Error] token carrying a message and position, and no further
//! tokens follow it.

pub mod token;

pub use token::{Token, TokenKind};

/// Configuration of a [Lexer]: the per-character dispatch table plus the
/// policy flags of the scanners.
///
/// A fresh config types ASCII letters as [TokenKind::Symbol], digits and
/// signs as [TokenKind::Number], and whitespace as [TokenKind::Whitespace];
/// everything else is [TokenKind::Unknown] until assigned.
#[derive(Clone)]
pub struct LexerConfig {
    char_types: [TokenKind; 128],
    comment_span: Option<(u8, u8)>,
    tag_span: Option<(u8, u8)>,
    /// Materialize whitespace runs as tokens instead of just consuming them.
    pub include_whitespace: bool,
    /// Materialize comment spans as tokens instead of just consuming them.
    pub include_comments: bool,
    /// Materialize tag spans as tokens instead of just consuming them.
    pub include_tags: bool,
    /// Scan a sign operator directly followed by a digit as a number.
    pub glue_sign_to_number: bool,
    /// Drop the enclosing quotation marks from string token values.
    pub trim_quotation_marks: bool,
    /// Allow backslash escaping inside strings.
    pub use_string_escape: bool,
    /// Allow escaping the quote character by doubling it inside strings.
    pub use_string_doubled_quotes: bool,
}

impl LexerConfig {
    /// Creates a config with the default dispatch table and all flags off
    /// except doubled-quote escaping.
    pub fn new() -> Self {
        let mut char_types = [TokenKind::Unknown; 128];
        for b in b'a'..=b'z' {
            char_types[b as usize] = TokenKind::Symbol;
        }
        for b in b'A'..=b'Z' {
            char_types[b as usize] = TokenKind::Symbol;
        }
        for b in b'0'..=b'9' {
            char_types[b as usize] = TokenKind::Number;
        }
        for b in [b'+', b'-', b'.'] {
            char_types[b as usize] = TokenKind::Number;
        }
        for b in [b' ', b'\t', b'\n', b'\r'] {
            char_types[b as usize] = TokenKind::Whitespace;
        }
        LexerConfig {
            char_types,
            comment_span: None,
            tag_span: None,
            include_whitespace: false,
            include_comments: false,
            include_tags: false,
            glue_sign_to_number: false,
            trim_quotation_marks: true,
            use_string_escape: false,
            use_string_doubled_quotes: true,
        }
    }

    /// Assigns a token kind to all characters of `chars` in the dispatch
    /// table, overriding previous assignments.
    pub fn with_char_type(mut self, kind: TokenKind, chars: &str) -> Self {
        for b in chars.bytes() {
            if (b as usize) < 128 {
                self.char_types[b as usize] = kind;
            }
        }
        self
    }

    /// Configures comments as a matched span between `open` and `close`,
    /// e.g. `[...]` for Newick.
    pub fn with_comment_span(mut self, open: char, close: char) -> Self {
        self.comment_span = Some((open as u8, close as u8));
        self.char_types[open as usize % 128] = TokenKind::Comment;
        self.char_types[close as usize % 128] = TokenKind::Comment;
        self
    }

    /// Configures tags as a matched span between `open` and `close`,
    /// e.g. `{...}` for Newick.
    pub fn with_tag_span(mut self, open: char, close: char) -> Self {
        self.tag_span = Some((open as u8, close as u8));
        self.char_types[open as usize % 128] = TokenKind::Tag;
        self.char_types[close as usize % 128] = TokenKind::Tag;
        self
    }

    fn char_type(&self, b: u8) -> TokenKind {
        if (b as usize) < 128 {
            self.char_types[b as usize]
        } else {
            TokenKind::Unknown
        }
    }
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenizer over an owned text buffer.
///
/// Tokens accumulate in the lexer and can be inspected repeatedly; the
/// sequence is only extended by [`process_step`](Self::process_step) (or all
/// at once by [`process_string`](Self::process_string)). After an error
/// token the sequence is final.
pub struct Lexer {
    config: LexerConfig,
    text: Vec<u8>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

// ============================================================================
// Processing (pub)
// ============================================================================
impl Lexer {
    /// Creates a lexer with the given configuration and no input.
    pub fn new(config: LexerConfig) -> Self {
        Lexer {
            config,
            text: Vec::new(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    /// Scans the whole input, replacing any previously stored tokens.
    ///
    /// Returns `true` iff no error token was produced. On failure the last
    /// token is of kind [TokenKind::Error] and describes the problem.
    pub fn process_string(&mut self, text: &str) -> bool {
        self.init(text);
        while !self.is_end() {
            if !self.process_step() {
                break;
            }
        }
        !self.has_error()
    }

    /// Starts stepwise scanning: initializes the input and produces only the
    /// first token. Further tokens are produced by
    /// [`process_step`](Self::process_step).
    pub fn process_string_stepwise(&mut self, text: &str) -> bool {
        self.init(text);
        self.process_step()
    }

    /// Produces the next token(s) of the input.
    ///
    /// Whitespace and comments are consumed (and possibly materialized)
    /// before the next regular token. Returns `false` when the input is
    /// exhausted or an error token was produced.
    pub fn process_step(&mut self) -> bool {
        if self.is_end() {
            return false;
        }

        // arbitrary interleavings of whitespace and comments before a token
        while self.scan_whitespace() || self.scan_comment() {}
        if self.has_error() {
            return false;
        }
        if self.is_end() {
            return false;
        }

        let b = self.text[self.pos];
        match self.config.char_type(b) {
            TokenKind::Symbol => self.scan_symbol(),
            TokenKind::Number => self.scan_number(),
            TokenKind::String => self.scan_string(),
            TokenKind::Bracket => self.scan_bracket(),
            TokenKind::Operator => self.scan_operator(),
            TokenKind::Tag => self.scan_tag(),
            TokenKind::Unknown => self.scan_unknown(),
            TokenKind::Error => {
                self.push_error("Invalid character.");
                false
            }
            // both are fully consumed by the loop above; a leftover span
            // delimiter means the table and the span config disagree
            TokenKind::Whitespace | TokenKind::Comment => {
                self.push_error("Invalid character.");
                false
            }
        }
    }

    fn init(&mut self, text: &str) {
        self.text = text.as_bytes().to_vec();
        self.pos = 0;
        self.line = 1;
        self.column = 1;
        self.tokens.clear();
    }
}

// ============================================================================
// Token access (pub)
// ============================================================================
impl Lexer {
    /// Returns the tokens produced so far.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the number of tokens produced so far.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if no tokens have been produced.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the most recently produced token.
    pub fn back(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Returns `true` if scanning stopped at an error token.
    pub fn has_error(&self) -> bool {
        self.tokens.last().is_some_and(|t| t.is_error())
    }

    /// Returns `true` once the whole input has been consumed.
    pub fn is_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Checks whether bracket tokens are validly nested.
    ///
    /// Every opening `(`, `[`, `{`, or `<` bracket token must be matched by
    /// its closing counterpart in the correct order. Span tokens (comments,
    /// tags, strings) are not considered, only [TokenKind::Bracket] tokens.
    pub fn validate_brackets(&self) -> bool {
        let mut stack: Vec<u8> = Vec::new();
        for token in &self.tokens {
            if !token.is_bracket() {
                continue;
            }
            let c = match token.value().bytes().next() {
                Some(c) => c,
                None => continue,
            };
            match c {
                b'(' => stack.push(b')'),
                b'[' => stack.push(b']'),
                b'{' => stack.push(b'}'),
                b'<' => stack.push(b'>'),
                b')' | b']' | b'}' | b'>' => {
                    if stack.pop() != Some(c) {
                        return false;
                    }
                }
                _ => {}
            }
        }
        stack.is_empty()
    }

    /// Returns a listing of the token sequence in readable form.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            out.push_str(&format!("[{:03}] {}\n", i, token));
        }
        out
    }
}

// ============================================================================
// Scanners
// ============================================================================
impl Lexer {
    fn cur(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.text.get(self.pos + offset).copied()
    }

    fn next_char(&mut self) {
        if let Some(b) = self.cur() {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn cur_type(&self) -> Option<TokenKind> {
        self.cur().map(|b| self.config.char_type(b))
    }

    fn push_token(&mut self, kind: TokenKind, value: String, line: usize, column: usize) {
        self.tokens.push(Token::new(kind, value, line, column));
    }

    fn push_error(&mut self, message: &str) {
        let (line, column) = (self.line, self.column);
        self.push_token(TokenKind::Error, message.to_string(), line, column);
    }

    /// Consumes a run of whitespace. Returns `true` iff any was found.
    fn scan_whitespace(&mut self) -> bool {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        while self.cur_type() == Some(TokenKind::Whitespace) {
            self.next_char();
        }
        let found = self.pos > start;
        if found && self.config.include_whitespace {
            let value = String::from_utf8_lossy(&self.text[start..self.pos]).into_owned();
            self.push_token(TokenKind::Whitespace, value, line, column);
        }
        found
    }

    /// Consumes a comment span if one starts here. Returns `true` iff a
    /// comment was consumed; pushes an error token on a stray or unmatched
    /// delimiter and returns `false`.
    fn scan_comment(&mut self) -> bool {
        let (open, close) = match self.config.comment_span {
            Some(span) => span,
            None => return false,
        };
        match self.cur() {
            Some(b) if b == close => {
                self.push_error("Closing comment without opening it.");
                false
            }
            Some(b) if b == open => {
                let (line, column) = (self.line, self.column);
                self.next_char();
                let start = self.pos;
                while self.cur().is_some_and(|b| b != close) {
                    self.next_char();
                }
                if self.is_end() {
                    self.push_error("Comment not closed.");
                    return false;
                }
                let value = String::from_utf8_lossy(&self.text[start..self.pos]).into_owned();
                self.next_char(); // closing delimiter
                if self.config.include_comments {
                    self.push_token(TokenKind::Comment, value, line, column);
                }
                true
            }
            _ => false,
        }
    }

    /// Scans a tag span. Symmetric to [scan_comment](Self::scan_comment) but
    /// dispatched like a regular token.
    fn scan_tag(&mut self) -> bool {
        let (open, close) = match self.config.tag_span {
            Some(span) => span,
            None => {
                self.push_error("Invalid character.");
                return false;
            }
        };
        match self.cur() {
            Some(b) if b == close => {
                self.push_error("Closing tag without opening tag.");
                false
            }
            Some(b) if b == open => {
                let (line, column) = (self.line, self.column);
                self.next_char();
                let start = self.pos;
                while self.cur().is_some_and(|b| b != close) {
                    self.next_char();
                }
                if self.is_end() {
                    self.push_error("Opening tag without closing tag.");
                    return false;
                }
                let value = String::from_utf8_lossy(&self.text[start..self.pos]).into_owned();
                self.next_char();
                if self.config.include_tags {
                    self.push_token(TokenKind::Tag, value, line, column);
                }
                true
            }
            _ => {
                self.push_error("Invalid character.");
                false
            }
        }
    }

    /// Scans a run of symbol characters. Symbols cannot be malformed.
    fn scan_symbol(&mut self) -> bool {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        while self.cur_type() == Some(TokenKind::Symbol) {
            self.next_char();
        }
        let value = String::from_utf8_lossy(&self.text[start..self.pos]).into_owned();
        self.push_token(TokenKind::Symbol, value, line, column);
        true
    }

    /// Scans a number of the form `[+-]digits[.digits][e[+-]digits]`.
    ///
    /// A character typed as number that cannot begin a number body (such as
    /// the `:` introducing Newick branch lengths) is consumed as a leader
    /// first. Dangling dots or exponents and lone signs produce an error
    /// token.
    fn scan_number(&mut self) -> bool {
        // consume a non-numeric leader character, e.g. ':', and any
        // whitespace separating it from the digits
        if let Some(b) = self.cur() {
            if !b.is_ascii_digit() && b != b'+' && b != b'-' && b != b'.' {
                self.next_char();
                while self.cur_type() == Some(TokenKind::Whitespace) {
                    self.next_char();
                }
            }
        }

        let (line, column) = (self.line, self.column);
        let mut value = String::new();

        if let Some(b @ (b'+' | b'-')) = self.cur() {
            value.push(b as char);
            self.next_char();
        }
        let int_digits = self.scan_digits(&mut value);
        let mut frac_digits = 0;
        if self.cur() == Some(b'.') {
            value.push('.');
            self.next_char();
            frac_digits = self.scan_digits(&mut value);
            if frac_digits == 0 {
                self.push_error("Malformed number.");
                return false;
            }
        }
        if int_digits == 0 && frac_digits == 0 {
            self.push_error("Malformed number.");
            return false;
        }
        if let Some(b @ (b'e' | b'E')) = self.cur() {
            value.push(b as char);
            self.next_char();
            if let Some(s @ (b'+' | b'-')) = self.cur() {
                value.push(s as char);
                self.next_char();
            }
            if self.scan_digits(&mut value) == 0 {
                self.push_error("Malformed number.");
                return false;
            }
        }

        self.push_token(TokenKind::Number, value, line, column);
        true
    }

    fn scan_digits(&mut self, value: &mut String) -> usize {
        let mut count = 0;
        while let Some(b) = self.cur() {
            if !b.is_ascii_digit() {
                break;
            }
            value.push(b as char);
            self.next_char();
            count += 1;
        }
        count
    }

    /// Scans a quoted string, honoring the configured escape flags.
    fn scan_string(&mut self) -> bool {
        let (line, column) = (self.line, self.column);
        let qmark = match self.cur() {
            Some(q) => q,
            None => return false,
        };
        self.next_char();

        let mut value = String::new();
        loop {
            match self.cur() {
                None => {
                    self.push_error("Malformed string.");
                    return false;
                }
                Some(b'\\') if self.config.use_string_escape => {
                    self.next_char();
                    match self.cur() {
                        Some(escaped) => {
                            value.push(escaped as char);
                            self.next_char();
                        }
                        None => {
                            self.push_error("Malformed string.");
                            return false;
                        }
                    }
                }
                Some(b) if b == qmark => {
                    if self.config.use_string_doubled_quotes && self.peek_at(1) == Some(qmark) {
                        value.push(qmark as char);
                        self.next_char();
                        self.next_char();
                    } else {
                        self.next_char();
                        break;
                    }
                }
                Some(b) => {
                    value.push(b as char);
                    self.next_char();
                }
            }
        }

        if !self.config.trim_quotation_marks {
            value = format!("{}{}{}", qmark as char, value, qmark as char);
        }
        self.push_token(TokenKind::String, value, line, column);
        true
    }

    /// Scans a single bracket character.
    fn scan_bracket(&mut self) -> bool {
        let (line, column) = (self.line, self.column);
        if let Some(b) = self.cur() {
            self.next_char();
            self.push_token(TokenKind::Bracket, (b as char).to_string(), line, column);
        }
        true
    }

    /// Scans a single operator character. A sign directly followed by a
    /// digit is scanned as a number if `glue_sign_to_number` is set.
    fn scan_operator(&mut self) -> bool {
        if self.config.glue_sign_to_number
            && matches!(self.cur(), Some(b'+') | Some(b'-'))
            && self.peek_at(1).is_some_and(|b| b.is_ascii_digit())
        {
            return self.scan_number();
        }

        let (line, column) = (self.line, self.column);
        if let Some(b) = self.cur() {
            self.next_char();
            self.push_token(TokenKind::Operator, (b as char).to_string(), line, column);
        }
        true
    }

    /// Scans one unknown character, so a caller driving the lexer stepwise
    /// can intervene between unknown tokens.
    fn scan_unknown(&mut self) -> bool {
        let (line, column) = (self.line, self.column);
        if let Some(b) = self.cur() {
            self.next_char();
            self.push_token(TokenKind::Unknown, (b as char).to_string(), line, column);
        }
        true
    }
}

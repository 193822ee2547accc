//! Netlist lexer.
//!
//! Netlists are line oriented: every non-blank character run is a word and
//! line breaks are significant. Lines starting with `*` are comments and
//! lines starting with `.` are directives.

/// Token types for netlists.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Component name, node id or value.
    Word(String),
    /// Directive name without the leading dot, uppercased (`.tran` -> `TRAN`).
    Directive(String),
    /// End of line
    Eol,
    /// End of file
    Eof,
}

/// A token with its source location.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

/// Lexer for netlists.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    column: usize,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            line: 1,
            column: 1,
            at_line_start: true,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> SpannedToken {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;

        let token = match self.peek_char() {
            None => Token::Eof,
            Some('\n') => {
                self.advance();
                self.line += 1;
                self.column = 1;
                self.at_line_start = true;
                Token::Eol
            }
            Some('*') if self.at_line_start => {
                self.skip_to_eol();
                return self.next_token();
            }
            Some('.') if self.at_line_start => {
                self.advance();
                let directive = self.read_word();
                self.skip_to_eol();
                Token::Directive(directive.to_uppercase())
            }
            Some(_) => {
                self.at_line_start = false;
                Token::Word(self.read_word())
            }
        };
        SpannedToken {
            token,
            line,
            column,
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(mut self) -> Vec<SpannedToken> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.token == Token::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        self.column += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c != '\n' && c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_to_eol(&mut self) {
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                break;
            }
            word.push(c);
            self.advance();
        }
        word
    }
}

//! Lexer for predicate expressions
//!
//! Converts the inner text of a `${ ... }` template into tokens.

use super::PredicateError;

/// A token with its byte offset in the expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    /// The token kind.
    pub kind: TokenKind<'a>,
    /// Byte offset where the token starts.
    pub position: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    /// Numeric literal, kept as written.
    Number(&'a str),
    /// String literal with doubled quotes collapsed.
    String(String),
    /// `true` / `false`
    Boolean(bool),
    /// `null`
    Null,
    /// Field or method name.
    Identifier(&'a str),

    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `.`
    Dot,

    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterEqual,
    /// `=~` or `matches`
    Matches,
    /// `&&` or `and`
    And,
    /// `||` or `or`
    Or,
    /// `!` or `not`
    Not,
    /// `-`
    Minus,

    /// End of input.
    Eof,
}

impl TokenKind<'_> {
    /// Binding power of a binary operator, `None` for everything else.
    #[must_use]
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Self::Or => Some(1),
            Self::And => Some(2),
            Self::Equal | Self::NotEqual => Some(3),
            Self::LessThan
            | Self::LessEqual
            | Self::GreaterThan
            | Self::GreaterEqual
            | Self::Matches => Some(4),
            _ => None,
        }
    }
}

/// Lexer over one expression string.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Tokenizes the whole input. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Token<'a>>, PredicateError> {
        let mut tokens = Vec::with_capacity((self.input.len() / 4).max(4));
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token<'a>, PredicateError> {
        self.skip_whitespace();
        let start = self.position;

        let Some(ch) = self.current_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position: start,
            });
        };

        let kind = match ch {
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Dot),
            '-' => self.single(TokenKind::Minus),
            '=' if self.peek() == Some('=') => self.double(TokenKind::Equal),
            '=' if self.peek() == Some('~') => self.double(TokenKind::Matches),
            '!' if self.peek() == Some('=') => self.double(TokenKind::NotEqual),
            '!' => self.single(TokenKind::Not),
            '<' if self.peek() == Some('=') => self.double(TokenKind::LessEqual),
            '<' => self.single(TokenKind::LessThan),
            '>' if self.peek() == Some('=') => self.double(TokenKind::GreaterEqual),
            '>' => self.single(TokenKind::GreaterThan),
            '&' if self.peek() == Some('&') => self.double(TokenKind::And),
            '|' if self.peek() == Some('|') => self.double(TokenKind::Or),
            '\'' | '"' => self.read_string(ch)?,
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' || c == '#' => self.read_identifier(),
            other => {
                return Err(PredicateError::syntax(
                    start,
                    format!("unexpected character '{other}'"),
                ));
            }
        };

        Ok(Token {
            kind,
            position: start,
        })
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek(&self) -> Option<char> {
        let mut chars = self.input[self.position..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn single(&mut self, kind: TokenKind<'a>) -> TokenKind<'a> {
        self.advance();
        kind
    }

    fn double(&mut self, kind: TokenKind<'a>) -> TokenKind<'a> {
        self.advance();
        self.advance();
        kind
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_string(&mut self, quote: char) -> Result<TokenKind<'a>, PredicateError> {
        let start = self.position;
        self.advance();
        let mut value = String::new();
        loop {
            match self.current_char() {
                None => {
                    return Err(PredicateError::syntax(start, "unterminated string literal"));
                }
                Some(c) if c == quote => {
                    self.advance();
                    // A doubled quote stands for one literal quote.
                    if self.current_char() == Some(quote) {
                        value.push(quote);
                        self.advance();
                    } else {
                        return Ok(TokenKind::String(value));
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_number(&mut self) -> TokenKind<'a> {
        let start = self.position;
        while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.current_char() == Some('.') && self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        TokenKind::Number(&self.input[start..self.position])
    }

    fn read_identifier(&mut self) -> TokenKind<'a> {
        let start = self.position;
        self.advance();
        while self
            .current_char()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        match &self.input[start..self.position] {
            "true" => TokenKind::Boolean(true),
            "false" => TokenKind::Boolean(false),
            "null" => TokenKind::Null,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "matches" => TokenKind::Matches,
            ident => TokenKind::Identifier(ident.trim_start_matches('#')),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_comparison() {
        assert_eq!(
            kinds("flag == '0'"),
            vec![
                TokenKind::Identifier("flag"),
                TokenKind::Equal,
                TokenKind::String("0".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_symbols() {
        assert_eq!(
            kinds("!a && not b || c and d or e"),
            vec![
                TokenKind::Not,
                TokenKind::Identifier("a"),
                TokenKind::And,
                TokenKind::Not,
                TokenKind::Identifier("b"),
                TokenKind::Or,
                TokenKind::Identifier("c"),
                TokenKind::And,
                TokenKind::Identifier("d"),
                TokenKind::Or,
                TokenKind::Identifier("e"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("12 3.25 7."),
            vec![
                TokenKind::Number("12"),
                TokenKind::Number("3.25"),
                TokenKind::Number("7"),
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_doubled_quote() {
        assert_eq!(
            kinds("'it''s'"),
            vec![TokenKind::String("it's".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("name == 'abc").tokenize().unwrap_err();
        assert!(matches!(err, PredicateError::Syntax { position: 8, .. }));
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("a @ b").tokenize().unwrap_err();
        assert!(matches!(err, PredicateError::Syntax { position: 2, .. }));
    }

    #[test]
    fn test_hash_prefix_is_dropped() {
        assert_eq!(
            kinds("#isEmpty(x)"),
            vec![
                TokenKind::Identifier("isEmpty"),
                TokenKind::LeftParen,
                TokenKind::Identifier("x"),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }
}

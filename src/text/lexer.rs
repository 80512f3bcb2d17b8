//! Numeric token scanner for test-case and answer lines.

/// A numeric token found on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text, including any sign
    pub text: String,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

impl Token {
    /// The token's numeric value.
    pub fn value(&self) -> Option<f64> {
        self.text.parse::<f64>().ok()
    }
}

/// Numeric token classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Digits only, with an optional sign
    Integer,
    /// Has a fractional part or an exponent
    Float,
}

/// Scanner yielding the numeric tokens of one line, left to right.
///
/// Everything that is not part of a number is skipped.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given line.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    /// Get the next numeric token, or `None` at end of line.
    pub fn next_token(&mut self) -> Option<Token> {
        while self.pos < self.bytes.len() {
            if self.starts_number(self.pos) {
                return Some(self.read_number());
            }
            self.pos += 1;
        }
        None
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.bytes.get(pos).copied()
    }

    fn digit_at(&self, pos: usize) -> bool {
        self.byte_at(pos).is_some_and(|b| b.is_ascii_digit())
    }

    /// Digits, or a '.' followed by a digit.
    fn starts_unsigned(&self, pos: usize) -> bool {
        self.digit_at(pos) || (self.byte_at(pos) == Some(b'.') && self.digit_at(pos + 1))
    }

    fn starts_number(&self, pos: usize) -> bool {
        match self.byte_at(pos) {
            Some(b'+' | b'-') => {
                // "--" is a separator, so a sign must not follow another sign
                let after_sign = pos > 0 && matches!(self.byte_at(pos - 1), Some(b'+' | b'-'));
                !after_sign && self.starts_unsigned(pos + 1)
            }
            Some(_) => self.starts_unsigned(pos),
            None => false,
        }
    }

    fn skip_digits(&mut self) {
        while self.digit_at(self.pos) {
            self.pos += 1;
        }
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;
        let mut kind = TokenKind::Integer;

        if matches!(self.byte_at(self.pos), Some(b'+' | b'-')) {
            self.pos += 1;
        }

        // Integer part
        self.skip_digits();

        // Fractional part
        if self.byte_at(self.pos) == Some(b'.') && self.digit_at(self.pos + 1) {
            kind = TokenKind::Float;
            self.pos += 1;
            self.skip_digits();
        }

        // Exponent
        if matches!(self.byte_at(self.pos), Some(b'e' | b'E')) {
            let digits_at = match self.byte_at(self.pos + 1) {
                Some(b'+' | b'-') => self.pos + 2,
                _ => self.pos + 1,
            };
            if self.digit_at(digits_at) {
                kind = TokenKind::Float;
                self.pos = digits_at;
                self.skip_digits();
            }
        }

        Token {
            kind,
            text: self.input[start..self.pos].to_string(),
            column: self.input[..start].chars().count() + 1,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Collect all numeric tokens of a line.
pub fn scan_numbers(line: &str) -> Vec<Token> {
    Lexer::new(line).collect()
}

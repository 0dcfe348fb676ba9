//! Tokenizer for DDL dumps.

use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Create,
    Alter,
    Add,
    Table,
    Only,
    Temporary,
    Primary,
    Key,
    Foreign,
    References,
    Not,
    Null,
    Unique,
    Default,
    On,
    Constraint,
    Index,
    If,
    Exists,
    AutoIncrement,
    /// A serial pseudo-type, lower-cased (`serial`, `bigserial`, `serial8`, ...).
    Serial(String),
    Check,
    Generated,

    Ident(String),
    /// Single-quoted string literal.
    Str(String),
    Num(String),

    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,
    /// `[]` after a type name.
    ArraySuffix,

    Eof,
}

/// Words that must not be read as part of a column type.
const KEYWORDS: &[(&str, Token)] = &[
    ("CREATE", Token::Create),
    ("ALTER", Token::Alter),
    ("ADD", Token::Add),
    ("TABLE", Token::Table),
    ("ONLY", Token::Only),
    ("TEMPORARY", Token::Temporary),
    ("TEMP", Token::Temporary),
    ("PRIMARY", Token::Primary),
    ("KEY", Token::Key),
    ("FOREIGN", Token::Foreign),
    ("REFERENCES", Token::References),
    ("NOT", Token::Not),
    ("NULL", Token::Null),
    ("UNIQUE", Token::Unique),
    ("DEFAULT", Token::Default),
    ("ON", Token::On),
    ("CONSTRAINT", Token::Constraint),
    ("INDEX", Token::Index),
    ("IF", Token::If),
    ("EXISTS", Token::Exists),
    ("AUTO_INCREMENT", Token::AutoIncrement),
    ("AUTOINCREMENT", Token::AutoIncrement),
    ("IDENTITY", Token::AutoIncrement),
    ("CHECK", Token::Check),
    ("GENERATED", Token::Generated),
];

const SERIAL_TYPES: &[&str] = &["serial", "smallserial", "bigserial", "serial2", "serial4", "serial8"];

fn word_token(word: &str) -> Token {
    let lower = word.to_lowercase();
    if SERIAL_TYPES.contains(&lower.as_str()) {
        return Token::Serial(lower);
    }
    let upper = word.to_uppercase();
    KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == upper)
        .map(|(_, token)| token.clone())
        .unwrap_or_else(|| Token::Ident(word.to_string()))
}

fn symbol_token(c: char) -> Option<Token> {
    match c {
        '(' => Some(Token::LParen),
        ')' => Some(Token::RParen),
        ',' => Some(Token::Comma),
        ';' => Some(Token::Semicolon),
        '.' => Some(Token::Dot),
        _ => None,
    }
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    ch: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut chars = input.chars().peekable();
        let ch = chars.next();
        Self { chars, ch }
    }

    fn bump(&mut self) {
        self.ch = self.chars.next();
    }

    fn next_is(&mut self, c: char) -> bool {
        self.chars.peek() == Some(&c)
    }

    /// Consume characters while `keep` holds, returning them.
    fn take_while(&mut self, mut keep: impl FnMut(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.ch.filter(|&c| keep(c)) {
            out.push(c);
            self.bump();
        }
        out
    }

    fn skip_line(&mut self) {
        self.take_while(|c| c != '\n');
    }

    /// Skip a `/* ... */` comment; the cursor is on the opening `/`.
    fn skip_block_comment(&mut self) {
        self.bump();
        self.bump();
        while let Some(c) = self.ch {
            self.bump();
            if c == '*' && self.ch == Some('/') {
                self.bump();
                return;
            }
        }
    }

    /// Read text between `quote`s; a doubled quote stands for itself.
    fn quoted(&mut self, quote: char) -> String {
        self.bump();
        let mut out = String::new();
        while let Some(c) = self.ch {
            self.bump();
            if c != quote {
                out.push(c);
            } else if self.ch == Some(quote) {
                out.push(quote);
                self.bump();
            } else {
                break;
            }
        }
        out
    }

    fn number(&mut self) -> String {
        let mut num = String::new();
        if self.ch == Some('-') {
            num.push('-');
            self.bump();
        }
        let mut seen_dot = false;
        num.push_str(&self.take_while(|c| {
            if c == '.' && !seen_dot {
                seen_dot = true;
                return true;
            }
            c.is_ascii_digit()
        }));
        num
    }

    /// `[name]` (SQL Server identifier) or an empty `[]` array suffix.
    fn bracketed(&mut self) -> Token {
        self.bump();
        let inner = self.take_while(|c| c != ']');
        self.bump();
        if inner.is_empty() {
            Token::ArraySuffix
        } else {
            Token::Ident(inner)
        }
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            let Some(c) = self.ch else {
                return Token::Eof;
            };

            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if let Some(token) = symbol_token(c) {
                self.bump();
                return token;
            }

            return match c {
                '-' if self.next_is('-') => {
                    self.skip_line();
                    continue;
                }
                '-' if self.chars.peek().is_some_and(|n| n.is_ascii_digit()) => {
                    Token::Num(self.number())
                }
                '/' if self.next_is('*') => {
                    self.skip_block_comment();
                    continue;
                }
                '#' => {
                    self.skip_line();
                    continue;
                }
                '"' | '`' => Token::Ident(self.quoted(c)),
                '\'' => Token::Str(self.quoted('\'')),
                '[' => self.bracketed(),
                _ if c.is_ascii_digit() => Token::Num(self.number()),
                _ if c.is_alphabetic() || c == '_' => {
                    let word = self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                    word_token(&word)
                }
                _ => {
                    // Operators carry nothing for table metadata
                    self.bump();
                    continue;
                }
            };
        }
    }

    /// All tokens, ending with [`Token::Eof`].
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens: Vec<Token> = std::iter::from_fn(|| match self.next_token() {
            Token::Eof => None,
            token => Some(token),
        })
        .collect();
        tokens.push(Token::Eof);
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_string())
    }

    #[test]
    fn test_create_table_tokens() {
        let tokens = Lexer::new("create table app.users (id INT NOT NULL);").tokenize();

        assert_eq!(
            tokens,
            vec![
                Token::Create,
                Token::Table,
                ident("app"),
                Token::Dot,
                ident("users"),
                Token::LParen,
                ident("id"),
                ident("INT"),
                Token::Not,
                Token::Null,
                Token::RParen,
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        let tokens = Lexer::new(r#"CREATE TABLE "User ""Table""" (`column name` INT, [Sku] INT);"#)
            .tokenize();

        assert_eq!(tokens[2], ident("User \"Table\""));
        assert_eq!(tokens[4], ident("column name"));
        assert_eq!(tokens[7], ident("Sku"));
    }

    #[test]
    fn test_comments_and_literals() {
        let tokens = Lexer::new("-- c\nCREATE /* b */ TABLE t (n NUMERIC(10,2) DEFAULT 'it''s');\n# tail")
            .tokenize();

        assert_eq!(tokens[0], Token::Create);
        assert_eq!(tokens[1], Token::Table);
        assert_eq!(tokens[7], Token::Num("10".to_string()));
        assert_eq!(tokens[12], Token::Str("it's".to_string()));
        assert_eq!(tokens.last(), Some(&Token::Eof));
        assert_eq!(tokens.len(), 16);
    }

    #[test]
    fn test_serial_and_array_suffix() {
        let tokens = Lexer::new("id bigserial, tags text[], n -1.5").tokenize();
        assert_eq!(tokens[1], Token::Serial("bigserial".to_string()));
        assert_eq!(tokens[5], Token::ArraySuffix);
        assert_eq!(tokens[8], Token::Num("-1.5".to_string()));
    }
}

//! SQL parser for CREATE TABLE and primary key statements.

use super::dialect::Dialect;
use super::lexer::{Lexer, Token};
use super::types::map_type;
use crate::schema::{ColumnMeta, TableMeta, TableRef};
use crate::typemap::SqlType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlParseError {
    #[error("Expected {expected} in table {table}, found {found:?}")]
    Expected {
        expected: &'static str,
        table: String,
        found: Token,
    },
    #[error("Unexpected end of input in table {0}")]
    UnexpectedEof(String),
}

/// Words that end a column's type and start a trailing clause.
const TYPE_TERMINATORS: &[&str] = &["collate", "comment", "charset", "as", "character"];

/// Words allowed in a type after its parenthesized arguments.
const TYPE_SUFFIXES: &[&str] = &[
    "unsigned", "zerofill", "with", "without", "time", "zone", "varying",
];

/// Parse a SQL dump into table metadata, in statement order.
pub fn parse_sql(input: &str, dialect: Dialect) -> Result<Vec<TableMeta>, SqlParseError> {
    let dialect = dialect.resolve(input);
    let mut lexer = Lexer::new(input);
    let tokens = lexer.tokenize();
    let mut parser = Parser::new(tokens, dialect);
    parser.parse()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    dialect: Dialect,
}

impl Parser {
    fn new(tokens: Vec<Token>, dialect: Dialect) -> Self {
        Self {
            tokens,
            pos: 0,
            dialect,
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn peek(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or(&Token::Eof)
    }

    /// An unquoted keyword such as `key` used as a column name, followed by a known type.
    fn keyword_starts_column(&self) -> bool {
        match self.peek(1) {
            Token::Ident(word) => map_type(word, self.dialect).sql_type != SqlType::Other,
            Token::Serial(_) => true,
            _ => false,
        }
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.current() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse(&mut self) -> Result<Vec<TableMeta>, SqlParseError> {
        let mut tables: Vec<TableMeta> = Vec::new();

        while self.current() != &Token::Eof {
            match self.current() {
                Token::Create => {
                    self.advance();
                    self.eat(&Token::Temporary);

                    if self.eat(&Token::Table) {
                        self.skip_if_not_exists();
                        if let Some(table) = self.parse_create_table()? {
                            tracing::debug!(
                                "Read table {} ({} columns, pk {:?})",
                                table.table,
                                table.columns.len(),
                                table.primary_key
                            );
                            tables.push(table);
                        }
                    } else {
                        // CREATE INDEX, VIEW, SEQUENCE, ...
                        self.skip_statement();
                    }
                }
                Token::Alter => {
                    // ALTER TABLE ... ADD [CONSTRAINT name] PRIMARY KEY (...)
                    if let Some((table, columns)) = self.parse_alter_table_pk() {
                        apply_alter_pk(&mut tables, &table, columns);
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }

        Ok(tables)
    }

    fn skip_if_not_exists(&mut self) {
        if self.eat(&Token::If) {
            self.eat(&Token::Not);
            self.eat(&Token::Exists);
        }
    }

    /// Parse `name` or `schema.name`.
    fn parse_qualified_name(&mut self) -> Option<TableRef> {
        let first = match self.current() {
            Token::Ident(name) => name.clone(),
            _ => return None,
        };
        self.advance();

        if self.eat(&Token::Dot) {
            let second = match self.current() {
                Token::Ident(name) => name.clone(),
                _ => return None,
            };
            self.advance();
            return Some(TableRef::new(Some(&first), second));
        }

        Some(TableRef::new(None, first))
    }

    fn parse_create_table(&mut self) -> Result<Option<TableMeta>, SqlParseError> {
        let Some(table) = self.parse_qualified_name() else {
            self.skip_statement();
            return Ok(None);
        };

        if self.current() != &Token::LParen {
            // CREATE TABLE ... AS SELECT, LIKE, PARTITION OF, ...
            self.skip_statement();
            return Ok(None);
        }
        self.advance();

        let mut columns: Vec<ColumnMeta> = Vec::new();
        let mut inline_pk: Vec<String> = Vec::new();
        let mut table_pk: Vec<String> = Vec::new();

        loop {
            match self.current() {
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Comma => {
                    self.advance();
                }
                Token::Constraint => {
                    // Named constraint: skip the name, then parse what follows
                    self.advance();
                    if let Token::Ident(_) = self.current() {
                        self.advance();
                    }
                }
                Token::Primary => {
                    // PRIMARY KEY (col1, col2, ...)
                    self.advance();
                    self.eat(&Token::Key);
                    table_pk = self.parse_column_list();
                    self.skip_until_element_end();
                }
                Token::Unique | Token::Index | Token::Key | Token::Check
                    if self.keyword_starts_column() =>
                {
                    let name = keyword_text(self.current()).to_string();
                    self.advance();
                    let (column, is_pk) = self.parse_column(name, &table)?;
                    if is_pk {
                        inline_pk.push(column.name.clone());
                    }
                    columns.push(column);
                }
                Token::Foreign | Token::Unique | Token::Index | Token::Key | Token::Check => {
                    if let (Token::Ident(next), after) = (self.peek(1), self.peek(2)) {
                        if !matches!(after, Token::LParen | Token::Ident(_)) {
                            tracing::warn!(
                                "Table {}: skipping '{} {}', read as a constraint; quote the name if it is a column",
                                table,
                                keyword_text(self.current()),
                                next
                            );
                        }
                    }
                    self.skip_until_element_end();
                }
                Token::Ident(name) => {
                    let name = name.clone();
                    self.advance();
                    let (column, is_pk) = self.parse_column(name, &table)?;
                    if is_pk {
                        inline_pk.push(column.name.clone());
                    }
                    columns.push(column);
                }
                Token::Eof => return Err(SqlParseError::UnexpectedEof(table.qualified_name())),
                _ => {
                    self.advance();
                }
            }
        }

        // Skip table options (ENGINE=, etc.)
        self.skip_statement();

        let primary_key = if table_pk.is_empty() { inline_pk } else { table_pk };
        mark_not_null(&mut columns, &primary_key);

        Ok(Some(TableMeta {
            table,
            columns,
            primary_key,
        }))
    }

    /// Parse one column definition, returning it and whether it is declared PRIMARY KEY inline.
    fn parse_column(
        &mut self,
        name: String,
        table: &TableRef,
    ) -> Result<(ColumnMeta, bool), SqlParseError> {
        let raw_type = self.collect_type();
        if raw_type.is_empty() {
            return Err(SqlParseError::Expected {
                expected: "column type",
                table: table.qualified_name(),
                found: self.current().clone(),
            });
        }
        let column_type = map_type(&raw_type, self.dialect);

        let mut nullable = true;
        let mut is_pk = false;

        loop {
            match self.current() {
                Token::Primary => {
                    self.advance();
                    self.eat(&Token::Key);
                    is_pk = true;
                }
                Token::Not => {
                    self.advance();
                    if self.eat(&Token::Null) {
                        nullable = false;
                    }
                }
                Token::Serial(_) => {
                    // SERIAL used as a modifier
                    self.advance();
                    nullable = false;
                }
                Token::LParen => self.skip_parenthesized(),
                Token::Comma | Token::RParen | Token::Eof => break,
                _ => {
                    self.advance();
                }
            }
        }

        // SERIAL types carry an implicit NOT NULL
        if raw_type.contains("serial") {
            nullable = false;
        }

        Ok((
            ColumnMeta {
                name,
                type_code: column_type.sql_type.code(),
                size: column_type.size,
                nullable,
            },
            is_pk,
        ))
    }

    /// Collect the type text of a column: `numeric(10,2)`, `timestamp with time zone`, `text[]`.
    fn collect_type(&mut self) -> String {
        let mut raw = String::new();
        let mut closed_args = false;

        loop {
            match self.current() {
                Token::Ident(t) => {
                    let lower = t.to_lowercase();
                    let allowed = if closed_args {
                        TYPE_SUFFIXES.contains(&lower.as_str())
                    } else {
                        raw.is_empty() || !TYPE_TERMINATORS.contains(&lower.as_str())
                    };
                    if !allowed {
                        break;
                    }
                    if !raw.is_empty() && !raw.ends_with('(') {
                        raw.push(' ');
                    }
                    raw.push_str(&lower);
                    self.advance();
                }
                Token::Serial(word) if raw.is_empty() => {
                    raw.push_str(word);
                    self.advance();
                }
                Token::LParen if !raw.is_empty() && !closed_args => {
                    raw.push('(');
                    self.advance();
                    while !matches!(self.current(), Token::RParen | Token::Eof) {
                        match self.current() {
                            Token::Num(n) => raw.push_str(n),
                            Token::Comma => raw.push(','),
                            _ => {}
                        }
                        self.advance();
                    }
                    raw.push(')');
                    self.advance();
                    closed_args = true;
                }
                Token::ArraySuffix if !raw.is_empty() => {
                    raw.push_str("[]");
                    self.advance();
                }
                _ => break,
            }
        }

        raw
    }

    fn parse_column_list(&mut self) -> Vec<String> {
        let mut cols = Vec::new();

        if self.current() != &Token::LParen {
            return cols;
        }
        self.advance();

        loop {
            match self.current() {
                Token::Ident(name) => {
                    cols.push(name.clone());
                    self.advance();
                }
                Token::LParen => self.skip_parenthesized(),
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Eof => break,
                _ => {
                    // ASC/DESC, prefix lengths, commas
                    self.advance();
                }
            }
        }

        cols
    }

    /// Parse `ALTER TABLE [ONLY] [IF EXISTS] name ADD [CONSTRAINT c] PRIMARY KEY (cols)`.
    fn parse_alter_table_pk(&mut self) -> Option<(TableRef, Vec<String>)> {
        self.advance(); // ALTER

        if !self.eat(&Token::Table) {
            self.skip_statement();
            return None;
        }
        self.eat(&Token::Only);
        if self.eat(&Token::If) {
            self.eat(&Token::Exists);
        }
        self.eat(&Token::Only);

        let Some(table) = self.parse_qualified_name() else {
            self.skip_statement();
            return None;
        };

        if !self.eat(&Token::Add) {
            self.skip_statement();
            return None;
        }
        if self.eat(&Token::Constraint) {
            if let Token::Ident(_) = self.current() {
                self.advance();
            }
        }
        if !self.eat(&Token::Primary) {
            self.skip_statement();
            return None;
        }
        self.eat(&Token::Key);

        let columns = self.parse_column_list();
        self.skip_statement();
        Some((table, columns))
    }

    fn skip_parenthesized(&mut self) {
        if self.current() != &Token::LParen {
            self.advance();
            return;
        }
        self.advance();
        let mut depth = 1;
        while depth > 0 {
            match self.current() {
                Token::LParen => {
                    depth += 1;
                    self.advance();
                }
                Token::RParen => {
                    depth -= 1;
                    self.advance();
                }
                Token::Eof => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn skip_statement(&mut self) {
        while !matches!(self.current(), Token::Semicolon | Token::Eof) {
            self.advance();
        }
        if self.current() == &Token::Semicolon {
            self.advance();
        }
    }

    /// Skip to the comma or closing paren ending the current table element.
    fn skip_until_element_end(&mut self) {
        while !matches!(self.current(), Token::Comma | Token::RParen | Token::Eof) {
            if self.current() == &Token::LParen {
                self.skip_parenthesized();
            } else {
                self.advance();
            }
        }
    }
}

fn keyword_text(token: &Token) -> &'static str {
    match token {
        Token::Unique => "unique",
        Token::Index => "index",
        Token::Key => "key",
        Token::Check => "check",
        Token::Foreign => "foreign",
        _ => "",
    }
}

fn mark_not_null(columns: &mut [ColumnMeta], primary_key: &[String]) {
    for col in columns.iter_mut() {
        if primary_key.contains(&col.name) {
            col.nullable = false;
        }
    }
}

/// Attach a primary key declared by ALTER TABLE to an already-read table.
fn apply_alter_pk(tables: &mut [TableMeta], target: &TableRef, columns: Vec<String>) {
    let found = tables.iter_mut().find(|t| {
        t.table.name == target.name && (target.schema.is_none() || t.table.schema == target.schema)
    });

    match found {
        Some(table) if table.primary_key.is_empty() => {
            mark_not_null(&mut table.columns, &columns);
            table.primary_key = columns;
        }
        Some(table) => {
            tracing::warn!(
                "Table {} already has primary key {:?}, ignoring ALTER TABLE key {:?}",
                table.table,
                table.primary_key,
                columns
            );
        }
        None => {
            tracing::warn!("ALTER TABLE adds primary key to unknown table {}", target);
        }
    }
}

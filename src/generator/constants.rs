//! Column size and required-ness constants, rendered as a Rust module.

use std::collections::HashSet;
use std::fmt::Write;

use convert_case::{Case, Casing};

use super::{ArtifactGenerator, GenerateError, GeneratorContext, TableSnapshot};

#[derive(Debug, Clone)]
pub struct ConstantsGenerator {
    context: GeneratorContext,
}

impl ConstantsGenerator {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }

    fn module_name(&self, object_name: &str) -> String {
        match self.context.namespace() {
            Some(namespace) => module_ident(namespace),
            None => module_ident(&object_name.to_case(Case::Snake)),
        }
    }
}

/// Keywords of every Rust edition, strict and reserved.
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "super", "Self", "_"];

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// A module identifier for `name`: invalid characters become `_`, a leading
/// digit gets a `_` prefix, and keywords are escaped.
fn module_ident(name: &str) -> String {
    let mut ident = sanitize(name);
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    } else if RUST_KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}

/// Upper-cased, sanitized constant suffix per column, in column order.
/// Columns that sanitize to the same suffix get `_2`, `_3`, ... appended.
fn constant_suffixes<'a>(columns: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut suffixes = Vec::new();

    for column in columns {
        let base = sanitize(&column.to_uppercase());
        let mut suffix = base.clone();
        let mut n = 1;
        while !seen.insert(suffix.clone()) {
            n += 1;
            suffix = format!("{}_{}", base, n);
        }
        if n > 1 {
            tracing::warn!(
                "Column {} collides with another column as {}, emitted as {}",
                column,
                base,
                suffix
            );
        }
        suffixes.push(suffix);
    }

    suffixes
}

impl ArtifactGenerator for ConstantsGenerator {
    fn context(&self) -> &GeneratorContext {
        &self.context
    }

    fn file_name(&self, object_name: &str) -> String {
        format!("{}_constants.rs", object_name.to_case(Case::Snake))
    }

    fn write_header(&self, out: &mut String, snapshot: &TableSnapshot) {
        let _ = writeln!(out, "//! Column constants for table {}.", snapshot.table);
        out.push_str("//!\n");
        let _ = writeln!(out, "//! Author: {}", self.context.author());
        let _ = writeln!(out, "//! Generated: {}", self.context.date_stamp());
        out.push('\n');
        let _ = writeln!(out, "pub mod {} {{", self.module_name(&snapshot.object_name));
    }

    fn write_body(&self, out: &mut String, snapshot: &TableSnapshot) -> Result<(), GenerateError> {
        if snapshot.columns.is_empty() {
            return Ok(());
        }

        let suffixes = constant_suffixes(snapshot.columns.iter().map(|c| c.name.as_str()));

        for (column, suffix) in snapshot.columns.iter().zip(&suffixes) {
            let _ = writeln!(out, "    pub const MAX_LEN_{}: u32 = {};", suffix, column.size);
        }
        out.push('\n');
        for (column, suffix) in snapshot.columns.iter().zip(&suffixes) {
            let _ = writeln!(out, "    pub const REQUIRED_{}: bool = {};", suffix, !column.nullable);
        }
        Ok(())
    }

    fn write_footer(&self, out: &mut String, _snapshot: &TableSnapshot) {
        out.push_str("}\n");
    }
}

//! Schema-driven artifact generation.
//!
//! A generator turns the metadata of one table into one text artifact. The
//! shared pieces (naming, author/date stamping, header → body → footer
//! sequencing, file output) live here; [`DescriptorGenerator`] and
//! [`ConstantsGenerator`] only render.

mod constants;
mod descriptor;
mod error;

pub use constants::ConstantsGenerator;
pub use descriptor::DescriptorGenerator;
pub use error::{ArtifactError, GenerateError};

use std::fmt;
use std::fs::File;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::naming::{DefaultNaming, Naming};
use crate::schema::{ColumnMeta, SchemaIntrospector, TableRef};

/// How to render a column whose type has no descriptor representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedTypePolicy {
    /// Write the literal `null` type, matching existing tooling output.
    #[default]
    Preserve,
    /// Leave the data type attribute out.
    Omit,
    /// Fail generation of the table.
    Fail,
}

impl UnmappedTypePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "preserve" => Some(Self::Preserve),
            "omit" => Some(Self::Omit),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }
}

/// Contextual metadata shared by every artifact of one run.
#[derive(Clone)]
pub struct GeneratorContext {
    author: String,
    namespace: Option<String>,
    date: NaiveDate,
    naming: Arc<dyn Naming + Send + Sync>,
}

impl fmt::Debug for GeneratorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorContext")
            .field("author", &self.author)
            .field("namespace", &self.namespace)
            .field("date", &self.date)
            .finish_non_exhaustive()
    }
}

impl GeneratorContext {
    /// Context stamped with today's local date and the default naming rules.
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            namespace: None,
            date: Local::now().date_naive(),
            naming: Arc::new(DefaultNaming),
        }
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_naming(mut self, naming: impl Naming + Send + Sync + 'static) -> Self {
        self.naming = Arc::new(naming);
        self
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Generation date as `YYYY-MM-DD`.
    pub fn date_stamp(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn object_name(&self, table: &TableRef) -> String {
        self.naming.object_name(&table.name)
    }

    pub fn column_object_name(&self, column: &ColumnMeta) -> String {
        self.naming.column_object_name(&column.name)
    }
}

/// Metadata of one table, read once before rendering.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub table: TableRef,
    pub object_name: String,
    pub columns: Vec<ColumnMeta>,
    pub primary_keys: Vec<String>,
}

/// Produces one text artifact per table.
pub trait ArtifactGenerator {
    fn context(&self) -> &GeneratorContext;

    /// Output file name for a table's object name.
    fn file_name(&self, object_name: &str) -> String;

    /// Whether rendering reads primary key metadata.
    fn needs_primary_keys(&self) -> bool {
        false
    }

    fn write_header(&self, out: &mut String, snapshot: &TableSnapshot);

    fn write_body(&self, out: &mut String, snapshot: &TableSnapshot) -> Result<(), GenerateError>;

    fn write_footer(&self, out: &mut String, snapshot: &TableSnapshot);

    /// Read the table's metadata and render header, body, and footer in order.
    fn generate(
        &self,
        schema: &dyn SchemaIntrospector,
        table: &TableRef,
    ) -> Result<String, GenerateError> {
        let columns = schema.columns(table).map_err(|e| {
            GenerateError::wrap(format!("Failed to read columns of table {}", table), e)
        })?;
        let primary_keys = if self.needs_primary_keys() {
            schema.primary_keys(table).map_err(|e| {
                GenerateError::wrap(format!("Failed to read primary keys of table {}", table), e)
            })?
        } else {
            Vec::new()
        };

        let snapshot = TableSnapshot {
            object_name: self.context().object_name(table),
            table: table.clone(),
            columns,
            primary_keys,
        };

        let mut out = String::new();
        self.write_header(&mut out, &snapshot);
        self.write_body(&mut out, &snapshot)?;
        self.write_footer(&mut out, &snapshot);
        Ok(out)
    }
}

/// Generate one table's artifact and write it to its own file under `dir`.
///
/// The file is only created once generation has succeeded, and its handle is
/// released before returning on every path.
pub fn write_artifact<G: ArtifactGenerator + ?Sized>(
    generator: &G,
    schema: &dyn SchemaIntrospector,
    table: &TableRef,
    dir: &Path,
) -> Result<PathBuf, ArtifactError> {
    let text = generator.generate(schema, table)?;
    let object_name = generator.context().object_name(table);
    let path = dir.join(generator.file_name(&object_name));

    let mut file = File::create(&path)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;

    tracing::info!("Wrote {} for table {}", path.display(), table);
    Ok(path)
}

pub mod config;
pub mod generator;
pub mod model;
pub mod naming;
pub mod schema;
pub mod sql;
pub mod typemap;
pub mod xml;

use wasm_bindgen::prelude::*;

use generator::{ArtifactGenerator, ConstantsGenerator, DescriptorGenerator, GeneratorContext};
use model::SqlRepository;
use schema::InMemorySchema;
use sql::Dialect;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn generate_from_sql(
    build: impl FnOnce(GeneratorContext) -> Box<dyn ArtifactGenerator>,
    source: &str,
    table: &str,
    author: Option<String>,
    dialect: Option<String>,
) -> Result<String, String> {
    let dialect = match dialect.as_deref() {
        Some(name) => Dialect::from_str(name).ok_or_else(|| format!("Unknown dialect: {}", name))?,
        None => Dialect::Auto,
    };
    let schema = InMemorySchema::from_sql(source, dialect).map_err(|e| e.to_string())?;
    let table = schema
        .find(table)
        .ok_or_else(|| format!("Unknown table: {}", table))?
        .clone();

    let context = GeneratorContext::new(author.unwrap_or_else(|| "unknown".to_string()));
    build(context)
        .generate(&schema, &table)
        .map_err(|e| e.format_detailed())
}

/// Generate a repository descriptor for one table of a SQL dump
#[wasm_bindgen(js_name = "sqlToDescriptor")]
pub fn sql_to_descriptor(
    source: &str,
    table: &str,
    author: Option<String>,
    dialect: Option<String>,
) -> Result<String, String> {
    generate_from_sql(
        |ctx| Box::new(DescriptorGenerator::new(ctx)),
        source,
        table,
        author,
        dialect,
    )
}

/// Generate the column constants module for one table of a SQL dump
#[wasm_bindgen(js_name = "sqlToConstants")]
pub fn sql_to_constants(
    source: &str,
    table: &str,
    author: Option<String>,
    dialect: Option<String>,
) -> Result<String, String> {
    generate_from_sql(
        |ctx| Box::new(ConstantsGenerator::new(ctx)),
        source,
        table,
        author,
        dialect,
    )
}

/// Parse a repository descriptor and outline its contents
#[wasm_bindgen(js_name = "describeRepository")]
pub fn describe_repository(xml: &str) -> Result<String, String> {
    SqlRepository::from_xml(xml)
        .map(|repo| repo.summary())
        .map_err(|e| e.to_string())
}

//! repodef CLI - repository descriptors and column constants from SQL dumps.

use clap::{Args, Parser, Subcommand};
use repodef::config::GeneratorConfig;
use repodef::generator::{
    ArtifactGenerator, ConstantsGenerator, DescriptorGenerator, GenerateError, GeneratorContext,
    UnmappedTypePolicy, write_artifact,
};
use repodef::model::{ParseOptions, SqlRepository};
use repodef::schema::{InMemorySchema, SchemaIntrospector, TableRef};
use repodef::sql::Dialect;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "repodef")]
#[command(about = "Repository descriptors and column constants from relational schemas")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log format: text or json
    #[arg(long, default_value = "text", global = true)]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn", global = true)]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a repository descriptor per table
    Descriptor(GenerateArgs),

    /// Generate a column constants module per table
    Constants(GenerateArgs),

    /// Parse a repository descriptor and print its outline
    Inspect {
        /// Descriptor XML file
        file: PathBuf,

        /// Fail on duplicate item-descriptor, table, or property names
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// SQL dump containing CREATE TABLE statements
    #[arg(long)]
    sql: PathBuf,

    /// SQL dialect: auto, generic, postgres, mysql
    #[arg(long)]
    dialect: Option<String>,

    /// Author stamped into the artifacts
    #[arg(long)]
    author: Option<String>,

    /// Module name for constants artifacts
    #[arg(long)]
    namespace: Option<String>,

    /// Write one file per table here instead of stdout
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Only generate these tables (repeatable)
    #[arg(long = "table")]
    tables: Vec<String>,

    /// Columns with unmapped types: preserve, omit, fail
    #[arg(long)]
    unmapped: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] repodef::config::ConfigError),
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Schema(#[from] repodef::schema::IntrospectError),
    #[error(transparent)]
    Model(#[from] repodef::model::MetaModelError),
    #[error("{0}")]
    Usage(String),
    #[error("{failed} of {total} tables failed")]
    TablesFailed { failed: usize, total: usize },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let mut config = match &cli.config {
        Some(path) => {
            let config = GeneratorConfig::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => GeneratorConfig::default(),
    };

    match cli.command {
        Commands::Descriptor(args) => {
            apply_overrides(&mut config, &args)?;
            let generator = DescriptorGenerator::new(context(&config))
                .with_unmapped_types(config.unmapped_types);
            generate_all(&generator, &config, &args.sql)
        }
        Commands::Constants(args) => {
            apply_overrides(&mut config, &args)?;
            let generator = ConstantsGenerator::new(context(&config));
            generate_all(&generator, &config, &args.sql)
        }
        Commands::Inspect { file, strict } => {
            if strict {
                config.duplicates = repodef::model::DuplicatePolicy::Reject;
            }
            let input = read(&file)?;
            let options = ParseOptions {
                duplicates: config.duplicates,
            };
            let repository = SqlRepository::from_xml_with(&input, &options)?;
            print!("{}", repository.summary());
            Ok(())
        }
    }
}

/// Command-line flags win over configuration file values.
fn apply_overrides(config: &mut GeneratorConfig, args: &GenerateArgs) -> Result<(), CliError> {
    if let Some(name) = &args.dialect {
        config.dialect = Dialect::from_str(name)
            .ok_or_else(|| CliError::Usage(format!("Unknown dialect: {}", name)))?;
    }
    if let Some(author) = &args.author {
        config.author = author.clone();
    }
    if args.namespace.is_some() {
        config.namespace = args.namespace.clone();
    }
    if args.out_dir.is_some() {
        config.output_dir = args.out_dir.clone();
    }
    if !args.tables.is_empty() {
        config.tables = args.tables.clone();
    }
    if let Some(policy) = &args.unmapped {
        config.unmapped_types = UnmappedTypePolicy::from_str(policy)
            .ok_or_else(|| CliError::Usage(format!("Unknown unmapped type policy: {}", policy)))?;
    }
    config.validate()?;
    Ok(())
}

fn context(config: &GeneratorConfig) -> GeneratorContext {
    GeneratorContext::new(config.author.clone()).with_namespace(config.namespace.clone())
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Generate every selected table, continuing past per-table failures.
fn generate_all(
    generator: &dyn ArtifactGenerator,
    config: &GeneratorConfig,
    sql: &Path,
) -> Result<(), CliError> {
    let input = read(sql)?;
    let schema = InMemorySchema::from_sql(&input, config.dialect)?;
    let tables = select_tables(&schema, &config.tables)?;
    info!("Generating {} table(s) from {:?}", tables.len(), sql);

    if let Some(dir) = &config.output_dir {
        std::fs::create_dir_all(dir).map_err(|source| CliError::OutputDir {
            path: dir.clone(),
            source,
        })?;
    }

    let mut failed = 0;
    for table in &tables {
        let result: Result<(), String> = match &config.output_dir {
            Some(dir) => write_artifact(generator, &schema, table, dir)
                .map(|_| ())
                .map_err(|e| match e {
                    repodef::generator::ArtifactError::Generate(g) => g.format_detailed(),
                    other => other.to_string(),
                }),
            None => generator
                .generate(&schema, table)
                .map(|text| print!("{}", text))
                .map_err(|e: GenerateError| e.format_detailed()),
        };

        if let Err(message) = result {
            error!("Table {} failed", table);
            eprintln!("{}", message);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(CliError::TablesFailed {
            failed,
            total: tables.len(),
        });
    }
    Ok(())
}

fn select_tables(schema: &InMemorySchema, names: &[String]) -> Result<Vec<TableRef>, CliError> {
    if names.is_empty() {
        return Ok(schema.tables()?);
    }
    names
        .iter()
        .map(|name| {
            schema
                .find(name)
                .cloned()
                .ok_or_else(|| CliError::Usage(format!("Unknown table: {}", name)))
        })
        .collect()
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

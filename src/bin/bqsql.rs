//! bqsql: compile operation trees to BigQuery SQL
//!
//! # Usage
//!
//! ```bash
//! # Compile a JSON operation tree
//! bqsql compile query.json
//!
//! # Translate raw SQL with bound parameters
//! bqsql translate "select DATE_FORMAT(created_at, '%Y') from t where id = ?" --param 42
//!
//! # Show the JSON column registry built from config
//! bqsql registry --config bqsql.toml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::PathBuf;

use bqsql::prelude::*;
use bqsql::transpiler::count_placeholders;

#[derive(Parser)]
#[command(name = "bqsql")]
#[command(version)]
#[command(about = "BigQuery SQL dialect compiler", long_about = None)]
#[command(after_help = "EXAMPLES:
    bqsql compile query.json
    bqsql compile query.json --dialect generic --format json
    bqsql translate \"select NOW() from t where a = ?\" --param 1
    bqsql registry")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an operation tree stored as JSON
    Compile {
        /// Path to the tree, or `-` for stdin
        tree: PathBuf,

        /// `bigquery` (or `bq`) or `generic`
        #[arg(short, long, default_value = "bigquery")]
        dialect: Dialect,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Config used to encode JSON columns and infer parameter types
        #[arg(short, long, env = "BQSQL_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Translate raw SQL; each `?` splits a fragment
    Translate {
        sql: String,

        /// Parameter values, in placeholder order
        #[arg(short, long)]
        param: Vec<String>,
    },
    /// Show the JSON column registry
    Registry {
        #[arg(short, long, env = "BQSQL_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Compile {
            tree,
            dialect,
            format,
            config,
        } => compile(tree, *dialect, *format, config.as_deref()),
        Commands::Translate { sql, param } => translate(sql, param),
        Commands::Registry { config } => show_registry(config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "bqsql=debug" } else { "bqsql=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(Config::load_or_default()?),
    }
}

fn read_tree(path: &std::path::Path) -> Result<OperationNode> {
    let content = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&content).context("invalid operation tree")
}

fn compile(
    tree: &std::path::Path,
    dialect: Dialect,
    format: OutputFormat,
    config: Option<&std::path::Path>,
) -> Result<()> {
    let node = read_tree(tree)?;
    let compiled = node.compile_with_dialect(dialect);
    let registry = JsonColumnRegistry::from_config(&load_config(config)?);
    let request = bqsql::engine::params::prepare_request(&compiled, &registry);

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "sql": request.sql,
                "parameters": request.params,
                "types": request.types,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{}", "Generated SQL:".green().bold());
            println!("{}", request.sql.white());
            print_params(&request.params);
            if let Some(types) = &request.types {
                let types: Vec<String> = types.iter().map(ToString::to_string).collect();
                println!("{} {}", "Types:".cyan(), types.join(", ").yellow());
            }
        }
    }
    Ok(())
}

fn translate(sql: &str, params: &[String]) -> Result<()> {
    let fragments: Vec<&str> = sql.split('?').collect();
    let values: Vec<OperationNode> = params.iter().map(|p| val(parse_param(p))).collect();
    let node = raw(fragments, values);
    let compiled = node.compile();

    println!("{}", "Translated SQL:".green().bold());
    println!("{}", compiled.sql.white());
    print_params(&compiled.parameters);

    let placeholders = count_placeholders(&compiled.sql);
    if placeholders != compiled.parameters.len() {
        println!(
            "{}",
            format!(
                "⚠ {} placeholders but {} parameters",
                placeholders,
                compiled.parameters.len()
            )
            .yellow()
        );
    }
    Ok(())
}

/// Interpret a command-line parameter as JSON when it parses, else as text.
fn parse_param(raw: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Null) => Value::Null,
        Ok(serde_json::Value::Bool(b)) => Value::Bool(b),
        Ok(serde_json::Value::Number(n)) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        Ok(serde_json::Value::String(s)) => Value::String(s),
        Ok(json @ (serde_json::Value::Array(_) | serde_json::Value::Object(_))) => Value::Json(json),
        Err(_) => Value::String(raw.to_string()),
    }
}

fn print_params(params: &[Value]) {
    if params.is_empty() {
        return;
    }
    println!();
    println!("{}", "Parameters:".cyan());
    for (i, p) in params.iter().enumerate() {
        println!("  ?{} = {}", i + 1, p.to_string().yellow());
    }
}

fn show_registry(config: Option<&std::path::Path>) -> Result<()> {
    let config = load_config(config)?;
    let registry = JsonColumnRegistry::from_config(&config);

    if registry.is_empty() {
        println!("{}", "No JSON columns configured.".dimmed());
        if let Some(path) = Config::default_path() {
            println!("Add a [json_columns] table to {}", path.display());
        }
        return Ok(());
    }

    println!("{}", "JSON columns:".green().bold());
    for (table, columns) in registry.tables() {
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
        println!("  {} {}", table.cyan(), columns.join(", "));
    }
    println!(
        "{} {}",
        "Introspection concurrency:".dimmed(),
        config.introspection_concurrency
    );
    Ok(())
}

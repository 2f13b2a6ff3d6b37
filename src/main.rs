//! mockbridge CLI
//!
//! Inspect how request patterns and fixtures will be seen by scenarios.

use clap::{Parser, Subcommand};
use colored::*;
use mockbridge::config::Config;
use mockbridge::query::{self, QueryMap};
use mockbridge::{BridgeError, FixtureLoader, RequestTarget};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mockbridge")]
#[command(version)]
#[command(about = "Query-string and fixture tooling for mock-server driven scenarios", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./mockbridge.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query string and print it as JSON
    ///
    /// Examples:
    ///   mockbridge parse "user.id=5&tags[]=a&tags[]=b"
    ///   mockbridge parse "?a.b[0]=x" --compact
    Parse {
        /// The query string (a leading '?' is ignored)
        #[arg(value_name = "QUERY")]
        query: String,

        /// Use the standard decoder, which renames '.' and ' ' in keys
        #[arg(long)]
        standard: bool,

        /// Print JSON on one line
        #[arg(long)]
        compact: bool,
    },
    /// Split a URL or path and print its parts with parsed query parameters
    Url {
        #[arg(value_name = "URL")]
        url: String,

        /// Print JSON on one line
        #[arg(long)]
        compact: bool,
    },
    /// Serialize a JSON object back into a query string
    Encode {
        /// JSON object such as '{"a.b": ["x", "y"]}'
        #[arg(value_name = "JSON")]
        json: String,
    },
    /// Print a fixture body from the fixtures directory
    Fixture {
        /// Fixture path relative to the fixtures directory
        #[arg(value_name = "NAME")]
        name: String,

        /// Parse the fixture as JSON and pretty-print it
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = Config::load(cli.config.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|config| {
            init_tracing(&config.log_level);
            run(cli.command, &config)
        });

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(mockbridge::config::DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Parse {
            query,
            standard,
            compact,
        } => parse_query(&query, standard, compact),
        Commands::Url { url, compact } => show_url(&url, compact),
        Commands::Encode { json } => encode_query(&json),
        Commands::Fixture { name, json } => show_fixture(config, &name, json),
    }
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", text);
    Ok(())
}

fn parse_query(raw: &str, standard: bool, compact: bool) -> anyhow::Result<()> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let params = if standard {
        query::parse_standard(raw)
    } else {
        query::parse(raw)
    };
    tracing::debug!(keys = params.len(), standard, "parsed query");
    print_json(&params, compact)
}

#[derive(Serialize)]
struct UrlReport<'a> {
    #[serde(flatten)]
    target: &'a RequestTarget,
    params: QueryMap,
}

fn show_url(url: &str, compact: bool) -> anyhow::Result<()> {
    let target = RequestTarget::parse(url);
    let report = UrlReport {
        params: target.query_params(),
        target: &target,
    };
    print_json(&report, compact)
}

fn encode_query(json: &str) -> anyhow::Result<()> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| BridgeError::InvalidInput(format!("not valid JSON: {e}")))?;
    if !value.is_object() {
        anyhow::bail!(BridgeError::InvalidInput(
            "encode expects a JSON object".to_string()
        ));
    }
    let params: QueryMap = serde_json::from_value(value).map_err(|e| {
        BridgeError::InvalidInput(format!("values must be strings, arrays or objects: {e}"))
    })?;
    println!("{}", query::to_query_string(&params));
    Ok(())
}

fn show_fixture(config: &Config, name: &str, json: bool) -> anyhow::Result<()> {
    let loader = FixtureLoader::new(&config.fixtures_dir);
    if json {
        let body = loader.load_json(name)?;
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", loader.load(name)?);
    }
    Ok(())
}

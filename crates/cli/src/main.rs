//! apinorm CLI
//!
//! Command-line interface for normalizing Swagger / OpenAPI documents.

mod logger;

use anyhow::{bail, Context, Result};
use apinorm_common::{Endpoint, ParsedDocument, ParserOptions};
use apinorm_parser::{resolve_ref, ApiDocumentParser, DocumentLoader, ExampleGenerator};
use clap::{Parser, Subcommand};
use colored::*;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Bucket for endpoints that declare no tag
const DEFAULT_TAG: &str = "default";

#[derive(Parser)]
#[command(name = "apinorm")]
#[command(version, about = "Normalize Swagger 2.0 and OpenAPI 3.x documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and display its endpoints grouped by tag
    #[command(after_help = "EXAMPLES:\n  \
        # Summarize a Swagger 2.0 document\n  \
        apinorm parse --spec petstore.json\n\n  \
        # Emit the full normalized document as JSON\n  \
        apinorm parse --spec openapi.yaml --json\n\n  \
        # Use custom parser options\n  \
        apinorm parse --spec openapi.yaml --config apinorm.yaml")]
    Parse {
        /// Path to the Swagger / OpenAPI document (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Parser options file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the normalized document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Synthesize an example for the schema at a JSON pointer
    #[command(after_help = "EXAMPLES:\n  \
        apinorm example --spec openapi.yaml --pointer '#/components/schemas/Pet'\n  \
        apinorm example --spec petstore.json --pointer '#/definitions/Order'")]
    Example {
        /// Path to the Swagger / OpenAPI document (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Local JSON pointer to the schema, e.g. '#/components/schemas/Pet'
        #[arg(short, long)]
        pointer: String,

        /// Parser options file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Commands::Parse { spec, config, json } => {
            parse_command(spec.as_path(), config.as_deref(), json, cli.verbose)?;
        }
        Commands::Example {
            spec,
            pointer,
            config,
        } => {
            example_command(spec.as_path(), &pointer, config.as_deref())?;
        }
    }

    Ok(())
}

fn load_options(config: Option<&Path>) -> Result<ParserOptions> {
    match config {
        Some(path) => ParserOptions::from_file(path)
            .with_context(|| format!("Failed to load parser options from {}", path.display())),
        None => Ok(ParserOptions::default()),
    }
}

fn parse_command(spec_path: &Path, config: Option<&Path>, json: bool, verbose: bool) -> Result<()> {
    let options = load_options(config)?;
    let parser = ApiDocumentParser::new(options);

    if !json {
        println!("{} Parsing document: {}", "→".cyan(), spec_path.display());
    }

    let parsed = parser.parse_file(spec_path);

    if json {
        let output =
            serde_json::to_string_pretty(&parsed).context("Failed to serialize parse result")?;
        println!("{}", output);
        if !parsed.success {
            bail!("Failed to parse {}", spec_path.display());
        }
        return Ok(());
    }

    if !parsed.success {
        bail!(
            "Failed to parse {}: {}",
            spec_path.display(),
            parsed.error.as_deref().unwrap_or("unknown error")
        );
    }

    print_summary(&parsed, verbose);
    Ok(())
}

fn print_summary(parsed: &ParsedDocument, verbose: bool) {
    println!("\n{}", "✓ Parse successful!".green().bold());
    if let Some(version) = parsed.spec_version {
        println!("  Format: {}", version.to_string().yellow());
    }
    if let Some(info) = &parsed.info {
        println!("  Title: {}", info.title.yellow());
        println!("  Version: {}", info.version.yellow());
        if let Some(servers) = &info.servers {
            for server in servers {
                println!("  Server: {}", server.url);
            }
        }
        if let Some(host) = &info.host {
            println!(
                "  Host: {}{}",
                host,
                info.base_path.as_deref().unwrap_or_default()
            );
        }
    }
    println!("  Endpoints: {}", parsed.endpoints.len());
    if let Some(schemes) = &parsed.security_schemes {
        let names: Vec<&str> = schemes.keys().map(String::as_str).collect();
        println!("  Security: {}", names.join(", "));
    }

    for (tag, endpoints) in group_by_tag(&parsed.endpoints) {
        println!("\n{}", tag.bold());
        for endpoint in endpoints {
            let method = format!("{:<7}", endpoint.method.as_str());
            let summary = endpoint.summary.as_deref().unwrap_or_default();
            if endpoint.deprecated {
                println!(
                    "  {} {} {}",
                    method.dimmed(),
                    endpoint.path.dimmed().strikethrough(),
                    summary.dimmed()
                );
            } else {
                println!("  {} {} {}", method.cyan(), endpoint.path, summary);
            }

            if verbose {
                for parameter in &endpoint.parameters {
                    let required = if parameter.required { "*" } else { "" };
                    println!(
                        "      {}{} ({})",
                        parameter.name, required, parameter.location
                    );
                }
                if let Some(body) = &endpoint.request_body {
                    for variant in &body.content {
                        println!("      body: {}", variant.content_type.yellow());
                    }
                }
                let codes: Vec<&str> = endpoint
                    .responses
                    .iter()
                    .map(|r| r.status_code.as_str())
                    .collect();
                if !codes.is_empty() {
                    println!("      responses: {}", codes.join(", "));
                }
            }
        }
    }
}

/// Group endpoints by tag in first-seen order. An endpoint with several
/// tags is listed under each of them.
fn group_by_tag(endpoints: &[Endpoint]) -> IndexMap<&str, Vec<&Endpoint>> {
    let mut groups: IndexMap<&str, Vec<&Endpoint>> = IndexMap::new();
    for endpoint in endpoints {
        if endpoint.tags.is_empty() {
            groups.entry(DEFAULT_TAG).or_default().push(endpoint);
        }
        for tag in &endpoint.tags {
            groups.entry(tag.as_str()).or_default().push(endpoint);
        }
    }
    groups
}

fn example_command(spec_path: &Path, pointer: &str, config: Option<&Path>) -> Result<()> {
    let options = load_options(config)?;
    let document = DocumentLoader::from_file(spec_path)
        .with_context(|| format!("Failed to load {}", spec_path.display()))?;

    let Some(schema) = resolve_ref(pointer, &document) else {
        bail!("No schema at {} in {}", pointer, spec_path.display());
    };

    let example = ExampleGenerator::new(&document, &options).generate(schema, 0);
    let output = serde_json::to_string_pretty(&example).context("Failed to serialize example")?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apinorm_common::HttpMethod;

    fn endpoint(path: &str, tags: &[&str]) -> Endpoint {
        Endpoint {
            path: path.to_string(),
            method: HttpMethod::Get,
            summary: None,
            description: None,
            operation_id: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            deprecated: false,
            parameters: Vec::new(),
            request_body: None,
            responses: Vec::new(),
            security: None,
            servers: None,
        }
    }

    #[test]
    fn test_group_by_tag() {
        let endpoints = vec![
            endpoint("/pets", &["pets"]),
            endpoint("/health", &[]),
            endpoint("/orders", &["store", "pets"]),
        ];

        let groups = group_by_tag(&endpoints);
        let names: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(names, vec!["pets", "default", "store"]);

        let pets: Vec<&str> = groups["pets"].iter().map(|e| e.path.as_str()).collect();
        assert_eq!(pets, vec!["/pets", "/orders"]);
        assert_eq!(groups["default"][0].path, "/health");
    }

    #[test]
    fn test_load_options_default() {
        let options = load_options(None).unwrap();
        assert_eq!(options, ParserOptions::default());
    }

    #[test]
    fn test_load_options_missing_file() {
        assert!(load_options(Some(Path::new("/nonexistent/apinorm.yaml"))).is_err());
    }
}

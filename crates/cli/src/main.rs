mod config;
mod serve;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use flagpress_core::{compile_flags, render, CompileError, Current, FlagSet, Legacy};

use crate::config::{load_flags, ServeConfig};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Feature-flag rule compiler and configuration server.
#[derive(Parser)]
#[command(
    name = "flagpress",
    version,
    about = "Feature-flag rule compiler and configuration server"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a flag definition file to a configuration document
    Compile {
        /// Path to the flag definitions (.json or .toml)
        flags: PathBuf,
        /// Emit the legacy config_v5 layout instead of config_v6
        #[arg(long)]
        legacy: bool,
        /// Print only the document fingerprint
        #[arg(long)]
        fingerprint: bool,
    },

    /// Check a flag definition file without emitting a document
    Check {
        /// Path to the flag definitions (.json or .toml)
        flags: PathBuf,
    },

    /// Validate a config_v6 document against the JSON Schema
    Validate {
        /// Path to the configuration document
        document: PathBuf,
    },

    /// Publish flag definitions and serve them over HTTP
    Serve {
        /// Server configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Address to bind (default 0.0.0.0)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (default 8080)
        #[arg(long)]
        port: Option<u16>,
        /// Distributions as KEY=FLAGS_FILE
        distributions: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Compile {
            flags,
            legacy,
            fingerprint,
        } => {
            cmd_compile(&flags, legacy, fingerprint, cli.output, cli.quiet);
        }
        Commands::Check { flags } => {
            cmd_check(&flags, cli.output, cli.quiet);
        }
        Commands::Validate { document } => {
            cmd_validate(&document, cli.output, cli.quiet);
        }
        Commands::Serve {
            config,
            bind,
            port,
            distributions,
        } => {
            let mut server_config = match config.as_deref().map(ServeConfig::load).transpose() {
                Ok(c) => c.unwrap_or_default(),
                Err(e) => {
                    report_error(&e.to_string(), cli.output, cli.quiet);
                    process::exit(1);
                }
            };
            if let Err(e) = server_config.merge_args(&distributions) {
                report_error(&e.to_string(), cli.output, cli.quiet);
                process::exit(1);
            }
            if bind.is_some() {
                server_config.bind = bind;
            }
            if port.is_some() {
                server_config.port = port;
            }

            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    let msg = format!("failed to create tokio runtime: {}", e);
                    report_error(&msg, cli.output, cli.quiet);
                    process::exit(1);
                }
            };
            if let Err(e) = rt.block_on(serve::start_server(server_config)) {
                report_error(&format!("server error: {}", e), cli.output, cli.quiet);
                process::exit(1);
            }
        }
    }
}

/// Log to stderr so stdout carries only command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("flagpress=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_or_exit(path: &Path, output: OutputFormat, quiet: bool) -> FlagSet {
    match load_flags(path) {
        Ok(flags) => flags,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}

fn report_compile_error(e: &CompileError, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => eprintln!("error: {}", e),
    }
}

fn cmd_compile(path: &Path, legacy: bool, fingerprint: bool, output: OutputFormat, quiet: bool) {
    let flags = load_or_exit(path, output, quiet);
    let compiled = match compile_flags(&flags) {
        Ok(c) => c,
        Err(e) => {
            report_compile_error(&e, output, quiet);
            process::exit(1);
        }
    };

    let rendered = if legacy {
        render::<Legacy>(&compiled, None)
    } else {
        render::<Current>(&compiled, None)
    };
    let rendered = match rendered {
        Ok(r) => r,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    if fingerprint {
        match output {
            OutputFormat::Text => println!("{}", rendered.etag),
            OutputFormat::Json => println!("{}", serde_json::json!({ "etag": rendered.etag })),
        }
        return;
    }

    // Pretty-print for humans; the fingerprint covers the compact bytes.
    let pretty = serde_json::from_slice::<serde_json::Value>(&rendered.bytes)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}

fn cmd_check(path: &Path, output: OutputFormat, quiet: bool) {
    let flags = load_or_exit(path, output, quiet);
    let compiled = match compile_flags(&flags) {
        Ok(c) => c,
        Err(e) => {
            report_compile_error(&e, output, quiet);
            process::exit(1);
        }
    };
    let rules: usize = compiled.iter().map(|f| f.rules.len()).sum();
    let legacy = render::<Legacy>(&compiled, None).is_ok();

    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => {
            println!("{} flags, {} rules", compiled.len(), rules);
            for flag in &compiled {
                println!(
                    "  {} ({}, {} rules)",
                    flag.key,
                    flag.setting_type,
                    flag.rules.len()
                );
            }
            if !legacy {
                println!("note: not representable as config_v5.json");
            }
        }
        OutputFormat::Json => {
            let flags: Vec<serde_json::Value> = compiled
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "key": f.key,
                        "type": f.setting_type.name(),
                        "rules": f.rules.len(),
                    })
                })
                .collect();
            let json = serde_json::json!({
                "valid": true,
                "flags": flags,
                "rules": rules,
                "legacy": legacy,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
}

static CONFIG_SCHEMA_STR: &str = include_str!("../../../schema/config-v6-schema.json");

fn cmd_validate(document_path: &Path, output: OutputFormat, quiet: bool) {
    let schema: serde_json::Value = match serde_json::from_str(CONFIG_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc_str = match std::fs::read_to_string(document_path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", document_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let doc: serde_json::Value = match serde_json::from_str(&doc_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", document_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let mut errors: Vec<String> = validator
        .iter_errors(&doc)
        .map(|e| format!("{}", e))
        .collect();

    // The schema checks shape; served/default type agreement needs the model.
    if errors.is_empty() {
        if let Err(e) = flagpress_model::parse_document(doc_str.as_bytes()) {
            errors.push(e.to_string());
        }
    }

    if errors.is_empty() {
        if !quiet {
            match output {
                OutputFormat::Text => println!("valid"),
                OutputFormat::Json => println!("{{\"valid\": true}}"),
            }
        }
    } else {
        match output {
            OutputFormat::Text => {
                if !quiet {
                    eprintln!("invalid document");
                    for err in &errors {
                        eprintln!("  - {}", err);
                    }
                }
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&json).unwrap_or_default()
                );
            }
        }
        process::exit(1);
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

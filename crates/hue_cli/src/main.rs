//! Hue CLI
//!
//! Resolve design-system color tokens from the command line:
//!
//! - `hue resolve color_brand_60 text/primary` - hex for each token
//! - `hue semantic` - every semantic token with its light/dark colors
//! - `hue check` - report reference cycles and dangling references

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use hue_tokens::{ColorDataset, DatasetReport, SemanticRow, TokenResolver};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::HueConfig;

#[derive(Parser)]
#[command(name = "hue")]
#[command(about = "Resolve design-system color tokens", version)]
struct Cli {
    /// Config file (defaults to ./hue.toml when present)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Directory holding the color JSON files (overrides the config)
    #[arg(long, short = 'd', global = true)]
    data: Option<PathBuf>,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    /// Increase logging (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve color tokens to hex values
    Resolve {
        /// Token references (theme keys, palette references or hex literals)
        #[arg(required = true)]
        tokens: Vec<String>,
    },

    /// Show light/dark colors of one semantic token, or of all of them
    Semantic {
        /// Semantic token name; omit to list every semantic token
        token: Option<String>,
    },

    /// Check the dataset for reference cycles and dangling references
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = HueConfig::discover(cli.config.as_deref())?;
    let data_dir = cli.data.unwrap_or(config.data.dir);

    let dataset = ColorDataset::load_dir(&data_dir)
        .with_context(|| format!("Failed to load color data from {}", data_dir.display()))?;
    info!("loaded color data from {}", data_dir.display());
    let resolver = TokenResolver::with_config(dataset, config.resolver);

    match cli.command {
        Commands::Resolve { tokens } => resolve(&resolver, &tokens, cli.json),
        Commands::Semantic { token: Some(token) } => {
            let colors = resolver.resolve_semantic_token(&token)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&colors)?);
            } else {
                println!("{}\t{}", colors.light, colors.dark);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Semantic { token: None } => {
            let rows = resolver.semantic_colors()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render_semantic_table(&rows));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            let report = resolver.check();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
            Ok(if report.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn resolve(resolver: &TokenResolver, tokens: &[String], as_json: bool) -> Result<ExitCode> {
    let mut failed = false;
    let mut out = Vec::with_capacity(tokens.len());

    for token in tokens {
        match resolver.resolve_color_data(Some(token)) {
            Ok(color) => {
                if as_json {
                    out.push(json!({ "token": token, "color": color }));
                } else {
                    let hex = color.as_ref().map(|c| c.hex.as_str()).unwrap_or("-");
                    println!("{token}\t{hex}");
                }
            }
            Err(err) => {
                failed = true;
                if as_json {
                    out.push(json!({ "token": token, "error": err.to_string() }));
                } else {
                    eprintln!("{token}: {err}");
                }
            }
        }
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&out)?);
    }
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn render_semantic_table(rows: &[SemanticRow]) -> String {
    let width = rows.iter().map(|r| r.dev_token.len()).max().unwrap_or(0);
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "{:<width$}  {}  {}\n",
            row.dev_token, row.colors.light, row.colors.dark
        ));
    }
    out
}

fn render_report(report: &DatasetReport) -> String {
    let mut out = String::new();
    for cycle in &report.cycles {
        out.push_str(&format!("cycle: {}\n", cycle.join(" -> ")));
    }
    for (category, key, reference) in &report.dangling {
        out.push_str(&format!("dangling: {category}.{key} -> {reference}\n"));
    }
    for token in &report.unresolved_semantic {
        out.push_str(&format!("unresolved semantic: {token}\n"));
    }
    if report.is_clean() {
        out.push_str("ok\n");
    }
    out
}

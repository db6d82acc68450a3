//! Sideonly CLI - check client/server side restrictions in a symbol graph

mod config;
mod render;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use sideonly_checker::{check, CheckOptions, Diagnostic, Hint, HintSynthesizer, SideResolver};
use sideonly_symbols::{build_graph, GraphFile, SymbolResult};

use config::Config;
use render::{hint_location, render_hints, report, span_label, SourceFile};

#[derive(Parser)]
#[command(name = "sideonly")]
#[command(about = "Client/server side checker for annotated symbol graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every use site and print diagnostics
    Check {
        /// Symbol graph (JSON)
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Human)]
        format: Format,
        /// Config file (default: sideonly.toml beside the graph)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the effective side of every declaration
    Sides {
        file: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print inferred side hints
    Hints {
        file: PathBuf,
        /// Print the source with hints inserted above declarations
        #[arg(short, long)]
        render: bool,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Human,
    Json,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            file,
            format,
            config,
        } => cmd_check(&file, format, config.as_deref()),
        Commands::Sides { file, config } => cmd_sides(&file, config.as_deref()),
        Commands::Hints {
            file,
            render,
            config,
        } => cmd_hints(&file, render, config.as_deref()),
    }
}

/// Logging goes to stderr; `RUST_LOG` overrides the default filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sideonly=warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// A loaded graph with the config and source text it came with
struct Session {
    config: Config,
    symbols: SymbolResult,
    source: Option<SourceFile>,
}

fn load_session(file: &Path, config_path: Option<&Path>) -> Session {
    let config = match Config::discover(file, config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let json = match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            std::process::exit(1);
        }
    };
    let graph_file: GraphFile = match serde_json::from_str(&json) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: malformed symbol graph {}: {}", file.display(), e);
            std::process::exit(1);
        }
    };

    let source = graph_file
        .source
        .as_deref()
        .and_then(|path| read_source(file, path));

    match build_graph(&graph_file, &config.load_options()) {
        Ok(symbols) => Session {
            config,
            symbols,
            source,
        },
        Err(errors) => {
            eprintln!("✗ {} - {} errors:", file.display(), errors.len());
            for err in &errors {
                report(&Diagnostic::from(err), source.as_ref());
            }
            std::process::exit(1);
        }
    }
}

/// Source paths are relative to the graph file
fn read_source(graph: &Path, source: &Path) -> Option<SourceFile> {
    let path = match graph.parent() {
        Some(dir) if source.is_relative() => dir.join(source),
        _ => source.to_path_buf(),
    };
    match fs::read_to_string(&path) {
        Ok(text) => Some(SourceFile {
            name: source.display().to_string(),
            text,
        }),
        Err(e) => {
            tracing::debug!("source {} not readable: {}", path.display(), e);
            None
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a Path,
    diagnostics: Vec<&'a Diagnostic>,
    hints: &'a [Hint],
}

fn cmd_check(file: &Path, format: Format, config_path: Option<&Path>) {
    let session = load_session(file, config_path);
    let options: CheckOptions = session.config.check_options();
    let result = check(&session.symbols.graph, &options);

    let warnings: Vec<Diagnostic> = session
        .symbols
        .deferred_errors
        .iter()
        .map(Diagnostic::from)
        .collect();

    match format {
        Format::Json => {
            let output = JsonReport {
                file,
                diagnostics: warnings.iter().chain(&result.diagnostics).collect(),
                hints: &result.hints,
            };
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing report: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Format::Human => {
            for diagnostic in warnings.iter().chain(&result.diagnostics) {
                report(diagnostic, session.source.as_ref());
            }
            for hint in &result.hints {
                println!("{}: {}", hint_location(hint, session.source.as_ref()), hint.text);
            }

            let errors = result.errors().count();
            if errors == 0 {
                println!(
                    "✓ {} - {} declarations, {} use sites",
                    file.display(),
                    session.symbols.graph.len(),
                    session.symbols.graph.use_sites().count()
                );
            } else {
                eprintln!("✗ {} - {} errors", file.display(), errors);
            }
        }
    }

    if result.has_errors() {
        std::process::exit(1);
    }
}

fn cmd_sides(file: &Path, config_path: Option<&Path>) {
    let session = load_session(file, config_path);
    let graph = &session.symbols.graph;
    let resolver = SideResolver::new(graph);

    let width = graph.iter().map(|d| d.name.len()).max().unwrap_or(0);
    for decl in graph.iter() {
        let marker = if decl.has_annotation() { "*" } else { " " };
        println!(
            "{:<width$} {}{:<18} {} {}",
            decl.name,
            marker,
            decl.kind().describe(),
            resolver.effective_side(decl.id),
            span_label(decl.span),
            width = width
        );
    }
    println!();
    println!("Legend: * = annotated");
}

fn cmd_hints(file: &Path, render: bool, config_path: Option<&Path>) {
    let session = load_session(file, config_path);
    let options = session.config.hints.options.clone();
    let indent_width = options.indent_width;
    let resolver = SideResolver::new(&session.symbols.graph);
    let hints = HintSynthesizer::new(&resolver, options).hints();

    if !render {
        for hint in &hints {
            println!(
                "{} {}: {}",
                hint_location(hint, session.source.as_ref()),
                session.symbols.graph.name_of(hint.decl),
                hint.text
            );
        }
        return;
    }

    match &session.source {
        Some(source) => print!("{}", render_hints(&source.text, &hints, indent_width)),
        None => {
            eprintln!("Error: {} names no readable source file to render", file.display());
            std::process::exit(1);
        }
    }
}

//! Searchify - Entry Point

use clap::Parser;
use searchify::config::{InvalidPattern, MatchMethod};
use searchify::model::{AppError, Document, ItemList, SearchifyError};
use searchify::state::Searchify;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Searchify - incremental, debounced filtering of a list of items
#[derive(Parser, Debug)]
#[command(name = "searchify")]
#[command(version)]
#[command(about = "Filter a list of items as you type, or run a single search and print the result")]
pub struct Args {
    /// Path to the item file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Run one search, print the result and exit instead of starting the UI
    #[arg(short, long)]
    pub query: Option<String>,

    /// Output format for --query
    #[arg(long, default_value = "text", value_parser = ["text", "json", "html"])]
    pub format: String,

    /// Minimum query length before a typed search runs
    #[arg(long)]
    pub min_chars: Option<usize>,

    /// How matches are shown: toggle a class in place, or rebuild the list from clones
    #[arg(long, value_parser = ["in-place", "duplicate", "css", "dom"])]
    pub match_method: Option<String>,

    /// Selector restricting which children are items (e.g. ".fruit", ":visible")
    #[arg(long)]
    pub filter: Option<String>,

    /// Match queries that are not valid patterns as literal text
    #[arg(long)]
    pub literal: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Machine-readable result of a `--query` run.
#[derive(Debug, Serialize)]
struct Report {
    query: String,
    match_count: usize,
    total: usize,
    matches: Vec<String>,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    Ok(run(args)?)
}

fn run(args: Args) -> Result<ExitCode, AppError> {
    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = searchify::config::load_config_with_precedence(args.config.clone())?;
        let merged = searchify::config::merge_config(config_file);
        let with_env = searchify::config::apply_env_overrides(merged)?;

        // Only flags the user actually passed override lower layers
        let match_method = args
            .match_method
            .as_deref()
            .map(str::parse::<MatchMethod>)
            .transpose()
            .map_err(|reason| searchify::config::ConfigError::InvalidValue {
                key: "match_method".to_string(),
                reason,
            })?;
        let invalid_pattern = args.literal.then_some(InvalidPattern::Literal);

        searchify::config::apply_cli_overrides(
            with_env,
            args.min_chars,
            match_method,
            args.filter.clone(),
            invalid_pattern,
        )
    };

    searchify::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let options = config.to_options()?;
    let items = searchify::source::load_items(args.file.clone())?;
    let ItemList {
        mut document,
        container,
    } = ItemList::build(&items).map_err(SearchifyError::from)?;
    let controller = Searchify::bind(&mut document, container, options)?;

    match args.query {
        Some(query) => run_query(document, controller, &query, &args.format),
        None => {
            let (_, controller) = searchify::view::run_with_controller(document, controller)?;
            info!(
                query = controller.query(),
                matches = controller.match_count(),
                "interactive session ended"
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Batch mode: one search, printed in the requested format.
fn run_query(
    mut document: Document,
    mut controller: Searchify,
    query: &str,
    format: &str,
) -> Result<ExitCode, AppError> {
    controller.search(&mut document, query)?;

    let mut stdout = io::stdout().lock();
    match format {
        "json" => {
            serde_json::to_writer_pretty(&mut stdout, &report(&document, &controller))
                .map_err(io::Error::from)?;
            writeln!(stdout)?;
        }
        "html" => writeln!(stdout, "{}", document.outer_html(document.root()))?,
        _ => {
            for text in matched_texts(&document, &controller) {
                writeln!(stdout, "{}", text)?;
            }
        }
    }

    Ok(if controller.has_matches() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn matched_texts(document: &Document, controller: &Searchify) -> Vec<String> {
    let item_text = &controller.options().item_text;
    controller
        .matches()
        .iter()
        .map(|id| item_text(document, *id))
        .collect()
}

fn report(document: &Document, controller: &Searchify) -> Report {
    Report {
        query: controller.query().to_string(),
        match_count: controller.match_count(),
        total: controller.items().len(),
        matches: matched_texts(document, controller),
    }
}

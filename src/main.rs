use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, ExportArgs, MatrixSource, to_item_ids};
use cli::render;
use config::Config;
use toolseq::export::{self, ExportFormat};
use toolseq::request::SelectionRequest;
use toolseq::{ItemId, MatrixCache, OptimizationResult, ToolMatrix, workcenter};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolseq")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("toolseq.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// A loaded matrix and where its results belong
struct LoadedMatrix {
    matrix: Arc<ToolMatrix>,
    work_center: Option<String>,
    output_dir: PathBuf,
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }
    if config.debug {
        println!("{} {:?}", "Config:".yellow(), config);
    }

    let cache = MatrixCache::new();

    match &cli.command {
        Commands::Centers => handle_centers_command(config),
        Commands::Items { source } => handle_items_command(source, config, &cache),
        Commands::Optimize {
            source,
            items,
            start,
            export,
        } => handle_optimize_command(source, items, start.as_deref(), export, config, &cache),
        Commands::Evaluate { source, items, export } => {
            handle_evaluate_command(source, items, export, config, &cache)
        }
    }
}

fn handle_centers_command(config: &Config) -> Result<()> {
    info!("Listing work centers under {}", config.data.dir.display());
    let centers = workcenter::discover(&config.data.dir, &config.data.matrix_stem)
        .context("Failed to discover work centers")?;

    if centers.is_empty() {
        println!(
            "{} no {}.* files under {}",
            "No work centers:".yellow(),
            config.data.matrix_stem,
            config.data.dir.display()
        );
        return Ok(());
    }

    println!("{}", "Work centers:".green());
    print!("{}", render::work_centers(&centers));
    Ok(())
}

fn handle_items_command(source: &MatrixSource, config: &Config, cache: &MatrixCache) -> Result<()> {
    let loaded = load_matrix(source, config, cache)?;
    println!(
        "{} {} items × {} items",
        "Loaded matrix:".green(),
        loaded.matrix.len(),
        loaded.matrix.len()
    );
    print!("{}", render::items(&loaded.matrix));
    Ok(())
}

fn handle_optimize_command(
    source: &MatrixSource,
    items: &[String],
    start: Option<&str>,
    export: &ExportArgs,
    config: &Config,
    cache: &MatrixCache,
) -> Result<()> {
    let loaded = load_matrix(source, config, cache)?;

    let request = SelectionRequest::new(to_item_ids(items), start.map(ItemId::from));
    let selection = request
        .resolve(&loaded.matrix, &config.selection.limits())
        .context("Invalid selection")?;
    info!(
        "Optimizing {} items starting at {}",
        selection.items.len(),
        selection.start
    );

    let result = toolseq::plan(&loaded.matrix, &selection.items, selection.start.as_str())
        .context("Optimization failed")?;

    print!("{}", render::result(&result, "Optimized Sequence"));
    maybe_export(&result, export, &loaded, config)
}

fn handle_evaluate_command(
    source: &MatrixSource,
    items: &[String],
    export: &ExportArgs,
    config: &Config,
    cache: &MatrixCache,
) -> Result<()> {
    let loaded = load_matrix(source, config, cache)?;

    let order = to_item_ids(items);
    let request = SelectionRequest::new(order.clone(), None);
    request
        .resolve(&loaded.matrix, &config.selection.limits())
        .context("Invalid selection")?;
    info!("Evaluating manual order of {} items", order.len());

    let result = toolseq::evaluate(&loaded.matrix, &order).context("Evaluation failed")?;

    print!("{}", render::result(&result, "Evaluated Sequence"));
    maybe_export(&result, export, &loaded, config)
}

fn load_matrix(source: &MatrixSource, config: &Config, cache: &MatrixCache) -> Result<LoadedMatrix> {
    let (path, work_center, output_dir) = match (&source.work_center, &source.matrix) {
        (Some(name), _) => {
            let wc = workcenter::find(&config.data.dir, &config.data.matrix_stem, name)
                .context("Failed to locate work center")?;
            (wc.matrix_path, Some(wc.name), wc.dir)
        }
        (None, Some(path)) => {
            let dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (path.clone(), None, dir)
        }
        (None, None) => eyre::bail!("Either --work-center or --matrix is required"),
    };

    info!("Loading matrix from {}", path.display());
    let matrix = cache
        .load(&path)
        .context(format!("Failed to load matrix from {}", path.display()))?;

    Ok(LoadedMatrix {
        matrix,
        work_center,
        output_dir,
    })
}

fn maybe_export(
    result: &OptimizationResult,
    args: &ExportArgs,
    loaded: &LoadedMatrix,
    config: &Config,
) -> Result<()> {
    if !args.export {
        return Ok(());
    }

    let format: ExportFormat = args.format.unwrap_or(config.export.format);
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| export::default_output(&loaded.output_dir, &config.export.file_stem, format));

    let written = export::write_result(result, format, &path, loaded.work_center.as_deref())
        .context(format!("Failed to export results to {}", path.display()))?;
    info!("Exported results ({}) to {}", format, written.display());
    println!("{} {}", "Results written to:".green(), written.display());
    Ok(())
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}

use anyhow::{Context, Result};
use buildlens::cli::{Cli, Command, OutputFormat};
use buildlens::config::AnalysisConfig;
use buildlens::engine::SuggestionEngine;
use buildlens::header_split::HeaderSplitter;
use buildlens::pch::PchOptimizer;
use buildlens::symbols::{SourceSymbolInspector, StaticSymbolInspector, SymbolInspector};
use buildlens::templates::TemplateAnalyzer;
use buildlens::trace::BuildTrace;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn run_suggest(
    trace_path: &Path,
    config_path: Option<&Path>,
    source_root: Option<PathBuf>,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let trace = BuildTrace::from_json_file(trace_path)?;
    let mut config = match config_path {
        Some(path) => AnalysisConfig::from_toml(path)?,
        None => AnalysisConfig::default(),
    };
    if seed.is_some() {
        config.header_split.seed = seed;
    }

    // Without a source tree no header has known symbols, so no split is proposed
    let inspector: Arc<dyn SymbolInspector> = match source_root {
        Some(root) => Arc::new(SourceSymbolInspector::new(root)),
        None => Arc::new(StaticSymbolInspector::new()),
    };
    let splitter = HeaderSplitter::with_config(inspector, config.header_split.clone());
    let engine = SuggestionEngine::new(splitter);

    let suggestions = engine
        .generate_all_suggestions(&trace, &config.suggestions)
        .context("Suggestion generation failed")?;

    match format {
        OutputFormat::Json => print_json(&suggestions)?,
        OutputFormat::Text => {
            if suggestions.is_empty() {
                println!("No suggestions above the configured thresholds.");
            }
            for (i, suggestion) in suggestions.iter().enumerate() {
                println!("{}. {}", i + 1, suggestion.to_report_string());
            }
        }
    }
    Ok(())
}

fn run_pch(
    trace_path: &Path,
    current: &[String],
    top: usize,
    min_ratio: f64,
    format: OutputFormat,
) -> Result<()> {
    if !(0.0..=1.0).contains(&min_ratio) {
        anyhow::bail!("Invalid value for --min-ratio: {} (must be in [0, 1])", min_ratio);
    }

    let trace = BuildTrace::from_json_file(trace_path)?;
    let plan = PchOptimizer::new(top, min_ratio).optimize(&trace, &trace.dependency_graph, current);

    match format {
        OutputFormat::Json => print_json(&plan)?,
        OutputFormat::Text => {
            print!("{}", plan.to_report_string());
            println!();
            print!("{}", plan.pch_source);
        }
    }
    Ok(())
}

fn run_templates(trace_path: &Path, top: usize, threshold: f64, format: OutputFormat) -> Result<()> {
    let trace = BuildTrace::from_json_file(trace_path)?;
    let analyzer = TemplateAnalyzer::new();
    let hotspots = analyzer.find_expensive_templates(&trace, top, threshold);

    match format {
        OutputFormat::Json => print_json(&hotspots)?,
        OutputFormat::Text => {
            if hotspots.is_empty() {
                println!("No template instantiations above {:.1} ms.", threshold);
            }
            for (i, hotspot) in hotspots.iter().enumerate() {
                println!("{:>3}. {}", i + 1, hotspot.to_report_string());
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    match args.command {
        Command::Suggest {
            trace,
            config,
            source_root,
            seed,
            format,
        } => run_suggest(&trace, config.as_deref(), source_root, seed, format),
        Command::Pch {
            trace,
            current,
            top,
            min_ratio,
            format,
        } => run_pch(&trace, &current, top, min_ratio, format),
        Command::Templates {
            trace,
            top,
            threshold,
            format,
        } => run_templates(&trace, top, threshold, format),
    }
}

//! Synthscan - human-made vs AI-generated image classification.
//!
//! This crate classifies local images and images behind Instagram post
//! links with a binary ONNX model.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod imaging;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod resolver;

use clap::Parser;
use cli::{ClassifyArgs, Cli, Command};
use config::{
    Config, config_file_path, load_default_config, resolve_model_path, save_default_config,
    staging_root, validate_config,
};
use futures_util::StreamExt;
use inference::OnnxClassifier;
use output::{HumanReporter, JsonReporter, ResultReporter, progress};
use pipeline::{Pipeline, collect_input_files};
use resolver::{InstagramClient, PostResolver};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub use error::{Error, Result};

/// Spinner message shown while an image is analyzed.
const ANALYZING_MESSAGE: &str = "Analyzing image...";

/// Main entry point for synthscan CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.classify.verbose, cli.classify.quiet);

    let mut config = load_default_config()?;
    apply_overrides(&mut config, &cli.classify);
    validate_config(&config)?;

    if let Some(command) = cli.command {
        return handle_command(command, &cli.classify, &config);
    }

    if cli.inputs.is_empty() {
        cli::help::print_smart_help(&config);
        return Ok(());
    }

    classify_files(&cli.inputs, &cli.classify, &config)
}

/// Apply command-line overrides on top of file configuration.
fn apply_overrides(config: &mut Config, args: &ClassifyArgs) {
    if let Some(threads) = args.intra_threads {
        config.model.intra_threads = Some(threads);
    }
    if let Some(darken) = args.darken_override() {
        config.preprocessing.darken = darken;
    }
    if let Some(filter) = args.resize_filter {
        config.preprocessing.resize_filter = filter;
    }
    if let Some(retrieval) = args.retrieval {
        config.resolver.retrieval = retrieval;
    }
    if let Some(dir) = &args.staging_dir {
        config.resolver.staging_dir = Some(dir.clone());
    }
    if let Some(concurrency) = args.concurrency {
        config.resolver.concurrency = usize::from(concurrency);
    }
}

/// Load the model and build the shared pipeline.
///
/// Fails before any input is touched when the model cannot be loaded.
fn build_pipeline(config: &Config, args: &ClassifyArgs) -> Result<Pipeline> {
    let model_path = resolve_model_path(config, args.model.as_deref())?;
    info!("Loading model: {}", model_path.display());

    let classifier = OnnxClassifier::load(&model_path, config.model.intra_threads)?;

    info!(
        "Preprocessing: darken={}, resize filter={:?}",
        config.preprocessing.darken, config.preprocessing.resize_filter
    );

    Ok(Pipeline::new(
        Arc::new(classifier),
        config.preprocessing,
        config.limits.max_image_bytes,
    ))
}

/// Build the pipeline. In JSON mode a failure is reported against every
/// pending input.
fn build_pipeline_for<'a>(
    config: &Config,
    args: &ClassifyArgs,
    reporter: &dyn ResultReporter,
    pending: impl IntoIterator<Item = &'a str>,
) -> Result<Pipeline> {
    build_pipeline(config, args).inspect_err(|e| {
        if args.json {
            for source in pending {
                reporter.failure(source, e);
            }
        }
    })
}

fn make_reporter(args: &ClassifyArgs) -> Box<dyn ResultReporter> {
    if args.json {
        Box::new(JsonReporter::new(args.include_image))
    } else {
        Box::new(HumanReporter::new())
    }
}

/// Classify local image files.
fn classify_files(inputs: &[PathBuf], args: &ClassifyArgs, config: &Config) -> Result<()> {
    let total_start = Instant::now();

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidImageFiles);
    }

    info!("Found {} image file(s) to classify", files.len());

    let reporter = make_reporter(args);
    let sources: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
    let pipeline =
        build_pipeline_for(config, args, reporter.as_ref(), sources.iter().map(String::as_str))?;

    let interactive = !args.quiet && !args.json;
    let file_progress = progress::create_input_progress(files.len(), interactive);

    let mut classified = 0;
    let mut failed = 0;

    for (file, source) in files.iter().zip(&sources) {
        let spinner = if file_progress.is_none() {
            progress::create_spinner(ANALYZING_MESSAGE, interactive)
        } else {
            None
        };

        let outcome = std::fs::read(file)
            .map_err(Error::from)
            .and_then(|bytes| pipeline.classify_upload(&bytes).map(|result| (result, bytes)));

        progress::clear_progress(spinner.as_ref());

        match outcome {
            Ok((result, bytes)) => {
                classified += 1;
                progress::suspend(file_progress.as_ref(), || {
                    reporter.file_result(file, &bytes, &result);
                });
            }
            Err(e) => {
                failed += 1;
                progress::suspend(file_progress.as_ref(), || {
                    reporter.failure(source, &e);
                });
                if args.fail_fast {
                    progress::clear_progress(file_progress.as_ref());
                    return Err(e);
                }
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::clear_progress(file_progress.as_ref());

    info!(
        "Complete: {} classified, {} failed in {:.2}s",
        classified,
        failed,
        total_start.elapsed().as_secs_f64()
    );

    if failed > 0 {
        warn!("{} file(s) had errors", failed);
        return Err(Error::ClassificationFailures {
            failed,
            total: files.len(),
        });
    }

    Ok(())
}

/// Classify the images behind post links.
fn classify_links(links: &[String], args: &ClassifyArgs, config: &Config) -> Result<()> {
    let total_start = Instant::now();

    let reporter = make_reporter(args);
    let pipeline =
        build_pipeline_for(config, args, reporter.as_ref(), links.iter().map(String::as_str))?;
    let client = InstagramClient::new(&config.resolver, config.limits.max_image_bytes)?;
    let resolver = PostResolver::new(
        client,
        config.resolver.retrieval,
        staging_root(&config.resolver),
    );
    let interactive = !args.quiet && !args.json;

    let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
        message: format!("Failed to create async runtime: {e}"),
    })?;

    let (classified, failed) = runtime.block_on(async {
        let spinner = progress::create_spinner(ANALYZING_MESSAGE, interactive);

        let mut outcomes = futures_util::stream::iter(links)
            .map(|link| {
                let pipeline = &pipeline;
                let resolver = &resolver;
                async move { (link, pipeline.classify_from_url(resolver, link).await) }
            })
            .buffered(config.resolver.concurrency);

        let mut classified = 0;
        let mut failed = 0;

        while let Some((link, outcome)) = outcomes.next().await {
            match outcome {
                Ok(classification) => {
                    classified += 1;
                    progress::suspend(spinner.as_ref(), || {
                        reporter.post_result(link, &classification);
                    });
                }
                Err(e) => {
                    failed += 1;
                    progress::suspend(spinner.as_ref(), || reporter.failure(link, &e));
                    if args.fail_fast {
                        progress::clear_progress(spinner.as_ref());
                        return Err(e);
                    }
                }
            }
        }

        progress::clear_progress(spinner.as_ref());
        Ok((classified, failed))
    })?;

    info!(
        "Complete: {} post(s) classified, {} failed in {:.2}s",
        classified,
        failed,
        total_start.elapsed().as_secs_f64()
    );

    if failed > 0 {
        return Err(Error::ClassificationFailures {
            failed,
            total: links.len(),
        });
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT is silent by default; -v and up lets its own logging through.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // stdout carries results only.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command, args: &ClassifyArgs, config: &Config) -> Result<()> {
    match command {
        Command::Url { links } => classify_links(&links, args, config),
        Command::Config { action } => handle_config_command(action),
        Command::Model { action } => handle_model_command(action, args, config),
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  Set model.path in the file, then run: synthscan model check");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{rendered}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

#[allow(clippy::print_stdout)]
fn handle_model_command(
    action: cli::ModelAction,
    args: &ClassifyArgs,
    config: &Config,
) -> Result<()> {
    use cli::ModelAction;

    match action {
        ModelAction::Check => {
            let path = resolve_model_path(config, args.model.as_deref())?;
            let classifier = OnnxClassifier::load(&path, config.model.intra_threads)?;
            println!("  {}: OK", classifier.path().display());
            Ok(())
        }
    }
}

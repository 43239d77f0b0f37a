#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # konet
//! ## Introduction
//!
//! Command-line tooling for the KoNET benchmark. `konet generate` downloads
//! the Korean national exam source PDFs, rasterizes their pages, cuts out
//! one image per question, and assembles `dataset.json`. `konet evaluate`
//! grades a submission file against that dataset and prints per-category
//! accuracy.
//!
//! ## Credentials
//!
//! The API judge reads `OPENAI_KEY` (and optionally `OPENAI_BASE_URL`) from
//! the environment or a `.env` file. The default rules judge needs neither.

use std::path::PathBuf;

use anyhow::Result;
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use konet::{
    config::JudgeConfig,
    dataset::Dataset,
    eval::{self, EvalOptions, JudgeMode, submission::Submission},
    fetch,
    generate::{self, GenerateOptions},
    paths::DatasetPaths,
    render,
};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Arguments of the `generate` command.
#[derive(Debug, Clone)]
struct GenerateArgs {
    /// Workspace root.
    data_dir: PathBuf,
    /// Source manifest override.
    sources:  Option<PathBuf>,
    /// Region manifest override.
    regions:  Option<PathBuf>,
    /// Label manifest override.
    labels:   Option<PathBuf>,
    /// Rasterization zoom factor.
    zoom:     f32,
    /// Concurrent downloads.
    workers:  usize,
}

/// Arguments of the `evaluate` command.
#[derive(Debug, Clone)]
struct EvaluateArgs {
    /// Submission file to grade.
    submission: PathBuf,
    /// Workspace root.
    data_dir:   PathBuf,
    /// Dataset file override.
    dataset:    Option<PathBuf>,
    /// Which comparator grades answers.
    judge:      JudgeMode,
    /// Judge model override.
    model:      Option<String>,
    /// Where per-question judgements are written.
    output:     PathBuf,
    /// Suppress the category table.
    no_table:   bool,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Build the benchmark dataset.
    Generate(GenerateArgs),
    /// Grade a submission against it.
    Evaluate(EvaluateArgs),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the workspace root flag
    fn data_dir() -> impl Parser<PathBuf> {
        long("data-dir")
            .help("Root of the benchmark data workspace")
            .argument::<PathBuf>("DIR")
            .fallback(PathBuf::from("data"))
    }

    /// parses the submission file path
    fn submission() -> impl Parser<PathBuf> {
        positional::<PathBuf>("SUBMISSION").help("Submission JSON file to grade")
    }

    let generate = {
        let sources = long("sources")
            .help("Source manifest (defaults to <data-dir>/manifests/sources.json)")
            .argument::<PathBuf>("FILE")
            .optional();
        let regions = long("regions")
            .help("Region manifest (defaults to <data-dir>/manifests/regions.json)")
            .argument::<PathBuf>("FILE")
            .optional();
        let labels = long("labels")
            .help("Label manifest (defaults to <data-dir>/manifests/labels.json)")
            .argument::<PathBuf>("FILE")
            .optional();
        let zoom = long("zoom")
            .help("Page rasterization zoom factor")
            .argument::<f32>("ZOOM")
            .fallback(render::DEFAULT_ZOOM);
        let workers = long("workers")
            .help("Number of downloads in flight at once")
            .argument::<usize>("N")
            .fallback(fetch::DEFAULT_WORKERS);

        construct!(GenerateArgs {
            data_dir(),
            sources,
            regions,
            labels,
            zoom,
            workers
        })
        .to_options()
        .command("generate")
        .help("Download exam sources and assemble the benchmark dataset")
        .map(Cmd::Generate)
    };

    let evaluate = {
        let dataset = long("dataset")
            .help("Dataset file (defaults to <data-dir>/dataset.json)")
            .argument::<PathBuf>("FILE")
            .optional();
        let judge = long("judge")
            .help("Comparator for answers: rules or api")
            .argument::<JudgeMode>("MODE")
            .fallback(JudgeMode::Rules);
        let model = long("model")
            .help("Judge model identifier (api mode only)")
            .argument::<String>("MODEL")
            .optional();
        let output = long("output")
            .help("Where to write per-question judgements")
            .argument::<PathBuf>("FILE")
            .fallback(PathBuf::from("evaluation_output.json"));
        let no_table = long("no-table").help("Skip the category table").switch();

        construct!(EvaluateArgs {
            submission(),
            data_dir(),
            dataset,
            judge,
            model,
            output,
            no_table
        })
        .to_options()
        .command("evaluate")
        .help("Grade a submission file and print per-category accuracy")
        .map(Cmd::Evaluate)
    };

    let cmd = construct!([generate, evaluate]);

    cmd.to_options()
        .descr("Generator and evaluator for the KoNET benchmark")
        .run()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match options() {
        Cmd::Generate(args) => {
            let paths = DatasetPaths::new(args.data_dir);
            let options = GenerateOptions::builder()
                .paths(paths)
                .sources(args.sources)
                .regions(args.regions)
                .labels(args.labels)
                .zoom(args.zoom)
                .workers(args.workers)
                .build();

            let dataset = generate::generate(&options).await?;

            println!(
                "{} {} questions ready.",
                "Generation complete:".green(),
                dataset.len()
            );
        }
        Cmd::Evaluate(args) => {
            let paths = DatasetPaths::new(args.data_dir);
            let dataset_file = args.dataset.unwrap_or_else(|| paths.dataset_file());
            let dataset = Dataset::load(&dataset_file)?;
            let submission = Submission::load(&args.submission)?;

            let judge = match args.judge {
                JudgeMode::Api => Some(JudgeConfig::from_env(args.model)?),
                JudgeMode::Rules => None,
            };
            let options = EvalOptions::builder()
                .output(args.output)
                .mode(args.judge)
                .judge(judge)
                .build();

            let report = eval::evaluate(&dataset, &submission, &paths, &options).await?;

            if !args.no_table {
                eprintln!("{}", report.table());
            }
            println!("{}", report.render());
        }
    };

    Ok(())
}

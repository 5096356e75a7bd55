//! Command implementations for the comment-risk CLI.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::dataset::csv::{CsvCommentReader, CsvCommentWriter, training_examples};
use crate::dataset::labeler::LabeledDataset;
use crate::pipeline::{EvaluationOutcome, Pipeline, PipelineConfig};

/// Execute a CLI command.
pub fn execute_command(args: RiskArgs) -> Result<()> {
    let pipeline = build_pipeline(&args)?;

    match &args.command {
        Command::Score(score_args) => score_text(score_args, &pipeline, &args),
        Command::Label(label_args) => label_file(label_args, &pipeline, &args),
        Command::Train(train_args) => train_file(train_args, &pipeline, &args),
        Command::Run(run_args) => run_file(run_args, &pipeline, &args),
    }
}

/// Load the configuration and vocabulary named on the command line.
fn build_pipeline(args: &RiskArgs) -> Result<Pipeline> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(vocabulary) = &args.vocabulary {
        config.vocabulary = Some(vocabulary.clone());
    }

    let vocabulary_source = config
        .vocabulary
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in keywords".to_string());

    Pipeline::new(config)
        .with_context(|| format!("failed to load vocabulary from {vocabulary_source}"))
}

/// Score a single text.
fn score_text(args: &ScoreArgs, pipeline: &Pipeline, cli_args: &RiskArgs) -> Result<()> {
    let result = pipeline.labeler().scorer().score_text(&args.text);

    output_result(
        "Scored text",
        &ScoreOutput {
            text: args.text.clone(),
            result,
        },
        cli_args,
    )?;

    Ok(())
}

/// Label a CSV file and write the labeled copy.
fn label_file(args: &LabelArgs, pipeline: &Pipeline, cli_args: &RiskArgs) -> Result<()> {
    let labeled = read_and_label(&args.input, pipeline)?;
    let output = write_labeled(&args.input, &args.output, &labeled)?;

    output_result("Comments labeled", &output, cli_args)?;
    Ok(())
}

/// Train and evaluate on an already labeled CSV file.
fn train_file(args: &TrainArgs, pipeline: &Pipeline, cli_args: &RiskArgs) -> Result<()> {
    let dataset = CsvCommentReader::new()
        .read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let config = pipeline.config();
    let examples = training_examples(&dataset, &config.text_column, &config.label_column)
        .with_context(|| format!("failed to extract training examples from {}", args.input.display()))?;

    let outcome = pipeline
        .train_and_evaluate(&examples)
        .context("training failed")?;
    let output = save_report(&args.report_file, outcome)?;

    output_result("Classifier trained", &output, cli_args)?;
    Ok(())
}

/// Label a CSV file, save it, then train and evaluate on the labels.
fn run_file(args: &RunArgs, pipeline: &Pipeline, cli_args: &RiskArgs) -> Result<()> {
    let dataset = CsvCommentReader::new()
        .read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let outcome = pipeline
        .run(&dataset)
        .with_context(|| format!("failed to label {}", args.input.display()))?;

    // Labels are saved before training results are inspected
    let labeling = write_labeled(&args.input, &args.output, &outcome.labeled)?;

    let (training, training_error) = match outcome.evaluation {
        Ok(evaluation) => (Some(save_report(&args.report_file, evaluation)?), None),
        Err(e) => (None, Some(e.to_string())),
    };

    output_result(
        "Pipeline finished",
        &RunOutput {
            labeling,
            training,
            training_error,
        },
        cli_args,
    )?;

    Ok(())
}

fn read_and_label(input: &Path, pipeline: &Pipeline) -> Result<LabeledDataset> {
    let dataset = CsvCommentReader::new()
        .read(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    pipeline
        .label(&dataset)
        .with_context(|| format!("failed to label {}", input.display()))
}

fn write_labeled(input: &Path, output: &Path, labeled: &LabeledDataset) -> Result<LabelOutput> {
    CsvCommentWriter::new()
        .write(output, labeled)
        .with_context(|| format!("failed to write {}", output.display()))?;

    Ok(LabelOutput {
        input: input.display().to_string(),
        output: output.display().to_string(),
        records: labeled.len(),
        tier_counts: labeled.tier_counts(),
    })
}

fn save_report(path: &Path, outcome: EvaluationOutcome) -> Result<TrainOutput> {
    std::fs::write(path, outcome.report.to_string())
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    log::info!("Saved classification report to {}", path.display());

    Ok(TrainOutput {
        report_file: path.display().to_string(),
        train_size: outcome.train_size,
        test_size: outcome.test_size,
        vocabulary_size: outcome.metadata.n_features,
        iterations: outcome.stats.iterations,
        converged: outcome.stats.converged,
        training_time_ms: outcome.stats.training_time_ms,
        warnings: outcome.warnings,
        report: outcome.report,
    })
}

//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cli::args::{OutputFormat, RiskArgs};
use crate::error::Result;
use crate::ml::metrics::ClassificationReport;
use crate::scoring::scorer::ScoringResult;
use crate::scoring::tier::Tier;

/// Result structure for scoring a single text.
#[derive(Debug, Serialize)]
pub struct ScoreOutput {
    pub text: String,
    #[serde(flatten)]
    pub result: ScoringResult,
}

/// Result structure for labeling a file.
#[derive(Debug, Serialize)]
pub struct LabelOutput {
    pub input: String,
    pub output: String,
    pub records: usize,
    pub tier_counts: BTreeMap<Tier, usize>,
}

/// Result structure for training and evaluation.
#[derive(Debug, Serialize)]
pub struct TrainOutput {
    pub report_file: String,
    pub train_size: usize,
    pub test_size: usize,
    pub vocabulary_size: usize,
    pub iterations: usize,
    pub converged: bool,
    pub training_time_ms: u64,
    pub warnings: Vec<String>,
    pub report: ClassificationReport,
}

/// Result structure for the full pipeline.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub labeling: LabelOutput,
    pub training: Option<TrainOutput>,
    pub training_error: Option<String>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    /// Lines printed in human mode.
    fn human_lines(&self) -> Vec<String>;
}

impl HumanOutput for ScoreOutput {
    fn human_lines(&self) -> Vec<String> {
        vec![
            format!("Score: {}", self.result.score),
            format!("Status Level: {}", self.result.tier),
            format!("Triggered Keywords: {}", self.result.evidence_string()),
        ]
    }
}

impl HumanOutput for LabelOutput {
    fn human_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Labeled {} comments from {} into {}",
            self.records, self.input, self.output
        )];
        for (tier, count) in &self.tier_counts {
            lines.push(format!("  {:<12}{count}", tier.as_str()));
        }
        lines
    }
}

impl HumanOutput for TrainOutput {
    fn human_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Trained on {} comments ({} features), evaluated on {}",
            self.train_size, self.vocabulary_size, self.test_size
        )];
        for warning in &self.warnings {
            lines.push(format!("Warning: {warning}"));
        }
        lines.push(String::new());
        lines.push("Classification Report:".to_string());
        lines.extend(self.report.to_string().lines().map(str::to_string));
        lines.push(format!("Report saved to {}", self.report_file));
        lines
    }
}

impl HumanOutput for RunOutput {
    fn human_lines(&self) -> Vec<String> {
        let mut lines = self.labeling.human_lines();
        lines.push(String::new());
        match (&self.training, &self.training_error) {
            (Some(training), _) => lines.extend(training.human_lines()),
            (None, Some(error)) => lines.push(format!("Training skipped: {error}")),
            (None, None) => {}
        }
        lines
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &RiskArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(message: &str, result: &T, args: &RiskArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }
    for line in result.human_lines() {
        println!("{line}");
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &RiskArgs) -> Result<()> {
    println!("{}", to_json(result, args.pretty)?);
    Ok(())
}

fn to_json<T: Serialize>(result: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_output() {
        let output = ScoreOutput {
            text: "Please don't kill me".to_string(),
            result: ScoringResult {
                score: 6,
                tier: Tier::Suspicious,
                evidence: vec!["kill".to_string(), "please".to_string()],
            },
        };

        assert_eq!(
            output.human_lines(),
            vec![
                "Score: 6",
                "Status Level: Suspicious",
                "Triggered Keywords: kill, please"
            ]
        );

        let json: serde_json::Value =
            serde_json::from_str(&to_json(&output, false).unwrap()).unwrap();
        assert_eq!(json["score"], 6);
        assert_eq!(json["tier"], "Suspicious");
        assert_eq!(json["evidence"][1], "please");
    }

    #[test]
    fn test_label_output_lists_every_tier() {
        let output = LabelOutput {
            input: "in.csv".to_string(),
            output: "out.csv".to_string(),
            records: 3,
            tier_counts: Tier::ALL.iter().map(|t| (*t, 1)).collect(),
        };

        let lines = output.human_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("Safe"));
        assert!(lines[3].contains("Dangerous"));
    }

    #[test]
    fn test_run_output_with_training_error() {
        let output = RunOutput {
            labeling: LabelOutput {
                input: "in.csv".to_string(),
                output: "out.csv".to_string(),
                records: 1,
                tier_counts: BTreeMap::new(),
            },
            training: None,
            training_error: Some("not enough tiers".to_string()),
        };

        let lines = output.human_lines();
        assert_eq!(lines.last().unwrap(), "Training skipped: not enough tiers");
    }
}

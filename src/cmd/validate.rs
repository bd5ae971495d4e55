//! Validate command - check parameters are complete for a period without computing anything

use crate::cmd::read_parameters;
use clap::Args;
use fisco::core::{ParameterError, Period, Variable};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// JSON parameter file (defaults to the built-in parameters)
    #[arg(short, long)]
    parameters: Option<PathBuf>,

    /// Period to check (YYYY checks every month of the year for monthly variables)
    #[arg(short = 'P', long)]
    period: Period,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    variable: &'static str,
    #[serde(rename = "type")]
    issue_type: &'static str,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    period: String,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let parameters = read_parameters(self.parameters.as_deref())?;

        let issues: Vec<ValidationIssue> = Variable::ALL
            .into_iter()
            .flat_map(|variable| {
                variable
                    .check_parameters(&parameters, self.period)
                    .into_iter()
                    .map(move |err| ValidationIssue {
                        variable: variable.name(),
                        issue_type: issue_type_name(&err),
                        message: describe(&err),
                    })
            })
            .collect();

        if self.json {
            self.print_json(&issues)?;
        } else {
            self.print_text(&issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue]) {
        println!();
        println!("VALIDATION RESULTS ({})", self.period);
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
        } else {
            println!("\u{26A0} {} issue(s) found:", issues.len());
            println!();

            for (i, issue) in issues.iter().enumerate() {
                println!("  {}. [{}] {}", i + 1, issue.issue_type, issue.variable);
                println!("     {}", issue.message);
                println!();
            }
        }
    }

    fn print_json(&self, issues: &[ValidationIssue]) -> anyhow::Result<()> {
        let output = ValidationOutput {
            period: self.period.to_string(),
            issue_count: issues.len(),
            issues: issues.to_vec(),
        };

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn issue_type_name(err: &ParameterError) -> &'static str {
    match err {
        ParameterError::NotFound { .. } => "MissingParameter",
        ParameterError::UnexpectedKind { .. } => "WrongKind",
        ParameterError::InvalidPeriod { .. } => "InvalidPeriod",
        ParameterError::InvalidScale { .. } => "InvalidScale",
    }
}

fn describe(err: &ParameterError) -> String {
    match err {
        ParameterError::InvalidScale { source, .. } => format!("{err}: {source}"),
        _ => err.to_string(),
    }
}

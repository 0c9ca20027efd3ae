//! Prediction commands

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{print_error, print_rows, print_success, truncate, OutputFormat};

/// Longest question shown in a table cell
const QUESTION_COLUMN_CHARS: usize = 60;

/// Row for the predictions table
#[derive(Tabled, Serialize)]
struct PredictionRow {
    #[tabled(rename = "Question")]
    question: String,
    #[tabled(rename = "Skill")]
    skill_tested: String,
}

/// Classify each question in turn
///
/// Every question is sent even if an earlier one fails; the command fails
/// if any of them did.
pub async fn predict(client: &ApiClient, questions: &[String], format: OutputFormat) -> Result<()> {
    let mut rows = Vec::with_capacity(questions.len());
    let mut failures = 0;

    for question in questions {
        match client.predict(question).await {
            Ok(skill_tested) => rows.push(PredictionRow {
                question: question.clone(),
                skill_tested,
            }),
            Err(e) => {
                failures += 1;
                print_error(&format!("{}: {:#}", truncate(question, QUESTION_COLUMN_CHARS), e));
            }
        }
    }

    match format {
        OutputFormat::Json => print_rows(&rows, format)?,
        OutputFormat::Table if rows.len() == 1 && questions.len() == 1 => {
            print_success(&format!("Skill tested: {}", rows[0].skill_tested.cyan().bold()));
        }
        OutputFormat::Table => {
            let display: Vec<PredictionRow> = rows
                .iter()
                .map(|row| PredictionRow {
                    question: truncate(&row.question, QUESTION_COLUMN_CHARS),
                    skill_tested: row.skill_tested.clone(),
                })
                .collect();
            print_rows(&display, format)?;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} predictions failed", failures, questions.len());
    }

    Ok(())
}

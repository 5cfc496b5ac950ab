use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::{DigestOutcome, DigestResult, ErrorResult};

/// Name of the downloadable result for an input file: `<stem>_digest.json`
pub fn digest_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("transcript");
    format!("{}_digest.json", stem)
}

/// Path of the downloadable result, next to the input file
pub fn digest_path_for(input: &Path) -> PathBuf {
    input.with_file_name(digest_file_name(input))
}

/// Write either outcome shape as pretty JSON
pub fn write_outcome(path: &Path, outcome: &DigestOutcome) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, outcome).context("Failed to write JSON")?;
    Ok(())
}

/// Human-readable rendering of an outcome for the terminal
pub struct HumanDigest<'a> {
    outcome: &'a DigestOutcome,
}

impl<'a> HumanDigest<'a> {
    pub fn new(outcome: &'a DigestOutcome) -> Self {
        Self { outcome }
    }

    pub fn format(&self) -> String {
        match self.outcome {
            DigestOutcome::Digest(result) => format_digest(result),
            DigestOutcome::Failed(error) => format_error(error),
        }
    }
}

fn format_digest(result: &DigestResult) -> String {
    let mut output = String::from("Analysis complete\n");

    if result.has_insights() {
        output.push_str("\nKey Insights\n------------\n");
        for (i, insight) in result.insights().iter().enumerate() {
            output.push_str(&format!(
                "{}. {} [{}, confidence {}]\n",
                i + 1,
                insight.description,
                insight.impact_level.label(),
                insight.confidence_score
            ));
            if !insight.reasoning.is_empty() {
                output.push_str(&format!("   Why: {}\n", insight.reasoning));
            }
        }
    }

    if result.has_quotes() {
        output.push_str("\nKey Quotes\n----------\n");
        for quote in result.quotes() {
            output.push_str(&format!("[{}] \"{}\"\n", quote.timestamp, quote.quote));
            if !quote.context.is_empty() {
                output.push_str(&format!("   Context: {}\n", quote.context));
            }
        }
    }

    output
}

fn format_error(error: &ErrorResult) -> String {
    let mut output = format!("Error: {}\n", error.error);

    if let Some(status) = error.status {
        output.push_str(&format!("Status: {}\n", status));
    }
    if let Some(details) = &error.details {
        output.push_str(&format!("Details:\n{}\n", details));
    }
    if let Some(exception) = &error.exception {
        output.push_str(&format!("Exception: {}\n", exception));
    }
    if let Some(raw) = &error.raw_excerpt {
        output.push_str(&format!("Raw reply:\n{}\n", raw));
    }
    if let Some(sanitized) = &error.sanitized_excerpt {
        output.push_str(&format!("Sanitized attempt:\n{}\n", sanitized));
    }
    if let Some(payload) = &error.raw_response {
        let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        output.push_str(&format!("Raw response:\n{}\n", pretty));
    }

    output
}

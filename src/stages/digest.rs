use anyhow::Result;
use serde_json::Value;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::llm::{build_digest_prompt, AnthropicClient};
use crate::models::{DigestError, DigestOutcome};
use crate::stages::{extract_reply_text, parse_reply, rank_digest};

/// Run one analysis: build the prompt, call the model once, then parse and rank.
///
/// Every expected failure comes back as [`DigestOutcome::Failed`]. Only
/// transport failures other than a timeout are returned as `Err`.
pub async fn analyze(client: &AnthropicClient, transcript: &str) -> Result<DigestOutcome> {
    let analysis_id = Uuid::new_v4();
    let span = info_span!("analysis", id = %analysis_id);

    async move {
        info!("Analyzing transcript ({} chars)", transcript.len());
        let prompt = build_digest_prompt(transcript);

        let payload = match client.complete(&prompt).await {
            Ok(payload) => payload,
            Err(DigestError::Transport(source)) => {
                return Err(anyhow::Error::new(source)
                    .context("Failed to send request to Anthropic API"));
            }
            Err(err) => {
                warn!("Completion failed: {}", err);
                return Ok(DigestOutcome::Failed(err.into()));
            }
        };

        let outcome = build_outcome(&payload);
        match &outcome {
            DigestOutcome::Digest(result) => info!(
                "Digest ready: {} insights, {} quotes",
                result.insights().len(),
                result.quotes().len()
            ),
            DigestOutcome::Failed(error) => warn!("Digest failed: {:?}", error.kind),
        }
        Ok(outcome)
    }
    .instrument(span)
    .await
}

/// Turn a provider payload into the final outcome. Pure; no I/O.
pub fn build_outcome(payload: &Value) -> DigestOutcome {
    let parsed = extract_reply_text(payload).and_then(parse_reply);

    match parsed {
        Ok(object) => DigestOutcome::Digest(rank_digest(object)),
        Err(err) => DigestOutcome::Failed(err.into()),
    }
}

pub mod io;
pub mod llm;
pub mod models;
pub mod stages;

pub use io::{digest_file_name, digest_path_for, read_transcript, write_outcome, HumanDigest};
pub use llm::{build_digest_prompt, AnthropicClient, AnthropicConfig, CompletionRequest};
pub use models::{
    DigestError, DigestOutcome, DigestResult, ErrorKind, ErrorResult, ImpactLevel, Insight, Quote,
};
pub use stages::{analyze, build_outcome, parse_reply, rank_digest, sanitize_reply};

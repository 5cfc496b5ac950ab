use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use transcript_digest::{
    analyze, build_digest_prompt, digest_path_for, read_transcript, write_outcome,
    AnthropicClient, AnthropicConfig, HumanDigest,
};

#[derive(Parser)]
#[command(name = "transcript-digest")]
#[command(author, version, about = "Extract SME insights and quotes from founder conversations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a transcript and print ranked insights and quotes
    Analyze {
        /// Transcript file (.txt or .md)
        #[arg(short, long)]
        input: PathBuf,

        /// Write the result JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the result JSON next to the input as <name>_digest.json
        #[arg(long, conflicts_with = "output")]
        save: bool,

        /// Print the raw result JSON instead of the formatted view
        #[arg(long)]
        json: bool,

        /// Print the transcript before analyzing it
        #[arg(long)]
        preview: bool,

        /// API key (defaults to the ANTHROPIC_API_KEY environment variable)
        #[arg(long)]
        api_key: Option<String>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
        timeout_secs: u64,

        /// Maximum tokens in the model's reply
        #[arg(long, default_value = "4096")]
        max_tokens: u32,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the prompt that would be sent for a transcript
    Prompt {
        /// Transcript file (.txt or .md)
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            save,
            json,
            preview,
            api_key,
            model,
            timeout_secs,
            max_tokens,
            verbose,
        } => {
            setup_logging(verbose);

            let mut config = AnthropicConfig::from_env();
            if api_key.is_some() {
                config.api_key = api_key;
            }
            if let Some(model) = model {
                config.model = model;
            }
            config.timeout = Duration::from_secs(timeout_secs);
            config.max_tokens = max_tokens;

            let output = output.or_else(|| save.then(|| digest_path_for(&input)));
            analyze_transcript(input, output, json, preview, config).await
        }
        Commands::Prompt { input } => {
            let transcript =
                read_transcript(&input).context("Failed to read input transcript")?;
            print!("{}", build_digest_prompt(&transcript));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder().with_writer(std::io::stderr);

    if std::env::var_os("RUST_LOG").is_some() {
        let subscriber = builder.with_env_filter(EnvFilter::from_default_env()).finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = builder.with_max_level(level).finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

async fn analyze_transcript(
    input: PathBuf,
    output: Option<PathBuf>,
    json: bool,
    preview: bool,
    config: AnthropicConfig,
) -> Result<ExitCode> {
    info!("Loading transcript from {:?}", input);
    let transcript = read_transcript(&input).context("Failed to read input transcript")?;

    if preview {
        println!("Transcript Preview");
        println!("==================");
        println!("{}", transcript);
        println!();
    }

    let client = AnthropicClient::new(config);
    let outcome = analyze(&client, &transcript).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize result")?
        );
    } else {
        print!("{}", HumanDigest::new(&outcome).format());
    }

    if let Some(path) = output {
        write_outcome(&path, &outcome)?;
        info!("Result written to {:?}", path);
    }

    Ok(if outcome.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

// SPDX-License-Identifier: MIT

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;

use textlens_rs::textlens::document::{read_input_file, PdfTextReader};
use textlens_rs::textlens::sample::SAMPLE_TEXT;
use textlens_rs::textlens::server::{self, AppState};
use textlens_rs::textlens::steps::PromptProfile;
use textlens_rs::textlens::{Analyzer, AnalyzerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify, extract entities from and summarize a text
    Analyze {
        /// PDF or plain-text file to analyze (defaults to the built-in sample)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelArgs,
    },
    /// Start the PDF upload UI
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8501)]
        port: u16,

        #[command(flatten)]
        model: ModelArgs,
    },
}

#[derive(clap::Args, Debug)]
struct ModelArgs {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model name, e.g. gpt-4o or claude-3-5-sonnet-latest
    #[arg(short, long)]
    model: Option<String>,

    /// OpenAI or Anthropic (inferred from the model name when omitted)
    #[arg(long)]
    provider: Option<String>,
}

impl ModelArgs {
    /// File config, then command-line overrides, then the environment
    fn load(&self, default_profile: PromptProfile) -> anyhow::Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => AnalyzerConfig {
                profile: default_profile,
                ..AnalyzerConfig::default()
            },
        };

        if let Some(model) = &self.model {
            config.model_name = Some(model.clone());
        }
        if let Some(provider) = &self.provider {
            config.provider = Some(provider.clone());
        }

        Ok(config.with_process_env())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Analyze { file, json, model } => {
            let config = model.load(PromptProfile::Sample)?;
            let analyzer = Analyzer::from_config(&config)?;

            let text = match &file {
                Some(path) => {
                    log::info!("Reading input from {}", path.display());
                    read_input_file(path, &PdfTextReader::new())
                        .with_context(|| format!("Failed to read {}", path.display()))?
                }
                None => SAMPLE_TEXT.to_string(),
            };

            let report = analyzer.analyze(&text).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.to_text());
            }
        }
        Commands::Serve { port, model } => {
            let config = model.load(PromptProfile::Document)?;
            // A missing API key stops here, before the listener binds
            let analyzer = Analyzer::from_config(&config)?;

            let state = AppState::new(analyzer, Arc::new(PdfTextReader::new()));
            server::serve(state, port)
                .await
                .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;
        }
    }

    Ok(())
}

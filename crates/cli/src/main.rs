use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use career_shot_core::{codec, config::Config, gemini::GeminiClient, init, ui};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Photo to generate from (required with --output)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Profession to depict (required with --output)
    #[arg(short, long)]
    profession: Option<String>,

    /// Generate once without the UI and write the resulting PNG here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the model defined in .env
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load config and override model if specified via CLI
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(m) = args.model {
        config.model_name = m;
    }

    // Headless mode: one generate call, PNG written to disk
    if let Some(output) = args.output {
        let image_path = args.image.context("--output requires --image")?;
        let profession = args.profession.context("--output requires --profession")?;

        let uploaded = codec::encode_file(&image_path)
            .with_context(|| format!("Failed to read {}", image_path.display()))?;
        if !uploaded.is_image() {
            bail!("{} does not look like an image file", image_path.display());
        }

        println!("Generating career photo with {}...", config.model_name);
        let client = GeminiClient::new(&config);
        let payload = client
            .generate(&uploaded.payload, &uploaded.mime_type, &profession)
            .await?;

        let bytes = codec::decode_payload(&payload)?;
        std::fs::write(&output, bytes)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("Saved {}", output.display());
        return Ok(());
    }

    // Default: launch the desktop application
    ui::run_app(config)?;
    Ok(())
}

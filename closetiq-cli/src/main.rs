use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use closetiq_ai::{AiClient, GeminiProvider};
use closetiq_common::models::{ClothingType, ItemId, Occasion};
use closetiq_common::traits::KeyValueStore;
use closetiq_core::services::{OutfitGenerator, SelectionMode, UploadService};
use closetiq_core::{AppConfig, FileKeyValueStore, InMemoryKeyValueStore, WardrobeStore};

mod render;

#[derive(Parser, Debug)]
#[command(name = "closetiq")]
#[command(author, version, about = "ClosetIQ - track your wardrobe and get outfit suggestions")]
struct Args {
    /// Directory holding the wardrobe file (overrides CLOSETIQ_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Gemini API key (overrides GEMINI_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Keep the wardrobe in memory only; nothing is read or written on disk
    #[arg(long, global = true, default_value = "false")]
    ephemeral: bool,

    /// Debug-level logging for closetiq crates
    #[arg(long, short = 'v', global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every item in the wardrobe
    List,

    /// Add a photo of a clothing item
    Add {
        /// Image file to upload
        image: PathBuf,

        #[arg(long = "type", value_parser = parse_type)]
        kind: Option<ClothingType>,

        #[arg(long, value_parser = parse_occasion)]
        occasion: Option<Occasion>,

        /// Ask the AI to fill in type and occasion you left out
        #[arg(long, default_value = "false")]
        analyze: bool,
    },

    /// Remove an item by id
    Remove { id: String },

    /// Suggest an outfit for an occasion
    Outfit {
        #[arg(value_parser = parse_occasion)]
        occasion: Occasion,

        /// Let the AI pick instead of choosing at random
        #[arg(long, default_value = "false")]
        ai: bool,

        /// Seed for the random pick, for repeatable results
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Classify an image without adding it
    Analyze { image: PathBuf },
}

fn parse_type(s: &str) -> Result<ClothingType, String> {
    s.parse().map_err(|e: closetiq_common::Error| e.to_string())
}

fn parse_occasion(s: &str) -> Result<Occasion, String> {
    s.parse().map_err(|e: closetiq_common::Error| e.to_string())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "closetiq=debug" } else { "closetiq=info" };
    let filter = EnvFilter::from_default_env().add_directive(level.parse().unwrap_or_default());
    let sub = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(sub).expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = AppConfig::from_env()
        .with_api_key(args.api_key.clone())
        .with_data_dir(args.data_dir.clone());
    debug!("Data directory: {}", config.data_dir.display());

    let result = if args.ephemeral {
        run(args.command, &config, InMemoryKeyValueStore::new()).await
    } else {
        run(args.command, &config, FileKeyValueStore::new(config.data_dir.clone())).await
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run<S: KeyValueStore>(
    command: Command,
    config: &AppConfig,
    backend: S,
) -> anyhow::Result<String> {
    let mut wardrobe = WardrobeStore::open(backend).await?;
    info!("Loaded {} wardrobe items", wardrobe.len());

    let ai_client = Arc::new(AiClient::new(Arc::new(GeminiProvider::new(config.gemini()))));

    let output = match command {
        Command::List => render::render_wardrobe(wardrobe.items()),

        Command::Add {
            image,
            kind,
            occasion,
            analyze,
        } => {
            let uploads = UploadService::new(Some(ai_client));
            let prepared = uploads.prepare(&image, kind, occasion, analyze).await?;

            let mut lines = Vec::new();
            if let Some(error) = &prepared.ai_error {
                lines.push(format!("AI analysis failed: {}", error));
            }
            if let Some(suggestion) = &prepared.suggestion {
                lines.push(render::render_suggestion(suggestion));
            }
            let item = wardrobe.add(prepared.candidate).await?;
            lines.push("Item added to wardrobe successfully!".to_string());
            lines.push(render::render_item(&item));
            lines.join("\n")
        }

        Command::Remove { id } => {
            let id = ItemId::from(id.as_str());
            match wardrobe.remove(&id).await? {
                Some(item) => format!("Removed {}", render::render_item(&item)),
                None => format!("No item with id {}", id),
            }
        }

        Command::Outfit { occasion, ai, seed } => {
            let generator = OutfitGenerator::new(Some(ai_client));
            let mode = if ai { SelectionMode::Ai } else { SelectionMode::Local };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let outfit = generator
                .generate(wardrobe.items(), occasion, mode, &mut rng)
                .await?;
            render::render_outfit(&outfit)
        }

        Command::Analyze { image } => {
            let uploads = UploadService::new(Some(ai_client));
            let suggestion = uploads.analyze(&image).await?;
            render::render_suggestion(&suggestion)
        }
    };

    Ok(output)
}

use anki_tts_backfill::domain::audio::AudioFormat;
use anki_tts_backfill::domain::batch::{BatchReport, BatchService, BatchServiceApi};
use anki_tts_backfill::error::AppError;
use anki_tts_backfill::infrastructure::config::{Config, LogFormat, TtsProvider};
use anki_tts_backfill::infrastructure::http::http_client;
use anki_tts_backfill::infrastructure::repositories::{
    AnkiConnectRepository, FsMediaRepository, OpenAiTtsRepository, PollyTtsRepository,
    TtsRepository,
};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Generate Swedish TTS audio for Anki cards that are missing it
#[derive(Parser, Debug)]
#[command(name = "anki-tts-backfill", version, long_about = None)]
struct Cli {
    /// Run in test mode (process only the first card)
    #[arg(long)]
    test: bool,

    /// Only process cards from this deck (overrides DECK_NAME)
    #[arg(long)]
    deck: Option<String>,

    /// Verbose output and diagnostics when no cards are found
    #[arg(long)]
    debug: bool,
}

const TROUBLESHOOTING: &[&str] = &[
    "Anki is running with the AnkiConnect add-on enabled",
    "The OpenAI API key (or AWS credentials) is valid",
    "ANKI_MEDIA_PATH points at your profile's collection.media directory",
];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => apply_cli(config, &cli),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    init_logging(&config);

    match run(config).await {
        Ok(report) => println!("\nCompleted! {}", report),
        Err(e) => {
            tracing::error!(error = %e, "Run aborted");
            eprintln!("Error: {}", e);
            eprintln!("Make sure:");
            for (index, hint) in TROUBLESHOOTING.iter().enumerate() {
                eprintln!("{}. {}", index + 1, hint);
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn apply_cli(mut config: Config, cli: &Cli) -> Config {
    config.test_mode |= cli.test;
    config.debug_mode |= cli.debug;
    if let Some(deck) = &cli.deck {
        config.deck_name = Some(deck.clone());
    }
    config
}

async fn run(config: Config) -> Result<BatchReport, AppError> {
    tracing::info!(
        anki_connect_url = %config.anki_connect_url,
        media_path = %config.media_path.display(),
        deck = config.deck_name.as_deref().unwrap_or("all decks"),
        provider = ?config.tts_provider,
        test_mode = config.test_mode,
        "Starting Anki TTS backfill"
    );

    if config.voice.format == AudioFormat::Pcm {
        tracing::warn!(
            "TTS_FORMAT=pcm: raw samples are saved with a .wav extension but without a WAV header"
        );
    }

    let client = http_client(config.http_timeout_secs)?;

    let card_repo = Arc::new(AnkiConnectRepository::new(
        client.clone(),
        config.anki_connect_url.clone(),
    ));
    let media_repo = Arc::new(FsMediaRepository::new(config.media_path.clone()));
    let tts_repo = build_tts_repository(&config, client).await?;

    let service = BatchService::new(card_repo, tts_repo, media_repo, config.batch_options());
    let report = service.run().await?;

    Ok(report)
}

async fn build_tts_repository(
    config: &Config,
    client: reqwest::Client,
) -> Result<Arc<dyn TtsRepository>, AppError> {
    match config.tts_provider {
        TtsProvider::OpenAi => {
            let api_key = config
                .openai_api_key
                .clone()
                .ok_or_else(|| AppError::Config("OPENAI_API_KEY is not set".to_string()))?;
            tracing::info!(model = %config.voice.model, voice = %config.voice.voice, "Using OpenAI TTS");
            let repo: Arc<dyn TtsRepository> = Arc::new(OpenAiTtsRepository::new(
                client,
                config.openai_base_url.clone(),
                api_key,
            ));
            Ok(repo)
        }
        TtsProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;

            let polly_client = aws_sdk_polly::Client::new(&aws_config);
            tracing::info!(voice = %config.voice.voice, "Using AWS Polly TTS");
            let repo: Arc<dyn TtsRepository> =
                Arc::new(PollyTtsRepository::new(Arc::new(polly_client)));
            Ok(repo)
        }
    }
}

fn init_logging(config: &Config) {
    let default_filter = if config.debug_mode {
        "anki_tts_backfill=debug"
    } else {
        "anki_tts_backfill=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

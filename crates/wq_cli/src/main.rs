use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use wq_core::{ArticleSource, QuizStorage};
use wq_inference::{BackendKind, Synthesizer};
use wq_scrappers::{handle_command, ExtractArgs, ExtractorConfig, QuizPipeline, WikipediaScraper};
use wq_storage::{StorageConfig, StorageKind};
use wq_web::{AppState, CorsConfig};

mod duration;
mod logging;

use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn encyclopedia articles into multiple-choice quizzes", long_about = None)]
struct Cli {
    /// Storage backend: sqlite, or memory (nothing survives the process)
    #[arg(long, env = "WQ_STORAGE", default_value = "sqlite", global = true)]
    storage: StorageKind,

    /// Database location for the sqlite backend [default: sqlite://quizzes.db]
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Generative backend: none, openai, gemini, ollama
    #[arg(long, env = "WQ_BACKEND", default_value = "none", global = true)]
    backend: BackendKind,

    #[arg(long, env = "WQ_MODEL", global = true)]
    model: Option<String>,

    #[arg(long, env = "WQ_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Overrides the backend endpoint
    #[arg(long, env = "WQ_MODEL_URL", global = true)]
    model_url: Option<String>,

    /// Article fetch timeout (e.g. 20s, 1m)
    #[arg(long, default_value = "20s", global = true)]
    fetch_timeout: HumanDuration,

    /// Generative model call timeout
    #[arg(long, default_value = "60s", global = true)]
    model_timeout: HumanDuration,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the title and paragraphs of an article
    Extract(ExtractArgs),
    /// Generate, store and print a quiz for an article
    Generate { url: String },
    /// List stored quizzes, newest first
    History,
    /// Print a stored quiz
    Show { id: String },
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "WQ_ADDR", default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
        /// Comma separated origins, or * for any
        #[arg(long, env = "ALLOWED_ORIGINS", default_value = wq_web::cors::DEFAULT_ALLOWED_ORIGINS)]
        allowed_origins: String,
    },
}

impl Cli {
    fn storage_config(&self) -> StorageConfig {
        let config = StorageConfig::new(self.storage);
        match &self.database_url {
            Some(url) => config.with_url(url.clone()),
            None => config,
        }
    }

    fn inference_config(&self) -> wq_inference::Config {
        wq_inference::Config {
            backend: self.backend,
            api_key: self.api_key.clone(),
            model_name: self.model.clone(),
            model_url: self.model_url.clone(),
            timeout: self.model_timeout.0,
            ..wq_inference::Config::default()
        }
    }

    fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::default().with_timeout(self.fetch_timeout.0)
    }
}

async fn run(cli: Cli, storage: Arc<dyn QuizStorage>) -> anyhow::Result<()> {
    let scraper = Arc::new(WikipediaScraper::with_config(&cli.extractor_config())?);
    let inference_config = cli.inference_config();
    let pipeline = || {
        let synthesizer = Synthesizer::from_config(&inference_config);
        match synthesizer.backend_name() {
            Some(name) => info!("🤖 Generative backend: {}", name),
            None => info!("🤖 No generative backend, quizzes come from the placeholder generator"),
        }
        let source: Arc<dyn ArticleSource> = scraper.clone();
        QuizPipeline::new(source, Arc::new(synthesizer), storage.clone())
    };

    match cli.command {
        Commands::Extract(args) => {
            handle_command(args, scraper.as_ref()).await?;
        }
        Commands::Generate { url } => {
            let stored = pipeline().generate(&url).await?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        Commands::History => {
            let summaries = storage.list().await?;
            if summaries.is_empty() {
                println!("No quizzes yet.");
            }
            for quiz in summaries {
                println!(
                    "{}  {}  {}  {}",
                    quiz.id,
                    quiz.date_generated.format("%Y-%m-%d %H:%M"),
                    quiz.title,
                    quiz.url
                );
            }
        }
        Commands::Show { id } => {
            let stored = storage
                .get(&id)
                .await?
                .with_context(|| format!("Quiz not found: {}", id))?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        Commands::Serve {
            addr,
            allowed_origins,
        } => {
            let cors = CorsConfig::from_list(&allowed_origins);
            let app = wq_web::create_app(AppState::new(pipeline()), &cors);
            wq_web::serve(addr, app).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let storage_config = cli.storage_config();
    let storage = wq_storage::open_storage(&storage_config)
        .await
        .with_context(|| format!("Failed to open {} storage", storage_config.kind))?;
    info!("💾 Storage ready (using {})", storage_config.kind);

    let result = run(cli, storage.clone()).await;

    if let Err(e) = storage.close().await {
        tracing::warn!("⚠️ Failed to close storage: {}", e);
    }
    result
}

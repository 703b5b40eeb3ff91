pub mod cli;
pub mod manager;
pub mod scrapers;

pub use cli::{handle_command, ExtractArgs};
pub use manager::QuizPipeline;
pub use scrapers::{ExtractorConfig, WikipediaScraper};

pub mod prelude {
    pub use super::manager::QuizPipeline;
    pub use super::scrapers::{ExtractorConfig, WikipediaScraper};
    pub use wq_core::{ArticleSource, ArticleText, Error, FetchError, Result};
}

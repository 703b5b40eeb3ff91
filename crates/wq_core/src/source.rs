use async_trait::async_trait;

use crate::types::ArticleText;
use crate::Result;

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch the page at `url` and return its title and body text.
    ///
    /// Fails only with `Error::Fetch` or `Error::EmptyContent`.
    async fn fetch_article(&self, url: &str) -> Result<ArticleText>;
}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Node, Selector};
use wq_core::{ArticleSource, ArticleText, Error, FetchError, Result};

use super::utils::{collapse_whitespace, parse_url, selector};
use super::ExtractorConfig;

/// Inline elements whose text never belongs in the article body.
/// `sup` carries footnote markers like `[12]`.
const SKIPPED_ELEMENTS: &[&str] = &["sup", "style", "script"];

struct Selectors {
    first_heading: Selector,
    title: Selector,
    content_text: Selector,
    parser_output: Selector,
    paragraph: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            first_heading: selector("#firstHeading")?,
            title: selector("title")?,
            content_text: selector("#mw-content-text")?,
            parser_output: selector(".mw-parser-output")?,
            paragraph: selector("p")?,
        })
    }
}

/// Extractor for MediaWiki article pages.
pub struct WikipediaScraper {
    client: Client,
    selectors: Selectors,
}

impl WikipediaScraper {
    pub fn new() -> Result<Self> {
        Self::with_config(&ExtractorConfig::default())
    }

    pub fn with_config(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            client: config.build_client()?,
            selectors: Selectors::new()?,
        })
    }

    /// Fetch `url` and extract its title and body paragraphs.
    pub async fn extract(&self, url: &str) -> Result<ArticleText> {
        let html = self.fetch_html(url).await?;
        self.extract_from_html(url, &html)
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let parsed = parse_url(url)?;
        tracing::debug!("Fetching {}", parsed);

        let response = self.client.get(parsed).send().await.map_err(FetchError::Transport)?;
        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(FetchError::Blocked { url: url.to_string(), status: status.as_u16() }.into());
        }
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() }.into());
        }
        Ok(response.text().await.map_err(FetchError::Transport)?)
    }

    /// Like `parse_article`, but an article without body text is an error.
    pub fn extract_from_html(&self, url: &str, html: &str) -> Result<ArticleText> {
        let article = self.parse_article(html);
        if article.body.is_empty() {
            return Err(Error::EmptyContent { url: url.to_string() });
        }
        Ok(article)
    }

    /// Pure extraction step: same HTML in, same article out.
    pub fn parse_article(&self, html: &str) -> ArticleText {
        let document = Html::parse_document(html);
        ArticleText {
            title: self.title(&document),
            body: self.body(&document),
        }
    }

    fn title(&self, document: &Html) -> String {
        let heading = document
            .select(&self.selectors.first_heading)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty());

        heading
            .or_else(|| {
                document
                    .select(&self.selectors.title)
                    .next()
                    .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            })
            .unwrap_or_default()
    }

    fn body(&self, document: &Html) -> String {
        let Some(content) = document
            .select(&self.selectors.content_text)
            .next()
            .or_else(|| document.select(&self.selectors.parser_output).next())
        else {
            return String::new();
        };

        content
            .select(&self.selectors.paragraph)
            .map(paragraph_text)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[async_trait]
impl ArticleSource for WikipediaScraper {
    async fn fetch_article(&self, url: &str) -> Result<ArticleText> {
        self.extract(url).await
    }
}

fn paragraph_text(paragraph: ElementRef<'_>) -> String {
    let mut text = String::new();
    push_text(paragraph, &mut text);
    collapse_whitespace(&text)
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(el) if el.name() == "br" => out.push(' '),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_text(child, out);
                }
            }
            _ => {}
        }
    }
}

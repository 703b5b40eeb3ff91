use clap::Args;
use wq_core::{ArticleSource, ArticleText, Result};

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Article URL, e.g. https://en.wikipedia.org/wiki/Rust_(programming_language)
    pub url: String,

    /// Print the extracted article as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn render(article: &ArticleText, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(article)?);
    }
    Ok(format!("# {}\n\n{}", article.title, article.body))
}

pub async fn handle_command(args: ExtractArgs, source: &dyn ArticleSource) -> Result<()> {
    let article = source.fetch_article(&args.url).await?;
    println!("{}", render(&article, args.json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> ArticleText {
        ArticleText {
            title: "Example".to_string(),
            body: "Paragraph one.\n\nParagraph two.".to_string(),
        }
    }

    #[test]
    fn test_render_text() {
        assert_eq!(render(&article(), false).unwrap(), "# Example\n\nParagraph one.\n\nParagraph two.");
    }

    #[test]
    fn test_render_json() {
        let value: serde_json::Value = serde_json::from_str(&render(&article(), true).unwrap()).unwrap();
        assert_eq!(value["title"], "Example");
        assert_eq!(value["body"], "Paragraph one.\n\nParagraph two.");
    }
}

use wq_core::Prompt;

/// Article prefix sent to the model, in characters.
pub const DEFAULT_MAX_ARTICLE_CHARS: usize = 15_000;

const SYSTEM_PROMPT: &str = "You are an assistant that writes quiz questions from an encyclopedia article. \
Given the article title and the article text, produce a single JSON object with exactly these keys:\n\
- title (string)\n\
- key_entities (object with three lists of strings: people, organizations, locations)\n\
- sections (list of the article's section titles)\n\
- related_topics (list of strings naming topics for further reading)\n\
- quiz (list of question objects)\n\
Produce between 7 and 8 quiz questions (aim for 8). Each question must be an object with: \
question (string), options (array of 3-5 distinct strings), answer (exactly one of the options, copied verbatim), \
difficulty (easy|medium|hard), explanation (string, grounded in the article text).\n\
Respond with only valid JSON that matches the described shape. Do not include any extra commentary.";

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn build_prompt(title: &str, article_text: &str, max_article_chars: usize) -> Prompt {
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: format!(
            "TITLE:\n{}\n\nARTICLE:\n{}\n\nReturn JSON only.",
            title,
            truncate_chars(article_text, max_article_chars)
        ),
    }
}

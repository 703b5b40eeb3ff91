use serde_json::{Map, Value};
use thiserror::Error;
use wq_core::types::MAX_QUESTIONS;
use wq_core::{Completion, KeyEntities, QuizQuestion, QuizRecord};

/// Quiz content before it is tied to an article.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizDraft {
    pub key_entities: KeyEntities,
    pub sections: Vec<String>,
    pub quiz: Vec<QuizQuestion>,
    pub related_topics: Vec<String>,
}

impl QuizDraft {
    pub fn into_record(self, title: &str, full_text: &str) -> QuizRecord {
        QuizRecord {
            url: String::new(),
            title: title.to_string(),
            full_text: full_text.to_string(),
            key_entities: self.key_entities,
            sections: self.sections,
            quiz: self.quiz,
            related_topics: self.related_topics,
        }
    }
}

/// Why the generative path gave up. Never leaves the synthesizer.
#[derive(Error, Debug)]
pub enum SynthesisFailure {
    #[error("no generative backend configured")]
    Unavailable,

    #[error("backend call failed: {0}")]
    Backend(#[from] wq_core::Error),

    #[error("backend did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("response has no 'quiz' key")]
    MissingQuiz,

    #[error("'quiz' is not a list")]
    QuizNotArray,

    #[error("none of the {0} generated questions passed validation")]
    NoValidQuestions(usize),
}

/// Models like to wrap JSON in a Markdown fence even when told not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // drop the info string (`json`) on the opening line
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn key_entities(value: Option<&Value>) -> KeyEntities {
    let object = value.and_then(Value::as_object);
    KeyEntities {
        people: string_list(object.and_then(|o| o.get("people"))),
        organizations: string_list(object.and_then(|o| o.get("organizations"))),
        locations: string_list(object.and_then(|o| o.get("locations"))),
    }
}

fn validate_questions(items: &[Value]) -> Vec<QuizQuestion> {
    let mut valid = Vec::with_capacity(items.len().min(MAX_QUESTIONS));
    for (i, item) in items.iter().enumerate() {
        match QuizQuestion::from_value(item.clone()) {
            Ok(question) => valid.push(question),
            Err(e) => tracing::warn!("Question {} failed validation: {}", i + 1, e),
        }
    }
    if valid.len() > MAX_QUESTIONS {
        tracing::debug!("Keeping the first {} of {} valid questions", MAX_QUESTIONS, valid.len());
        valid.truncate(MAX_QUESTIONS);
    }
    valid
}

fn parse_object(object: &Map<String, Value>) -> Result<QuizDraft, SynthesisFailure> {
    let items = object
        .get("quiz")
        .ok_or(SynthesisFailure::MissingQuiz)?
        .as_array()
        .ok_or(SynthesisFailure::QuizNotArray)?;

    let quiz = validate_questions(items);
    if quiz.is_empty() {
        return Err(SynthesisFailure::NoValidQuestions(items.len()));
    }

    Ok(QuizDraft {
        key_entities: key_entities(object.get("key_entities")),
        sections: string_list(object.get("sections")),
        quiz,
        related_topics: string_list(object.get("related_topics")),
    })
}

/// Turn a backend answer into a draft, dropping invalid questions one by one.
pub fn parse_completion(completion: Completion) -> Result<QuizDraft, SynthesisFailure> {
    let value = match completion {
        Completion::Structured(value) => value,
        Completion::Text(text) => serde_json::from_str(strip_code_fence(&text))?,
    };
    match &value {
        Value::Object(object) => parse_object(object),
        _ => Err(SynthesisFailure::NotAnObject),
    }
}

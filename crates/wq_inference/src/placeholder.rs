//! Deterministic stand-in quiz used whenever generation is unavailable.
//!
//! The content is generic on purpose: it keeps the pipeline usable without a
//! model, not informative.

use wq_core::{Difficulty, KeyEntities, QuizQuestion};

use crate::response::QuizDraft;

fn question(text: String, options: [&str; 4], answer: &str, difficulty: Difficulty, explanation: &str) -> QuizQuestion {
    QuizQuestion {
        question: text,
        options: options.iter().map(|o| o.to_string()).collect(),
        answer: answer.to_string(),
        difficulty,
        explanation: explanation.to_string(),
    }
}

/// Always exactly eight questions, each satisfying the question invariants.
pub fn placeholder_quiz(title: &str, _article_text: &str) -> QuizDraft {
    // the title is the first answer, so it must be a usable, distinct option
    let subject = if title.trim().is_empty() { "Untitled article" } else { title };

    let mut options = vec![subject.to_string()];
    options.extend(
        ["Something else", "Another topic", "None of the above", "A different subject"]
            .into_iter()
            .filter(|d| *d != subject)
            .take(3)
            .map(str::to_string),
    );

    let quiz = vec![
        QuizQuestion {
            question: format!("What is the main subject of the article '{}'?", subject),
            options,
            answer: subject.to_string(),
            difficulty: Difficulty::Easy,
            explanation: "The article title names the main subject.".to_string(),
        },
        question(
            "Which of the following is mentioned in the article?".to_string(),
            ["A mentioned fact", "Not mentioned", "Unknown", "Irrelevant"],
            "A mentioned fact",
            Difficulty::Medium,
            "Placeholder: a generated quiz would ground this in the article text.",
        ),
        question(
            "Which period is most closely associated with the topic?".to_string(),
            ["Early 1900s", "Mid 20th century", "Late 20th century", "21st century"],
            "Mid 20th century",
            Difficulty::Medium,
            "Placeholder: temporal context referenced in the article.",
        ),
        question(
            "Which of these would be considered a key term related to the article?".to_string(),
            ["Key term A", "Key term B", "Key term C", "Key term D"],
            "Key term A",
            Difficulty::Easy,
            "Placeholder key term used for demonstration.",
        ),
        question(
            "Which region is primarily discussed in the article?".to_string(),
            ["Global", "Region A", "Region B", "Local"],
            "Global",
            Difficulty::Medium,
            "Placeholder: the article often addresses a broad or global context.",
        ),
        question(
            "What is a common application or use-case mentioned?".to_string(),
            ["Application A", "Application B", "Application C", "Application D"],
            "Application A",
            Difficulty::Medium,
            "Placeholder application used as an example.",
        ),
        question(
            "Which of the following is an important subtopic?".to_string(),
            ["Subtopic 1", "Subtopic 2", "Subtopic 3", "Subtopic 4"],
            "Subtopic 1",
            Difficulty::Hard,
            "Placeholder subtopic for depth.",
        ),
        question(
            "Which statement best summarizes a likely conclusion from the article?".to_string(),
            ["Conclusion A", "Conclusion B", "Conclusion C", "Conclusion D"],
            "Conclusion A",
            Difficulty::Hard,
            "Placeholder summary of the conclusion.",
        ),
    ];

    QuizDraft {
        key_entities: KeyEntities::default(),
        sections: Vec::new(),
        quiz,
        related_topics: vec!["Related topic 1".to_string(), "Related topic 2".to_string()],
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::QuestionId;

/// Every quiz question carries exactly four options.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,

    #[error("expected {OPTION_COUNT} options, found {found}")]
    WrongOptionCount { found: usize },

    #[error("correct option index {index} is out of range")]
    CorrectIndexOutOfRange { index: usize },
}

/// Subject category a question belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Math,
    Reading,
    Writing,
    #[default]
    General,
}

impl Category {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Category::Math => "MATH",
            Category::Reading => "READING",
            Category::Writing => "WRITING",
            Category::General => "GENERAL",
        }
    }

    /// Lenient parse for wire payloads; unknown categories map to `General`.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "math" => Category::Math,
            "reading" => Category::Reading,
            "writing" => Category::Writing,
            _ => Category::General,
        }
    }
}

/// A quiz question, either fetched from the backend or taken from the
/// builtin bank when no session is available. Consumed once per encounter,
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct: usize,
    category: Category,
    points: u32,
    time_limit_secs: u32,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text is empty, the option count is
    /// not exactly four, or the correct index does not address an option.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct: usize,
        category: Category,
        points: u32,
        time_limit_secs: u32,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount {
                found: options.len(),
            });
        }
        if correct >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange { index: correct });
        }

        Ok(Self {
            id,
            text,
            options,
            correct,
            category,
            points,
            time_limit_secs,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    /// Whether the given selection answers this question correctly. A `None`
    /// selection models a timeout and is always wrong.
    #[must_use]
    pub fn is_correct(&self, selected: Option<usize>) -> bool {
        selected == Some(self.correct)
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct
    }
}

/// Offline question bank used when the backend is unreachable or no session
/// exists. Intentionally small; the backend carries the real bank.
#[must_use]
pub fn builtin_bank() -> Vec<Question> {
    const DEFAULT_TIME_LIMIT: u32 = 30;
    const DEFAULT_POINTS: u32 = 10;

    let raw: [(&str, &str, [&str; 4], usize); 5] = [
        (
            "local_1",
            "What is the capital of France?",
            ["Paris", "London", "Berlin", "Madrid"],
            0,
        ),
        (
            "local_2",
            "What is 15% of 200?",
            ["20", "25", "30", "35"],
            2,
        ),
        (
            "local_3",
            "Which word is a synonym of 'rapid'?",
            ["Slow", "Swift", "Late", "Calm"],
            1,
        ),
        (
            "local_4",
            "If 2x + 4 = 12, what is x?",
            ["2", "3", "4", "6"],
            1,
        ),
        (
            "local_5",
            "Which sentence is grammatically correct?",
            [
                "Them went home.",
                "They goes home.",
                "They went home.",
                "They gone home.",
            ],
            2,
        ),
    ];

    raw.into_iter()
        .map(|(id, text, options, correct)| {
            Question::new(
                QuestionId::new(id),
                text,
                options.into_iter().map(String::from).collect(),
                correct,
                Category::General,
                DEFAULT_POINTS,
                DEFAULT_TIME_LIMIT,
            )
            .expect("builtin questions are well formed")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn builds_a_valid_question() {
        let q = Question::new(
            QuestionId::new("q1"),
            "2 + 2?",
            options(4),
            1,
            Category::Math,
            15,
            30,
        )
        .unwrap();
        assert!(q.is_correct(Some(1)));
        assert!(!q.is_correct(Some(0)));
        assert!(!q.is_correct(None));
    }

    #[test]
    fn rejects_wrong_option_count() {
        let err = Question::new(
            QuestionId::new("q1"),
            "2 + 2?",
            options(3),
            0,
            Category::Math,
            10,
            30,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::WrongOptionCount { found: 3 });
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = Question::new(
            QuestionId::new("q1"),
            "2 + 2?",
            options(4),
            4,
            Category::Math,
            10,
            30,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::CorrectIndexOutOfRange { index: 4 });
    }

    #[test]
    fn rejects_empty_text() {
        let err = Question::new(
            QuestionId::new("q1"),
            "   ",
            options(4),
            0,
            Category::Math,
            10,
            30,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn builtin_bank_is_well_formed() {
        let bank = builtin_bank();
        assert!(!bank.is_empty());
        for q in &bank {
            assert_eq!(q.options().len(), OPTION_COUNT);
            assert!(q.correct_index() < OPTION_COUNT);
            assert!(q.points() > 0);
        }
    }

    #[test]
    fn unknown_category_maps_to_general() {
        assert_eq!(Category::from_wire("science"), Category::General);
        assert_eq!(Category::from_wire("math"), Category::Math);
    }
}

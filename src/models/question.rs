// src/models/question.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single answer value, either the index of the chosen option or the option text.
///
/// Comparison is exact: `Index(1)` never equals `Text("1")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Index(i64),
    Text(String),
}

/// One entry of a round's question file (`round<N>.json`).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Question {
    /// The text shown to participants.
    #[validate(length(min = 1, max = 1000))]
    pub question: String,

    /// Options in display order.
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,

    /// The correct answer key, compared against submissions by value.
    pub answer: AnswerValue,
}

impl Question {
    /// Whether `answer` points at one of `options`.
    pub fn answer_is_listed(&self) -> bool {
        match &self.answer {
            AnswerValue::Index(i) => usize::try_from(*i).is_ok_and(|i| i < self.options.len()),
            AnswerValue::Text(text) => self.options.iter().any(|o| o == text),
        }
    }
}

/// DTO for sending a question to participants (excludes the answer).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub question: String,
    pub options: Vec<String>,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        PublicQuestion {
            question: q.question.clone(),
            options: q.options.clone(),
        }
    }
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.is_empty() {
        return Err(validator::ValidationError::new("options_cannot_be_empty"));
    }
    for opt in options {
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

/// Answers as submitted by a client.
///
/// Either an array aligned with the question list (`null` for unanswered) or an
/// object keyed by question index (`{"0": "4", "2": "Jupiter"}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubmittedAnswers {
    List(Vec<Option<AnswerValue>>),
    Indexed(HashMap<String, Option<AnswerValue>>),
}

impl Default for SubmittedAnswers {
    fn default() -> Self {
        SubmittedAnswers::List(Vec::new())
    }
}

impl SubmittedAnswers {
    /// Normalises into one slot per question. Answers past `question_count` are dropped.
    pub fn into_slots(self, question_count: usize) -> Result<Vec<Option<AnswerValue>>, String> {
        let mut slots = vec![None; question_count];
        match self {
            SubmittedAnswers::List(list) => {
                for (slot, answer) in slots.iter_mut().zip(list) {
                    *slot = answer;
                }
            }
            SubmittedAnswers::Indexed(map) => {
                for (key, answer) in map {
                    // Canonical keys only; "0", "00" and " 0" must not collide in one slot.
                    let index = key
                        .parse::<usize>()
                        .ok()
                        .filter(|index| index.to_string() == key)
                        .ok_or_else(|| format!("Invalid answer index '{}'", key))?;
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = answer;
                    }
                }
            }
        }
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<AnswerValue> {
        Some(AnswerValue::Text(s.to_string()))
    }

    #[test]
    fn list_answers_keep_holes_and_pad() {
        let answers: SubmittedAnswers = serde_json::from_str(r#"["4", null]"#).unwrap();
        let slots = answers.into_slots(3).unwrap();
        assert_eq!(slots, vec![text("4"), None, None]);
    }

    #[test]
    fn indexed_answers_land_in_their_slot() {
        let answers: SubmittedAnswers =
            serde_json::from_str(r#"{"0": "4", "2": "Jupiter", "9": "ignored"}"#).unwrap();
        let slots = answers.into_slots(3).unwrap();
        assert_eq!(slots, vec![text("4"), None, text("Jupiter")]);
    }

    #[test]
    fn indexed_answers_reject_non_numeric_keys() {
        let answers: SubmittedAnswers = serde_json::from_str(r#"{"first": 1}"#).unwrap();
        assert!(answers.into_slots(3).is_err());
    }

    #[test]
    fn indexed_answers_reject_aliased_keys() {
        for body in [r#"{"0": "4", "00": "5"}"#, r#"{" 0": "4"}"#, r#"{"+1": "4"}"#] {
            let answers: SubmittedAnswers = serde_json::from_str(body).unwrap();
            assert!(answers.into_slots(2).is_err(), "{} should be rejected", body);
        }
    }

    #[test]
    fn indexed_answers_score_the_same_every_time() {
        let body = r#"{"1": "Paris", "0": "4", "2": null}"#;
        let first = serde_json::from_str::<SubmittedAnswers>(body).unwrap().into_slots(3).unwrap();
        for _ in 0..50 {
            let again = serde_json::from_str::<SubmittedAnswers>(body).unwrap().into_slots(3).unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn numbers_and_strings_stay_distinct() {
        let answers: SubmittedAnswers = serde_json::from_str(r#"[1, "1"]"#).unwrap();
        let slots = answers.into_slots(2).unwrap();
        assert_eq!(slots[0], Some(AnswerValue::Index(1)));
        assert_eq!(slots[1], text("1"));
        assert_ne!(slots[0], slots[1]);
    }

    #[test]
    fn answer_must_be_one_of_the_options() {
        let q = Question {
            question: "2 + 2?".to_string(),
            options: vec!["3".to_string(), "4".to_string()],
            answer: AnswerValue::Text("4".to_string()),
        };
        assert!(q.answer_is_listed());

        let by_index = Question { answer: AnswerValue::Index(2), ..q.clone() };
        assert!(!by_index.answer_is_listed());

        let negative = Question { answer: AnswerValue::Index(-1), ..q };
        assert!(!negative.answer_is_listed());
    }
}

// src/engine/question_bank.rs

use std::{collections::BTreeMap, fs, path::Path};

use validator::Validate;

use crate::{
    error::AppError,
    models::question::{PublicQuestion, Question},
    store::QuizStore,
};

/// Read-only question sets, one per round. Loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    rounds: BTreeMap<i32, Vec<Question>>,
}

impl QuestionBank {
    /// Loads every `round<N>.json` in `dir`, where `N >= 1`.
    ///
    /// Fails on unreadable or malformed files, on questions whose answer is not
    /// one of their options, and when no round file is found.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| {
            AppError::Internal(format!("Cannot read questions dir {}: {}", dir.display(), e))
        })?;

        let mut rounds = BTreeMap::new();
        for entry in entries {
            let path = entry
                .map_err(|e| AppError::Internal(e.to_string()))?
                .path();

            let Some(round) = round_from_file_name(&path) else {
                continue;
            };

            let raw = fs::read_to_string(&path)
                .map_err(|e| AppError::Internal(format!("{}: {}", path.display(), e)))?;
            let questions: Vec<Question> = serde_json::from_str(&raw)
                .map_err(|e| AppError::Internal(format!("{}: {}", path.display(), e)))?;

            check_questions(&questions)
                .map_err(|msg| AppError::Internal(format!("{}: {}", path.display(), msg)))?;

            tracing::info!("Loaded {} questions for round {}", questions.len(), round);
            rounds.insert(round, questions);
        }

        if rounds.is_empty() {
            return Err(AppError::Internal(format!(
                "No round<N>.json files in {}",
                dir.display()
            )));
        }

        Ok(Self { rounds })
    }

    pub fn is_valid_round(&self, round: i32) -> bool {
        self.rounds.contains_key(&round)
    }

    pub fn rounds(&self) -> impl Iterator<Item = i32> + '_ {
        self.rounds.keys().copied()
    }

    /// Full questions including answers. `None` for an unknown round.
    pub fn questions(&self, round: i32) -> Option<&[Question]> {
        self.rounds.get(&round).map(Vec::as_slice)
    }

    /// Questions with the answers stripped; empty for an unknown round.
    pub fn public_questions(&self, round: i32) -> Vec<PublicQuestion> {
        self.questions(round)
            .map(|qs| qs.iter().map(PublicQuestion::from).collect())
            .unwrap_or_default()
    }
}

fn round_from_file_name(path: &Path) -> Option<i32> {
    if path.extension()? != "json" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix("round")?
        .parse::<i32>()
        .ok()
        .filter(|round| *round >= 1)
}

fn check_questions(questions: &[Question]) -> Result<(), String> {
    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|e| format!("question {}: {}", index, e))?;
        if !question.answer_is_listed() {
            return Err(format!("question {}: answer is not one of the options", index));
        }
    }
    Ok(())
}

/// Questions for the round participants are currently in.
///
/// Read path: a storage failure or an unset round yields an empty list.
pub async fn current_questions(store: &dyn QuizStore, bank: &QuestionBank) -> Vec<PublicQuestion> {
    let round = match store.load_status().await {
        Ok(status) => status.current_round,
        Err(e) => {
            tracing::warn!("Failed to read quiz status for questions: {}", e);
            return Vec::new();
        }
    };

    bank.public_questions(round)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_number_comes_from_file_name() {
        assert_eq!(round_from_file_name(Path::new("q/round1.json")), Some(1));
        assert_eq!(round_from_file_name(Path::new("q/round12.json")), Some(12));
        assert_eq!(round_from_file_name(Path::new("q/round0.json")), None);
        assert_eq!(round_from_file_name(Path::new("q/round1.txt")), None);
        assert_eq!(round_from_file_name(Path::new("q/questions.json")), None);
    }

    #[test]
    fn loads_fixture_rounds() {
        let bank = QuestionBank::load_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/questions"))
            .expect("fixtures load");
        assert_eq!(bank.rounds().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(bank.questions(1).map(<[Question]>::len), Some(3));
        assert!(bank.public_questions(3).is_empty());
        assert!(!bank.is_valid_round(0));
    }

    #[test]
    fn shipped_question_files_are_valid() {
        let bank = QuestionBank::load_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/questions"))
            .expect("shipped questions load");
        assert!(bank.is_valid_round(1));
        assert!(bank.is_valid_round(2));
    }
}

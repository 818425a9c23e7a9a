// src/engine/scoring.rs

use chrono::{DateTime, Duration, Utc};

use crate::{
    config::Config,
    engine::{question_bank::QuestionBank, rounds::accepting_round},
    error::AppError,
    models::{
        question::{AnswerValue, Question, SubmittedAnswers},
        score::{DISQUALIFIED_SCORE, NewScore, UpsertOutcome},
    },
    store::QuizStore,
};

/// Number of slots whose answer equals the question's answer exactly.
/// Unanswered slots and answers past the last question count for nothing.
pub fn score_answers(answers: &[Option<AnswerValue>], questions: &[Question]) -> i32 {
    let correct = answers
        .iter()
        .zip(questions)
        .filter(|&(answer, question)| answer.as_ref() == Some(&question.answer))
        .count();
    i32::try_from(correct).unwrap_or(i32::MAX)
}

/// Whole seconds from `enter` to `exit`, floored and never negative.
pub fn elapsed_seconds(enter: DateTime<Utc>, exit: DateTime<Utc>) -> i32 {
    let secs = (exit - enter).num_milliseconds().div_euclid(1000).max(0);
    i32::try_from(secs).unwrap_or(i32::MAX)
}

/// Enter/exit times with the fallbacks applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub enter_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub time_taken: i32,
}

/// A missing exit is `now`; a missing enter is one nominal round before the exit.
pub fn resolve_timing(
    enter: Option<DateTime<Utc>>,
    exit: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    round_duration: Duration,
) -> Timing {
    let exit_time = exit.unwrap_or(now);
    let enter_time = enter.unwrap_or(exit_time - round_duration);
    Timing {
        enter_time,
        exit_time,
        time_taken: elapsed_seconds(enter_time, exit_time),
    }
}

/// A team's answers for the round it is in.
#[derive(Debug, Clone)]
pub struct Submission {
    pub team_name: String,
    pub answers: SubmittedAnswers,
    pub enter_time: Option<DateTime<Utc>>,
    pub exit_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReceipt {
    pub round: i32,
    pub score: i32,
    pub total_questions: usize,
}

/// Scores a submission against the current round and records it (last write wins).
pub async fn submit_score(
    store: &dyn QuizStore,
    bank: &QuestionBank,
    config: &Config,
    submission: Submission,
) -> Result<ScoreReceipt, AppError> {
    let round = accepting_round(store, config.accept_late_submissions).await?;
    let questions = bank.questions(round).ok_or(AppError::InvalidRound(round))?;

    let slots = submission
        .answers
        .into_slots(questions.len())
        .map_err(AppError::BadRequest)?;
    let score = score_answers(&slots, questions);

    let timing = resolve_timing(
        submission.enter_time,
        submission.exit_time,
        Utc::now(),
        Duration::seconds(config.quiz_duration_secs),
    );

    let outcome = store
        .upsert_score(
            NewScore {
                round,
                team_name: submission.team_name.clone(),
                score,
                enter_time: Some(timing.enter_time),
                exit_time: timing.exit_time,
                time_taken: Some(timing.time_taken),
            },
            config.disqualification_terminal,
        )
        .await?;

    match outcome {
        UpsertOutcome::Written => {}
        UpsertOutcome::RoundChanged => return Err(AppError::NoActiveRound),
        UpsertOutcome::KeptDisqualified => {
            tracing::info!(
                "Rejected submission from disqualified team '{}' in round {}",
                submission.team_name,
                round
            );
            return Err(AppError::Conflict(format!(
                "Team '{}' is disqualified from round {}",
                submission.team_name, round
            )));
        }
    }

    tracing::debug!(
        "Team '{}' scored {}/{} in round {} ({}s)",
        submission.team_name,
        score,
        questions.len(),
        round,
        timing.time_taken
    );

    Ok(ScoreReceipt {
        round,
        score,
        total_questions: questions.len(),
    })
}

/// Records a disqualification for `team_name`, overwriting any earlier score.
/// Returns the round it was recorded in. Repeated calls are harmless.
pub async fn disqualify(
    store: &dyn QuizStore,
    config: &Config,
    team_name: &str,
    enter_time: Option<DateTime<Utc>>,
) -> Result<i32, AppError> {
    let round = accepting_round(store, config.accept_late_submissions).await?;

    let exit_time = Utc::now();
    let time_taken = enter_time.map_or(0, |enter| elapsed_seconds(enter, exit_time));

    let outcome = store
        .upsert_score(
            NewScore {
                round,
                team_name: team_name.to_string(),
                score: DISQUALIFIED_SCORE,
                enter_time,
                exit_time,
                time_taken: Some(time_taken),
            },
            false,
        )
        .await?;

    if outcome == UpsertOutcome::RoundChanged {
        return Err(AppError::NoActiveRound);
    }

    tracing::info!("Team '{}' disqualified in round {}", team_name, round);
    Ok(round)
}

//! Core pipeline operations shared by all HTTP handlers.
//!
//! This includes:
//!   - Exercise generation (prompt build → gateway → parse → store)
//!   - Answer validation (grading prompt → gateway → parse)
//!   - Submission recording (difficulty score lookup → ledger)
//!
//! No partial state ever escapes: a generation or grading failure aborts
//! before anything is written, so retrying from the client is always safe.

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::Prompts;
use crate::domain::{score_for_level, Exercise, ProgressRecord, SolveStatus, Verdict};
use crate::error::AppError;
use crate::ledger::SubmissionEvent;
use crate::parser;
use crate::state::AppState;
use crate::util::{fill_template, flatten_code};

/// Deterministic generation prompt embedding topic and level.
pub fn build_generation_prompt(prompts: &Prompts, topic: &str, level: &str) -> String {
  fill_template(&prompts.generation_template, &[("topic", topic), ("level", level)])
}

/// Grading prompt embedding the problem statement and both flattened code
/// strings. The model is asked to judge logical equivalence, not textual
/// equality.
pub fn build_grading_prompt(
  prompts: &Prompts,
  description: &str,
  user_code: &str,
  expected_code: &str,
) -> String {
  fill_template(
    &prompts.grading_template,
    &[
      ("description", description),
      ("user_code", user_code),
      ("expected_code", expected_code),
    ],
  )
}

/// Generate, validate and store a new exercise for `(topic, level)`.
#[instrument(level = "info", skip(state), fields(%topic, %level))]
pub async fn generate_exercise(
  state: &AppState,
  topic: &str,
  level: &str,
) -> Result<Exercise, AppError> {
  if topic.trim().is_empty() || level.trim().is_empty() {
    return Err(AppError::Validation("missing required field: topic or level".into()));
  }

  let prompt = build_generation_prompt(&state.prompts, topic, level);
  let raw = state.ollama.generate(&prompt).await.map_err(AppError::generation)?;
  let draft = parser::parse_exercise(&raw)
    .map_err(|e| AppError::generation(e.into()))?;

  let ex = Exercise {
    code: Uuid::new_v4().to_string(),
    topic: topic.to_string(),
    level: level.to_string(),
    title: draft.title,
    description: draft.description,
    example_input: draft.example_input,
    example_output: draft.example_output,
    prompt,
    solution: flatten_code(&draft.solution.code),
    created_at: Utc::now(),
  };

  state.insert_exercise(ex.clone()).await;
  info!(target: "exercise", code = %ex.code, %topic, %level, title = %ex.title, "Exercise generated and stored");
  Ok(ex)
}

/// Grade a user's submission against a stored exercise.
/// The verdict is advisory: no execution or static analysis happens here,
/// it is exactly as reliable as the external model.
#[instrument(level = "info", skip(state, user_code), fields(%code, code_len = user_code.len()))]
pub async fn validate_answer(
  state: &AppState,
  code: &str,
  user_code: &str,
) -> Result<Verdict, AppError> {
  let ex = state.get_exercise(code).await.ok_or(AppError::NotFound("exercise"))?;

  let clean_user = flatten_code(user_code);
  let clean_expected = flatten_code(&ex.solution);
  let prompt = build_grading_prompt(&state.prompts, &ex.description, &clean_user, &clean_expected);

  let raw = state.ollama.generate(&prompt).await.map_err(AppError::grading)?;
  let verdict = parser::parse_verdict(&raw)
    .map_err(|e| AppError::grading(e.into()))?;

  info!(target: "exercise", %code, is_correct = verdict.is_correct, "Submission graded");
  Ok(verdict)
}

/// Record a graded submission against the user's progress.
/// The score is fixed by the exercise's difficulty level, never by the caller.
#[instrument(level = "info", skip(state, user_code), fields(%user_id, %problem_code, ?status))]
pub async fn record_submission(
  state: &AppState,
  user_id: &str,
  problem_code: &str,
  status: SolveStatus,
  user_code: &str,
) -> Result<ProgressRecord, AppError> {
  if problem_code.trim().is_empty() || user_code.trim().is_empty() {
    return Err(AppError::Validation(
      "missing required field: problemCode, status or userCode".into(),
    ));
  }

  let ex = state.get_exercise(problem_code).await.ok_or(AppError::NotFound("problem"))?;
  let score = score_for_level(&ex.level);

  let record = state
    .record_submission(
      user_id,
      SubmissionEvent {
        problem_code: problem_code.to_string(),
        status,
        score,
        user_code: flatten_code(user_code),
      },
    )
    .await?;

  info!(
    target: "progress",
    %user_id, %problem_code, ?status, score,
    total_score = record.total_score,
    "Progress updated"
  );
  Ok(record)
}

//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::logic;
use crate::protocol::*;
use crate::routes::auth::AuthedUser;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(topic = %body.topic, level = %body.level))]
pub async fn http_generate_exercise(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GenerateIn>,
) -> Result<Json<ExerciseOut>, AppError> {
  let ex = logic::generate_exercise(&state, &body.topic, &body.level).await?;
  info!(target: "exercise", code = %ex.code, "HTTP exercise generated");
  Ok(Json(to_exercise_out(&ex)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_exercises(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ExerciseSummaryOut>>, AppError> {
  let all = state.list_exercises().await;
  if all.is_empty() {
    return Err(AppError::NotFound("exercises"));
  }
  Ok(Json(all.iter().map(to_summary_out).collect()))
}

#[instrument(level = "info", skip(state), fields(%topic))]
pub async fn http_exercises_by_topic(
  State(state): State<Arc<AppState>>,
  Path(topic): Path<String>,
) -> Result<Json<Vec<ExerciseOut>>, AppError> {
  let hits = state.exercises_by_topic(&topic).await;
  if hits.is_empty() {
    return Err(AppError::NotFound("exercises for this topic"));
  }
  Ok(Json(hits.iter().map(to_exercise_out).collect()))
}

#[instrument(level = "info", skip(state), fields(%code))]
pub async fn http_get_exercise(
  State(state): State<Arc<AppState>>,
  Path(code): Path<String>,
) -> Result<Json<ExerciseOut>, AppError> {
  let ex = state.get_exercise(&code).await.ok_or(AppError::NotFound("exercise"))?;
  Ok(Json(to_exercise_out(&ex)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_clear_exercises(
  State(state): State<Arc<AppState>>,
) -> Json<ClearedOut> {
  let removed = state.clear_exercises().await;
  info!(target: "exercise", removed, "HTTP exercise store cleared");
  Json(ClearedOut { removed })
}

#[instrument(level = "info", skip(state, body), fields(code = %body.code, code_len = body.user_code.len()))]
pub async fn http_submit_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SubmissionIn>,
) -> Result<Json<VerdictOut>, AppError> {
  let verdict = logic::validate_answer(&state, &body.code, &body.user_code).await?;
  info!(target: "exercise", code = %body.code, is_correct = verdict.is_correct, "HTTP submission graded");
  Ok(Json(verdict.into()))
}

#[instrument(level = "info", skip(state, body), fields(user_id = %user.0, problem = %body.problem_code))]
pub async fn http_update_progress(
  State(state): State<Arc<AppState>>,
  user: AuthedUser,
  Json(body): Json<ProgressIn>,
) -> Result<Json<ProgressOut>, AppError> {
  let record = logic::record_submission(
    &state,
    &user.0,
    &body.problem_code,
    body.status,
    &body.user_code,
  )
  .await?;
  Ok(Json(to_progress_out(&record)))
}

#[instrument(level = "info", skip(state), fields(user_id = %user.0))]
pub async fn http_get_progress(
  State(state): State<Arc<AppState>>,
  user: AuthedUser,
) -> Json<ProgressQueryOut> {
  let progress = state.get_progress(&user.0).await;
  Json(ProgressQueryOut { progress: progress.as_ref().map(to_progress_out) })
}

#[instrument(level = "info", skip(state), fields(user_id = %user.0))]
pub async fn http_delete_progress(
  State(state): State<Arc<AppState>>,
  user: AuthedUser,
) -> Result<Json<MessageOut>, AppError> {
  if !state.delete_progress(&user.0).await {
    return Err(AppError::NotFound("progress for this user"));
  }
  info!(target: "progress", user_id = %user.0, "HTTP progress deleted");
  Ok(Json(MessageOut { message: "progress deleted".into() }))
}

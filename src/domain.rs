//! Domain models: exercises, grading verdicts, and the per-user progress ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome recorded for a submission.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
  Correct,
  Incorrect,
}

/// A generated coding problem. Created once by the generator (fully
/// validated before it is stored) and immutable thereafter. Externally
/// identified only by `code`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
  pub code: String,
  pub topic: String,
  pub level: String,      // free-form difficulty (e.g. "easy", "medium", "hard")
  pub title: String,
  pub description: String,
  pub example_input: String,
  pub example_output: String,
  /// Generation prompt the exercise was produced from.
  pub prompt: String,
  /// Reference solution code, newline-stripped.
  pub solution: String,
  pub created_at: DateTime<Utc>,
}

/// Unvalidated exercise payload parsed out of a model reply.
/// Only ever lives between the parser and the generator.
#[derive(Debug)]
pub struct ExerciseDraft {
  pub title: String,
  pub description: String,
  pub example_input: String,
  pub example_output: String,
  pub solution: SolutionDraft,
}

#[derive(Debug)]
pub struct SolutionDraft {
  pub language: String,
  pub code: String,
  pub explanation: String,
}

/// Grading outcome for one submission. Never persisted on its own;
/// only folded into a `ProgressRecord` by the ledger.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
  pub is_correct: bool,
  pub feedback: String,
}

/// Per-problem attempt history and latest submission for one user.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedProblem {
  pub problem_code: String,
  pub status: SolveStatus,
  pub attempts: u32,
  /// Value this problem awards (fixed by its difficulty at first submission).
  pub score: u32,
  /// Latest submitted code, newline-stripped. Overwritten on resubmission.
  pub user_code: String,
}

/// Per-user ledger: solved problems plus cumulative score.
/// Invariant: at most one `SolvedProblem` entry per `problem_code`, and
/// `total_score` only ever grows (credit is granted on the first transition
/// into `Correct` for a problem, never again).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
  pub user_id: String,
  pub solved_problems: Vec<SolvedProblem>,
  pub total_score: u32,
}

impl ProgressRecord {
  pub fn new(user_id: String) -> Self {
    Self { user_id, solved_problems: Vec::new(), total_score: 0 }
  }

  pub fn problem(&self, problem_code: &str) -> Option<&SolvedProblem> {
    self.solved_problems.iter().find(|p| p.problem_code == problem_code)
  }
}

/// Points awarded per difficulty level. Unknown levels fall back to the
/// easy value rather than failing (kept from the source system; arguably
/// this should reject instead).
pub fn score_for_level(level: &str) -> u32 {
  match level {
    "easy" => 10,
    "medium" => 20,
    "hard" => 30,
    _ => 10,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn score_table_matches_difficulties() {
    assert_eq!(score_for_level("easy"), 10);
    assert_eq!(score_for_level("medium"), 20);
    assert_eq!(score_for_level("hard"), 30);
  }

  #[test]
  fn unknown_level_falls_back_to_base_score() {
    assert_eq!(score_for_level("legendary"), 10);
    assert_eq!(score_for_level(""), 10);
  }

  #[test]
  fn status_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&SolveStatus::Correct).unwrap(), "\"correct\"");
    let s: SolveStatus = serde_json::from_str("\"incorrect\"").unwrap();
    assert_eq!(s, SolveStatus::Incorrect);
  }
}

//! Public request/response DTOs for the HTTP API (serde ready).
//! Keep this small and stable to evolve backend and clients independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Exercise, ProgressRecord, SolveStatus, SolvedProblem, Verdict};

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

/// Uniform error body produced by `AppError::into_response`.
#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct MessageOut {
    pub message: String,
}

//
// Exercise generation & lookup
//

#[derive(Debug, Deserialize)]
pub struct GenerateIn {
    pub topic: String,
    pub level: String,
}

/// Full exercise as delivered to clients (the original system returns the
/// stored document verbatim, reference solution included).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseOut {
    pub code: String,
    pub topic: String,
    pub level: String,
    pub title: String,
    pub description: String,
    pub example_input: String,
    pub example_output: String,
    pub prompt: String,
    pub solution: String,
    pub created_at: DateTime<Utc>,
}

/// Short form used by list endpoints.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSummaryOut {
    pub code: String,
    pub title: String,
    pub topic: String,
    pub level: String,
    pub created_at: DateTime<Utc>,
}

pub fn to_exercise_out(e: &Exercise) -> ExerciseOut {
    ExerciseOut {
        code: e.code.clone(),
        topic: e.topic.clone(),
        level: e.level.clone(),
        title: e.title.clone(),
        description: e.description.clone(),
        example_input: e.example_input.clone(),
        example_output: e.example_output.clone(),
        prompt: e.prompt.clone(),
        solution: e.solution.clone(),
        created_at: e.created_at,
    }
}

pub fn to_summary_out(e: &Exercise) -> ExerciseSummaryOut {
    ExerciseSummaryOut {
        code: e.code.clone(),
        title: e.title.clone(),
        topic: e.topic.clone(),
        level: e.level.clone(),
        created_at: e.created_at,
    }
}

#[derive(Serialize)]
pub struct ClearedOut {
    pub removed: usize,
}

//
// Answer grading
//

#[derive(Deserialize)]
pub struct SubmissionIn {
    pub code: String,
    #[serde(rename = "userCode")]
    pub user_code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictOut {
    pub is_correct: bool,
    pub feedback: String,
}

impl From<Verdict> for VerdictOut {
    fn from(v: Verdict) -> Self {
        Self { is_correct: v.is_correct, feedback: v.feedback }
    }
}

//
// Progress
//

#[derive(Deserialize)]
pub struct ProgressIn {
    #[serde(rename = "problemCode")]
    pub problem_code: String,
    pub status: SolveStatus,
    #[serde(rename = "userCode")]
    pub user_code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedProblemOut {
    pub problem_code: String,
    pub status: SolveStatus,
    pub attempts: u32,
    pub score: u32,
    pub user_code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOut {
    pub user_id: String,
    pub total_score: u32,
    pub solved_problems: Vec<SolvedProblemOut>,
}

/// GET /progress envelope: `progress` is null until the first submission.
#[derive(Serialize)]
pub struct ProgressQueryOut {
    pub progress: Option<ProgressOut>,
}

fn to_solved_out(p: &SolvedProblem) -> SolvedProblemOut {
    SolvedProblemOut {
        problem_code: p.problem_code.clone(),
        status: p.status,
        attempts: p.attempts,
        score: p.score,
        user_code: p.user_code.clone(),
    }
}

pub fn to_progress_out(r: &ProgressRecord) -> ProgressOut {
    ProgressOut {
        user_id: r.user_id.clone(),
        total_score: r.total_score,
        solved_problems: r.solved_problems.iter().map(to_solved_out).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_out_uses_camel_case_wire_names() {
        let out = ExerciseOut {
            code: "c".into(),
            topic: "t".into(),
            level: "easy".into(),
            title: "ti".into(),
            description: "d".into(),
            example_input: "i".into(),
            example_output: "o".into(),
            prompt: "p".into(),
            solution: "s".into(),
            created_at: Utc::now(),
        };
        let v: serde_json::Value = serde_json::to_value(&out).unwrap();
        assert!(v.get("exampleInput").is_some());
        assert!(v.get("exampleOutput").is_some());
        assert!(v.get("createdAt").is_some());
        assert!(v.get("example_input").is_none());
    }

    #[test]
    fn summary_out_carries_created_at() {
        let out = ExerciseSummaryOut {
            code: "c".into(),
            title: "t".into(),
            topic: "arrays".into(),
            level: "easy".into(),
            created_at: Utc::now(),
        };
        let v: serde_json::Value = serde_json::to_value(&out).unwrap();
        assert!(v.get("createdAt").is_some());
        assert!(v.get("created_at").is_none());
    }

    #[test]
    fn progress_in_accepts_the_original_wire_shape() {
        let p: ProgressIn = serde_json::from_str(
            r#"{"problemCode":"p1","status":"correct","userCode":"x"}"#,
        )
        .unwrap();
        assert_eq!(p.problem_code, "p1");
        assert_eq!(p.status, SolveStatus::Correct);
    }

    #[test]
    fn progress_in_rejects_unknown_status() {
        let res: Result<ProgressIn, _> = serde_json::from_str(
            r#"{"problemCode":"p1","status":"solved","userCode":"x"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn verdict_out_round_trips_from_domain() {
        let out: VerdictOut = Verdict { is_correct: true, feedback: "nice".into() }.into();
        let v: serde_json::Value = serde_json::to_value(&out).unwrap();
        assert_eq!(v["isCorrect"], true);
        assert_eq!(v["feedback"], "nice");
    }
}

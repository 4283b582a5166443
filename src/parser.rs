//! Parsing of untrusted model output.
//!
//! The inference service is asked to self-format its reply as JSON, but the
//! payload is still just text: a transport success can carry a non-JSON or
//! incomplete body. Everything here is a pure function from that text to a
//! typed value or a `ParseError`; no partial object ever escapes.

use serde_json::Value;

use crate::domain::{ExerciseDraft, SolutionDraft, Verdict};
use crate::error::ParseError;

/// Required string field lookup. Wrong type and empty both count as missing;
/// `name` is the dotted path reported to the caller.
fn req_str(doc: &Value, key: &str, name: &'static str) -> Result<String, ParseError> {
  match doc.get(key).and_then(Value::as_str) {
    Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
    _ => Err(ParseError::MissingField(name)),
  }
}

/// Parse a generated exercise out of a raw model reply.
/// Field checks run in schema order, so the first gap is the one reported.
pub fn parse_exercise(raw: &str) -> Result<ExerciseDraft, ParseError> {
  let doc: Value = serde_json::from_str(raw)?;

  let title = req_str(&doc, "title", "title")?;
  let description = req_str(&doc, "description", "description")?;
  let example_input = req_str(&doc, "exampleInput", "exampleInput")?;
  let example_output = req_str(&doc, "exampleOutput", "exampleOutput")?;

  let solution = doc
    .get("solution")
    .filter(|v| v.is_object())
    .ok_or(ParseError::MissingField("solution"))?;
  let solution = SolutionDraft {
    language: req_str(solution, "language", "solution.language")?,
    code: req_str(solution, "code", "solution.code")?,
    explanation: req_str(solution, "explanation", "solution.explanation")?,
  };

  Ok(ExerciseDraft { title, description, example_input, example_output, solution })
}

/// Parse a grading verdict out of a raw model reply.
/// `isCorrect` must be a boolean and `feedback` a string; a wrong type is
/// reported the same way as an absent field.
pub fn parse_verdict(raw: &str) -> Result<Verdict, ParseError> {
  let doc: Value = serde_json::from_str(raw)?;

  let is_correct = doc
    .get("isCorrect")
    .and_then(Value::as_bool)
    .ok_or(ParseError::MissingField("isCorrect"))?;
  let feedback = doc
    .get("feedback")
    .and_then(Value::as_str)
    .ok_or(ParseError::MissingField("feedback"))?
    .to_string();

  Ok(Verdict { is_correct, feedback })
}

//! Loading prompt configuration from TOML.
//!
//! Prompt templates drive both model calls; defaults are built in and a
//! `CONFIG_PATH` TOML file may override them to tune tone/structure.

use serde::Deserialize;
use tracing::{info, error};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompt templates used against the inference service.
/// Placeholders use `{key}` syntax (see `util::fill_template`).
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  /// Exercise generation; placeholders: {topic}, {level}.
  pub generation_template: String,
  /// Answer grading; placeholders: {description}, {user_code}, {expected_code}.
  pub grading_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      generation_template: r#"Generate a coding problem as JSON for the topic "{topic}" at level "{level}". Expected format:
{
    "title": "Problem title",
    "description": "Detailed description",
    "exampleInput": "Example input",
    "exampleOutput": "Example output",
    "solution": {
        "language": "Language (Python, Java, etc.)",
        "code": "Solution code",
        "explanation": "Brief explanation"
    }
}
"#.into(),
      grading_template: r#"You are a code evaluator. Judge whether the user's code below correctly solves the stated problem.

Problem:
{description}

User code:
{user_code}

Expected solution:
{expected_code}

Compare the following aspects:
- Does the user's code follow the same logical flow as the expected solution?
- Are the required operations handled correctly?
- Are key elements missing from the implementation?

Return JSON in the format:
{
    "isCorrect": true/false,
    "feedback": "Text explaining what is missing or done incorrectly, with suggestions to improve."
}
"#.into(),
    }
  }
}

/// Attempt to load `AppConfig` from CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "codedrill_backend", %path, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "codedrill_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "codedrill_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

//! Application state: in-memory stores, prompts, and the Ollama client.
//!
//! This module owns:
//!   - the exercise store (keyed by opaque exercise code)
//!   - the progress store (one record per user)
//!   - the prompts struct (from TOML or defaults)
//!   - the inference client
//!
//! The progress store is the only shared mutable resource in the system.
//! All progress mutation goes through `record_submission`, which runs the
//! whole read-modify-write under one write guard so that concurrent
//! submissions for the same `(user, problem)` pair serialize and a
//! lost update on `total_score` cannot occur.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::config::{load_config_from_env, Prompts};
use crate::domain::{Exercise, ProgressRecord};
use crate::error::AppError;
use crate::ledger::{self, SubmissionEvent};
use crate::ollama::Ollama;

#[derive(Clone)]
pub struct AppState {
    pub exercises: Arc<RwLock<HashMap<String, Exercise>>>,
    pub progress: Arc<RwLock<HashMap<String, ProgressRecord>>>,
    pub ollama: Ollama,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load config, init the inference client.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, AppError> {
        let prompts = load_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let ollama = Ollama::from_env()?;
        info!(
            target: "codedrill_backend",
            base_url = %ollama.base_url(),
            model = %ollama.model(),
            "Ollama client ready"
        );

        Ok(Self {
            exercises: Arc::new(RwLock::new(HashMap::new())),
            progress: Arc::new(RwLock::new(HashMap::new())),
            ollama,
            prompts,
        })
    }

    /// Insert a fully-validated exercise. The generator is the only caller.
    #[instrument(level = "debug", skip(self, ex), fields(code = %ex.code))]
    pub async fn insert_exercise(&self, ex: Exercise) {
        self.exercises.write().await.insert(ex.code.clone(), ex);
    }

    #[instrument(level = "debug", skip(self), fields(%code))]
    pub async fn get_exercise(&self, code: &str) -> Option<Exercise> {
        self.exercises.read().await.get(code).cloned()
    }

    /// All stored exercises, newest first (as the listing is consumed).
    pub async fn list_exercises(&self) -> Vec<Exercise> {
        let mut all: Vec<Exercise> = self.exercises.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.code.cmp(&b.code)));
        all
    }

    pub async fn exercises_by_topic(&self, topic: &str) -> Vec<Exercise> {
        let mut hits: Vec<Exercise> = self
            .exercises
            .read()
            .await
            .values()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.code.cmp(&b.code)));
        hits
    }

    /// Remove every stored exercise; returns how many were dropped.
    #[instrument(level = "info", skip(self))]
    pub async fn clear_exercises(&self) -> usize {
        let mut store = self.exercises.write().await;
        let n = store.len();
        store.clear();
        n
    }

    /// Fold a submission into the user's progress record, creating the
    /// record lazily on first submission.
    ///
    /// The write guard spans lookup, transition and store, so two
    /// simultaneous "first correct" events for the same pair cannot both
    /// credit `total_score`, and no duplicate per-problem entry can appear.
    #[instrument(level = "info", skip(self, event), fields(%user_id, problem = %event.problem_code))]
    pub async fn record_submission(
        &self,
        user_id: &str,
        event: SubmissionEvent,
    ) -> Result<ProgressRecord, AppError> {
        let mut progress = self.progress.write().await;
        let record = progress
            .entry(user_id.to_string())
            .or_insert_with(|| ProgressRecord::new(user_id.to_string()));

        let res = ledger::apply_submission(record, event).map(|()| record.clone());
        if res.is_err() {
            // Don't leave behind an empty record created for a rejected event.
            if progress
                .get(user_id)
                .is_some_and(|r| r.solved_problems.is_empty() && r.total_score == 0)
            {
                progress.remove(user_id);
            }
        }
        res
    }

    #[instrument(level = "debug", skip(self), fields(%user_id))]
    pub async fn get_progress(&self, user_id: &str) -> Option<ProgressRecord> {
        self.progress.read().await.get(user_id).cloned()
    }

    /// Drop the user's progress record. Returns false when none existed.
    #[instrument(level = "info", skip(self), fields(%user_id))]
    pub async fn delete_progress(&self, user_id: &str) -> bool {
        self.progress.write().await.remove(user_id).is_some()
    }
}

//! Per-idea research progress.
//!
//! A research run for one idea has `N + 2` reportable steps: the `N`
//! independent tasks, then synthesis, then the monitoring plan.

use std::sync::{Mutex, PoisonError};

use arc_core::metrics::ResearchProgress;

pub const SYNTHESIS_STEP: &str = "synthesis";
pub const MONITORING_STEP: &str = "monitoring";

/// Receives progress updates. Called from the scheduler's driving task, never
/// from inside a worker.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, progress: &ResearchProgress);
}

/// Observer that ignores every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_progress(&self, _progress: &ResearchProgress) {}
}

/// Counts finished steps for one idea and forwards each update.
pub struct ProgressTracker<'a> {
    idea_id: String,
    total_steps: u32,
    completed: Mutex<u32>,
    observer: &'a dyn ProgressObserver,
}

impl<'a> ProgressTracker<'a> {
    #[must_use]
    pub fn new(idea_id: &str, task_count: usize, observer: &'a dyn ProgressObserver) -> Self {
        let tasks = u32::try_from(task_count).unwrap_or(u32::MAX);
        Self {
            idea_id: idea_id.to_string(),
            total_steps: tasks.saturating_add(2),
            completed: Mutex::new(0),
            observer,
        }
    }

    #[must_use]
    pub const fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Announce the run before any step has finished.
    pub fn start(&self) {
        self.observer
            .on_progress(&ResearchProgress::new(&self.idea_id, 0, self.total_steps, "queued"));
    }

    /// Mark `step` finished, whatever its outcome.
    pub fn step_finished(&self, step: &str) -> ResearchProgress {
        let completed = {
            let mut completed = self.completed.lock().unwrap_or_else(PoisonError::into_inner);
            *completed = (*completed + 1).min(self.total_steps);
            *completed
        };
        let progress = ResearchProgress::new(&self.idea_id, completed, self.total_steps, step);
        tracing::debug!(
            idea_id = %self.idea_id,
            step,
            completed,
            total = self.total_steps,
            "research progress"
        );
        self.observer.on_progress(&progress);
        progress
    }
}

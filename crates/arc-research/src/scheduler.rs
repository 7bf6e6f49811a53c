//! Parallel research scheduler.
//!
//! Runs the independent research tasks for one idea on a bounded pool (a
//! semaphore plus a `JoinSet`): a task is dispatched as soon as a slot frees.
//! Once every dispatched task has finished, synthesis and then the monitoring
//! plan run in sequence on the successful subset.
//!
//! A failing, panicking, or timed-out task is recorded against that task and
//! never aborts the others. Cancellation stops dispatch; tasks already in
//! flight drain and their results are kept.

use std::any::Any;
use std::collections::BTreeSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use arc_config::ResearchConfig;
use arc_core::entities::{
    MonitoringResult, PromotedIdea, ResearchTaskResult, SynthesisResult, TaskFailure,
    TelemetryRecord,
};
use arc_core::enums::{Lane, TaskOutcome};
use arc_core::errors::AdapterError;
use arc_core::ids::{PREFIX_TELEMETRY, generate_id};
use arc_core::ports::ResearchAdapter;
use arc_telemetry::TelemetrySink;
use chrono::Utc;
use futures::FutureExt;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};

use crate::progress::{MONITORING_STEP, ProgressObserver, ProgressTracker, SYNTHESIS_STEP};

/// Shared cancellation switch for a research run.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything one idea's research produced, successful or not.
#[derive(Debug, Clone, Default)]
pub struct ResearchExecution {
    /// Successful task results, in task-list order.
    pub results: Vec<ResearchTaskResult>,
    /// Failed, timed-out, or undispatched tasks, in task-list order.
    pub failures: Vec<TaskFailure>,
    pub synthesis: Option<SynthesisResult>,
    pub monitoring: Option<MonitoringResult>,
    pub stage_errors: Vec<String>,
    pub cancelled: bool,
}

impl ResearchExecution {
    /// Synthesis and monitoring both produced output.
    #[must_use]
    pub const fn stages_succeeded(&self) -> bool {
        self.synthesis.is_some() && self.monitoring.is_some()
    }
}

struct Finished {
    index: usize,
    task_id: String,
    outcome: Result<ResearchTaskResult, String>,
    duration_ms: u64,
}

enum Event {
    Slot(OwnedSemaphorePermit),
    Joined(Result<Finished, JoinError>),
    Closed,
}

pub struct ResearchScheduler {
    adapter: Arc<dyn ResearchAdapter>,
    telemetry: Arc<dyn TelemetrySink>,
    concurrency: usize,
    task_timeout: Duration,
}

impl ResearchScheduler {
    #[must_use]
    pub fn new(
        adapter: Arc<dyn ResearchAdapter>,
        telemetry: Arc<dyn TelemetrySink>,
        config: &ResearchConfig,
    ) -> Self {
        Self {
            adapter,
            telemetry,
            concurrency: config.concurrency.max(1),
            task_timeout: Duration::from_secs(config.task_timeout_secs),
        }
    }

    /// Run `tasks` for `idea`, then synthesis and monitoring.
    ///
    /// Reports `tasks.len() + 2` steps to `progress`.
    pub async fn execute(
        &self,
        run_id: &str,
        idea: &PromotedIdea,
        tasks: &[String],
        progress: &dyn ProgressObserver,
        cancel: &CancelFlag,
    ) -> ResearchExecution {
        let tracker = ProgressTracker::new(&idea.idea_id, tasks.len(), progress);
        tracker.start();

        let mut execution = self.run_independent(run_id, idea, tasks, &tracker, cancel).await;
        if execution.cancelled {
            execution
                .stage_errors
                .push("research cancelled before synthesis".to_string());
            return execution;
        }
        if execution.results.is_empty() {
            execution
                .stage_errors
                .push("no task succeeded, nothing to synthesize".to_string());
            tracker.step_finished(SYNTHESIS_STEP);
            tracker.step_finished(MONITORING_STEP);
            return execution;
        }

        let synthesis = self
            .run_stage(
                run_id,
                idea,
                SYNTHESIS_STEP,
                self.adapter.synthesize(idea, &execution.results),
            )
            .await;
        tracker.step_finished(SYNTHESIS_STEP);
        let synthesis = match synthesis {
            Ok(synthesis) => synthesis,
            Err(error) => {
                execution.stage_errors.push(format!("synthesis: {error}"));
                tracker.step_finished(MONITORING_STEP);
                return execution;
            }
        };

        let monitoring = self
            .run_stage(
                run_id,
                idea,
                MONITORING_STEP,
                self.adapter
                    .plan_monitoring(idea, &synthesis, &execution.results),
            )
            .await;
        tracker.step_finished(MONITORING_STEP);
        match monitoring {
            Ok(monitoring) => execution.monitoring = Some(monitoring),
            Err(error) => execution.stage_errors.push(format!("monitoring: {error}")),
        }
        execution.synthesis = Some(synthesis);
        execution
    }

    async fn run_independent(
        &self,
        run_id: &str,
        idea: &PromotedIdea,
        tasks: &[String],
        tracker: &ProgressTracker<'_>,
        cancel: &CancelFlag,
    ) -> ResearchExecution {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let shared_idea = Arc::new(idea.clone());
        let mut set: JoinSet<Finished> = JoinSet::new();
        let mut pending = BTreeSet::new();
        let mut slots: Vec<Option<Result<ResearchTaskResult, TaskFailure>>> =
            tasks.iter().map(|_| None).collect();
        let mut queue = tasks.iter().enumerate().peekable();

        loop {
            let dispatching = queue.peek().is_some() && !cancel.is_cancelled();
            let event = if dispatching {
                tokio::select! {
                    permit = Arc::clone(&semaphore).acquire_owned() => {
                        permit.map_or(Event::Closed, Event::Slot)
                    }
                    Some(joined) = set.join_next() => Event::Joined(joined),
                }
            } else {
                match set.join_next().await {
                    Some(joined) => Event::Joined(joined),
                    None => break,
                }
            };

            match event {
                Event::Slot(permit) => {
                    if cancel.is_cancelled() {
                        continue;
                    }
                    let Some((index, task_id)) = queue.next() else {
                        continue;
                    };
                    tracing::debug!(idea_id = %idea.idea_id, %task_id, "dispatching research task");
                    pending.insert(index);
                    let adapter = Arc::clone(&self.adapter);
                    let idea = Arc::clone(&shared_idea);
                    let task_id = task_id.clone();
                    let timeout = self.task_timeout;
                    set.spawn(async move {
                        let _permit = permit;
                        let started = Instant::now();
                        let outcome = guarded(timeout, adapter.run_task(&task_id, &idea))
                            .await
                            .and_then(|result| {
                                if result.task_id == task_id {
                                    Ok(result)
                                } else {
                                    Err(format!("runner returned a result for {}", result.task_id))
                                }
                            });
                        Finished {
                            index,
                            task_id,
                            outcome,
                            duration_ms: elapsed_ms(started),
                        }
                    });
                }
                Event::Joined(Ok(finished)) => {
                    let index = finished.index;
                    pending.remove(&index);
                    tracker.step_finished(&finished.task_id);
                    slots[index] = Some(self.settle(run_id, idea, finished));
                }
                Event::Joined(Err(e)) => {
                    tracing::warn!(idea_id = %idea.idea_id, error = %e, "research worker aborted");
                }
                Event::Closed => break,
            }
        }

        let cancelled = cancel.is_cancelled() && queue.peek().is_some();
        let mut execution = ResearchExecution {
            cancelled,
            ..ResearchExecution::default()
        };
        for (index, task_id) in tasks.iter().enumerate() {
            match slots[index].take() {
                Some(Ok(result)) => execution.results.push(result),
                Some(Err(failure)) => execution.failures.push(failure),
                None => {
                    let error = if pending.contains(&index) {
                        "research worker aborted"
                    } else {
                        "cancelled before dispatch"
                    };
                    self.record(run_id, idea, task_id, TaskOutcome::Skipped, 0, Some(error));
                    execution.failures.push(TaskFailure {
                        task_id: task_id.clone(),
                        error: error.to_string(),
                        duration_ms: 0,
                    });
                }
            }
        }
        tracing::info!(
            idea_id = %idea.idea_id,
            succeeded = execution.results.len(),
            failed = execution.failures.len(),
            cancelled,
            "independent research finished"
        );
        execution
    }

    fn settle(
        &self,
        run_id: &str,
        idea: &PromotedIdea,
        finished: Finished,
    ) -> Result<ResearchTaskResult, TaskFailure> {
        match finished.outcome {
            Ok(result) => {
                self.record(
                    run_id,
                    idea,
                    &finished.task_id,
                    TaskOutcome::Succeeded,
                    finished.duration_ms,
                    None,
                );
                Ok(result)
            }
            Err(error) => {
                tracing::warn!(
                    idea_id = %idea.idea_id,
                    task_id = %finished.task_id,
                    %error,
                    "research task failed"
                );
                self.record(
                    run_id,
                    idea,
                    &finished.task_id,
                    TaskOutcome::Failed,
                    finished.duration_ms,
                    Some(&error),
                );
                Err(TaskFailure {
                    task_id: finished.task_id,
                    error,
                    duration_ms: finished.duration_ms,
                })
            }
        }
    }

    async fn run_stage<T, F>(
        &self,
        run_id: &str,
        idea: &PromotedIdea,
        stage: &str,
        fut: F,
    ) -> Result<T, String>
    where
        F: Future<Output = Result<T, AdapterError>>,
    {
        let started = Instant::now();
        let outcome = guarded(self.task_timeout, fut).await;
        let duration_ms = elapsed_ms(started);
        match &outcome {
            Ok(_) => self.record(run_id, idea, stage, TaskOutcome::Succeeded, duration_ms, None),
            Err(error) => {
                tracing::warn!(idea_id = %idea.idea_id, stage, %error, "research stage failed");
                self.record(
                    run_id,
                    idea,
                    stage,
                    TaskOutcome::Failed,
                    duration_ms,
                    Some(error),
                );
            }
        }
        outcome
    }

    fn record(
        &self,
        run_id: &str,
        idea: &PromotedIdea,
        task_id: &str,
        outcome: TaskOutcome,
        duration_ms: u64,
        error: Option<&str>,
    ) {
        self.telemetry.record_task(TelemetryRecord {
            id: generate_id(PREFIX_TELEMETRY),
            run_id: run_id.to_string(),
            lane: Lane::LaneB,
            task_id: task_id.to_string(),
            idea_id: Some(idea.idea_id.clone()),
            outcome,
            duration_ms,
            error: error.map(str::to_string),
            recorded_at: Utc::now(),
        });
    }
}

/// Await `fut` under a deadline, turning errors, timeouts, and panics into a
/// message.
async fn guarded<T, F>(timeout: Duration, fut: F) -> Result<T, String>
where
    F: Future<Output = Result<T, AdapterError>>,
{
    match tokio::time::timeout(timeout, AssertUnwindSafe(fut).catch_unwind()).await {
        Err(_) => Err(AdapterError::Timeout {
            secs: timeout.as_secs(),
        }
        .to_string()),
        Ok(Err(panic)) => Err(format!("task panicked: {}", panic_message(panic.as_ref()))),
        Ok(Ok(Err(e))) => Err(e.to_string()),
        Ok(Ok(Ok(value))) => Ok(value),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use arc_core::metrics::ResearchProgress;
    use arc_telemetry::TelemetryStore;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::progress::NoopProgress;
    use crate::test_support::fakes::{FakeResearch, promoted_idea, task_list};

    fn config(concurrency: usize) -> ResearchConfig {
        ResearchConfig {
            concurrency,
            task_timeout_secs: 1,
            ..ResearchConfig::default()
        }
    }

    fn build(
        adapter: &Arc<FakeResearch>,
        concurrency: usize,
    ) -> (ResearchScheduler, Arc<TelemetryStore>) {
        let telemetry = Arc::new(TelemetryStore::in_memory());
        let scheduler =
            ResearchScheduler::new(adapter.clone(), telemetry.clone(), &config(concurrency));
        (scheduler, telemetry)
    }

    async fn run(
        scheduler: &ResearchScheduler,
        tasks: &[String],
        progress: &dyn ProgressObserver,
        cancel: &CancelFlag,
    ) -> ResearchExecution {
        scheduler
            .execute("run-1", &promoted_idea("idea-1"), tasks, progress, cancel)
            .await
    }

    #[derive(Default)]
    struct Collect(Mutex<Vec<ResearchProgress>>);

    impl ProgressObserver for Collect {
        fn on_progress(&self, progress: &ResearchProgress) {
            self.0.lock().unwrap().push(progress.clone());
        }
    }

    #[tokio::test]
    async fn all_tasks_succeed_then_stages_run() {
        let adapter = Arc::new(FakeResearch::default());
        let (scheduler, telemetry) = build(&adapter, 3);
        let tasks = task_list(7);
        let progress = Collect::default();

        let execution = run(&scheduler, &tasks, &progress, &CancelFlag::new()).await;

        assert_eq!(execution.results.len(), 7);
        assert!(execution.failures.is_empty());
        assert!(execution.stages_succeeded());
        let ids: Vec<&str> = execution.results.iter().map(|r| r.task_id.as_str()).collect();
        let expected: Vec<&str> = tasks.iter().map(String::as_str).collect();
        assert_eq!(ids, expected);

        let seen = progress.0.lock().unwrap();
        let last = seen.last().unwrap();
        assert_eq!(last.total_steps, 9);
        assert_eq!(last.completed_steps, 9);
        assert_eq!(last.current_step, MONITORING_STEP);

        assert_eq!(telemetry.tasks().len(), 9);
    }

    #[tokio::test]
    async fn in_flight_tasks_never_exceed_the_ceiling() {
        let adapter = Arc::new(FakeResearch {
            delay_ms: 20,
            ..FakeResearch::default()
        });
        let (scheduler, _) = build(&adapter, 3);
        run(&scheduler, &task_list(7), &NoopProgress, &CancelFlag::new()).await;
        assert_eq!(adapter.max_in_flight(), 3);
    }

    #[tokio::test]
    async fn failed_task_is_recorded_and_synthesis_uses_the_rest() {
        let tasks = task_list(4);
        let adapter = Arc::new(FakeResearch {
            failing: [tasks[1].clone()].into(),
            ..FakeResearch::default()
        });
        let (scheduler, telemetry) = build(&adapter, 2);

        let execution = run(&scheduler, &tasks, &NoopProgress, &CancelFlag::new()).await;

        assert_eq!(execution.results.len(), 3);
        assert_eq!(execution.failures.len(), 1);
        assert_eq!(execution.failures[0].task_id, tasks[1]);
        assert!(execution.stages_succeeded());
        assert_eq!(adapter.synthesized_with(), vec![3]);
        assert_eq!(telemetry.quality_metrics().failed, 1);
    }

    #[tokio::test]
    async fn panicking_task_is_a_task_failure() {
        let tasks = task_list(3);
        let adapter = Arc::new(FakeResearch {
            panicking: [tasks[0].clone()].into(),
            ..FakeResearch::default()
        });
        let (scheduler, _) = build(&adapter, 3);

        let execution = run(&scheduler, &tasks, &NoopProgress, &CancelFlag::new()).await;

        assert_eq!(execution.failures.len(), 1);
        assert!(execution.failures[0].error.contains("panicked"));
        assert_eq!(execution.results.len(), 2);
    }

    #[tokio::test]
    async fn slow_task_times_out() {
        let tasks = task_list(2);
        let adapter = Arc::new(FakeResearch {
            hanging: [tasks[1].clone()].into(),
            ..FakeResearch::default()
        });
        let (scheduler, _) = build(&adapter, 2);

        let execution = run(&scheduler, &tasks, &NoopProgress, &CancelFlag::new()).await;

        assert_eq!(execution.failures.len(), 1);
        assert!(execution.failures[0].error.contains("timed out"));
    }

    #[tokio::test]
    async fn synthesis_failure_skips_monitoring() {
        let adapter = Arc::new(FakeResearch {
            fail_synthesis: true,
            ..FakeResearch::default()
        });
        let (scheduler, _) = build(&adapter, 3);
        let progress = Collect::default();

        let execution = run(&scheduler, &task_list(3), &progress, &CancelFlag::new()).await;

        assert!(execution.synthesis.is_none());
        assert!(execution.monitoring.is_none());
        assert!(execution.stage_errors[0].starts_with("synthesis"));
        assert_eq!(adapter.monitoring_calls(), 0);
        assert_eq!(progress.0.lock().unwrap().last().unwrap().completed_steps, 5);
    }

    #[tokio::test]
    async fn monitoring_failure_keeps_synthesis() {
        let adapter = Arc::new(FakeResearch {
            fail_monitoring: true,
            ..FakeResearch::default()
        });
        let (scheduler, _) = build(&adapter, 3);
        let execution = run(&scheduler, &task_list(2), &NoopProgress, &CancelFlag::new()).await;
        assert!(execution.synthesis.is_some());
        assert!(execution.monitoring.is_none());
        assert!(!execution.stages_succeeded());
    }

    #[tokio::test]
    async fn all_failed_tasks_skip_synthesis() {
        let tasks = task_list(2);
        let adapter = Arc::new(FakeResearch {
            failing: tasks.iter().cloned().collect(),
            ..FakeResearch::default()
        });
        let (scheduler, _) = build(&adapter, 2);
        let execution = run(&scheduler, &tasks, &NoopProgress, &CancelFlag::new()).await;
        assert!(execution.synthesis.is_none());
        assert!(adapter.synthesized_with().is_empty());
    }

    #[tokio::test]
    async fn cancellation_stops_dispatch_and_keeps_in_flight_results() {
        let cancel = CancelFlag::new();
        let tasks = task_list(6);
        let adapter = Arc::new(FakeResearch {
            delay_ms: 20,
            cancel_after_first_call: Some(cancel.clone()),
            ..FakeResearch::default()
        });
        let (scheduler, _) = build(&adapter, 2);

        let execution = run(&scheduler, &tasks, &NoopProgress, &cancel).await;

        assert!(execution.cancelled);
        assert!(execution.synthesis.is_none());
        // The first two tasks were already dispatched and drain normally.
        assert!(!execution.results.is_empty());
        assert!(execution.results.len() <= 2);
        assert_eq!(execution.results.len() + execution.failures.len(), 6);
        assert!(
            execution
                .failures
                .iter()
                .all(|f| f.error == "cancelled before dispatch")
        );
        assert!(adapter.calls() <= 2);
    }
}

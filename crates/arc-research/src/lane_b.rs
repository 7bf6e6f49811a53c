//! Lane B orchestrator: quota-bounded deep research on promoted ideas.
//!
//! One run per date. Candidates are the best-ranked ideas still in `new`
//! status that were not already researched in the current windows. Admitted
//! ideas are researched one after another; the parallelism lives inside each
//! idea's task set. Every idea ends as a persisted packet version, complete
//! or not, and complete packets also produce a decision brief.

use std::sync::Arc;

use arc_config::{ArcConfig, ResearchConfig};
use arc_core::entities::{Admission, DecisionBrief, IdeaCard, LaneOutcomeRecord, PromotedIdea};
use arc_core::enums::{Lane, PacketStatus, RunStatus};
use arc_core::ids::{PREFIX_OUTCOME, PREFIX_RUN, generate_id};
use arc_core::ports::{IdeaStore, Notifier, PacketStore, ResearchAdapter, RunLedger, UsageSource};
use arc_telemetry::TelemetrySink;
use chrono::{NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ResearchError;
use crate::packet::{CompletionChecker, assemble, build_brief};
use crate::progress::ProgressObserver;
use crate::quota::QuotaManager;
use crate::scheduler::{CancelFlag, ResearchScheduler};
use crate::versioning::PacketVersioner;

/// Collaborators wired in by the composition root.
#[derive(Clone)]
pub struct LaneBDeps {
    pub ideas: Arc<dyn IdeaStore>,
    pub research: Arc<dyn ResearchAdapter>,
    pub packets: Arc<dyn PacketStore>,
    pub usage: Arc<dyn UsageSource>,
    pub notifier: Arc<dyn Notifier>,
    pub ledger: Arc<dyn RunLedger>,
    pub telemetry: Arc<dyn TelemetrySink>,
}

#[derive(Debug, Clone, Default)]
pub struct LaneBOptions {
    /// Manual run: admit past the quota caps.
    pub force: bool,
    /// Research at most this many ideas.
    pub max_ideas: Option<u32>,
    /// Replace the configured research task list.
    pub tasks: Option<Vec<String>>,
    pub cancel: CancelFlag,
}

/// Outcome for one researched idea.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IdeaResearchSummary {
    pub idea_id: String,
    pub ticker: String,
    pub packet_id: String,
    pub version: u32,
    pub status: PacketStatus,
    pub completion_score: u8,
    pub degraded: bool,
    pub failed_tasks: Vec<String>,
    pub brief_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LaneBRunReport {
    pub run_id: String,
    pub run_date: NaiveDate,
    pub status: RunStatus,
    pub error: Option<String>,
    pub candidates: u32,
    pub admission: Option<Admission>,
    /// Quota allowed no research today. Not a failure.
    pub quota_exhausted: bool,
    pub cancelled: bool,
    pub ideas: Vec<IdeaResearchSummary>,
    pub briefs: Vec<DecisionBrief>,
    pub notify_error: Option<String>,
}

impl LaneBRunReport {
    fn new(run_id: String, run_date: NaiveDate) -> Self {
        Self {
            run_id,
            run_date,
            status: RunStatus::Running,
            error: None,
            candidates: 0,
            admission: None,
            quota_exhausted: false,
            cancelled: false,
            ideas: Vec::new(),
            briefs: Vec::new(),
            notify_error: None,
        }
    }
}

pub struct LaneBOrchestrator {
    deps: LaneBDeps,
    quota: QuotaManager,
    scheduler: ResearchScheduler,
    checker: CompletionChecker,
    versioner: PacketVersioner,
    config: ResearchConfig,
    progress: Arc<dyn ProgressObserver>,
}

impl LaneBOrchestrator {
    #[must_use]
    pub fn new(deps: LaneBDeps, config: &ArcConfig, progress: Arc<dyn ProgressObserver>) -> Self {
        let scheduler = ResearchScheduler::new(
            Arc::clone(&deps.research),
            Arc::clone(&deps.telemetry),
            &config.research,
        );
        Self {
            quota: QuotaManager::new(config.quota.clone(), Utc::now().date_naive()),
            scheduler,
            checker: CompletionChecker::new(&config.research),
            versioner: PacketVersioner::new(config.research.diffable_fields.clone()),
            config: config.research.clone(),
            progress,
            deps,
        }
    }

    #[must_use]
    pub const fn quota(&self) -> &QuotaManager {
        &self.quota
    }

    /// Execute one research run for `run_date`.
    ///
    /// Never returns an error: fatal failures come back as a `failed` report,
    /// an already-claimed date as `skipped`. A cancelled run is reported as
    /// failed so the date can be run again.
    pub async fn run(&self, run_date: NaiveDate, options: &LaneBOptions) -> LaneBRunReport {
        let mut report = LaneBRunReport::new(generate_id(PREFIX_RUN), run_date);
        let run_id = report.run_id.clone();

        match self.deps.ledger.begin_run(Lane::LaneB, run_date, &run_id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(%run_id, %run_date, "lane B already ran for this date, skipping");
                report.status = RunStatus::Skipped;
                self.record_outcome(&report);
                return report;
            }
            Err(e) => {
                report.status = RunStatus::Failed;
                report.error = Some(ResearchError::Ledger(e).to_string());
                self.record_outcome(&report);
                return report;
            }
        }

        let result = self.execute(&mut report, options).await;
        match result {
            Ok(()) if report.cancelled => {
                report.status = RunStatus::Failed;
                report.error = Some("run cancelled".to_string());
            }
            Ok(()) => report.status = RunStatus::Completed,
            Err(e) => {
                let error = e.to_string();
                tracing::error!(%run_id, %error, "lane B run failed");
                report.status = RunStatus::Failed;
                report.error = Some(error);
            }
        }

        if let Err(e) = self
            .deps
            .ledger
            .finish_run(Lane::LaneB, run_date, report.status, report.error.as_deref())
            .await
        {
            tracing::warn!(%run_id, error = %e, "failed to record lane B run status");
        }

        tracing::info!(
            %run_id,
            status = %report.status,
            researched = report.ideas.len(),
            briefs = report.briefs.len(),
            quota_exhausted = report.quota_exhausted,
            "lane B run finished"
        );
        self.record_outcome(&report);
        report
    }

    async fn execute(
        &self,
        report: &mut LaneBRunReport,
        options: &LaneBOptions,
    ) -> Result<(), ResearchError> {
        let day = report.run_date;
        let completed = self
            .quota
            .load_usage(self.deps.usage.as_ref(), day)
            .await
            .map_err(ResearchError::Usage)?;

        let mut candidates: Vec<IdeaCard> = self
            .deps
            .ideas
            .promotable_ideas()
            .await
            .map_err(ResearchError::Ideas)?
            .into_iter()
            .filter(|card| !completed.contains(&card.id))
            .collect();
        if let Some(max) = options.max_ideas {
            candidates.truncate(usize::try_from(max).unwrap_or(usize::MAX));
        }
        report.candidates = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
        if candidates.is_empty() {
            tracing::info!(run_id = %report.run_id, "no promotable ideas");
            return Ok(());
        }

        let admission = self.quota.admit(day, report.candidates, options.force);
        let admitted = usize::try_from(admission.admitted).unwrap_or(usize::MAX);
        report.quota_exhausted = admission.is_exhausted();
        report.admission = Some(admission);
        if report.quota_exhausted {
            return Ok(());
        }

        let tasks = options.tasks.as_ref().unwrap_or(&self.config.tasks);
        let checker = options
            .tasks
            .as_ref()
            .map_or_else(|| self.checker.clone(), |t| self.checker.clone().with_tasks(t.clone()));

        for card in candidates.into_iter().take(admitted) {
            if options.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            self.research_idea(report, &card, tasks, &checker, &options.cancel)
                .await?;
        }
        if options.cancel.is_cancelled() {
            report.cancelled = true;
        }

        if !report.briefs.is_empty() {
            if let Err(e) = self.deps.notifier.notify_briefs(&report.briefs).await {
                tracing::warn!(run_id = %report.run_id, error = %e, "brief notification failed");
                report.notify_error = Some(e.to_string());
            }
        }
        Ok(())
    }

    async fn research_idea(
        &self,
        report: &mut LaneBRunReport,
        card: &IdeaCard,
        tasks: &[String],
        checker: &CompletionChecker,
        cancel: &CancelFlag,
    ) -> Result<(), ResearchError> {
        let idea = PromotedIdea::from_card(card, Utc::now());
        tracing::info!(
            run_id = %report.run_id,
            idea_id = %idea.idea_id,
            ticker = %idea.ticker,
            "researching idea"
        );
        let execution = self
            .scheduler
            .execute(&report.run_id, &idea, tasks, self.progress.as_ref(), cancel)
            .await;

        // A cut-short idea keeps its queue slot and its quota.
        if execution.cancelled {
            tracing::info!(idea_id = %idea.idea_id, "research cancelled, idea left unpromoted");
        } else {
            self.deps
                .usage
                .record_admission(&card.id, report.run_date, &report.run_id)
                .await
                .map_err(ResearchError::Persist)?;
            self.deps
                .ideas
                .mark_promoted(&card.id)
                .await
                .map_err(ResearchError::Persist)?;
        }
        let content = assemble(&idea, execution, checker);

        let previous = self
            .deps
            .packets
            .latest_packet(&idea.idea_id)
            .await
            .map_err(ResearchError::Persist)?;
        let now = Utc::now();
        let packet = self
            .versioner
            .create_version(content, previous.as_ref(), now)?;
        self.deps
            .packets
            .save_packet(&packet)
            .await
            .map_err(ResearchError::Persist)?;

        let brief = build_brief(&packet, self.config.max_position_pct, now);
        if let Some(brief) = &brief {
            self.deps
                .packets
                .save_brief(brief)
                .await
                .map_err(ResearchError::Persist)?;
        }

        let content = &packet.content;
        report.ideas.push(IdeaResearchSummary {
            idea_id: packet.idea_id.clone(),
            ticker: content.ticker.clone(),
            packet_id: packet.id.clone(),
            version: packet.version,
            status: content.status,
            completion_score: content.completion.score,
            degraded: content.degraded,
            failed_tasks: content.failed_tasks.iter().map(|f| f.task_id.clone()).collect(),
            brief_id: brief.as_ref().map(|b| b.id.clone()),
        });
        report.briefs.extend(brief);
        Ok(())
    }

    fn record_outcome(&self, report: &LaneBRunReport) {
        let summary = serde_json::json!({
            "candidates": report.candidates,
            "admitted": report.admission.as_ref().map_or(0, |a| a.admitted),
            "researched": report.ideas.len(),
            "complete": report.ideas.iter().filter(|i| i.status == PacketStatus::Complete).count(),
            "briefs": report.briefs.len(),
            "quota_exhausted": report.quota_exhausted,
            "cancelled": report.cancelled,
        });
        self.deps.telemetry.record_outcome(LaneOutcomeRecord {
            id: generate_id(PREFIX_OUTCOME),
            run_id: report.run_id.clone(),
            lane: Lane::LaneB,
            run_date: report.run_date,
            status: report.status,
            selected_new_fraction: None,
            summary,
            error: report.error.clone(),
            recorded_at: Utc::now(),
        });
    }
}

//! Lane A orchestrator: the daily discovery run.
//!
//! ```text
//! fetching_universe → shortlisting → enriching → gating → ranking
//!   → selecting → persisting → notifying → done
//! ```
//!
//! Steps run strictly in sequence, each at most once. Any step may move the run
//! to `failed`; a failed run is recorded and the next cycle starts fresh.
//! Enrichment failures skip the affected member. A notifier failure is
//! recorded but does not fail the run, since the ideas are already persisted.

use std::sync::Arc;
use std::time::Instant;

use arc_config::{ArcConfig, LaneAConfig};
use arc_core::entities::{
    GateOutcome, IdeaCard, IdeaDraft, LaneOutcomeRecord, SeenContext, TelemetryRecord,
    UniverseMember,
};
use arc_core::enums::{Lane, LaneAStep, RunStatus, TaskOutcome};
use arc_core::errors::CoreError;
use arc_core::ids::{PREFIX_IDEA, PREFIX_OUTCOME, PREFIX_RUN, PREFIX_TELEMETRY, generate_id};
use arc_core::metrics::{LaneARunMetrics, SelectionComposition, StepCounts};
use arc_core::ports::{Enricher, IdeaStore, NoveltyStore, Notifier, RunLedger, UniverseProvider};
use arc_telemetry::TelemetrySink;
use chrono::{NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;
use crate::gates::GateEngine;
use crate::novelty::{NoveltyEngine, dedupe_universe};
use crate::ranking::RankingEngine;

const ENRICH_TASK: &str = "enrich";

/// Collaborators wired in by the composition root.
#[derive(Clone)]
pub struct LaneADeps {
    pub universe: Arc<dyn UniverseProvider>,
    pub novelty: Arc<dyn NoveltyStore>,
    pub enricher: Arc<dyn Enricher>,
    pub ideas: Arc<dyn IdeaStore>,
    pub notifier: Arc<dyn Notifier>,
    pub ledger: Arc<dyn RunLedger>,
    pub telemetry: Arc<dyn TelemetrySink>,
}

/// A member whose enrichment call failed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ItemFailure {
    pub ticker: String,
    pub error: String,
}

/// A draft that was enriched but failed admission.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GateRejection {
    pub ticker: String,
    pub failures: Vec<GateOutcome>,
}

/// Everything a Lane A run produced, including partial results of a failed run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LaneARunReport {
    pub run_id: String,
    pub run_date: NaiveDate,
    pub status: RunStatus,
    /// Step that failed, for failed runs.
    pub failed_step: Option<LaneAStep>,
    pub error: Option<String>,
    pub metrics: LaneARunMetrics,
    pub ideas: Vec<IdeaCard>,
    pub enrichment_failures: Vec<ItemFailure>,
    pub gate_rejections: Vec<GateRejection>,
    pub notify_error: Option<String>,
}

/// Mutable state threaded through one run.
struct RunContext {
    step: LaneAStep,
    run_id: String,
    run_date: NaiveDate,
    metrics: LaneARunMetrics,
    universe: Vec<UniverseMember>,
    shortlist: Vec<UniverseMember>,
    drafts: Vec<IdeaDraft>,
    ranked: Vec<IdeaDraft>,
    ideas: Vec<IdeaCard>,
    enrichment_failures: Vec<ItemFailure>,
    gate_rejections: Vec<GateRejection>,
    notify_error: Option<String>,
}

impl RunContext {
    fn new(run_id: String, run_date: NaiveDate) -> Self {
        Self {
            step: LaneAStep::FetchingUniverse,
            metrics: LaneARunMetrics::new(run_id.clone(), run_date),
            run_id,
            run_date,
            universe: Vec::new(),
            shortlist: Vec::new(),
            drafts: Vec::new(),
            ranked: Vec::new(),
            ideas: Vec::new(),
            enrichment_failures: Vec::new(),
            gate_rejections: Vec::new(),
            notify_error: None,
        }
    }

    fn advance(&mut self, next: LaneAStep) -> Result<(), DiscoveryError> {
        if !self.step.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                entity_type: "lane_a_run".into(),
                id: self.run_id.clone(),
                from: self.step.to_string(),
                to: next.to_string(),
            }
            .into());
        }
        tracing::debug!(run_id = %self.run_id, from = %self.step, to = %next, "lane A step");
        self.step = next;
        Ok(())
    }

    fn into_report(self, status: RunStatus, error: Option<String>) -> LaneARunReport {
        let failed_step = (status == RunStatus::Failed).then_some(self.step);
        LaneARunReport {
            run_id: self.run_id,
            run_date: self.run_date,
            status,
            failed_step,
            error,
            metrics: self.metrics,
            ideas: self.ideas,
            enrichment_failures: self.enrichment_failures,
            gate_rejections: self.gate_rejections,
            notify_error: self.notify_error,
        }
    }
}

pub struct LaneAOrchestrator {
    deps: LaneADeps,
    novelty: NoveltyEngine,
    gates: GateEngine,
    ranking: RankingEngine,
    config: LaneAConfig,
}

impl LaneAOrchestrator {
    #[must_use]
    pub fn new(deps: LaneADeps, config: &ArcConfig) -> Self {
        Self {
            deps,
            novelty: NoveltyEngine::new(config.novelty.clone()),
            gates: GateEngine::new(config.gates.clone()),
            ranking: RankingEngine::new(&config.ranking),
            config: config.lane_a.clone(),
        }
    }

    /// Execute one discovery run for `run_date`.
    ///
    /// Never returns an error: fatal failures come back as a `failed` report,
    /// an already-claimed date as `skipped`.
    pub async fn run(&self, run_date: NaiveDate) -> LaneARunReport {
        let run_id = generate_id(PREFIX_RUN);
        let mut ctx = RunContext::new(run_id.clone(), run_date);

        match self.deps.ledger.begin_run(Lane::LaneA, run_date, &run_id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(%run_id, %run_date, "lane A already ran for this date, skipping");
                let report = ctx.into_report(RunStatus::Skipped, None);
                self.record_outcome(&report);
                return report;
            }
            Err(e) => {
                let error = DiscoveryError::Ledger(e).to_string();
                tracing::error!(%run_id, %error, "lane A could not claim run");
                ctx.step = LaneAStep::Failed;
                let report = ctx.into_report(RunStatus::Failed, Some(error));
                self.record_outcome(&report);
                return report;
            }
        }

        let result = self.execute(&mut ctx).await;
        let (status, error) = match result {
            Ok(()) => (RunStatus::Completed, None),
            Err(e) => {
                let error = e.to_string();
                tracing::error!(%run_id, step = %ctx.step, %error, "lane A run failed");
                (RunStatus::Failed, Some(error))
            }
        };

        if let Err(e) = self
            .deps
            .ledger
            .finish_run(Lane::LaneA, run_date, status, error.as_deref())
            .await
        {
            tracing::warn!(%run_id, error = %e, "failed to record lane A run status");
        }

        let report = ctx.into_report(status, error);
        if report.status == RunStatus::Completed {
            let s = &report.metrics.selection;
            tracing::info!(
                %run_id,
                universe = report.metrics.universe_size,
                selected = s.selected,
                new_pct = s.new_pct,
                reappearance_pct = s.reappearance_pct,
                "lane A run completed"
            );
        }
        self.record_outcome(&report);
        report
    }

    async fn execute(&self, ctx: &mut RunContext) -> Result<(), DiscoveryError> {
        self.fetch_universe(ctx).await?;
        ctx.advance(LaneAStep::Shortlisting)?;
        self.shortlist(ctx).await?;
        ctx.advance(LaneAStep::Enriching)?;
        self.enrich(ctx).await;
        ctx.advance(LaneAStep::Gating)?;
        self.gate(ctx)?;
        ctx.advance(LaneAStep::Ranking)?;
        self.rank(ctx)?;
        ctx.advance(LaneAStep::Selecting)?;
        self.select(ctx)?;
        ctx.advance(LaneAStep::Persisting)?;
        self.persist(ctx).await?;
        ctx.advance(LaneAStep::Notifying)?;
        self.notify(ctx).await;
        ctx.advance(LaneAStep::Done)
    }

    async fn fetch_universe(&self, ctx: &mut RunContext) -> Result<(), DiscoveryError> {
        let fetched = self
            .deps
            .universe
            .fetch_universe()
            .await
            .map_err(DiscoveryError::UniverseFetch)?;
        if fetched.is_empty() {
            return Err(DiscoveryError::EmptyUniverse);
        }
        let (universe, dropped) = dedupe_universe(fetched);
        if dropped > 0 {
            tracing::warn!(run_id = %ctx.run_id, dropped, "duplicate tickers in universe");
        }
        ctx.metrics.universe_size = count(universe.len());
        ctx.metrics.record_step(
            LaneAStep::FetchingUniverse,
            StepCounts {
                succeeded: count(universe.len()),
                failed: 0,
                skipped: count(dropped),
            },
        );
        ctx.universe = universe;
        Ok(())
    }

    async fn shortlist(&self, ctx: &mut RunContext) -> Result<(), DiscoveryError> {
        let universe = std::mem::take(&mut ctx.universe);
        let total = universe.len();
        let shortlist = self
            .novelty
            .shortlist(universe, self.deps.novelty.as_ref(), ctx.run_date)
            .await?;
        ctx.metrics.shortlist = shortlist.composition;
        ctx.metrics.record_step(
            LaneAStep::Shortlisting,
            StepCounts {
                succeeded: count(shortlist.len()),
                failed: 0,
                skipped: count(total - shortlist.len()),
            },
        );
        ctx.shortlist = shortlist.members;
        Ok(())
    }

    async fn enrich(&self, ctx: &mut RunContext) {
        let mut counts = StepCounts::default();
        for member in std::mem::take(&mut ctx.shortlist) {
            let started = Instant::now();
            let result = self.deps.enricher.enrich(&member).await;
            let duration_ms = elapsed_ms(started);

            let outcome = match result {
                Ok(draft) if draft.ticker != member.ticker => Err(format!(
                    "enricher returned a draft for {} instead of {}",
                    draft.ticker, member.ticker
                )),
                Ok(mut draft) => {
                    draft.novelty = member.novelty;
                    ctx.drafts.push(draft);
                    Ok(())
                }
                Err(e) => Err(e.to_string()),
            };

            match outcome {
                Ok(()) => {
                    counts.succeeded += 1;
                    self.record_task(ctx, TaskOutcome::Succeeded, duration_ms, None);
                }
                Err(error) => {
                    counts.failed += 1;
                    tracing::warn!(run_id = %ctx.run_id, ticker = %member.ticker, %error, "enrichment failed");
                    self.record_task(
                        ctx,
                        TaskOutcome::Failed,
                        duration_ms,
                        Some(error.clone()),
                    );
                    ctx.enrichment_failures.push(ItemFailure {
                        ticker: member.ticker,
                        error,
                    });
                }
            }
        }
        ctx.metrics.enrichment = counts;
        ctx.metrics.record_step(LaneAStep::Enriching, counts);
    }

    fn gate(&self, ctx: &mut RunContext) -> Result<(), DiscoveryError> {
        let mut passed = Vec::new();
        let stats = &mut ctx.metrics.gates;
        for mut draft in std::mem::take(&mut ctx.drafts) {
            let evaluation = self.gates.evaluate(&draft);
            stats.evaluated += 1;
            if evaluation.passed {
                stats.passed += 1;
            } else {
                stats.failed += 1;
                if evaluation.results.override_reason().is_some() {
                    stats.overrides += 1;
                }
                for failure in evaluation.failures() {
                    *stats.failures_by_gate.entry(failure.gate).or_default() += 1;
                }
                ctx.gate_rejections.push(GateRejection {
                    ticker: draft.ticker.clone(),
                    failures: evaluation.failures().cloned().collect(),
                });
            }
            draft.attach_gate_results(evaluation.results)?;
            if evaluation.passed {
                passed.push(draft);
            }
        }
        let counts = StepCounts {
            succeeded: stats.passed,
            failed: stats.failed,
            skipped: 0,
        };
        ctx.metrics.record_step(LaneAStep::Gating, counts);
        ctx.drafts = passed;
        Ok(())
    }

    fn rank(&self, ctx: &mut RunContext) -> Result<(), DiscoveryError> {
        ctx.ranked = self.ranking.rank(std::mem::take(&mut ctx.drafts))?;
        ctx.metrics.ranked = count(ctx.ranked.len());
        ctx.metrics.record_step(
            LaneAStep::Ranking,
            StepCounts {
                succeeded: count(ctx.ranked.len()),
                ..StepCounts::default()
            },
        );
        Ok(())
    }

    fn select(&self, ctx: &mut RunContext) -> Result<(), DiscoveryError> {
        let ranked = std::mem::take(&mut ctx.ranked);
        let total = ranked.len();
        let now = Utc::now();
        let cards = ranked
            .into_iter()
            .take(self.config.top_n)
            .map(|draft| IdeaCard::from_draft(draft, generate_id(PREFIX_IDEA), ctx.run_date, now))
            .collect::<Result<Vec<_>, _>>()?;

        ctx.metrics.selection = SelectionComposition::from_annotations(cards.iter().map(|c| &c.novelty));
        ctx.metrics.record_step(
            LaneAStep::Selecting,
            StepCounts {
                succeeded: count(cards.len()),
                failed: 0,
                skipped: count(total - cards.len()),
            },
        );
        ctx.ideas = cards;
        Ok(())
    }

    async fn persist(&self, ctx: &mut RunContext) -> Result<(), DiscoveryError> {
        self.deps
            .ideas
            .save_ideas(&ctx.ideas)
            .await
            .map_err(DiscoveryError::Persist)?;

        // Tickers are unique after dedupe, so each state is touched once.
        for card in &ctx.ideas {
            let context = SeenContext {
                seen_on: ctx.run_date,
                run_id: ctx.run_id.clone(),
                idea_id: Some(card.id.clone()),
                tags: vec![card.novelty.class.to_string(), card.style.to_string()],
            };
            self.deps
                .novelty
                .record_seen(&card.ticker, &context)
                .await
                .map_err(DiscoveryError::NoveltyStore)?;
        }
        ctx.metrics.record_step(
            LaneAStep::Persisting,
            StepCounts {
                succeeded: count(ctx.ideas.len()),
                ..StepCounts::default()
            },
        );
        Ok(())
    }

    async fn notify(&self, ctx: &mut RunContext) {
        let mut counts = StepCounts::default();
        if !self.config.notify || ctx.ideas.is_empty() {
            counts.skipped = 1;
        } else if let Err(e) = self.deps.notifier.notify_ideas(&ctx.ideas).await {
            tracing::warn!(run_id = %ctx.run_id, error = %e, "notification failed");
            counts.failed = 1;
            ctx.notify_error = Some(e.to_string());
        } else {
            counts.succeeded = 1;
        }
        ctx.metrics.record_step(LaneAStep::Notifying, counts);
    }

    fn record_task(
        &self,
        ctx: &RunContext,
        outcome: TaskOutcome,
        duration_ms: u64,
        error: Option<String>,
    ) {
        self.deps.telemetry.record_task(TelemetryRecord {
            id: generate_id(PREFIX_TELEMETRY),
            run_id: ctx.run_id.clone(),
            lane: Lane::LaneA,
            task_id: ENRICH_TASK.to_string(),
            idea_id: None,
            outcome,
            duration_ms,
            error,
            recorded_at: Utc::now(),
        });
    }

    fn record_outcome(&self, report: &LaneARunReport) {
        let selected_new_fraction = (report.status == RunStatus::Completed)
            .then(|| report.metrics.selection.new_fraction());
        self.deps.telemetry.record_outcome(LaneOutcomeRecord {
            id: generate_id(PREFIX_OUTCOME),
            run_id: report.run_id.clone(),
            lane: Lane::LaneA,
            run_date: report.run_date,
            status: report.status,
            selected_new_fraction,
            summary: serde_json::to_value(&report.metrics).unwrap_or_default(),
            error: report.error.clone(),
            recorded_at: Utc::now(),
        });
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

//! Packet assembly, completion checking, and decision briefs.

use std::collections::BTreeMap;

use arc_config::ResearchConfig;
use arc_core::entities::{
    CompletionReport, DecisionBrief, PacketContent, PromotedIdea, ResearchPacket, SizingGuidance,
    SynthesisResult,
};
use arc_core::enums::{PacketStatus, Verdict};
use arc_core::ids::{PREFIX_BRIEF, generate_id};
use chrono::{DateTime, Utc};

use crate::scheduler::ResearchExecution;

/// Scores a packet against the required sections.
///
/// The checklist has one entry per configured research task, four for the
/// synthesis (present, thesis, scenario narratives, probabilities summing to
/// one), and two for the monitoring plan (KPIs, invalidation triggers).
#[derive(Debug, Clone)]
pub struct CompletionChecker {
    required_tasks: Vec<String>,
    min_grounding_ratio: f64,
    min_ic_confidence: f64,
    probability_tolerance: f64,
}

impl CompletionChecker {
    #[must_use]
    pub fn new(config: &ResearchConfig) -> Self {
        Self {
            required_tasks: config.tasks.clone(),
            min_grounding_ratio: config.min_grounding_ratio,
            min_ic_confidence: config.min_ic_confidence,
            probability_tolerance: config.probability_tolerance,
        }
    }

    /// Same checker with a different required task list.
    #[must_use]
    pub fn with_tasks(mut self, tasks: Vec<String>) -> Self {
        self.required_tasks = tasks;
        self
    }

    #[must_use]
    pub fn check(&self, content: &PacketContent) -> CompletionReport {
        let mut checklist: Vec<(String, bool)> = self
            .required_tasks
            .iter()
            .map(|task| (format!("task:{task}"), content.task_results.contains_key(task)))
            .collect();

        let synthesis = content.synthesis.as_ref();
        checklist.push(("synthesis".into(), synthesis.is_some()));
        checklist.push((
            "synthesis.thesis".into(),
            synthesis.is_some_and(|s| !s.thesis.trim().is_empty()),
        ));
        checklist.push((
            "synthesis.scenarios".into(),
            synthesis.is_some_and(scenarios_described),
        ));
        checklist.push((
            "synthesis.probabilities".into(),
            synthesis.is_some_and(|s| {
                (s.probability_mass() - 1.0).abs() <= self.probability_tolerance
            }),
        ));

        let monitoring = content.monitoring.as_ref();
        checklist.push(("monitoring.kpis".into(), monitoring.is_some_and(|m| !m.kpis.is_empty())));
        checklist.push((
            "monitoring.invalidation_triggers".into(),
            monitoring.is_some_and(|m| !m.invalidation_triggers.is_empty()),
        ));

        let total = checklist.len();
        let missing: Vec<String> = checklist
            .into_iter()
            .filter_map(|(item, ok)| (!ok).then_some(item))
            .collect();
        let satisfied = total - missing.len();
        let score = if total == 0 {
            100
        } else {
            u8::try_from(satisfied * 100 / total).unwrap_or(100)
        };

        let complete = missing.is_empty();
        let evidence_grounding_ratio = grounding_ratio(content);
        let ic_bundle_eligible = complete
            && !content.degraded
            && evidence_grounding_ratio >= self.min_grounding_ratio
            && content.confidence >= self.min_ic_confidence;

        CompletionReport {
            score,
            complete,
            ic_bundle_eligible,
            missing,
            evidence_grounding_ratio,
        }
    }
}

fn scenarios_described(synthesis: &SynthesisResult) -> bool {
    [&synthesis.bull, &synthesis.base, &synthesis.bear]
        .iter()
        .all(|leg| !leg.narrative.trim().is_empty() && leg.probability >= 0.0)
}

/// Grounded evidence references over all evidence references, across every
/// task result. Zero when no evidence was cited.
#[allow(clippy::cast_precision_loss)]
fn grounding_ratio(content: &PacketContent) -> f64 {
    let (grounded, total) = content
        .task_results
        .values()
        .flat_map(|r| r.evidence.iter())
        .fold((0usize, 0usize), |(g, t), e| (g + usize::from(e.grounded), t + 1));
    if total == 0 {
        0.0
    } else {
        grounded as f64 / total as f64
    }
}

/// Build packet content from one idea's research and score it.
///
/// Confidence starts from the synthesis confidence (or the mean task
/// confidence without a synthesis) and is scaled down by the share of
/// tasks that failed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn assemble(
    idea: &PromotedIdea,
    execution: ResearchExecution,
    checker: &CompletionChecker,
) -> PacketContent {
    let attempted = execution.results.len() + execution.failures.len();
    let failed_share = if attempted == 0 {
        1.0
    } else {
        execution.failures.len() as f64 / attempted as f64
    };
    let base_confidence = execution.synthesis.as_ref().map_or_else(
        || {
            if execution.results.is_empty() {
                0.0
            } else {
                execution.results.iter().map(|r| r.confidence).sum::<f64>()
                    / execution.results.len() as f64
            }
        },
        |s| s.confidence,
    );
    let confidence = (base_confidence * (1.0 - failed_share)).clamp(0.0, 1.0);
    let stages_failed = execution.cancelled || !execution.stages_succeeded();

    let task_results: BTreeMap<_, _> = execution
        .results
        .into_iter()
        .map(|r| (r.task_id.clone(), r))
        .collect();

    let mut content = PacketContent {
        idea_id: idea.idea_id.clone(),
        ticker: idea.ticker.clone(),
        task_results,
        degraded: !execution.failures.is_empty(),
        failed_tasks: execution.failures,
        synthesis: execution.synthesis,
        monitoring: execution.monitoring,
        stage_errors: execution.stage_errors,
        confidence,
        status: PacketStatus::Failed,
        completion: CompletionReport::default(),
    };
    content.completion = checker.check(&content);
    content.status = if stages_failed {
        PacketStatus::Failed
    } else if content.completion.complete {
        PacketStatus::Complete
    } else {
        PacketStatus::Incomplete
    };
    content
}

/// Summarise a complete packet for humans. `None` for anything not complete.
#[must_use]
pub fn build_brief(
    packet: &ResearchPacket,
    max_position_pct: f64,
    now: DateTime<Utc>,
) -> Option<DecisionBrief> {
    let content = &packet.content;
    if content.status != PacketStatus::Complete || !packet.is_complete() {
        return None;
    }
    let synthesis = content.synthesis.as_ref()?;
    let verdict = synthesis.recommendation;
    let conviction = content.confidence.clamp(0.0, 1.0);

    let sizing = if verdict == Verdict::Buy {
        SizingGuidance {
            max_position_pct: max_position_pct * conviction,
            conviction,
            rationale: format!(
                "{max_position_pct:.1}% ceiling scaled by {:.0}% conviction",
                conviction * 100.0
            ),
        }
    } else {
        SizingGuidance {
            max_position_pct: 0.0,
            conviction,
            rationale: format!("no position on a {verdict} verdict"),
        }
    };

    Some(DecisionBrief {
        id: generate_id(PREFIX_BRIEF),
        idea_id: packet.idea_id.clone(),
        packet_id: packet.id.clone(),
        packet_version: packet.version,
        ticker: content.ticker.clone(),
        verdict,
        expected_value: synthesis.expected_value,
        thesis_summary: synthesis.thesis.clone(),
        sizing,
        key_risks: content
            .monitoring
            .as_ref()
            .map(|m| m.invalidation_triggers.clone())
            .unwrap_or_default(),
        ic_bundle_eligible: content.completion.ic_bundle_eligible,
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use arc_core::entities::TaskFailure;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::fakes::{monitoring, promoted_idea, synthesis, task_result};

    fn config() -> ResearchConfig {
        ResearchConfig {
            tasks: vec!["business_overview_report".into(), "valuation_analysis".into()],
            ..ResearchConfig::default()
        }
    }

    fn checker() -> CompletionChecker {
        CompletionChecker::new(&config())
    }

    fn full_execution() -> ResearchExecution {
        ResearchExecution {
            results: vec![
                task_result("business_overview_report", true),
                task_result("valuation_analysis", true),
            ],
            synthesis: Some(synthesis(Verdict::Buy)),
            monitoring: Some(monitoring()),
            ..ResearchExecution::default()
        }
    }

    fn packet(content: PacketContent) -> ResearchPacket {
        ResearchPacket {
            id: "pkt-00000001".into(),
            idea_id: content.idea_id.clone(),
            version: 1,
            previous_id: None,
            content,
            diff: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn full_packet_is_complete_and_eligible() {
        let content = assemble(&promoted_idea("idea-1"), full_execution(), &checker());
        assert_eq!(content.status, PacketStatus::Complete);
        assert_eq!(content.completion.score, 100);
        assert!(content.completion.complete);
        assert!(content.completion.ic_bundle_eligible);
        assert!(content.completion.missing.is_empty());
        assert!((content.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn missing_task_makes_packet_incomplete() {
        let mut execution = full_execution();
        execution.results.pop();
        let content = assemble(&promoted_idea("idea-1"), execution, &checker());
        assert_eq!(content.status, PacketStatus::Incomplete);
        assert_eq!(content.completion.missing, vec!["task:valuation_analysis"]);
        // 7 of 8 checklist entries satisfied.
        assert_eq!(content.completion.score, 87);
    }

    #[test]
    fn failed_tasks_degrade_confidence() {
        let mut execution = full_execution();
        execution.failures.push(TaskFailure {
            task_id: "risk_assessment".into(),
            error: "timed out after 300s".into(),
            duration_ms: 300_000,
        });
        let content = assemble(&promoted_idea("idea-1"), execution, &checker());
        assert!(content.degraded);
        // One of three attempted tasks failed.
        assert!((content.confidence - 0.8 * 2.0 / 3.0).abs() < 1e-9);
        // Complete against the configured tasks, but not committee-ready.
        assert!(content.completion.complete);
        assert!(!content.completion.ic_bundle_eligible);
    }

    #[test]
    fn stage_failure_fails_the_packet() {
        let mut execution = full_execution();
        execution.monitoring = None;
        execution.stage_errors.push("monitoring: timed out after 30s".into());
        let content = assemble(&promoted_idea("idea-1"), execution, &checker());
        assert_eq!(content.status, PacketStatus::Failed);
        assert!(
            content
                .completion
                .missing
                .contains(&"monitoring.kpis".to_string())
        );
    }

    #[test]
    fn probabilities_must_sum_to_one() {
        let mut execution = full_execution();
        if let Some(s) = execution.synthesis.as_mut() {
            s.bear.probability = 0.5;
        }
        let content = assemble(&promoted_idea("idea-1"), execution, &checker());
        assert_eq!(content.completion.missing, vec!["synthesis.probabilities"]);
    }

    #[test]
    fn ungrounded_evidence_blocks_committee_bundle() {
        let mut execution = full_execution();
        execution.results = vec![
            task_result("business_overview_report", false),
            task_result("valuation_analysis", true),
        ];
        let content = assemble(&promoted_idea("idea-1"), execution, &checker());
        assert!(content.completion.complete);
        assert!((content.completion.evidence_grounding_ratio - 0.5).abs() < 1e-9);
        assert!(!content.completion.ic_bundle_eligible);
    }

    #[test]
    fn buy_brief_scales_position_by_confidence() {
        let content = assemble(&promoted_idea("idea-1"), full_execution(), &checker());
        let brief = build_brief(&packet(content), 5.0, Utc::now()).unwrap();
        assert_eq!(brief.verdict, Verdict::Buy);
        assert!((brief.sizing.max_position_pct - 4.0).abs() < 1e-9);
        assert_eq!(brief.key_risks.len(), 1);
        assert_eq!(brief.packet_version, 1);
        assert!(brief.id.starts_with("brf-"));
    }

    #[test]
    fn non_buy_brief_sizes_at_zero() {
        let mut execution = full_execution();
        execution.synthesis = Some(synthesis(Verdict::Watch));
        let content = assemble(&promoted_idea("idea-1"), execution, &checker());
        let brief = build_brief(&packet(content), 5.0, Utc::now()).unwrap();
        assert!(brief.sizing.max_position_pct.abs() < f64::EPSILON);
    }

    #[test]
    fn incomplete_packet_has_no_brief() {
        let mut execution = full_execution();
        execution.results.clear();
        let content = assemble(&promoted_idea("idea-1"), execution, &checker());
        assert!(build_brief(&packet(content), 5.0, Utc::now()).is_none());
    }
}

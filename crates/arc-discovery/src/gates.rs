//! Admission gate battery.
//!
//! Five gates run in fixed order against every enriched draft. All gates are
//! evaluated so the full failure list is always available; the aggregate
//! verdict fails if any gate fails. Failures are data, not errors.
//!
//! The downside-shape gate has binary override semantics: any dominant risk
//! flag fails it outright, whatever the leverage ratio says. Novelty is not
//! an input to any gate.

use arc_config::GatesConfig;
use arc_core::entities::{GateOutcome, GateResults, IdeaDraft};
use arc_core::enums::{GateId, OverrideReason};

/// Verdict of the full battery for one draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateEvaluation {
    pub passed: bool,
    pub results: GateResults,
}

impl GateEvaluation {
    pub fn failures(&self) -> impl Iterator<Item = &GateOutcome> {
        self.results.failures()
    }
}

#[derive(Debug, Clone)]
pub struct GateEngine {
    config: GatesConfig,
}

impl GateEngine {
    #[must_use]
    pub const fn new(config: GatesConfig) -> Self {
        Self { config }
    }

    /// Run every gate against `draft`.
    #[must_use]
    pub fn evaluate(&self, draft: &IdeaDraft) -> GateEvaluation {
        let outcomes: Vec<GateOutcome> = GateId::ALL
            .iter()
            .map(|gate| match gate {
                GateId::DataSufficiency => self.data_sufficiency(draft),
                GateId::Coherence => self.coherence(draft),
                GateId::EdgeClaim => self.edge_claim(draft),
                GateId::DownsideShape => self.downside_shape(draft),
                GateId::StyleFit => self.style_fit(draft),
            })
            .collect();
        let results = GateResults { outcomes };
        GateEvaluation {
            passed: results.passed(),
            results,
        }
    }

    fn data_sufficiency(&self, draft: &IdeaDraft) -> GateOutcome {
        let c = &self.config;
        let mut details = Vec::new();
        let hypothesis = char_len(&draft.hypothesis);
        if hypothesis < c.min_hypothesis_chars {
            details.push(format!(
                "hypothesis has {hypothesis} chars, need {}",
                c.min_hypothesis_chars
            ));
        }
        let mechanism = char_len(&draft.mechanism);
        if mechanism < c.min_mechanism_chars {
            details.push(format!(
                "mechanism has {mechanism} chars, need {}",
                c.min_mechanism_chars
            ));
        }
        let signposts = draft.signposts.iter().filter(|s| !s.trim().is_empty()).count();
        if signposts < c.min_signposts {
            details.push(format!("{signposts} signposts, need {}", c.min_signposts));
        }
        if draft.catalysts.len() < c.min_catalysts {
            details.push(format!(
                "{} catalysts, need {}",
                draft.catalysts.len(),
                c.min_catalysts
            ));
        }
        verdict(GateId::DataSufficiency, details)
    }

    #[allow(clippy::cast_precision_loss)]
    fn coherence(&self, draft: &IdeaDraft) -> GateOutcome {
        let hypothesis = char_len(&draft.hypothesis);
        if hypothesis == 0 {
            return GateOutcome::fail(GateId::Coherence, vec!["hypothesis is empty".into()]);
        }
        let ratio = char_len(&draft.mechanism) as f64 / hypothesis as f64;
        if ratio > self.config.min_mechanism_ratio {
            GateOutcome::pass(GateId::Coherence)
        } else {
            GateOutcome::fail(
                GateId::Coherence,
                vec![format!(
                    "mechanism/hypothesis length ratio {ratio:.2} does not exceed {:.2}",
                    self.config.min_mechanism_ratio
                )],
            )
        }
    }

    fn edge_claim(&self, draft: &IdeaDraft) -> GateOutcome {
        let valid = draft.edge_types.iter().any(|edge| {
            let edge = edge.trim();
            self.config
                .valid_edge_types
                .iter()
                .any(|v| v.eq_ignore_ascii_case(edge))
        });
        if valid {
            GateOutcome::pass(GateId::EdgeClaim)
        } else if draft.edge_types.is_empty() {
            GateOutcome::fail(GateId::EdgeClaim, vec!["no edge type declared".into()])
        } else {
            GateOutcome::fail(
                GateId::EdgeClaim,
                vec![format!(
                    "no recognised edge type in [{}]",
                    draft.edge_types.join(", ")
                )],
            )
        }
    }

    fn downside_shape(&self, draft: &IdeaDraft) -> GateOutcome {
        let flags = &draft.risk_flags;
        let raised: Vec<OverrideReason> = [
            (flags.leverage_risk_dominant, OverrideReason::LeverageRiskDominant),
            (flags.liquidity_risk_dominant, OverrideReason::LiquidityRiskDominant),
            (flags.regulatory_cliff_dominant, OverrideReason::RegulatoryCliffDominant),
        ]
        .into_iter()
        .filter_map(|(set, reason)| set.then_some(reason))
        .collect();

        if let Some((first, rest)) = raised.split_first() {
            let mut outcome = GateOutcome::overridden(GateId::DownsideShape, *first);
            outcome
                .details
                .extend(rest.iter().map(|r| format!("binary override: {r}")));
            return outcome;
        }

        let limits = self.config.styles.limits_for(draft.style);
        match (draft.metrics.net_debt_to_ebitda, limits.max_net_debt_to_ebitda) {
            (Some(value), Some(max)) if value > max => GateOutcome::fail(
                GateId::DownsideShape,
                vec![format!(
                    "net debt/EBITDA {value:.2} above {max:.2} for {}",
                    draft.style
                )],
            ),
            _ => GateOutcome::pass(GateId::DownsideShape),
        }
    }

    fn style_fit(&self, draft: &IdeaDraft) -> GateOutcome {
        let limits = self.config.styles.limits_for(draft.style);
        let metrics = &draft.metrics;
        let mut details = Vec::new();

        if let (Some(value), Some(floor)) = (metrics.ebit_margin, limits.min_ebit_margin) {
            if value < floor {
                details.push(format!("EBIT margin {value:.3} below floor {floor:.3}"));
            }
        }
        if let (Some(value), Some(ceiling)) = (metrics.ev_to_ebit, limits.max_ev_to_ebit) {
            if value > ceiling {
                details.push(format!("EV/EBIT {value:.1} above ceiling {ceiling:.1}"));
            }
        }
        if let (Some(value), Some(ceiling)) = (metrics.pe_ratio, limits.max_pe_ratio) {
            if value > ceiling {
                details.push(format!("P/E {value:.1} above ceiling {ceiling:.1}"));
            }
        }
        verdict(GateId::StyleFit, details)
    }
}

fn verdict(gate: GateId, details: Vec<String>) -> GateOutcome {
    if details.is_empty() {
        GateOutcome::pass(gate)
    } else {
        GateOutcome::fail(gate, details)
    }
}

fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_core::entities::{Catalyst, MetricsSnapshot, RiskFlags};
    use arc_core::enums::InvestmentStyle;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn draft() -> IdeaDraft {
        IdeaDraft {
            ticker: "ACME".into(),
            company_name: "Acme Corp".into(),
            style: InvestmentStyle::QualityCompounder,
            hypothesis: "Pricing power in the aftermarket business is underappreciated".into(),
            mechanism: "Contract renewals over the next two years reprice the installed base \
                        and lift segment margins toward peer levels"
                .into(),
            edge_types: vec!["variant_perception".into()],
            metrics: MetricsSnapshot {
                net_debt_to_ebitda: Some(1.2),
                ebit_margin: Some(0.22),
                ev_to_ebit: Some(18.0),
                pe_ratio: Some(24.0),
                ..MetricsSnapshot::default()
            },
            risk_flags: RiskFlags::default(),
            catalysts: vec![Catalyst {
                description: "Renewal cycle".into(),
                expected_window: Some("2026H2".into()),
            }],
            signposts: vec!["Renewal pricing disclosed at Q3".into()],
            score: None,
            novelty: None,
            gate_results: None,
            rank_score: None,
        }
    }

    fn engine() -> GateEngine {
        GateEngine::new(GatesConfig::default())
    }

    fn failed_gates(evaluation: &GateEvaluation) -> Vec<GateId> {
        evaluation.failures().map(|o| o.gate).collect()
    }

    #[test]
    fn clean_draft_passes_every_gate() {
        let evaluation = engine().evaluate(&draft());
        assert!(evaluation.passed);
        assert_eq!(evaluation.results.outcomes.len(), 5);
        let order: Vec<GateId> = evaluation.results.outcomes.iter().map(|o| o.gate).collect();
        assert_eq!(order, GateId::ALL.to_vec());
    }

    #[test]
    fn all_gates_evaluated_without_short_circuit() {
        let mut d = draft();
        d.hypothesis = "Short".into();
        d.edge_types = vec!["hunch".into()];
        d.metrics.ebit_margin = Some(0.01);
        let evaluation = engine().evaluate(&d);
        assert!(!evaluation.passed);
        assert_eq!(
            failed_gates(&evaluation),
            vec![GateId::DataSufficiency, GateId::EdgeClaim, GateId::StyleFit]
        );
        assert_eq!(evaluation.results.outcomes.len(), 5);
    }

    #[rstest]
    #[case::zero(Some(0.0))]
    #[case::low(Some(0.5))]
    #[case::absent(None)]
    fn leverage_flag_overrides_any_ratio(#[case] ratio: Option<f64>) {
        let mut d = draft();
        d.risk_flags.leverage_risk_dominant = true;
        d.metrics.net_debt_to_ebitda = ratio;
        let evaluation = engine().evaluate(&d);
        let outcome = evaluation.results.outcome(GateId::DownsideShape).unwrap();
        assert!(!outcome.passed);
        assert_eq!(
            outcome.override_reason,
            Some(OverrideReason::LeverageRiskDominant)
        );
        assert!(!evaluation.passed);
    }

    #[test]
    fn multiple_flags_record_first_reason_and_list_the_rest() {
        let mut d = draft();
        d.risk_flags.liquidity_risk_dominant = true;
        d.risk_flags.regulatory_cliff_dominant = true;
        let evaluation = engine().evaluate(&d);
        let outcome = evaluation.results.outcome(GateId::DownsideShape).unwrap();
        assert_eq!(
            outcome.override_reason,
            Some(OverrideReason::LiquidityRiskDominant)
        );
        assert_eq!(outcome.details.len(), 2);
    }

    #[test]
    fn numeric_leverage_threshold_depends_on_style() {
        let mut d = draft();
        d.metrics.net_debt_to_ebitda = Some(4.5);
        let evaluation = engine().evaluate(&d);
        let outcome = evaluation.results.outcome(GateId::DownsideShape).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.override_reason, None);

        d.style = InvestmentStyle::Turnaround;
        d.metrics.ebit_margin = None;
        d.metrics.ev_to_ebit = Some(8.0);
        let evaluation = engine().evaluate(&d);
        assert!(evaluation.results.outcome(GateId::DownsideShape).unwrap().passed);
    }

    #[test]
    fn absent_metrics_do_not_fail_style_fit() {
        let mut d = draft();
        d.metrics = MetricsSnapshot::default();
        let evaluation = engine().evaluate(&d);
        assert!(evaluation.results.outcome(GateId::StyleFit).unwrap().passed);
        assert!(evaluation.results.outcome(GateId::DownsideShape).unwrap().passed);
    }

    #[test]
    fn empty_hypothesis_fails_coherence() {
        let mut d = draft();
        d.hypothesis = String::new();
        let evaluation = engine().evaluate(&d);
        assert!(failed_gates(&evaluation).contains(&GateId::Coherence));
    }

    #[test]
    fn thin_mechanism_fails_coherence() {
        let mut d = draft();
        d.mechanism = "Renewals reprice".into();
        let evaluation = engine().evaluate(&d);
        let outcome = evaluation.results.outcome(GateId::Coherence).unwrap();
        assert!(!outcome.passed);
        assert!(outcome.details[0].contains("ratio"));
    }

    #[test]
    fn edge_tags_match_case_insensitively() {
        let mut d = draft();
        d.edge_types = vec!["  Structural ".into()];
        assert!(engine().evaluate(&d).passed);
    }

    #[test]
    fn novelty_does_not_change_the_verdict() {
        use arc_core::entities::NoveltyAnnotation;
        use arc_core::enums::NoveltyClass;

        let mut fresh = draft();
        fresh.novelty = Some(NoveltyAnnotation {
            score: 1.0,
            class: NoveltyClass::New,
            is_exploration: false,
        });
        let mut stale = draft();
        stale.novelty = Some(NoveltyAnnotation {
            score: 0.05,
            class: NoveltyClass::Repeat,
            is_exploration: true,
        });
        assert_eq!(engine().evaluate(&fresh), engine().evaluate(&stale));
    }
}

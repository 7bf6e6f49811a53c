//! Run metrics and progress records exposed to API and UI layers.
//!
//! The NEW/REAPPEARANCE fractions of the selected output are the system's core
//! health signal and are reported on every Lane A run.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::NoveltyAnnotation;
use crate::enums::{GateId, LaneAStep, NoveltyClass};

/// Per-class counts of a shortlist. Exploration picks are counted once, under
/// `exploration`, regardless of their novelty class.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ShortlistComposition {
    pub new: u32,
    pub reappearance: u32,
    pub repeat: u32,
    pub exploration: u32,
}

impl ShortlistComposition {
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.new + self.reappearance + self.repeat + self.exploration
    }

    pub fn count(&mut self, annotation: &NoveltyAnnotation) {
        if annotation.is_exploration {
            self.exploration += 1;
            return;
        }
        match annotation.class {
            NoveltyClass::New => self.new += 1,
            NoveltyClass::Reappearance => self.reappearance += 1,
            NoveltyClass::Repeat => self.repeat += 1,
        }
    }
}

/// Succeeded / failed / skipped item counts for one step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StepCounts {
    pub succeeded: u32,
    pub failed: u32,
    pub skipped: u32,
}

/// Counts reported for a Lane A step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StepSummary {
    pub step: LaneAStep,
    pub counts: StepCounts,
}

/// Gate pass/fail tallies for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GateStats {
    pub evaluated: u32,
    pub passed: u32,
    pub failed: u32,
    /// Failures caused by a binary risk flag.
    pub overrides: u32,
    pub failures_by_gate: BTreeMap<GateId, u32>,
}

/// Novelty composition of the final selected output, as percentages.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SelectionComposition {
    pub selected: u32,
    pub new_pct: f64,
    pub reappearance_pct: f64,
    pub repeat_pct: f64,
    pub exploration_pct: f64,
}

impl SelectionComposition {
    /// Percentages are computed over the novelty *class* of every selected
    /// idea; exploration is reported as an overlapping share.
    #[must_use]
    pub fn from_annotations<'a>(annotations: impl IntoIterator<Item = &'a NoveltyAnnotation>) -> Self {
        let mut selected = 0u32;
        let (mut new, mut reappearance, mut repeat, mut exploration) = (0u32, 0u32, 0u32, 0u32);
        for annotation in annotations {
            selected += 1;
            match annotation.class {
                NoveltyClass::New => new += 1,
                NoveltyClass::Reappearance => reappearance += 1,
                NoveltyClass::Repeat => repeat += 1,
            }
            if annotation.is_exploration {
                exploration += 1;
            }
        }
        let pct = |n: u32| {
            if selected == 0 {
                0.0
            } else {
                f64::from(n) * 100.0 / f64::from(selected)
            }
        };
        Self {
            selected,
            new_pct: pct(new),
            reappearance_pct: pct(reappearance),
            repeat_pct: pct(repeat),
            exploration_pct: pct(exploration),
        }
    }

    /// Fraction (0..=1) of the output classified NEW.
    #[must_use]
    pub fn new_fraction(&self) -> f64 {
        self.new_pct / 100.0
    }
}

/// Metrics emitted by every Lane A run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LaneARunMetrics {
    pub run_id: String,
    pub run_date: NaiveDate,
    pub universe_size: u32,
    pub shortlist: ShortlistComposition,
    pub enrichment: StepCounts,
    pub gates: GateStats,
    pub ranked: u32,
    pub selection: SelectionComposition,
    pub steps: Vec<StepSummary>,
}

impl LaneARunMetrics {
    #[must_use]
    pub fn new(run_id: String, run_date: NaiveDate) -> Self {
        Self {
            run_id,
            run_date,
            universe_size: 0,
            shortlist: ShortlistComposition::default(),
            enrichment: StepCounts::default(),
            gates: GateStats::default(),
            ranked: 0,
            selection: SelectionComposition::default(),
            steps: Vec::new(),
        }
    }

    /// Record the item counts of a finished step.
    pub fn record_step(&mut self, step: LaneAStep, counts: StepCounts) {
        self.steps.push(StepSummary { step, counts });
    }
}

/// Progress of one idea through Lane B: N independent tasks plus synthesis
/// and monitoring.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResearchProgress {
    pub idea_id: String,
    pub completed_steps: u32,
    pub total_steps: u32,
    pub current_step: String,
    pub percentage: f64,
}

impl ResearchProgress {
    #[must_use]
    pub fn new(idea_id: &str, completed_steps: u32, total_steps: u32, current_step: &str) -> Self {
        let percentage = if total_steps == 0 {
            100.0
        } else {
            f64::from(completed_steps) * 100.0 / f64::from(total_steps)
        };
        Self {
            idea_id: idea_id.to_string(),
            completed_steps,
            total_steps,
            current_step: current_step.to_string(),
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn annotation(class: NoveltyClass, is_exploration: bool) -> NoveltyAnnotation {
        NoveltyAnnotation {
            score: 0.5,
            class,
            is_exploration,
        }
    }

    #[test]
    fn shortlist_counts_exploration_separately() {
        let mut composition = ShortlistComposition::default();
        composition.count(&annotation(NoveltyClass::New, false));
        composition.count(&annotation(NoveltyClass::Repeat, true));
        composition.count(&annotation(NoveltyClass::Reappearance, false));
        assert_eq!(
            composition,
            ShortlistComposition {
                new: 1,
                reappearance: 1,
                repeat: 0,
                exploration: 1,
            }
        );
        assert_eq!(composition.total(), 3);
    }

    #[test]
    fn selection_percentages() {
        let annotations = [
            annotation(NoveltyClass::New, false),
            annotation(NoveltyClass::New, false),
            annotation(NoveltyClass::Reappearance, false),
            annotation(NoveltyClass::Repeat, true),
        ];
        let composition = SelectionComposition::from_annotations(&annotations);
        assert_eq!(composition.selected, 4);
        assert!((composition.new_pct - 50.0).abs() < 1e-9);
        assert!((composition.reappearance_pct - 25.0).abs() < 1e-9);
        assert!((composition.exploration_pct - 25.0).abs() < 1e-9);
        assert!((composition.new_fraction() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_selection_reports_zero() {
        let composition = SelectionComposition::from_annotations(std::iter::empty());
        assert_eq!(composition.selected, 0);
        assert!(composition.new_pct.abs() < f64::EPSILON);
    }

    #[test]
    fn progress_percentage() {
        let progress = ResearchProgress::new("idea-1", 3, 8, "valuation_analysis");
        assert!((progress.percentage - 37.5).abs() < 1e-9);
        assert_eq!(ResearchProgress::new("idea-1", 0, 0, "").percentage, 100.0);
    }
}

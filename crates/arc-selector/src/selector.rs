//! Greedy value-per-cost task selection.
//!
//! Candidates are taken in descending value/cost order. Each one is added
//! together with whatever part of its dependency closure is not yet
//! selected, provided the whole closure fits in the remaining budget and
//! every dependency is known, eligible, and acyclic. Anything that cannot be
//! added is recorded as a [`Rejection`]. The selected set is then ordered
//! topologically, with ready tasks released by value/cost ratio.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

use arc_config::SelectorConfig;
use arc_core::entities::TaskDefinition;
use arc_core::enums::{Lane, TaskTier, TaskTrigger};
use rustworkx_core::connectivity::find_cycle;
use rustworkx_core::petgraph::Direction;
use rustworkx_core::petgraph::algo::toposort;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::TaskCatalog;

const BUDGET_TOLERANCE: f64 = 1e-9;

/// What to select and under which constraints.
///
/// `lane` and `stage` narrow the top-level candidates only; dependencies are
/// resolved against the whole catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SelectionRequest {
    pub budget: f64,
    #[serde(default)]
    pub lane: Option<Lane>,
    #[serde(default)]
    pub stage: Option<String>,
    /// Signal strength in 0..=1 for `signal_threshold` tasks.
    #[serde(default)]
    pub signal: f64,
    /// Manually requested selection; unlocks `manual_only` tasks.
    #[serde(default)]
    pub manual: bool,
    #[serde(default)]
    pub allow_experimental: bool,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl SelectionRequest {
    #[must_use]
    pub fn from_config(config: &SelectorConfig) -> Self {
        Self {
            budget: config.budget,
            allow_experimental: config.allow_experimental,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    #[must_use]
    pub fn excluding<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(ids.into_iter().map(Into::into));
        self
    }

    fn in_scope(&self, task: &TaskDefinition) -> bool {
        self.lane.is_none_or(|lane| lane == task.lane)
            && self.stage.as_deref().is_none_or(|stage| stage == task.stage)
    }

    fn eligibility(&self, task: &TaskDefinition) -> Result<(), RejectionReason> {
        if self.exclude.iter().any(|id| *id == task.id) {
            return Err(RejectionReason::Excluded);
        }
        match task.tier {
            TaskTier::Deprecated => return Err(RejectionReason::Deprecated),
            TaskTier::Experimental if !self.allow_experimental => {
                return Err(RejectionReason::Experimental);
            }
            _ => {}
        }
        match task.trigger {
            TaskTrigger::ManualOnly if !self.manual => Err(RejectionReason::ManualOnly),
            TaskTrigger::SignalThreshold => {
                let required = task.min_signal.unwrap_or(0.0);
                if self.signal >= required {
                    Ok(())
                } else {
                    Err(RejectionReason::BelowSignal {
                        required,
                        signal: self.signal,
                    })
                }
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    Excluded,
    Deprecated,
    Experimental,
    ManualOnly,
    BelowSignal { required: f64, signal: f64 },
    MissingDependency { dependency: String },
    DependencyExcluded { dependency: String },
    DependencyIneligible { dependency: String, detail: String },
    DependencyCycle { path: Vec<String> },
    OverBudget { required: f64, remaining: f64 },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excluded => f.write_str("excluded"),
            Self::Deprecated => f.write_str("deprecated"),
            Self::Experimental => f.write_str("experimental tasks not allowed"),
            Self::ManualOnly => f.write_str("manual-only task"),
            Self::BelowSignal { required, signal } => {
                write!(f, "signal {signal:.2} below required {required:.2}")
            }
            Self::MissingDependency { dependency } => write!(f, "unknown dependency {dependency}"),
            Self::DependencyExcluded { dependency } => write!(f, "dependency {dependency} excluded"),
            Self::DependencyIneligible { dependency, detail } => {
                write!(f, "dependency {dependency} not selectable: {detail}")
            }
            Self::DependencyCycle { path } => write!(f, "dependency cycle {}", path.join(" -> ")),
            Self::OverBudget {
                required,
                remaining,
            } => write!(f, "needs {required:.2}, {remaining:.2} remaining"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rejection {
    pub task_id: String,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Selection {
    /// Selected tasks in execution order.
    pub selected: Vec<TaskDefinition>,
    pub total_cost: f64,
    pub total_value: f64,
    pub remaining_budget: f64,
    pub rejected: Vec<Rejection>,
}

impl Selection {
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.selected.iter().map(|t| t.id.clone()).collect()
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|t| t.id == id)
    }

    #[must_use]
    pub fn rejection(&self, id: &str) -> Option<&RejectionReason> {
        self.rejected.iter().find(|r| r.task_id == id).map(|r| &r.reason)
    }
}

pub struct TaskSelector<'a> {
    catalog: &'a TaskCatalog,
}

impl<'a> TaskSelector<'a> {
    #[must_use]
    pub const fn new(catalog: &'a TaskCatalog) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn select(&self, request: &SelectionRequest) -> Selection {
        let mut candidates: Vec<&TaskDefinition> = self
            .catalog
            .tasks()
            .iter()
            .filter(|t| request.in_scope(t))
            .collect();
        candidates.sort_by(|a, b| by_ratio_desc(a, b));

        let mut selected: HashSet<&str> = HashSet::new();
        let mut picked: Vec<&TaskDefinition> = Vec::new();
        let mut rejected = Vec::new();
        let mut remaining = request.budget.max(0.0);

        for candidate in candidates {
            if selected.contains(candidate.id.as_str()) {
                continue;
            }
            if let Err(reason) = request.eligibility(candidate) {
                rejected.push(Rejection {
                    task_id: candidate.id.clone(),
                    reason,
                });
                continue;
            }

            let closure = match self.closure(candidate, request, &selected) {
                Ok(closure) => closure,
                Err(reason) => {
                    tracing::debug!(task_id = %candidate.id, %reason, "task rejected");
                    rejected.push(Rejection {
                        task_id: candidate.id.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let required: f64 = closure.iter().map(|t| t.expected_cost_score).sum();
            if required > remaining + BUDGET_TOLERANCE {
                tracing::debug!(task_id = %candidate.id, required, remaining, "over budget");
                rejected.push(Rejection {
                    task_id: candidate.id.clone(),
                    reason: RejectionReason::OverBudget {
                        required,
                        remaining,
                    },
                });
                continue;
            }

            remaining = (remaining - required).max(0.0);
            for task in closure {
                selected.insert(task.id.as_str());
                picked.push(task);
            }
        }

        let ordered = execution_order(&picked);
        let total_cost: f64 = ordered.iter().map(|t| t.expected_cost_score).sum();
        let total_value: f64 = ordered.iter().map(|t| t.expected_value_score).sum();
        tracing::info!(
            selected = ordered.len(),
            rejected = rejected.len(),
            total_cost,
            total_value,
            "task selection complete"
        );

        Selection {
            selected: ordered.into_iter().cloned().collect(),
            total_cost,
            total_value,
            remaining_budget: remaining,
            rejected,
        }
    }

    /// Not-yet-selected dependency closure of `root`, dependencies first.
    ///
    /// The closure is built as a graph with an edge from each task to each
    /// of its dependencies. Unknown or ineligible dependencies reject while
    /// the graph grows; a cycle anywhere in it rejects with the cycle path.
    fn closure(
        &self,
        root: &'a TaskDefinition,
        request: &SelectionRequest,
        selected: &HashSet<&str>,
    ) -> Result<Vec<&'a TaskDefinition>, RejectionReason> {
        let mut graph: DiGraph<&'a TaskDefinition, ()> = DiGraph::new();
        let mut index: HashMap<&'a str, NodeIndex> = HashMap::new();
        let root_index = graph.add_node(root);
        index.insert(root.id.as_str(), root_index);

        let mut pending = vec![root_index];
        while let Some(current) = pending.pop() {
            let task = graph[current];
            for dep_id in &task.dependencies {
                if selected.contains(dep_id.as_str()) {
                    continue;
                }
                if let Some(&known) = index.get(dep_id.as_str()) {
                    graph.update_edge(current, known, ());
                    continue;
                }
                let Some(dep) = self.catalog.get(dep_id) else {
                    return Err(RejectionReason::MissingDependency {
                        dependency: dep_id.clone(),
                    });
                };
                match request.eligibility(dep) {
                    Ok(()) => {}
                    Err(RejectionReason::Excluded) => {
                        return Err(RejectionReason::DependencyExcluded {
                            dependency: dep_id.clone(),
                        });
                    }
                    Err(other) => {
                        return Err(RejectionReason::DependencyIneligible {
                            dependency: dep_id.clone(),
                            detail: other.to_string(),
                        });
                    }
                }
                let added = graph.add_node(dep);
                index.insert(dep.id.as_str(), added);
                graph.add_edge(current, added, ());
                pending.push(added);
            }
        }

        match toposort(&graph, None) {
            Ok(sorted) => Ok(sorted.into_iter().rev().map(|i| graph[i]).collect()),
            Err(cycle) => Err(RejectionReason::DependencyCycle {
                path: cycle_path(&graph, root_index, cycle.node_id()),
            }),
        }
    }
}

/// Ids along the cycle reachable from `root`, closed on its first id.
fn cycle_path(
    graph: &DiGraph<&TaskDefinition, ()>,
    root: NodeIndex,
    fallback: NodeIndex,
) -> Vec<String> {
    let edges = find_cycle(graph, Some(root));
    let Some(&(first, _)) = edges.first() else {
        let id = graph[fallback].id.clone();
        return vec![id.clone(), id];
    };
    let mut path = vec![graph[first].id.clone()];
    path.extend(edges.iter().map(|&(_, to)| graph[to].id.clone()));
    path
}

fn by_ratio_desc(a: &TaskDefinition, b: &TaskDefinition) -> Ordering {
    b.value_cost_ratio()
        .total_cmp(&a.value_cost_ratio())
        .then_with(|| a.id.cmp(&b.id))
}

struct Ready<'a>(&'a TaskDefinition, NodeIndex);

impl PartialEq for Ready<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ready<'_> {}

impl PartialOrd for Ready<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ready<'_> {
    // Max-heap: highest ratio first, then lowest id.
    fn cmp(&self, other: &Self) -> Ordering {
        by_ratio_desc(other.0, self.0)
    }
}

/// Topological order of the selected set with ready tasks released by
/// ratio. Edges run from dependency to dependent; every dependency of a
/// selected task is itself selected and the set is acyclic.
fn execution_order<'a>(tasks: &[&'a TaskDefinition]) -> Vec<&'a TaskDefinition> {
    let mut graph: DiGraph<&'a TaskDefinition, ()> = DiGraph::with_capacity(tasks.len(), 0);
    let index: HashMap<&str, NodeIndex> = tasks
        .iter()
        .map(|&task| (task.id.as_str(), graph.add_node(task)))
        .collect();
    for &task in tasks {
        let Some(&to) = index.get(task.id.as_str()) else {
            continue;
        };
        for dep in &task.dependencies {
            if let Some(&from) = index.get(dep.as_str()) {
                graph.update_edge(from, to, ());
            }
        }
    }

    let mut indegree: Vec<usize> = graph
        .node_indices()
        .map(|i| graph.neighbors_directed(i, Direction::Incoming).count())
        .collect();
    let mut ready: BinaryHeap<Ready<'a>> = graph
        .node_indices()
        .filter(|i| indegree[i.index()] == 0)
        .map(|i| Ready(graph[i], i))
        .collect();
    let mut order = Vec::with_capacity(tasks.len());
    while let Some(Ready(task, at)) = ready.pop() {
        order.push(task);
        for next in graph.neighbors_directed(at, Direction::Outgoing) {
            let n = &mut indegree[next.index()];
            *n -= 1;
            if *n == 0 {
                ready.push(Ready(graph[next], next));
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn task(id: &str, value: f64, cost: f64, deps: &[&str]) -> TaskDefinition {
        TaskDefinition {
            id: id.into(),
            lane: Lane::LaneB,
            stage: "research".into(),
            expected_value_score: value,
            expected_cost_score: cost,
            dependencies: deps.iter().map(ToString::to_string).collect(),
            tier: TaskTier::Core,
            trigger: TaskTrigger::Always,
            min_signal: None,
            description: String::new(),
        }
    }

    fn catalog(tasks: Vec<TaskDefinition>) -> TaskCatalog {
        TaskCatalog::from_tasks(tasks).unwrap()
    }

    fn request(budget: f64) -> SelectionRequest {
        SelectionRequest {
            budget,
            ..SelectionRequest::default()
        }
    }

    fn position(selection: &Selection, id: &str) -> usize {
        selection.selected.iter().position(|t| t.id == id).unwrap()
    }

    #[test]
    fn greedy_by_ratio_within_budget() {
        let catalog = catalog(vec![
            task("cheap_win", 0.8, 0.2, &[]),
            task("solid", 0.9, 0.5, &[]),
            task("pricey", 0.5, 0.9, &[]),
        ]);
        let selection = TaskSelector::new(&catalog).select(&request(0.8));
        assert_eq!(selection.ids(), vec!["cheap_win", "solid"]);
        assert!((selection.total_cost - 0.7).abs() < 1e-9);
        assert!((selection.total_value - 1.7).abs() < 1e-9);
        assert!((selection.remaining_budget - 0.1).abs() < 1e-9);
        assert!(matches!(
            selection.rejection("pricey"),
            Some(RejectionReason::OverBudget { .. })
        ));
    }

    #[test]
    fn pulls_in_dependencies_and_orders_them_first() {
        let catalog = catalog(vec![
            task("base", 0.2, 0.4, &[]),
            task("mid", 0.3, 0.3, &["base"]),
            task("top", 0.9, 0.1, &["mid"]),
        ]);
        let selection = TaskSelector::new(&catalog).select(&request(1.0));
        assert_eq!(selection.ids(), vec!["base", "mid", "top"]);
        assert!(selection.rejected.is_empty());
    }

    #[test]
    fn closure_that_does_not_fit_is_rejected_whole() {
        let catalog = catalog(vec![
            task("heavy_dep", 0.1, 0.75, &[]),
            task("star", 0.9, 0.25, &["heavy_dep"]),
            task("filler", 0.3, 0.3, &[]),
        ]);
        let selection = TaskSelector::new(&catalog).select(&request(0.5));
        assert_eq!(selection.ids(), vec!["filler"]);
        assert_eq!(
            selection.rejection("star"),
            Some(&RejectionReason::OverBudget {
                required: 1.0,
                remaining: 0.5
            })
        );
    }

    #[test]
    fn task_with_excluded_dependency_is_never_selected() {
        let catalog = catalog(vec![
            task("base", 0.5, 0.2, &[]),
            task("derived", 0.9, 0.1, &["base"]),
            task("indirect", 0.9, 0.1, &["derived"]),
        ]);
        let selection =
            TaskSelector::new(&catalog).select(&request(10.0).excluding(["base"]));
        assert!(selection.selected.is_empty());
        assert_eq!(selection.rejection("base"), Some(&RejectionReason::Excluded));
        assert_eq!(
            selection.rejection("derived"),
            Some(&RejectionReason::DependencyExcluded {
                dependency: "base".into()
            })
        );
        assert_eq!(
            selection.rejection("indirect"),
            Some(&RejectionReason::DependencyExcluded {
                dependency: "base".into()
            })
        );
    }

    #[test]
    fn missing_dependency_is_a_rejection() {
        let catalog = catalog(vec![
            task("orphan", 0.9, 0.1, &["ghost"]),
            task("fine", 0.2, 0.2, &[]),
        ]);
        let selection = TaskSelector::new(&catalog).select(&request(1.0));
        assert_eq!(selection.ids(), vec!["fine"]);
        assert_eq!(
            selection.rejection("orphan"),
            Some(&RejectionReason::MissingDependency {
                dependency: "ghost".into()
            })
        );
    }

    #[test]
    fn cycles_terminate_as_rejections() {
        let catalog = catalog(vec![
            task("a", 0.9, 0.1, &["b"]),
            task("b", 0.8, 0.1, &["c"]),
            task("c", 0.7, 0.1, &["a"]),
            task("selfish", 0.6, 0.1, &["selfish"]),
            task("free", 0.1, 0.1, &[]),
        ]);
        let selection = TaskSelector::new(&catalog).select(&request(10.0));
        assert_eq!(selection.ids(), vec!["free"]);
        assert_eq!(
            selection.rejection("a"),
            Some(&RejectionReason::DependencyCycle {
                path: vec!["a".into(), "b".into(), "c".into(), "a".into()]
            })
        );
        assert_eq!(
            selection.rejection("selfish"),
            Some(&RejectionReason::DependencyCycle {
                path: vec!["selfish".into(), "selfish".into()]
            })
        );
    }

    #[test]
    fn cycle_below_the_candidate_reports_the_loop_itself() {
        let catalog = catalog(vec![
            task("entry", 0.9, 0.1, &["left"]),
            task("left", 0.1, 0.1, &["right"]),
            task("right", 0.1, 0.1, &["left"]),
        ]);
        let selection = TaskSelector::new(&catalog).select(&request(10.0));
        assert!(selection.selected.is_empty());
        assert_eq!(
            selection.rejection("entry"),
            Some(&RejectionReason::DependencyCycle {
                path: vec!["left".into(), "right".into(), "left".into()]
            })
        );
    }

    #[test]
    fn diamond_dependencies_are_not_a_cycle() {
        let catalog = catalog(vec![
            task("base", 0.1, 0.1, &[]),
            task("left", 0.1, 0.1, &["base"]),
            task("right", 0.1, 0.1, &["base"]),
            task("top", 0.9, 0.1, &["left", "right", "left"]),
        ]);
        let selection = TaskSelector::new(&catalog).select(&request(10.0));
        assert!(selection.rejected.is_empty());
        assert_eq!(selection.ids(), vec!["base", "left", "right", "top"]);
        assert!((selection.total_cost - 0.4).abs() < 1e-9);
    }

    #[test]
    fn ready_ties_break_by_ratio() {
        let catalog = catalog(vec![
            task("root", 0.1, 0.5, &[]),
            task("low", 0.2, 0.4, &["root"]),
            task("high", 0.8, 0.2, &["root"]),
            task("independent", 0.3, 0.3, &[]),
        ]);
        let selection = TaskSelector::new(&catalog).select(&request(10.0));
        // independent (1.0) and root (0.2) are ready first; after root, high (4.0) beats low (0.5).
        assert_eq!(selection.ids(), vec!["independent", "root", "high", "low"]);
    }

    #[test]
    fn shared_dependency_selected_once() {
        let catalog = catalog(vec![
            task("shared", 0.1, 0.3, &[]),
            task("left", 0.9, 0.1, &["shared"]),
            task("right", 0.8, 0.1, &["shared"]),
        ]);
        let selection = TaskSelector::new(&catalog).select(&request(0.5));
        assert_eq!(selection.ids(), vec!["shared", "left", "right"]);
        assert!((selection.total_cost - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_budget_selects_nothing() {
        let catalog = catalog(vec![task("a", 0.9, 0.1, &[])]);
        let selection = TaskSelector::new(&catalog).select(&request(0.0));
        assert!(selection.selected.is_empty());
        assert_eq!(selection.rejected.len(), 1);
    }

    fn gated(tier: TaskTier, trigger: TaskTrigger, min_signal: Option<f64>) -> TaskCatalog {
        let mut t = task("gated", 0.9, 0.1, &[]);
        t.tier = tier;
        t.trigger = trigger;
        t.min_signal = min_signal;
        catalog(vec![t])
    }

    #[rstest]
    #[case::deprecated(TaskTier::Deprecated, TaskTrigger::Always, None, false)]
    #[case::experimental(TaskTier::Experimental, TaskTrigger::Always, None, false)]
    #[case::manual_only(TaskTier::Core, TaskTrigger::ManualOnly, None, false)]
    #[case::weak_signal(TaskTier::Core, TaskTrigger::SignalThreshold, Some(0.8), false)]
    #[case::strong_signal(TaskTier::Core, TaskTrigger::SignalThreshold, Some(0.4), true)]
    #[case::gate_pass(TaskTier::Supporting, TaskTrigger::GatePass, None, true)]
    fn eligibility_rules(
        #[case] tier: TaskTier,
        #[case] trigger: TaskTrigger,
        #[case] min_signal: Option<f64>,
        #[case] selectable: bool,
    ) {
        let catalog = gated(tier, trigger, min_signal);
        let req = SelectionRequest {
            signal: 0.5,
            ..request(1.0)
        };
        let selection = TaskSelector::new(&catalog).select(&req);
        assert_eq!(selection.is_selected("gated"), selectable);
    }

    #[test]
    fn unlocking_flags() {
        let experimental = gated(TaskTier::Experimental, TaskTrigger::Always, None);
        let req = SelectionRequest {
            allow_experimental: true,
            ..request(1.0)
        };
        assert!(TaskSelector::new(&experimental).select(&req).is_selected("gated"));

        let manual = gated(TaskTier::Core, TaskTrigger::ManualOnly, None);
        let req = SelectionRequest {
            manual: true,
            ..request(1.0)
        };
        assert!(TaskSelector::new(&manual).select(&req).is_selected("gated"));

        let deprecated = gated(TaskTier::Deprecated, TaskTrigger::Always, None);
        let req = SelectionRequest {
            manual: true,
            allow_experimental: true,
            ..request(1.0)
        };
        assert!(!TaskSelector::new(&deprecated).select(&req).is_selected("gated"));
    }

    #[test]
    fn ineligible_dependency_blocks_dependent() {
        let mut old = task("old", 0.1, 0.1, &[]);
        old.tier = TaskTier::Deprecated;
        let catalog = catalog(vec![old, task("new", 0.9, 0.1, &["old"])]);
        let selection = TaskSelector::new(&catalog).select(&request(1.0));
        assert!(selection.selected.is_empty());
        assert_eq!(
            selection.rejection("new"),
            Some(&RejectionReason::DependencyIneligible {
                dependency: "old".into(),
                detail: "deprecated".into()
            })
        );
    }

    #[test]
    fn stage_filter_limits_candidates_not_dependencies() {
        let mut synth = task("synth", 0.9, 0.1, &["research_a"]);
        synth.stage = "synthesis".into();
        let catalog = catalog(vec![
            task("research_a", 0.2, 0.2, &[]),
            task("research_b", 0.5, 0.2, &[]),
            synth,
        ]);

        let research = TaskSelector::new(&catalog).select(&request(10.0).with_stage("research"));
        assert_eq!(research.ids(), vec!["research_b", "research_a"]);

        let synthesis = TaskSelector::new(&catalog).select(&request(10.0).with_stage("synthesis"));
        assert_eq!(synthesis.ids(), vec!["research_a", "synth"]);
    }

    #[test]
    fn builtin_catalog_selection_respects_dependencies() {
        let catalog = TaskCatalog::builtin().unwrap();
        let selection = TaskSelector::new(&catalog)
            .select(&SelectionRequest::from_config(&SelectorConfig::default()));
        assert!(!selection.selected.is_empty());
        assert!(selection.total_cost <= SelectorConfig::default().budget + 1e-9);
        for task in &selection.selected {
            for dep in &task.dependencies {
                assert!(position(&selection, dep) < position(&selection, &task.id));
            }
        }
        assert!(!selection.is_selected("research_report_summary"));
    }
}

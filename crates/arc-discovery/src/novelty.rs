//! Novelty shortlist engine.
//!
//! Classifies every universe member as NEW, REAPPEARANCE, or REPEAT from its
//! sighting history and picks a bounded shortlist before any enrichment cost
//! is incurred. Class dominates score: the non-exploration slots drain NEW,
//! then REAPPEARANCE, then REPEAT, and never interleave across classes. A
//! fixed share of the shortlist is drawn uniformly at random from everything
//! left over so members with no signal still get coverage.

use std::collections::{HashMap, HashSet};

use arc_config::NoveltyConfig;
use arc_core::entities::{NoveltyAnnotation, NoveltyState, UniverseMember};
use arc_core::enums::NoveltyClass;
use arc_core::metrics::ShortlistComposition;
use arc_core::ports::NoveltyStore;
use chrono::{Datelike, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::DiscoveryError;

/// Ordered shortlist plus its composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Shortlist {
    /// Non-exploration picks in class order, followed by exploration picks.
    /// Every member carries its novelty annotation.
    pub members: Vec<UniverseMember>,
    pub composition: ShortlistComposition,
}

impl Shortlist {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct NoveltyEngine {
    config: NoveltyConfig,
}

impl NoveltyEngine {
    #[must_use]
    pub const fn new(config: NoveltyConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &NoveltyConfig {
        &self.config
    }

    /// Classify one member from its sighting history.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn classify(&self, state: Option<&NoveltyState>, today: NaiveDate) -> (NoveltyClass, f64) {
        let c = &self.config;
        let Some(state) = state else {
            return (NoveltyClass::New, c.unseen_score.max(c.min_score));
        };

        let days = state.days_since_seen(today);
        let (class, score) = if days >= c.new_threshold_days {
            (NoveltyClass::New, c.new_score)
        } else if days >= c.penalty_threshold_days {
            let span = (c.new_threshold_days - c.penalty_threshold_days) as f64;
            let t = (days - c.penalty_threshold_days) as f64 / span;
            let score =
                c.reappearance_min_score + t * (c.reappearance_max_score - c.reappearance_min_score);
            (NoveltyClass::Reappearance, score)
        } else {
            // Recent sightings score lowest; frequent ones take an extra penalty.
            let t = if c.penalty_threshold_days > 0 {
                days as f64 / c.penalty_threshold_days as f64
            } else {
                1.0
            };
            let mut score = c.repeat_min_score + t * (c.repeat_max_score - c.repeat_min_score);
            if state.seen_count > c.max_repeat_count {
                score -= c.repeat_penalty;
            }
            (NoveltyClass::Repeat, score)
        };
        (class, score.max(c.min_score))
    }

    /// Load sighting history for every member, then build the shortlist.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::NoveltyStore` if any history lookup fails.
    pub async fn shortlist(
        &self,
        universe: Vec<UniverseMember>,
        store: &dyn NoveltyStore,
        today: NaiveDate,
    ) -> Result<Shortlist, DiscoveryError> {
        let mut states = HashMap::with_capacity(universe.len());
        for member in &universe {
            if let Some(state) = store
                .novelty_state(&member.ticker)
                .await
                .map_err(DiscoveryError::NoveltyStore)?
            {
                states.insert(member.ticker.clone(), state);
            }
        }
        let mut rng = self.rng_for(today);
        Ok(self.build_shortlist(universe, &states, today, &mut rng))
    }

    /// Pure shortlist construction over preloaded history.
    pub fn build_shortlist<R: rand::Rng + ?Sized>(
        &self,
        universe: Vec<UniverseMember>,
        states: &HashMap<String, NoveltyState>,
        today: NaiveDate,
        rng: &mut R,
    ) -> Shortlist {
        let target = self.config.shortlist_size;
        let exploration_slots = self.config.exploration_slots().min(target);
        let core_slots = target - exploration_slots;

        let mut buckets: [Vec<UniverseMember>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for mut member in universe {
            let (class, score) = self.classify(states.get(&member.ticker), today);
            member.novelty = Some(NoveltyAnnotation {
                score,
                class,
                is_exploration: false,
            });
            buckets[class_index(class)].push(member);
        }
        for bucket in &mut buckets {
            bucket.sort_by(|a, b| {
                annotation_score(b)
                    .total_cmp(&annotation_score(a))
                    .then_with(|| a.ticker.cmp(&b.ticker))
            });
        }

        let mut composition = ShortlistComposition::default();
        let mut members = Vec::with_capacity(target);
        let mut remaining = Vec::new();
        for member in buckets.into_iter().flatten() {
            if members.len() < core_slots {
                if let Some(annotation) = &member.novelty {
                    composition.count(annotation);
                }
                members.push(member);
            } else {
                remaining.push(member);
            }
        }

        // Deterministic pre-order so a seeded draw is reproducible.
        remaining.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        remaining.shuffle(rng);
        for mut member in remaining.into_iter().take(exploration_slots) {
            if let Some(annotation) = member.novelty.as_mut() {
                annotation.is_exploration = true;
                composition.count(annotation);
            }
            members.push(member);
        }

        tracing::debug!(
            new = composition.new,
            reappearance = composition.reappearance,
            repeat = composition.repeat,
            exploration = composition.exploration,
            "shortlist built"
        );
        Shortlist {
            members,
            composition,
        }
    }

    /// RNG for one run. A configured seed is mixed with the run date so seeded
    /// runs stay reproducible without drawing the same sample every day.
    fn rng_for(&self, today: NaiveDate) -> StdRng {
        match self.config.seed {
            Some(seed) => {
                let day = u64::try_from(today.num_days_from_ce()).unwrap_or_default();
                StdRng::seed_from_u64(seed.wrapping_add(day))
            }
            None => StdRng::from_entropy(),
        }
    }
}

/// Drop repeated tickers, keeping the first occurrence.
#[must_use]
pub fn dedupe_universe(universe: Vec<UniverseMember>) -> (Vec<UniverseMember>, usize) {
    let mut seen = HashSet::with_capacity(universe.len());
    let before = universe.len();
    let unique: Vec<UniverseMember> = universe
        .into_iter()
        .filter(|m| seen.insert(m.ticker.clone()))
        .collect();
    let dropped = before - unique.len();
    (unique, dropped)
}

const fn class_index(class: NoveltyClass) -> usize {
    match class {
        NoveltyClass::New => 0,
        NoveltyClass::Reappearance => 1,
        NoveltyClass::Repeat => 2,
    }
}

fn annotation_score(member: &UniverseMember) -> f64 {
    member.novelty.map_or(0.0, |n| n.score)
}

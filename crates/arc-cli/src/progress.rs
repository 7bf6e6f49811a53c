use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use arc_core::metrics::ResearchProgress;
use arc_research::ProgressObserver;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::ui;

const TEMPLATE: &str = "{prefix:>12} {wide_bar:.cyan/blue} {pos}/{len} {msg}";

/// One progress bar per researched idea, drawn on stderr.
pub struct BarObserver {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
    enabled: bool,
}

impl BarObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::with_enabled(ui::prefs().progress)
    }

    fn with_enabled(enabled: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
            enabled,
        }
    }

    fn bar_for(&self, progress: &ResearchProgress) -> ProgressBar {
        let mut bars = self.bars.lock().unwrap_or_else(PoisonError::into_inner);
        bars.entry(progress.idea_id.clone())
            .or_insert_with(|| {
                let bar = self
                    .multi
                    .add(ProgressBar::new(u64::from(progress.total_steps)));
                bar.set_style(
                    ProgressStyle::with_template(TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar.set_prefix(progress.idea_id.clone());
                bar
            })
            .clone()
    }
}

impl Default for BarObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for BarObserver {
    fn on_progress(&self, progress: &ResearchProgress) {
        tracing::debug!(
            idea_id = %progress.idea_id,
            completed = progress.completed_steps,
            total = progress.total_steps,
            step = %progress.current_step,
            "research progress"
        );
        if !self.enabled {
            return;
        }
        let bar = self.bar_for(progress);
        bar.set_position(u64::from(progress.completed_steps));
        if progress.completed_steps >= progress.total_steps {
            bar.finish_with_message(format!("{:.0}% done", progress.percentage));
        } else {
            bar.set_message(progress.current_step.clone());
        }
    }
}

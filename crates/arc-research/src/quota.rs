//! Lane B quota manager.
//!
//! Two independent hard caps, one per calendar window: the day, and the
//! business week (Monday to Friday). Weekend days count against the week
//! that started on the preceding Monday. Unused quota never rolls over; a new
//! window starts from zero. Windows only move forward, so a day already
//! rolled past reads as closed.
//!
//! Every admission is a single read-modify-write under one lock, so two
//! `admit` calls can never jointly exceed either cap.

use std::sync::{Mutex, PoisonError};

use arc_config::QuotaConfig;
use arc_core::entities::{Admission, QuotaCheck, QuotaState, UsageSnapshot};
use arc_core::enums::QuotaWindow;
use arc_core::errors::AdapterError;
use arc_core::ports::UsageSource;
use chrono::{Datelike, Days, NaiveDate};

/// First and last business day of the week containing `day`.
#[must_use]
pub fn business_week(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(day.weekday().num_days_from_monday());
    let monday = day.checked_sub_days(Days::new(offset)).unwrap_or(day);
    let friday = monday.checked_add_days(Days::new(4)).unwrap_or(monday);
    (monday, friday)
}

#[derive(Debug, Clone)]
struct Windows {
    daily: QuotaState,
    weekly: QuotaState,
}

impl Windows {
    fn fresh(day: NaiveDate, config: &QuotaConfig) -> Self {
        let (monday, friday) = business_week(day);
        Self {
            daily: QuotaState {
                window: QuotaWindow::Daily,
                period_start: day,
                period_end: day,
                used: 0,
                cap: config.daily_cap,
            },
            weekly: QuotaState {
                window: QuotaWindow::Weekly,
                period_start: monday,
                period_end: friday,
                used: 0,
                cap: config.weekly_cap,
            },
        }
    }

    /// Advance to `day`, starting new windows where the current ones have
    /// lapsed. Windows only move forward: returns `false` and leaves them
    /// untouched for a day before the current daily window.
    fn roll_to(&mut self, day: NaiveDate, config: &QuotaConfig) -> bool {
        if day < self.daily.period_start {
            return false;
        }
        let fresh = Self::fresh(day, config);
        if self.daily.period_start != day {
            self.daily = fresh.daily;
        }
        if self.weekly.period_start != fresh.weekly.period_start {
            self.weekly = fresh.weekly;
        }
        true
    }

    /// Read-only windows for a day already rolled past. The week is shared
    /// with the current one when both fall in the same business week.
    fn lapsed(&self, day: NaiveDate, config: &QuotaConfig) -> Self {
        let mut view = Self::fresh(day, config);
        if view.weekly.period_start == self.weekly.period_start {
            view.weekly = self.weekly.clone();
        }
        view
    }
}

pub struct QuotaManager {
    config: QuotaConfig,
    windows: Mutex<Windows>,
}

impl QuotaManager {
    #[must_use]
    pub fn new(config: QuotaConfig, today: NaiveDate) -> Self {
        let windows = Windows::fresh(today, &config);
        Self {
            config,
            windows: Mutex::new(windows),
        }
    }

    /// Seed both windows for `day` with usage already recorded elsewhere.
    pub fn set_usage(&self, day: NaiveDate, daily_used: u32, weekly_used: u32) {
        let mut windows = self.lock();
        *windows = Windows::fresh(day, &self.config);
        windows.daily.used = daily_used;
        // The day is part of the week, so the week has seen at least as much.
        windows.weekly.used = weekly_used.max(daily_used);
    }

    /// Load today's and this week's usage from the persistence layer.
    ///
    /// Returns the idea ids already researched in either window, so the
    /// caller can keep them out of the candidate list.
    ///
    /// # Errors
    ///
    /// Propagates the usage source's error.
    pub async fn load_usage(
        &self,
        source: &dyn UsageSource,
        day: NaiveDate,
    ) -> Result<Vec<String>, AdapterError> {
        let (monday, _) = business_week(day);
        let week_end = monday.checked_add_days(Days::new(6)).unwrap_or(monday);
        let daily = source.daily_usage(day).await?;
        let weekly = source.weekly_usage(monday, week_end).await?;
        self.set_usage(day, daily.used, weekly.used);
        tracing::debug!(%day, daily = daily.used, weekly = weekly.used, "quota usage loaded");
        Ok(merge_completed(daily, weekly))
    }

    /// Current usage and remaining capacity for `day`. Never mutates usage.
    #[must_use]
    pub fn check_quota(&self, day: NaiveDate) -> QuotaCheck {
        let mut windows = self.lock();
        if !windows.roll_to(day, &self.config) {
            let view = windows.lapsed(day, &self.config);
            return QuotaCheck {
                used: view.daily.used,
                remaining: 0,
                daily: view.daily,
                weekly: view.weekly,
            };
        }
        QuotaCheck {
            used: windows.daily.used,
            remaining: windows.daily.remaining().min(windows.weekly.remaining()),
            daily: windows.daily.clone(),
            weekly: windows.weekly.clone(),
        }
    }

    /// Admit up to `requested` items on `day` and charge them to both windows.
    ///
    /// Without `manual_override` at most `min(daily_remaining,
    /// weekly_remaining, requested)` are admitted, which is zero once either
    /// cap is reached. With it every requested item is admitted and charged.
    /// A day before the current window is closed and admits nothing.
    pub fn admit(&self, day: NaiveDate, requested: u32, manual_override: bool) -> Admission {
        let mut windows = self.lock();
        if !windows.roll_to(day, &self.config) {
            tracing::warn!(
                %day,
                current = %windows.daily.period_start,
                requested,
                "admission for a lapsed day refused"
            );
            let view = windows.lapsed(day, &self.config);
            return Admission {
                requested,
                admitted: 0,
                overridden: false,
                daily_remaining: 0,
                weekly_remaining: view.weekly.remaining(),
                limited_by: (requested > 0).then_some(QuotaWindow::Daily),
            };
        }

        let daily_remaining = windows.daily.remaining();
        let weekly_remaining = windows.weekly.remaining();
        let within_caps = requested.min(daily_remaining).min(weekly_remaining);

        let (admitted, overridden) = if manual_override && within_caps < requested {
            (requested, true)
        } else {
            (within_caps, false)
        };

        let limited_by = if overridden || admitted == requested {
            None
        } else if daily_remaining <= weekly_remaining {
            Some(QuotaWindow::Daily)
        } else {
            Some(QuotaWindow::Weekly)
        };

        windows.daily.used = windows.daily.used.saturating_add(admitted);
        windows.weekly.used = windows.weekly.used.saturating_add(admitted);

        if overridden {
            tracing::warn!(%day, requested, daily_remaining, weekly_remaining, "quota overridden");
        } else if admitted == 0 && requested > 0 {
            tracing::info!(%day, requested, "research quota exhausted");
        }

        Admission {
            requested,
            admitted,
            overridden,
            daily_remaining: windows.daily.remaining(),
            weekly_remaining: windows.weekly.remaining(),
            limited_by,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Windows> {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn merge_completed(daily: UsageSnapshot, weekly: UsageSnapshot) -> Vec<String> {
    let mut ids = weekly.completed_ids;
    for id in daily.completed_ids {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2026-06-01 is a Monday.
    fn monday() -> NaiveDate {
        date(2026, 6, 1)
    }

    fn manager(daily_cap: u32, weekly_cap: u32) -> QuotaManager {
        QuotaManager::new(
            QuotaConfig {
                daily_cap,
                weekly_cap,
            },
            monday(),
        )
    }

    #[rstest]
    #[case::monday(date(2026, 6, 1))]
    #[case::wednesday(date(2026, 6, 3))]
    #[case::friday(date(2026, 6, 5))]
    #[case::saturday(date(2026, 6, 6))]
    #[case::sunday(date(2026, 6, 7))]
    fn days_map_to_their_business_week(#[case] day: NaiveDate) {
        assert_eq!(business_week(day), (date(2026, 6, 1), date(2026, 6, 5)));
    }

    #[test]
    fn admits_only_what_is_left_today() {
        let quota = manager(4, 10);
        quota.set_usage(monday(), 3, 3);
        let admission = quota.admit(monday(), 5, false);
        assert_eq!(admission.admitted, 1);
        assert_eq!(admission.limited_by, Some(QuotaWindow::Daily));
        assert_eq!(admission.daily_remaining, 0);
        assert!(!admission.overridden);
    }

    #[test]
    fn weekly_cap_binds_independently() {
        let quota = manager(4, 10);
        quota.set_usage(monday(), 0, 9);
        let admission = quota.admit(monday(), 3, false);
        assert_eq!(admission.admitted, 1);
        assert_eq!(admission.limited_by, Some(QuotaWindow::Weekly));
    }

    #[test]
    fn repeated_admissions_never_exceed_cap() {
        let quota = manager(3, 10);
        let first = quota.admit(monday(), 2, false);
        let second = quota.admit(monday(), 2, false);
        assert_eq!(first.admitted + second.admitted, 3);
        let check = quota.check_quota(monday());
        assert_eq!(check.used, 3);
        assert_eq!(check.remaining, 0);
    }

    #[test]
    fn exhausted_quota_refuses() {
        let quota = manager(2, 10);
        quota.set_usage(monday(), 2, 2);
        let admission = quota.admit(monday(), 1, false);
        assert!(admission.is_exhausted());
    }

    #[test]
    fn manual_override_bypasses_caps() {
        let quota = manager(2, 10);
        quota.set_usage(monday(), 2, 2);
        let admission = quota.admit(monday(), 3, true);
        assert_eq!(admission.admitted, 3);
        assert!(admission.overridden);
        assert_eq!(admission.limited_by, None);
        assert_eq!(quota.check_quota(monday()).daily.used, 5);
    }

    #[test]
    fn override_within_caps_is_not_flagged() {
        let quota = manager(4, 10);
        let admission = quota.admit(monday(), 2, true);
        assert_eq!(admission.admitted, 2);
        assert!(!admission.overridden);
    }

    #[test]
    fn check_does_not_consume() {
        let quota = manager(4, 10);
        quota.check_quota(monday());
        quota.check_quota(monday());
        assert_eq!(quota.check_quota(monday()).remaining, 4);
    }

    #[test]
    fn new_day_resets_daily_but_not_weekly() {
        let quota = manager(4, 10);
        quota.admit(monday(), 4, false);
        let tuesday = date(2026, 6, 2);
        let check = quota.check_quota(tuesday);
        assert_eq!(check.daily.used, 0);
        assert_eq!(check.weekly.used, 4);
        assert_eq!(check.remaining, 4);
    }

    #[test]
    fn back_dated_check_does_not_reopen_the_day() {
        let quota = manager(4, 10);
        let tuesday = date(2026, 6, 2);
        assert_eq!(quota.admit(tuesday, 4, false).admitted, 4);

        let earlier = quota.check_quota(monday());
        assert_eq!(earlier.remaining, 0);
        assert_eq!(earlier.weekly.used, 4);

        let second = quota.admit(tuesday, 4, false);
        assert_eq!(second.admitted, 0);
        assert_eq!(second.limited_by, Some(QuotaWindow::Daily));
        assert_eq!(quota.check_quota(tuesday).daily.used, 4);
    }

    #[test]
    fn back_dated_admission_is_refused_without_charging() {
        let quota = manager(4, 10);
        let wednesday = date(2026, 6, 3);
        quota.admit(wednesday, 1, false);

        let late = quota.admit(monday(), 2, true);
        assert_eq!(late.admitted, 0);
        assert!(!late.overridden);
        assert!(late.is_exhausted());

        let check = quota.check_quota(wednesday);
        assert_eq!(check.daily.used, 1);
        assert_eq!(check.weekly.used, 1);
        assert_eq!(check.remaining, 3);
    }

    #[test]
    fn new_week_starts_from_zero() {
        let quota = manager(4, 5);
        quota.admit(monday(), 4, false);
        quota.admit(date(2026, 6, 2), 4, false);
        let next_monday = date(2026, 6, 8);
        let check = quota.check_quota(next_monday);
        assert_eq!(check.weekly.used, 0);
        assert_eq!(check.weekly.period_start, next_monday);
        // No rollover of the unused daily allowance.
        assert_eq!(check.remaining, 4);
    }

    #[test]
    fn saturday_counts_against_the_week() {
        let quota = manager(4, 6);
        quota.admit(date(2026, 6, 5), 4, false);
        let admission = quota.admit(date(2026, 6, 6), 4, false);
        assert_eq!(admission.admitted, 2);
        assert_eq!(admission.limited_by, Some(QuotaWindow::Weekly));
    }

    #[test]
    fn completed_ids_merge_without_duplicates() {
        let daily = UsageSnapshot {
            used: 1,
            completed_ids: vec!["idea-1".into()],
        };
        let weekly = UsageSnapshot {
            used: 2,
            completed_ids: vec!["idea-0".into(), "idea-1".into()],
        };
        assert_eq!(merge_completed(daily, weekly), vec!["idea-0", "idea-1"]);
    }
}

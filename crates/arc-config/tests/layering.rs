//! Integration tests for configuration layering.
//!
//! Uses `figment::Jail` for sandboxed cwd and env var manipulation.

use arc_config::ArcConfig;
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[novelty]
shortlist_size = 40
exploration_fraction = 0.2
seed = 7

[quota]
daily_cap = 4
weekly_cap = 12

[gates.styles.turnaround]
max_net_debt_to_ebitda = 6.5
"#,
        )?;

        let config: ArcConfig = Figment::from(Serialized::defaults(ArcConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.novelty.shortlist_size, 40);
        assert_eq!(config.novelty.seed, Some(7));
        assert_eq!(config.novelty.exploration_slots(), 8);
        assert_eq!(config.quota.daily_cap, 4);
        assert_eq!(config.quota.weekly_cap, 12);
        assert_eq!(
            config.gates.styles.turnaround.max_net_debt_to_ebitda,
            Some(6.5)
        );
        // Untouched sections keep their defaults.
        assert_eq!(config.research.concurrency, 3);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".arc")?;
        jail.create_file(
            ".arc/config.toml",
            r#"
[lane_a]
top_n = 12
"#,
        )?;

        let config = ArcConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.lane_a.top_n, 12);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".arc")?;
        jail.create_file(
            ".arc/config.toml",
            r#"
[research]
concurrency = 2
"#,
        )?;
        jail.set_env("ARC_RESEARCH__CONCURRENCY", "5");
        jail.set_env("ARC_SELECTOR__BUDGET", "2.5");

        let config = ArcConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.research.concurrency, 5);
        assert!((config.selector.budget - 2.5).abs() < f64::EPSILON);
        Ok(())
    });
}

#[test]
fn explicit_file_sits_below_env() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[quota]
daily_cap = 2
weekly_cap = 6
"#,
        )?;
        jail.set_env("ARC_QUOTA__WEEKLY_CAP", "8");

        let config =
            ArcConfig::load_with_file(std::path::Path::new("custom.toml")).map_err(|e| e.to_string())?;
        assert_eq!(config.quota.daily_cap, 2);
        assert_eq!(config.quota.weekly_cap, 8);
        Ok(())
    });
}

#[test]
fn inconsistent_weights_fail_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("ARC_RANKING__WEIGHTS__NOVELTY", "0.9");
        let err = ArcConfig::load().unwrap_err();
        assert!(err.to_string().contains("ranking.weights"));
        Ok(())
    });
}

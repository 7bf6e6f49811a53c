use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use arc_core::entities::{
    EvidenceRef, IdeaDraft, MonitoringResult, PromotedIdea, ResearchTaskResult, SynthesisResult,
    UniverseMember,
};
use arc_core::errors::AdapterError;
use arc_core::ports::{Enricher, ResearchAdapter, UniverseProvider};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AdapterError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AdapterError::Unavailable(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| AdapterError::InvalidResponse(format!("{}: {e}", path.display())))
}

pub struct FileUniverse {
    path: PathBuf,
}

impl FileUniverse {
    #[must_use]
    pub fn new(fixtures: &Path) -> Self {
        Self {
            path: fixtures.join("universe.json"),
        }
    }
}

#[async_trait]
impl UniverseProvider for FileUniverse {
    async fn fetch_universe(&self) -> Result<Vec<UniverseMember>, AdapterError> {
        read_json(&self.path).await
    }
}

/// Serves pre-written drafts keyed by ticker. A ticker without a draft is an
/// enrichment failure.
pub struct FileEnricher {
    path: PathBuf,
    drafts: tokio::sync::OnceCell<HashMap<String, IdeaDraft>>,
}

impl FileEnricher {
    #[must_use]
    pub fn new(fixtures: &Path) -> Self {
        Self {
            path: fixtures.join("drafts.json"),
            drafts: tokio::sync::OnceCell::new(),
        }
    }

    async fn drafts(&self) -> Result<&HashMap<String, IdeaDraft>, AdapterError> {
        self.drafts
            .get_or_try_init(|| async {
                let drafts: Vec<IdeaDraft> = read_json(&self.path).await?;
                Ok(drafts.into_iter().map(|d| (d.ticker.clone(), d)).collect())
            })
            .await
    }
}

#[async_trait]
impl Enricher for FileEnricher {
    async fn enrich(&self, member: &UniverseMember) -> Result<IdeaDraft, AdapterError> {
        self.drafts()
            .await?
            .get(&member.ticker)
            .cloned()
            .ok_or_else(|| AdapterError::InvalidResponse(format!("no draft for {}", member.ticker)))
    }
}

/// Recorded output of one research task; timestamps are stamped on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskFixture {
    pub content: serde_json::Value,
    #[serde(default)]
    pub evidence: Vec<EvidenceRef>,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub implications: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchFixture {
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskFixture>,
    #[serde(default)]
    pub synthesis: Option<SynthesisResult>,
    #[serde(default)]
    pub monitoring: Option<MonitoringResult>,
}

pub struct FileResearch {
    dir: PathBuf,
}

impl FileResearch {
    #[must_use]
    pub fn new(fixtures: &Path) -> Self {
        Self {
            dir: fixtures.join("research"),
        }
    }

    async fn fixture(&self, ticker: &str) -> Result<ResearchFixture, AdapterError> {
        read_json(&self.dir.join(format!("{ticker}.json"))).await
    }
}

#[async_trait]
impl ResearchAdapter for FileResearch {
    async fn run_task(
        &self,
        task_id: &str,
        idea: &PromotedIdea,
    ) -> Result<ResearchTaskResult, AdapterError> {
        let started_at = Utc::now();
        let task = self
            .fixture(&idea.ticker)
            .await?
            .tasks
            .remove(task_id)
            .ok_or_else(|| {
                AdapterError::InvalidResponse(format!("{}: no output for {task_id}", idea.ticker))
            })?;
        Ok(ResearchTaskResult {
            task_id: task_id.to_string(),
            content: task.content,
            evidence: task.evidence,
            key_findings: task.key_findings,
            implications: task.implications,
            confidence: task.confidence,
            started_at,
            completed_at: Utc::now(),
        })
    }

    async fn synthesize(
        &self,
        idea: &PromotedIdea,
        _results: &[ResearchTaskResult],
    ) -> Result<SynthesisResult, AdapterError> {
        self.fixture(&idea.ticker)
            .await?
            .synthesis
            .ok_or_else(|| AdapterError::InvalidResponse(format!("{}: no synthesis", idea.ticker)))
    }

    async fn plan_monitoring(
        &self,
        idea: &PromotedIdea,
        _synthesis: &SynthesisResult,
        _results: &[ResearchTaskResult],
    ) -> Result<MonitoringResult, AdapterError> {
        self.fixture(&idea.ticker)
            .await?
            .monitoring
            .ok_or_else(|| AdapterError::InvalidResponse(format!("{}: no monitoring plan", idea.ticker)))
    }
}

#[cfg(test)]
pub(crate) mod sample {
    //! A small fixture directory: six tickers, drafts for all but one,
    //! research for two.

    use std::path::Path;

    use serde_json::json;

    pub const TASKS: [&str; 2] = ["business_overview_report", "valuation_analysis"];

    fn draft(ticker: &str) -> serde_json::Value {
        json!({
            "ticker": ticker,
            "company_name": format!("{ticker} Industries"),
            "style": "quality_compounder",
            "hypothesis": format!("{ticker} pricing power is underestimated by consensus"),
            "mechanism": "Contract repricing lifts margins as legacy deals roll off",
            "edge_types": ["variant_perception"],
            "metrics": {
                "net_debt_to_ebitda": 1.2,
                "ebit_margin": 0.18,
                "ev_to_ebit": 14.0,
                "roic": 0.16,
                "revenue_growth": 0.08
            },
            "catalysts": [{ "description": "Investor day", "expected_window": "Q3" }],
            "signposts": ["Renewal pricing", "Gross margin"],
            "score": {
                "edge_clarity": 4.0,
                "business_quality": 4.0,
                "financial_resilience": 4.0,
                "valuation_tension": 3.5,
                "catalyst_clarity": 3.5,
                "information_integrity": 4.0
            }
        })
    }

    fn research(ticker: &str) -> serde_json::Value {
        let task = |id: &str| {
            json!({
                "content": { "summary": format!("{ticker} {id}") },
                "evidence": [{ "source": "10-K", "locator": "p. 12", "grounded": true }],
                "key_findings": [format!("{id} supports the thesis")],
                "confidence": 0.8
            })
        };
        json!({
            "tasks": {
                (TASKS[0]): task(TASKS[0]),
                (TASKS[1]): task(TASKS[1])
            },
            "synthesis": {
                "thesis": format!("{ticker} re-rates as margins expand"),
                "bull": { "probability": 0.25, "target_return": 0.5, "narrative": "Fast repricing" },
                "base": { "probability": 0.5, "target_return": 0.2, "narrative": "Steady" },
                "bear": { "probability": 0.25, "target_return": -0.2, "narrative": "Churn" },
                "expected_value": 0.175,
                "recommendation": "buy",
                "confidence": 0.75
            },
            "monitoring": {
                "kpis": [{ "name": "Gross margin", "target": "> 40%", "cadence": "quarterly" }],
                "invalidation_triggers": ["Churn above 10%"]
            }
        })
    }

    pub fn write(dir: &Path) {
        let tickers = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF"];
        let universe: Vec<serde_json::Value> = tickers
            .iter()
            .map(|t| {
                json!({
                    "ticker": t,
                    "name": format!("{t} Industries"),
                    "region": "US",
                    "sector": "Industrials",
                    "market_cap_usd": 5.0e9,
                    "currency": "USD"
                })
            })
            .collect();
        let drafts: Vec<serde_json::Value> = tickers[..5].iter().map(|t| draft(t)).collect();

        std::fs::create_dir_all(dir.join("research")).unwrap();
        std::fs::write(dir.join("universe.json"), json!(universe).to_string()).unwrap();
        std::fs::write(dir.join("drafts.json"), json!(drafts).to_string()).unwrap();
        for t in &tickers[..5] {
            std::fs::write(
                dir.join("research").join(format!("{t}.json")),
                research(t).to_string(),
            )
            .unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use arc_core::enums::InvestmentStyle;

    use super::*;

    fn promoted(ticker: &str) -> PromotedIdea {
        PromotedIdea {
            idea_id: "idea-1".into(),
            ticker: ticker.into(),
            company_name: format!("{ticker} Industries"),
            style: InvestmentStyle::QualityCompounder,
            hypothesis: String::new(),
            mechanism: String::new(),
            edge_types: vec![],
            catalysts: vec![],
            signposts: vec![],
            promoted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn universe_and_drafts_load() {
        let dir = tempfile::tempdir().unwrap();
        sample::write(dir.path());

        let universe = FileUniverse::new(dir.path()).fetch_universe().await.unwrap();
        assert_eq!(universe.len(), 6);

        let enricher = FileEnricher::new(dir.path());
        let draft = enricher.enrich(&universe[0]).await.unwrap();
        assert_eq!(draft.ticker, "AAA");
        let missing = enricher.enrich(&universe[5]).await.unwrap_err();
        assert!(missing.to_string().contains("no draft for FFF"));
    }

    #[tokio::test]
    async fn missing_universe_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileUniverse::new(dir.path()).fetch_universe().await.unwrap_err();
        assert!(matches!(err, AdapterError::Unavailable(_)));
    }

    #[tokio::test]
    async fn research_serves_recorded_tasks() {
        let dir = tempfile::tempdir().unwrap();
        sample::write(dir.path());
        let research = FileResearch::new(dir.path());
        let idea = promoted("AAA");

        let result = research.run_task("valuation_analysis", &idea).await.unwrap();
        assert_eq!(result.task_id, "valuation_analysis");
        assert!(result.evidence[0].grounded);

        assert!(research.run_task("pre_mortem_analysis", &idea).await.is_err());

        let synthesis = research.synthesize(&idea, &[result.clone()]).await.unwrap();
        assert!(research.plan_monitoring(&idea, &synthesis, &[result]).await.is_ok());
        assert!(research.run_task("valuation_analysis", &promoted("FFF")).await.is_err());
    }
}

//! Entity builders shared by the repo tests.

use std::collections::BTreeMap;

use arc_core::entities::{
    CompletionReport, DecisionBrief, GateOutcome, GateResults, IdeaCard, MetricsSnapshot,
    NoveltyAnnotation, PacketContent, ResearchPacket, RiskFlags, SizingGuidance,
};
use arc_core::enums::{GateId, IdeaStatus, InvestmentStyle, NoveltyClass, PacketStatus, Verdict};
use chrono::{NaiveDate, TimeZone, Utc};

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
}

pub fn idea_card(id: &str, ticker: &str, rank_score: f64, run_date: NaiveDate) -> IdeaCard {
    let at = Utc
        .from_utc_datetime(&run_date.and_hms_opt(6, 0, 0).unwrap());
    IdeaCard {
        id: id.into(),
        ticker: ticker.into(),
        company_name: format!("{ticker} Holdings"),
        style: InvestmentStyle::SpecialSituation,
        hypothesis: "Spin-off discount closes".into(),
        mechanism: "Index inclusion forces buying".into(),
        edge_types: vec!["structural".into()],
        catalysts: vec![],
        signposts: vec!["Index review date".into()],
        metrics: MetricsSnapshot::default(),
        risk_flags: RiskFlags::default(),
        score: None,
        gate_results: GateResults {
            outcomes: GateId::ALL.iter().map(|g| GateOutcome::pass(*g)).collect(),
        },
        novelty: NoveltyAnnotation {
            score: 1.0,
            class: NoveltyClass::New,
            is_exploration: false,
        },
        rank_score,
        status: IdeaStatus::New,
        run_date,
        created_at: at,
        updated_at: at,
    }
}

pub fn packet(idea_id: &str, version: u32, previous_id: Option<&str>) -> ResearchPacket {
    ResearchPacket {
        id: format!("pkt-{idea_id}-{version}"),
        idea_id: idea_id.into(),
        version,
        previous_id: previous_id.map(String::from),
        content: PacketContent {
            idea_id: idea_id.into(),
            ticker: "ACME".into(),
            task_results: BTreeMap::new(),
            failed_tasks: vec![],
            synthesis: None,
            monitoring: None,
            stage_errors: vec![],
            confidence: 0.7,
            degraded: false,
            status: PacketStatus::Incomplete,
            completion: CompletionReport::default(),
        },
        diff: vec![],
        created_at: Utc.with_ymd_and_hms(2026, 6, 2, 9, 0, 0).unwrap(),
    }
}

pub fn brief(packet: &ResearchPacket) -> DecisionBrief {
    DecisionBrief {
        id: format!("brf-{}", packet.id),
        idea_id: packet.idea_id.clone(),
        packet_id: packet.id.clone(),
        packet_version: packet.version,
        ticker: packet.content.ticker.clone(),
        verdict: Verdict::Buy,
        expected_value: 0.18,
        thesis_summary: "Discount closes within a year".into(),
        sizing: SizingGuidance {
            max_position_pct: 3.5,
            conviction: 0.7,
            rationale: "confidence 0.70".into(),
        },
        key_risks: vec!["Index review slips".into()],
        ic_bundle_eligible: true,
        created_at: packet.created_at,
    }
}

//! # arc-discovery
//!
//! Lane A of the idea factory: novelty-aware shortlisting, the admission gate
//! battery, weighted ranking, and the sequential discovery run that ties them
//! together.

pub mod error;
pub mod gates;
pub mod lane_a;
pub mod novelty;
pub mod ranking;

mod test_support;

pub use error::DiscoveryError;
pub use gates::{GateEngine, GateEvaluation};
pub use lane_a::{GateRejection, ItemFailure, LaneADeps, LaneAOrchestrator, LaneARunReport};
pub use novelty::{NoveltyEngine, Shortlist};
pub use ranking::RankingEngine;

//! # arc-core
//!
//! Core types, ports, ID generation, and error types for the ARC idea factory.
//!
//! This crate provides the foundational types shared across all ARC crates:
//! - Entity structs for every pipeline object (universe members, drafts, idea
//!   cards, research packets, decision briefs, task definitions)
//! - Status enums with state machine transitions
//! - ID prefix constants and generation helpers
//! - Cross-cutting error types
//! - Run metrics and progress records exposed to API/UI layers
//! - Collaborator ports (`async_trait` interfaces) the engines consume

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod metrics;
pub mod ports;

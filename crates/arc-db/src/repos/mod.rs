//! Port implementations on [`ArcStore`](crate::ArcStore), one file per table group.

pub mod ideas;
pub mod novelty;
pub mod packets;
pub mod runs;
pub mod usage;

#[cfg(test)]
pub(crate) mod fixtures;

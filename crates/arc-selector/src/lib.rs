//! Task catalog and value/cost task selection.
//!
//! [`TaskCatalog`] holds the static task definitions; [`TaskSelector`] picks
//! a budget-bounded, dependency-closed subset and returns it in execution
//! order.

pub mod catalog;
pub mod error;
pub mod selector;

pub use catalog::TaskCatalog;
pub use error::SelectorError;
pub use selector::{Rejection, RejectionReason, Selection, SelectionRequest, TaskSelector};

//! Text analysis of the current message through the Symbl API
//!
//! Each analysis kind runs the same chain:
//! - read the body from the host
//! - submit it to the process-text endpoint
//! - wait, then poll the kind's result endpoint once
//! - render the JSON into the kind's pane

mod actor;
mod client;
mod error;
mod kind;
mod payload;
mod pipeline;

pub use actor::{AnalysisCommand, AnalysisEvent, spawn_analysis_actor};
pub use client::SymblClient;
pub use error::AnalysisError;
pub use kind::AnalysisKind;
pub use pipeline::{AnalysisContext, WaitStrategy};

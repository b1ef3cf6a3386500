//! Sentence segmentation.
//!
//! Regroups a document's flat stream of words and markers into sentence
//! nodes using a pluggable [`BreakPolicy`], selected by tokenisation model
//! name through a [`PolicyRegistry`].

mod config;
mod engine;
mod registry;
mod strategy;

pub use config::create_default_policies;
pub use engine::Segmenter;
pub use registry::PolicyRegistry;
pub use strategy::{BreakPolicy, PeriodAndCapitalPolicy, PeriodPolicy};

//! Generic attributed tree used for every stage of the corpus pipeline.
//!
//! A single [`Node`] type carries an explicit [`NodeKind`]; specialised
//! behaviour (words are leaves, phrases carry a `type`) hangs off the kind
//! rather than off a type hierarchy.

mod attributes;
mod kind;
mod node;

pub use attributes::Attributes;
pub use kind::{MarkerKind, NodeKind};
pub use node::{Descendants, Node};

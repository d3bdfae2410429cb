//! Controller layer between callers and the immutable state tree.
//!
//! # Responsibility
//! - Hold the current tree and publish a new one per user action.
//! - Persist every committed tree through the `Store` collaborator.

pub mod tracker;

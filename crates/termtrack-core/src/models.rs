//! Domain models for termtrack.
//!
//! These are the core types shared across all crates.

pub mod project;
pub mod session;
pub mod task;
pub mod user;

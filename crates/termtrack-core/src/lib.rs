//! Core domain types for termtrack: users, projects, tasks and the
//! repository traits the storage layer implements.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{TermtrackError, TermtrackResult};

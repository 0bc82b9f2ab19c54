//! Core of the job board service: job postings, application lifecycle with
//! capacity-limited positions, and worker saved-job bookmarks.

pub mod board;
pub mod config;
pub mod error;
pub mod telemetry;

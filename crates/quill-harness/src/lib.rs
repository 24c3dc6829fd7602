//! # Quill Harness
//!
//! Support code for checking that scheduled posts reach the public listing:
//! synthetic post generation, visibility verification, publication polling
//! and cleanup of the synthetic posts afterwards.
//!
//! Every function works against the `PostRepository` port, so the same code
//! runs in-process against the in-memory store and remotely against a live
//! server through the HTTP adapter.

pub mod cleanup;
pub mod error;
pub mod generator;
pub mod polling;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use cleanup::{CleanupReport, cleanup_test_data};
pub use error::HarnessError;
pub use generator::{
    BatchFailure, BatchOutcome, GeneratedPost, GenerationPlan, PostSpec, TestDataGenerator,
};
pub use polling::{LastSeen, PollConfig, PollOutcome, wait_for_publication};
pub use visibility::{ActualVisibility, VisibilityCheck, VisibilityReport, verify_visibility};

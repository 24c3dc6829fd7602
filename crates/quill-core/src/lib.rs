//! # Quill Core
//!
//! The domain layer of Quill.
//! Holds the content status model, the ports infrastructure implements, and
//! the content scoring checklists. Nothing in here performs I/O.

pub mod analysis;
pub mod domain;
pub mod error;
pub mod ports;

pub use domain::{ContentPost, PostStatus, derive_status};
pub use error::{DomainError, RepoError};

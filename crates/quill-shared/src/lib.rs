//! # Quill Shared
//!
//! Wire types shared by the API server and its clients (the HTTP content
//! store adapter and the publication harness CLI).

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};

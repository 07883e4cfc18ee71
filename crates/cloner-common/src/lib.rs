//! Media Cloner Common Library
//!
//! Shared types, logging setup, and error handling for the media cloner.
//!
//! # Overview
//!
//! - **Error Handling**: [`ClonerError`] for configuration and start-up failures
//! - **Logging**: Centralised `tracing` subscriber initialisation
//! - **Types**: Item lifecycle states and content classification
//!
//! # Example
//!
//! ```no_run
//! use cloner_common::types::{extension_for_mime, LifecycleState};
//!
//! assert_eq!(extension_for_mime("image/png"), Some(".png"));
//! assert_eq!("pending".parse::<LifecycleState>().ok(), Some(LifecycleState::Pending));
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{ClonerError, Result};
pub use types::{ContentCategory, LifecycleState};

//! Core post-parse functionality.
//!
//! This module contains everything that operates on already-parsed entries:
//!
//! - [`models`] — [`OutputConfig`] output field toggles
//! - [`filter`] — [`FilterConfig`] and [`apply_filters`]
//! - [`output`] — JSON / JSONL / CSV writers
//!
//! # Example
//!
//! ```
//! use flowpack::core::{FilterConfig, apply_filters};
//! use flowpack::entry::MessageType;
//!
//! let config = FilterConfig::new().with_message_type(MessageType::Mit);
//! let filtered = apply_filters(vec![], &config);
//! assert!(filtered.is_empty());
//! ```

pub mod filter;
pub mod models;
pub mod output;

pub use filter::{FilterConfig, apply_filters};
pub use models::OutputConfig;

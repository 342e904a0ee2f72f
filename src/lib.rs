//! truthguard-rs: one normalizer for every shape the fact-verification backend answers with.
//!
//! [`normalize::normalize`] is the core; everything else wraps it for I/O.

pub mod client;
pub mod config;
pub mod error;
pub mod fences;
pub mod markdown;
pub mod normalize;
pub mod report;
pub mod server;
pub mod types;

pub use normalize::normalize;
pub use types::{Normalized, NormalizedVerdict, VerdictClass};

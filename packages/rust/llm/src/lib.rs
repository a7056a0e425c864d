//! LLM call capability and reply normalization for BrandLens.
//!
//! - [`LlmClient`] — the narrow "prompt in, reply text out" trait agents use
//! - [`AnthropicClient`] — the Messages API implementation
//! - [`normalize_reply`] — free-form reply text → structured mapping

pub mod client;
pub mod normalize;

pub use client::{AnthropicClient, LlmClient};
pub use normalize::{normalize_keys, normalize_reply};

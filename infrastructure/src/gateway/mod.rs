//! AI gateway adapter
//!
//! Implements [`GenerationClient`](arena_application::GenerationClient) over an
//! OpenAI-compatible chat completions endpoint.

pub mod client;
pub mod protocol;

pub use client::AiGatewayClient;

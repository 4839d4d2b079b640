//! LLM provider abstraction layer
//!
//! This crate provides provider-agnostic abstractions for talking to hosted
//! Large Language Models through a chat-completion interface:
//!
//! - Message types for LLM communication
//! - Completion request/response types
//! - The [`LLMProvider`] trait that components depend on
//! - An OpenAI-compatible provider, usable against any endpoint that speaks the
//!   `/chat/completions` protocol (OpenAI, Groq, local servers)
//!
//! With the `mock` feature enabled, a mockall-generated `MockLLMProvider` is
//! exported for tests in downstream crates.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

#[cfg(any(test, feature = "mock"))]
pub use provider::MockLLMProvider;

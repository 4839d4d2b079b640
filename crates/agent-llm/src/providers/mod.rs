//! Concrete LLM provider implementations

pub mod openai;

pub use openai::{GROQ_API_BASE, OpenAIConfig, OpenAIProvider};

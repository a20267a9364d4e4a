//! cockpit-llm — LLM backend abstraction layer.
//! The tech-watch analyzer talks to a `LlmBackend`; Gemini is the production backend.

pub mod backend;

pub use backend::{GeminiBackend, LlmBackend, LlmError, LlmRequest, LlmResponse, Message};

//! OpenAI-compatible chat completions adapter
//!
//! Implements LlmGateway over `POST {base_url}/v1/chat/completions`, which
//! OpenAI, Azure-style proxies, vLLM, Ollama and most hosted gateways serve.

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod session;

pub use gateway::{OpenAiGateway, OpenAiSettings};

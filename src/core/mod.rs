//! Core configuration shared by the library and the binary.

mod config;

pub use config::{AiConfig, Config, GeneralConfig, OllamaConfig, UiConfig, FALLBACK_API_KEY_ENV};

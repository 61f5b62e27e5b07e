//! # Love-OS Core
//!
//! Domain types, traits, and the provider error shared by every Love-OS crate.
//! This crate has **no framework dependencies**. It only defines the seams
//! the other crates implement against.
//!
//! ## Seams
//!
//! - [`Provider`] — a chat-completion backend (OpenAI-compatible, Gemini, ...)
//! - [`Generator`] — the `generate(prompt, temperature)` capability the
//!   flow engine is built on. Providers are adapted into generators; tests
//!   inject scripted ones.

pub mod error;
pub mod generator;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::ProviderError;
pub use generator::Generator;
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};

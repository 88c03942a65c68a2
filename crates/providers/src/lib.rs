//! LLM Provider implementations for Ladle.
//!
//! All providers implement the `ladle_core::Provider` trait.
//! The router selects the correct provider based on configuration.

pub mod openai_compat;
pub mod preference;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use preference::PreferenceChain;
pub use router::{ProviderRouter, build_from_config, model_for};

// Configuration and identity types shared across all Roost crates
pub mod config;
pub mod identity;

// Re-export commonly used types for convenience
pub use config::TokenConfig;
pub use identity::{NodeIdentity, SigningSecret};

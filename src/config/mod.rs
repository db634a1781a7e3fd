//! Configuration module
//!
//! Settings are plain values handed to providers at construction time.
//! There is deliberately no global settings instance: a provider only
//! sees the configuration it was built with.

mod settings;

pub use settings::*;

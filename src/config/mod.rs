//! Application configuration module.

pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::Config;

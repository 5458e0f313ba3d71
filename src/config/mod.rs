//! Project configuration (`.envseal.toml`).

pub mod settings;

pub use settings::Settings;

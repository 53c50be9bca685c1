//! Configuration file parsing and validation

pub mod rewire_toml;

pub use rewire_toml::{CONFIG_FILE, ColorOption, Config, OutputConfig, OutputFormat, RewireMeta};

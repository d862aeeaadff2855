//! Model configuration.
//!
//! A [`ModelConfig`] is read from JSON. Every field is optional; missing
//! fields fall back to the single coloured triangle the demo draws.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    bundle::{AttributeDescriptor, ComponentType},
    error::Result,
    model::DrawProperties,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "glmodel".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub debug: bool,
    /// A `log` level filter such as `"info"` or `"debug"`.
    pub log_level: String,
    pub window: WindowConfig,
    pub clear_color: [f32; 4],
    pub draw: DrawProperties,
    /// Vertex attribute layout, in the order the attributes are set up.
    pub attributes: IndexMap<String, AttributeDescriptor>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let mut attributes = IndexMap::new();
        attributes.insert(
            "position".to_string(),
            AttributeDescriptor::new(2, ComponentType::Float),
        );
        Self {
            name: "triangle".to_string(),
            debug: false,
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            clear_color: [0.0; 4],
            draw: DrawProperties::default(),
            attributes,
        }
    }
}

impl ModelConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The configured level, or `Info` if it does not parse.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

//! Runtime settings.
//!
//! Defaults are built in, then overridden by an optional `genea.toml` (or the
//! file named by `GENEA_CONFIG`) and finally by `GENEA_*` environment
//! variables, e.g. `GENEA_GRAPH__RANKSEP=2`.
use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const CONFIG_ENV: &str = "GENEA_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "genea.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub prompt: String,
    pub log_filter: String,
    pub graph: GraphSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphSettings {
    pub ranksep: f64,
    pub male_color: String,
    pub female_color: String,
    pub dot_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: "genea>> ".to_string(),
            log_filter: "warn".to_string(),
            graph: GraphSettings::default(),
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            ranksep: 3.0,
            male_color: "lightblue".to_string(),
            female_color: "pink".to_string(),
            dot_suffix: ".dot".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let file = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let defaults = Settings::default();
        let settings = Config::builder()
            .set_default("prompt", defaults.prompt)?
            .set_default("log_filter", defaults.log_filter)?
            .set_default("graph.ranksep", defaults.graph.ranksep)?
            .set_default("graph.male_color", defaults.graph.male_color)?
            .set_default("graph.female_color", defaults.graph.female_color)?
            .set_default("graph.dot_suffix", defaults.graph.dot_suffix)?
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix("GENEA").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

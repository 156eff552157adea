//! Tool configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `delve.ron` in the working directory (if exists)
//! 3. The file passed with `--config` (must exist)
//! 4. Environment variables prefixed with `DELVE_`
//!
//! Example environment variable: `DELVE_GENERATION__PIT__OFFSET_Y=5`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use delve_core::GenConfig;
use serde::{Deserialize, Serialize};

/// Main tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub generation: GenConfig,
}

/// Reference world bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Lowest buildable Y
    pub min_height: i32,
    /// Highest buildable Y (exclusive)
    pub max_height: i32,
    /// Terrain is generated this many blocks around the target column
    pub radius: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            min_height: 0,
            max_height: 256,
            radius: 24,
        }
    }
}

impl CliConfig {
    /// Load configuration with layered priority, see the module docs
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("world.min_height", 0_i64)?
            .set_default("world.max_height", 256_i64)?
            .set_default("world.radius", 24_i64)?
            // Layer 2: Config file in the working directory (optional)
            .add_source(
                File::with_name("delve")
                    .format(config::FileFormat::Ron)
                    .required(false),
            );

        // Layer 3: Explicit config file
        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path)
                    .format(config::FileFormat::Ron)
                    .required(true),
            );
        }

        // Layer 4: Environment variables (DELVE_WORLD__RADIUS, etc.)
        let builder = builder.add_source(Environment::with_prefix("DELVE").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

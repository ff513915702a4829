//! Global sound physics settings
//!
//! Holds the values the reflectivity table falls back on. Stored as TOML or
//! RON through the [`Config`] trait; the reflectivity table itself lives in
//! its own property file (see [`crate::reflectivity`]).

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// Supplies the reflectivity used for sound types without an explicit value
///
/// The provider is consulted every time defaults are built and on every
/// lookup miss, so a provider whose value changes is honored immediately.
pub trait DefaultReflectivity {
    /// Current default block reflectivity
    fn default_reflectivity(&self) -> f64;
}

impl DefaultReflectivity for f64 {
    fn default_reflectivity(&self) -> f64 {
        *self
    }
}

impl<T: DefaultReflectivity + ?Sized> DefaultReflectivity for &T {
    fn default_reflectivity(&self) -> f64 {
        (**self).default_reflectivity()
    }
}

impl<T: DefaultReflectivity + ?Sized> DefaultReflectivity for std::rc::Rc<T> {
    fn default_reflectivity(&self) -> f64 {
        (**self).default_reflectivity()
    }
}

impl<T: DefaultReflectivity + ?Sized> DefaultReflectivity for std::sync::Arc<T> {
    fn default_reflectivity(&self) -> f64 {
        (**self).default_reflectivity()
    }
}

/// # Sound Physics Configuration
///
/// Top-level settings file for the sound physics subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundPhysicsConfig {
    /// Reflectivity for blocks without a curated or configured value
    pub default_block_reflectivity: f64,
    /// Location of the per-sound-type reflectivity property file
    pub reflectivity_file: PathBuf,
}

impl SoundPhysicsConfig {
    /// Default block reflectivity when nothing else is configured
    pub const DEFAULT_BLOCK_REFLECTIVITY: f64 = 0.5;

    /// Accepted range for the default block reflectivity
    pub const DEFAULT_REFLECTIVITY_RANGE: RangeInclusive<f64> = 0.01..=10.0;

    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            default_block_reflectivity: Self::DEFAULT_BLOCK_REFLECTIVITY,
            reflectivity_file: PathBuf::from("config/soundphysics/reflectivity.properties"),
        }
    }

    /// Set the default block reflectivity
    pub fn with_default_block_reflectivity(mut self, value: f64) -> Self {
        self.default_block_reflectivity = value;
        self
    }

    /// Set the reflectivity file location
    pub fn with_reflectivity_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.reflectivity_file = path.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let value = self.default_block_reflectivity;
        if !Self::DEFAULT_REFLECTIVITY_RANGE.contains(&value) {
            return Err(ConfigError::Invalid(format!(
                "default_block_reflectivity {value} outside {}..={}",
                Self::DEFAULT_REFLECTIVITY_RANGE.start(),
                Self::DEFAULT_REFLECTIVITY_RANGE.end()
            )));
        }

        if self.reflectivity_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("reflectivity_file cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Load settings from `path`, falling back to defaults
    ///
    /// A missing, unreadable or invalid file is logged and replaced by
    /// [`SoundPhysicsConfig::default`]; it never stops startup.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match Self::load_from_file(path).and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => {
                log::info!("Loaded sound physics settings from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

impl Default for SoundPhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultReflectivity for SoundPhysicsConfig {
    fn default_reflectivity(&self) -> f64 {
        self.default_block_reflectivity
    }
}

impl Config for SoundPhysicsConfig {}

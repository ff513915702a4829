//! # Sound Physics
//!
//! Per-material reflectivity configuration for block-based acoustic
//! simulation.
//!
//! ## Features
//!
//! - **Stable names**: every block sound type has a hard-coded canonical
//!   name, independent of the host's internal identifiers
//! - **Property file storage**: a human-editable `NAME=value` file, created
//!   with sensible defaults on first use
//! - **Forgiving loads**: bad values and unknown names are logged and skipped
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sound_physics::prelude::*;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let settings = SoundPhysicsConfig::load_or_default("config/soundphysics.toml");
//!     let path = settings.reflectivity_file.clone();
//!     let mut reflectivity = ReflectivityConfig::new(path, settings)?;
//!
//!     let stone = reflectivity.reflectivity(SoundType::Stone);
//!     reflectivity.set_reflectivity(SoundType::Wool, stone / 10.0);
//!     reflectivity.save()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod foundation;
pub mod reflectivity;
pub mod sound_type;

pub use config::{Config, ConfigError, DefaultReflectivity, Properties, SoundPhysicsConfig};
pub use reflectivity::{EntryError, LoadReport, ReflectivityConfig, ReflectivityMap};
pub use sound_type::{NameRegistry, SoundType, UnknownSoundType};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, DefaultReflectivity, SoundPhysicsConfig},
        reflectivity::{LoadReport, ReflectivityConfig, ReflectivityMap},
        sound_type::{NameRegistry, SoundType},
    };
}

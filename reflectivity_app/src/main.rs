//! Reflectivity table tool
//!
//! Opens the reflectivity file named by the sound physics settings (creating
//! it with defaults if needed) and prints every sound type with its label
//! and current value.
//!
//! Usage: `reflectivity_tool [SETTINGS_FILE] [--reset]`
//!
//! Entries skipped while opening the file are summarized in the log.
//! `--reset` writes the built-in defaults back over the file.

use sound_physics::foundation::logging::{self, info, warn, LevelFilter};
use sound_physics::prelude::*;

/// Settings file used when none is given on the command line
const DEFAULT_SETTINGS_PATH: &str = "config/soundphysics.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(LevelFilter::Info);

    let mut settings_path = DEFAULT_SETTINGS_PATH.to_string();
    let mut reset = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--reset" => reset = true,
            _ => settings_path = arg,
        }
    }

    let settings = SoundPhysicsConfig::load_or_default(&settings_path);
    let path = settings.reflectivity_file.clone();
    let mut reflectivity = ReflectivityConfig::new(path, settings)?;

    let report = reflectivity.last_report();
    if report.is_clean() {
        info!("{} entries applied from {}", report.applied, reflectivity.path().display());
    } else {
        let skipped: Vec<String> = report.skipped.iter().map(ToString::to_string).collect();
        warn!(
            "{} entries applied from {}, {} rewritten with defaults: {}",
            report.applied,
            reflectivity.path().display(),
            skipped.len(),
            skipped.join("; ")
        );
    }

    if reset {
        info!("Resetting {} to defaults", reflectivity.path().display());
        reflectivity.reset_to_defaults().save()?;
    }

    let width = SoundType::ALL
        .iter()
        .map(|t| t.display_name().len())
        .max()
        .unwrap_or(0);

    for (sound_type, value) in reflectivity.reflectivities() {
        println!(
            "{:<width$}  {:<20}  {}",
            sound_type.display_name(),
            sound_type.name(),
            value
        );
    }

    info!(
        "{} sound types, default reflectivity {}",
        NameRegistry::global().len(),
        reflectivity.defaults().default_reflectivity()
    );
    Ok(())
}

//! Per-sound-type reflectivity table
//!
//! [`ReflectivityConfig`] owns the mapping from [`SoundType`] to reflectivity
//! and keeps it in sync with a property file of `NAME=value` lines, one per
//! sound type.
//!
//! Loading always starts from the built-in defaults and layers whatever valid
//! entries the file has on top. Entries with a value that isn't a number, or
//! a key that isn't a known sound type, are logged and skipped; a damaged file
//! never prevents startup. Saving rewrites the whole file from memory.
//!
//! No locking is done here. Callers that share a `ReflectivityConfig` between
//! threads must serialize access themselves, and edits made to the file by
//! another program are lost on the next [`ReflectivityConfig::save`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, DefaultReflectivity, Properties};
use crate::sound_type::{NameRegistry, SoundType};

/// Reflectivity per sound type, in sound type declaration order
pub type ReflectivityMap = BTreeMap<SoundType, f64>;

/// Header comment written at the top of the reflectivity file
const FILE_HEADER: &str = "Block sound type reflectivity";

/// Curated reflectivity values
///
/// Hard, stone-like materials reflect more than the default; soft or porous
/// ones absorb more.
const CURATED_REFLECTIVITY: &[(SoundType, f64)] = &[
    (SoundType::Stone, 1.5),
    (SoundType::NetheriteBlock, 1.5),
    (SoundType::Tuff, 1.5),
    (SoundType::Amethyst, 1.5),
    (SoundType::Basalt, 1.5),
    (SoundType::Calcite, 1.5),
    (SoundType::BoneBlock, 1.5),
    (SoundType::Copper, 1.25),
    (SoundType::Deepslate, 1.5),
    (SoundType::DeepslateBricks, 1.5),
    (SoundType::DeepslateTiles, 1.5),
    (SoundType::PolishedDeepslate, 1.5),
    (SoundType::NetherBricks, 1.5),
    (SoundType::Netherrack, 1.1),
    (SoundType::NetherGoldOre, 1.1),
    (SoundType::NetherOre, 1.1),
    (SoundType::Stem, 0.4),
    (SoundType::Wool, 0.1),
    (SoundType::HoneyBlock, 0.1),
    (SoundType::Moss, 0.1),
    (SoundType::SoulSand, 0.2),
    (SoundType::SoulSoil, 0.2),
    (SoundType::CoralBlock, 0.2),
    (SoundType::Metal, 1.25),
    (SoundType::Wood, 0.4),
    (SoundType::Gravel, 0.3),
    (SoundType::Grass, 0.3),
    (SoundType::Glass, 0.75),
    (SoundType::Sand, 0.2),
    (SoundType::Snow, 0.15),
];

/// A property file entry that was skipped during load
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// The value is not a number
    #[error("Failed to parse reflectivity of {key}: {value:?}")]
    InvalidValue {
        /// Entry key as written in the file
        key: String,
        /// Raw value as written in the file
        value: String,
    },

    /// The key doesn't name a known sound type
    #[error("Sound type {key} not found")]
    UnknownSoundType {
        /// Entry key as written in the file
        key: String,
    },
}

/// Outcome of [`ReflectivityConfig::load`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries that overrode a default
    pub applied: usize,
    /// Entries that were ignored, in file order
    pub skipped: Vec<EntryError>,
}

impl LoadReport {
    /// Whether every entry in the file was applied
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Reflectivity table backed by a property file
#[derive(Debug)]
pub struct ReflectivityConfig<P> {
    path: PathBuf,
    properties: Properties,
    reflectivity: ReflectivityMap,
    defaults: P,
    last_report: LoadReport,
}

impl<P: DefaultReflectivity> ReflectivityConfig<P> {
    /// Open the reflectivity file at `path`
    ///
    /// Loads whatever is there (a missing file counts as empty) and writes
    /// the result straight back, so after this call the file exists and
    /// lists every known sound type.
    pub fn new(path: impl Into<PathBuf>, defaults: P) -> Result<Self, ConfigError> {
        let mut config = Self {
            path: path.into(),
            properties: Properties::new(),
            reflectivity: ReflectivityMap::new(),
            defaults,
            last_report: LoadReport::default(),
        };
        config.load()?;
        config.save()?;
        Ok(config)
    }

    /// Reload the table from disk, replacing everything in memory
    pub fn load(&mut self) -> Result<LoadReport, ConfigError> {
        self.properties = Properties::load_or_empty(&self.path)?;

        let mut reflectivity = self.create_defaults();
        let mut report = LoadReport::default();

        for (key, value) in self.properties.iter() {
            match parse_entry(key, value) {
                Ok((sound_type, value)) => {
                    log::debug!("Reflectivity of {} set to {}", sound_type, value);
                    reflectivity.insert(sound_type, value);
                    report.applied += 1;
                }
                Err(e) => {
                    log::warn!("{}", e);
                    report.skipped.push(e);
                }
            }
        }

        self.reflectivity = reflectivity;

        log::info!(
            "Loaded reflectivity from {} ({} applied, {} skipped)",
            self.path.display(),
            report.applied,
            report.skipped.len()
        );
        self.last_report = report.clone();
        Ok(report)
    }

    /// Write the whole table to disk, replacing the file's contents
    pub fn save(&mut self) -> Result<(), ConfigError> {
        self.properties.clear();

        for (&sound_type, &value) in &self.reflectivity {
            self.properties.insert(sound_type.name(), format!("{value:?}"));
        }

        self.properties.save(&self.path, Some(FILE_HEADER))?;
        log::debug!(
            "Saved {} reflectivity entries to {}",
            self.properties.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Build the default table: the provider's default for every sound type,
    /// then the curated values on top
    pub fn create_defaults(&self) -> ReflectivityMap {
        let default = self.defaults.default_reflectivity();

        let mut map: ReflectivityMap = NameRegistry::global()
            .iter()
            .map(|sound_type| (sound_type, default))
            .collect();

        map.extend(CURATED_REFLECTIVITY.iter().copied());
        map
    }

    /// The current table
    ///
    /// Borrowed read-only; change values through
    /// [`ReflectivityConfig::set_reflectivity`].
    pub fn reflectivities(&self) -> &ReflectivityMap {
        &self.reflectivity
    }

    /// Reflectivity of one sound type, or the default if it has no entry
    pub fn reflectivity(&self, sound_type: SoundType) -> f64 {
        self.reflectivity
            .get(&sound_type)
            .copied()
            .unwrap_or_else(|| self.defaults.default_reflectivity())
    }

    /// Set the reflectivity of a sound type
    ///
    /// Takes effect in memory only; call [`ReflectivityConfig::save`] to
    /// persist. Any value is accepted, including negative and non-finite ones.
    pub fn set_reflectivity(&mut self, sound_type: SoundType, value: f64) -> &mut Self {
        self.reflectivity.insert(sound_type, value);
        self
    }

    /// Discard all in-memory changes and go back to the defaults
    pub fn reset_to_defaults(&mut self) -> &mut Self {
        self.reflectivity = self.create_defaults();
        self
    }

    /// Outcome of the most recent [`ReflectivityConfig::load`], including
    /// the one run by [`ReflectivityConfig::new`]
    pub fn last_report(&self) -> &LoadReport {
        &self.last_report
    }

    /// Location of the backing property file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The default reflectivity provider
    pub fn defaults(&self) -> &P {
        &self.defaults
    }
}

/// Turn one property entry into a table entry
fn parse_entry(key: &str, value: &str) -> Result<(SoundType, f64), EntryError> {
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| EntryError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })?;

    let sound_type = NameRegistry::global()
        .category_of(key)
        .ok_or_else(|| EntryError::UnknownSoundType { key: key.to_string() })?;

    Ok((sound_type, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::BTreeSet;

    const DEFAULT: f64 = 0.5;

    fn open(dir: &tempfile::TempDir) -> ReflectivityConfig<f64> {
        ReflectivityConfig::new(dir.path().join("reflectivity.properties"), DEFAULT).unwrap()
    }

    fn open_with(dir: &tempfile::TempDir, contents: &str) -> ReflectivityConfig<f64> {
        let path = dir.path().join("reflectivity.properties");
        std::fs::write(&path, contents).unwrap();
        ReflectivityConfig::new(path, DEFAULT).unwrap()
    }

    #[test]
    fn test_defaults_cover_every_sound_type() {
        let dir = tempfile::tempdir().unwrap();
        let config = open(&dir);

        let defaults = config.create_defaults();
        let keys: BTreeSet<_> = defaults.keys().copied().collect();
        let known: BTreeSet<_> = NameRegistry::global().iter().collect();
        assert_eq!(keys, known);
        assert_eq!(defaults.len(), SoundType::ALL.len());
    }

    #[test]
    fn test_curated_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = open(&dir);

        assert_eq!(config.reflectivity(SoundType::Stone), 1.5);
        assert_eq!(config.reflectivity(SoundType::Metal), 1.25);
        assert_eq!(config.reflectivity(SoundType::Glass), 0.75);
        assert_eq!(config.reflectivity(SoundType::Snow), 0.15);
        assert_eq!(config.reflectivity(SoundType::Wool), 0.1);
        // Not curated
        assert_eq!(config.reflectivity(SoundType::Lantern), DEFAULT);
        assert_eq!(config.reflectivity(SoundType::Ladder), DEFAULT);
    }

    #[test]
    fn test_new_materializes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("reflectivity.properties");
        assert!(!path.exists());

        let config = ReflectivityConfig::new(&path, DEFAULT).unwrap();
        assert_eq!(config.path(), path.as_path());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("#Block sound type reflectivity\n"));
        assert!(contents.contains("\nSTONE=1.5\n"));
        assert!(contents.contains("\nLANTERN=0.5\n"));

        let written = Properties::parse(&contents);
        assert_eq!(written.len(), SoundType::ALL.len());
        for sound_type in SoundType::ALL {
            assert!(written.get(sound_type.name()).is_some(), "{sound_type} missing");
        }
    }

    #[test]
    fn test_file_is_written_in_declaration_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = open(&dir);

        let written = Properties::load(config.path()).unwrap();
        let keys: Vec<_> = written.iter().map(|(k, _)| k).collect();
        let expected: Vec<_> = SoundType::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_load_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = open_with(&dir, "STONE=2.0\nNOT_A_CATEGORY=3.0\nWOOL=notanumber\n");

        assert_eq!(config.reflectivity(SoundType::Stone), 2.0);
        assert_eq!(config.reflectivity(SoundType::Wool), 0.1);
        assert!(config.reflectivities().keys().all(|t| t.name() != "NOT_A_CATEGORY"));
        assert_eq!(config.reflectivities().len(), SoundType::ALL.len());

        // The normalizing save on open dropped the unknown key and rewrote WOOL
        let report = config.load().unwrap();
        assert!(report.is_clean());
        assert_eq!(config.reflectivity(SoundType::Wool), 0.1);
    }

    #[test]
    fn test_load_report_lists_skipped_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = open(&dir);

        std::fs::write(
            config.path(),
            "# edited by hand\nSTONE=2.0\nNOT_A_CATEGORY=3.0\nGLASS=0.9\nWOOL=notanumber\n",
        )
        .unwrap();
        let report = config.load().unwrap();

        assert_eq!(report.applied, 2);
        assert_eq!(
            report.skipped,
            vec![
                EntryError::UnknownSoundType { key: "NOT_A_CATEGORY".to_string() },
                EntryError::InvalidValue {
                    key: "WOOL".to_string(),
                    value: "notanumber".to_string(),
                },
            ]
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn test_bad_lines_among_valid_ones() {
        let dir = tempfile::tempdir().unwrap();
        let config = open_with(
            &dir,
            "GRAVEL=0.6\nSAND=soft\nLADDER = 0.9\nGRANITE=1.0\nCHAIN=1.3\n",
        );

        assert_eq!(config.reflectivity(SoundType::Gravel), 0.6);
        assert_eq!(config.reflectivity(SoundType::Ladder), 0.9);
        assert_eq!(config.reflectivity(SoundType::Chain), 1.3);
        assert_eq!(config.reflectivity(SoundType::Sand), 0.2);
    }

    #[test]
    fn test_unknown_key_with_bad_value_reports_the_value() {
        // The value is checked before the key
        assert_eq!(
            parse_entry("GRANITE", "hard"),
            Err(EntryError::InvalidValue {
                key: "GRANITE".to_string(),
                value: "hard".to_string(),
            })
        );
    }

    #[test]
    fn test_values_are_trimmed() {
        assert_eq!(parse_entry("STONE", " 2.5 "), Ok((SoundType::Stone, 2.5)));
        assert_eq!(parse_entry("STONE", "-1e3"), Ok((SoundType::Stone, -1000.0)));
        assert!(parse_entry("STONE", "").is_err());
        assert!(parse_entry("stone", "1.0").is_err());
    }

    #[test]
    fn test_empty_or_comment_only_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = open_with(&dir, "# nothing here\n\n! still nothing\n");
        assert_eq!(config.reflectivities(), &config.create_defaults());

        let dir = tempfile::tempdir().unwrap();
        let config = open_with(&dir, "");
        assert_eq!(config.reflectivities(), &config.create_defaults());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = open(&dir);

        config
            .set_reflectivity(SoundType::Stone, 0.1 + 0.2)
            .set_reflectivity(SoundType::Glass, 1e-300)
            .set_reflectivity(SoundType::Anvil, f64::MAX)
            .set_reflectivity(SoundType::Candle, -3.0)
            .set_reflectivity(SoundType::Chain, f64::INFINITY)
            .set_reflectivity(SoundType::Bamboo, 2.0);
        let before = config.reflectivities().clone();

        config.save().unwrap();
        config.load().unwrap();
        assert_eq!(config.reflectivities(), &before);

        let reopened = ReflectivityConfig::new(config.path(), DEFAULT).unwrap();
        assert_eq!(reopened.reflectivities(), &before);

        let written = Properties::load(config.path()).unwrap();
        assert_eq!(written.get("STONE"), Some("0.30000000000000004"));
        assert_eq!(written.get("BAMBOO"), Some("2.0"));
        assert_eq!(written.get("CHAIN"), Some("inf"));
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = open_with(&dir, "STONE=3.0\nMOSS=0.05\nBROKEN\n");

        config.load().unwrap();
        let first = config.reflectivities().clone();
        config.load().unwrap();
        assert_eq!(config.reflectivities(), &first);
    }

    #[test]
    fn test_load_discards_unsaved_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = open(&dir);

        config.set_reflectivity(SoundType::Stone, 9.0);
        assert_eq!(config.reflectivity(SoundType::Stone), 9.0);

        config.load().unwrap();
        assert_eq!(config.reflectivity(SoundType::Stone), 1.5);
    }

    #[test]
    fn test_set_accepts_any_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = open(&dir);

        config.set_reflectivity(SoundType::Wood, -42.0);
        config.set_reflectivity(SoundType::Wool, f64::NAN);
        assert_eq!(config.reflectivity(SoundType::Wood), -42.0);
        assert!(config.reflectivity(SoundType::Wool).is_nan());
    }

    #[test]
    fn test_missing_entry_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = open(&dir);

        config.reflectivity.remove(&SoundType::Stone);
        assert_eq!(config.reflectivity(SoundType::Stone), DEFAULT);
    }

    #[test]
    fn test_reset_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = open_with(&dir, "STONE=3.0\n");

        config.reset_to_defaults();
        assert_eq!(config.reflectivity(SoundType::Stone), 1.5);

        // In memory only until saved
        let on_disk = Properties::load(config.path()).unwrap();
        assert_eq!(on_disk.get("STONE"), Some("3.0"));
    }

    #[test]
    fn test_default_provider_is_read_on_every_load() {
        struct Live(Cell<f64>);

        impl DefaultReflectivity for Live {
            fn default_reflectivity(&self) -> f64 {
                self.0.get()
            }
        }

        let live = Live(Cell::new(0.5));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reflectivity.properties");
        std::fs::write(&path, "# empty\n").unwrap();

        let mut config = ReflectivityConfig::new(&path, &live).unwrap();
        assert_eq!(config.reflectivity(SoundType::Lantern), 0.5);

        // The file now pins LANTERN, so clear it before reloading
        std::fs::write(&path, "STONE=2.0\n").unwrap();
        live.0.set(0.8);
        config.load().unwrap();

        approx::assert_relative_eq!(config.reflectivity(SoundType::Lantern), 0.8);
        approx::assert_relative_eq!(config.reflectivity(SoundType::Stone), 2.0);
        assert_eq!(config.defaults().default_reflectivity(), 0.8);
    }

    #[test]
    fn test_settings_as_provider() {
        use crate::config::SoundPhysicsConfig;

        let dir = tempfile::tempdir().unwrap();
        let settings = SoundPhysicsConfig::new()
            .with_default_block_reflectivity(0.7)
            .with_reflectivity_file(dir.path().join("refl.properties"));

        let config = ReflectivityConfig::new(settings.reflectivity_file.clone(), settings).unwrap();
        assert_eq!(config.reflectivity(SoundType::Lantern), 0.7);
        assert_eq!(config.reflectivity(SoundType::Stone), 1.5);
    }

    #[test]
    fn test_new_keeps_the_opening_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = open_with(&dir, "STONE=2.0\nNOT_A_CATEGORY=3.0\nWOOL=notanumber\n");

        let report = config.last_report();
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(report.skipped[0], EntryError::UnknownSoundType { .. }));
        assert!(matches!(report.skipped[1], EntryError::InvalidValue { .. }));

        // The opening save normalized the file
        config.load().unwrap();
        assert!(config.last_report().is_clean());
        assert_eq!(config.last_report().applied, SoundType::ALL.len());
    }

    #[test]
    fn test_invalid_utf8_degrades_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reflectivity.properties");
        std::fs::write(&path, b"# caf\xe9 edit\nSTONE=2.0\nGLASS=0.\xff\n").unwrap();

        let config = ReflectivityConfig::new(&path, DEFAULT).unwrap();
        assert_eq!(config.reflectivity(SoundType::Stone), 2.0);
        assert_eq!(config.reflectivity(SoundType::Glass), 0.75);
        assert_eq!(config.last_report().applied, 1);
        assert_eq!(
            config.last_report().skipped,
            vec![EntryError::InvalidValue {
                key: "GLASS".to_string(),
                value: "0.\u{FFFD}".to_string(),
            }]
        );

        // Rewritten as valid UTF-8
        assert!(std::str::from_utf8(&std::fs::read(&path).unwrap()).is_ok());
    }

    #[test]
    fn test_unreadable_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        // A directory can't be read as a property file
        let result = ReflectivityConfig::new(dir.path(), DEFAULT);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_unwritable_location_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "").unwrap();

        let result = ReflectivityConfig::new(blocker.join("reflectivity.properties"), DEFAULT);
        assert!(matches!(result, Err(ConfigError::Io(_))));

        let mut config = open(&dir);
        config.path = blocker.join("nested").join("reflectivity.properties");
        assert!(matches!(config.save(), Err(ConfigError::Io(_))));
    }
}

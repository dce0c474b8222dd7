// Configuration management
//
// Settings for classification, palette assignment and output, persisted as
// TOML. Missing sections and fields fall back to their defaults.

use crate::color::{ColorClassifier, DEFAULT_TOLERANCE};
use crate::engine::{EngineError, PaletteEngine};
use crate::palette::{MAX_PALETTES, PALETTE_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Default configuration file path
pub const CONFIG_FILE: &str = "makechr.toml";

/// Merge strategies the command line examines before giving up
pub const DEFAULT_SEARCH_BUDGET: u64 = 1_000_000;

/// Errors that can occur while loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error
    Io(io::Error),

    /// Malformed TOML
    Parse(toml::de::Error),

    /// Configuration could not be serialized
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Tool configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakechrConfig {
    /// Pixel classification settings
    pub classifier: ClassifierConfig,

    /// Palette assignment settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum RGB distance to the nearest hardware color
    pub tolerance: u32,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of background palettes available (1-4)
    pub max_palettes: usize,

    /// Colors per palette, background included (1-4)
    pub palette_size: usize,

    /// Maximum merge strategies to examine (0 = unlimited)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_budget: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Scale factor for the palette view image
    pub palette_view_scale: u32,

    /// Scale factor for the colorization, grid and error views
    pub view_scale: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_palettes: MAX_PALETTES,
            palette_size: PALETTE_SIZE,
            search_budget: Some(DEFAULT_SEARCH_BUDGET),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            palette_view_scale: 2,
            view_scale: 2,
        }
    }
}

impl ClassifierConfig {
    /// Create a classifier with these settings
    pub fn build(&self) -> ColorClassifier {
        ColorClassifier::new(self.tolerance)
    }
}

impl EngineConfig {
    /// Create an engine with these settings
    pub fn build(&self) -> Result<PaletteEngine, EngineError> {
        let budget = self.search_budget.filter(|&budget| budget > 0);
        Ok(PaletteEngine::with_limits(self.max_palettes, self.palette_size)?
            .with_search_budget(budget))
    }
}

impl MakechrConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration, using defaults if the file does not exist
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

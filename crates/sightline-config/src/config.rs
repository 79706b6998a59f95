//! Configuration sections with their defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Triangle budget and hysteresis.
    pub lod: LodConfig,
    /// Visibility precomputation.
    pub visibility: VisibilityConfig,
    /// Level files, camera path and object catalog.
    pub scene: SceneConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Runtime level-of-detail budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Visible triangle count at which promotions stop and demotions start.
    pub max_triangles: u64,
    /// Frames an instance must wait after a tier change.
    pub hysteresis_frames: u32,
}

/// Chord sampling used to build the visibility file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Number of random chords to cast.
    pub samples: u64,
    /// Seed for chord sampling.
    pub seed: u64,
    /// Worker threads (0 = one per CPU).
    pub workers: usize,
    /// Chords per work unit.
    pub batch_size: u64,
}

/// Level files, camera path and the object classes placed on the map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Grid map file.
    pub map_path: PathBuf,
    /// Visibility file.
    pub pvs_path: PathBuf,
    /// Camera position on the first frame.
    pub camera_start: [f32; 3],
    /// Camera position on the last frame.
    pub camera_end: [f32; 3],
    /// Frames to simulate.
    pub frames: u32,
    /// Object classes keyed by map value.
    pub catalog: Vec<CatalogConfig>,
}

/// One object class bound to a map value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Map value (1..=3) whose cells receive this object.
    pub map_value: u8,
    /// Class name.
    pub name: String,
    /// Triangle count of each tier, coarsest first.
    pub triangles: [u32; 5],
    /// Bounding diagonal of the mesh before scaling.
    pub diagonal: f32,
    /// Uniform scale applied to every instance.
    pub scale: f32,
    /// World position every instance offset is relative to.
    pub anchor: [f32; 3],
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            max_triangles: 120_000,
            hysteresis_frames: 100,
        }
    }
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            samples: 50_000,
            seed: 0x5EED,
            workers: 0,
            batch_size: 1024,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            map_path: PathBuf::from("res/map1.txt"),
            pvs_path: PathBuf::from("res/map1visibility.txt"),
            camera_start: [16.0, 6.0, 30.0],
            camera_end: [16.0, 6.0, 2.0],
            frames: 600,
            catalog: vec![
                CatalogConfig {
                    map_value: 1,
                    name: "teapot".to_string(),
                    triangles: [396, 788, 1_568, 3_136, 6_320],
                    diagonal: 6.4,
                    scale: 0.15,
                    anchor: [0.0, 0.0, 0.0],
                },
                CatalogConfig {
                    map_value: 2,
                    name: "metaballs".to_string(),
                    triangles: [520, 1_040, 2_080, 4_160, 8_320],
                    diagonal: 3.2,
                    scale: 0.25,
                    anchor: [0.0, 0.3, 0.0],
                },
                CatalogConfig {
                    map_value: 3,
                    name: "dragon".to_string(),
                    triangles: [1_250, 2_500, 5_000, 10_000, 20_000],
                    diagonal: 5.6,
                    scale: 0.15,
                    anchor: [0.0, 0.0, 0.0],
                },
            ],
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            map_value: 1,
            name: String::new(),
            triangles: [0; 5],
            diagonal: 1.0,
            scale: 1.0,
            anchor: [0.0; 3],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_error)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::ReadError {
                path: config_path.to_path_buf(),
                source,
            })?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

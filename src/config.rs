//! Viewer configuration.
//!
//! Read once at startup from TOML. Every field has a default, so a missing
//! file or a partial one is fine.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ARENA_VIEWER_CONFIG";
/// Looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "viewer.toml";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
    pub asset_dir: AssetDir,
    /// `env_logger` filter, overrides `RUST_LOG`.
    pub log_filter: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Arena".to_string(),
            width: 1400,
            height: 600,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Units per second.
    pub speed: f32,
    /// Radians per mouse unit per second.
    pub sensitivity: f32,
    pub max_pitch: f32,
    /// x and z stay within +-this.
    pub arena_half_extent: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            speed: 7.0,
            sensitivity: 0.5,
            max_pitch: 1.5,
            arena_half_extent: 14.0,
            fov: 90.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f64; 4],
    pub light_position: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.1, 0.0, 0.8, 1.0],
            light_position: [-25.0, 20.0, 5.0],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AssetDir(pub PathBuf);

impl Default for AssetDir {
    fn default() -> Self {
        AssetDir(PathBuf::from("assets"))
    }
}

impl AsRef<Path> for AssetDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl ViewerConfig {
    pub fn from_toml(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &contents)
    }

    /// `$ARENA_VIEWER_CONFIG`, else `viewer.toml` if it exists, else the
    /// defaults. A file that exists but does not parse is an error.
    pub fn load() -> Result<Self, ConfigError> {
        if cfg!(target_arch = "wasm32") {
            return Ok(Self::default());
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from_file(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

//! Deformer configuration
//!
//! Immutable per surface instance. Stored as RON so grids can be tuned
//! without recompiling; any field left out of the file takes its default.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

/// Validation limits for configuration files
pub mod limits {
    /// Largest accepted grid edge (cells). Keeps vertex count within u32 indices
    /// and a rebuild per edit affordable.
    pub const MAX_GRID_SIZE: usize = 1024;
}

/// Error type for configuration loading and validation
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// Grid and sculpting parameters for a heightfield surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeformerConfig {
    /// Cells per edge. The grid is square: `grid_size²` cells,
    /// `(grid_size + 1)²` vertices.
    pub grid_size: usize,
    /// World-space edge length of one cell
    pub cell_size: f32,
    /// World-space radius of effect for each deform call
    pub deformation_radius: f32,
    /// Height removed at the center of a deform call
    pub deformation_depth: f32,
}

impl Default for DeformerConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            cell_size: 0.5,
            deformation_radius: 1.0,
            deformation_depth: 0.3,
        }
    }
}

impl DeformerConfig {
    pub fn new(grid_size: usize, cell_size: f32, deformation_radius: f32, deformation_depth: f32) -> Self {
        Self {
            grid_size,
            cell_size,
            deformation_radius,
            deformation_depth,
        }
    }

    /// Reject configurations that would produce an undefined grid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::Invalid("grid_size must be at least 1".into()));
        }
        if self.grid_size > limits::MAX_GRID_SIZE {
            return Err(ConfigError::Invalid(format!(
                "grid_size too large ({} > {})",
                self.grid_size, limits::MAX_GRID_SIZE
            )));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cell_size must be positive and finite (got {})",
                self.cell_size
            )));
        }
        if !self.deformation_radius.is_finite() || self.deformation_radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "deformation_radius must be positive and finite (got {})",
                self.deformation_radius
            )));
        }
        if !self.deformation_depth.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "deformation_depth must be finite (got {})",
                self.deformation_depth
            )));
        }
        Ok(())
    }

    /// Number of vertices along one edge
    pub fn verts_per_edge(&self) -> usize {
        self.grid_size + 1
    }

    /// World-space edge length of the whole surface
    pub fn extent(&self) -> f32 {
        self.grid_size as f32 * self.cell_size
    }

    /// Parse and validate a RON document
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a RON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new().depth_limit(2);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}

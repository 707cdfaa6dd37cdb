use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hexmesh::GridCell;

// Inclusive square range of cells, `min..=max` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRange {
    pub min: i32,
    pub max: i32,
}

impl GridRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    // -radius..=radius
    pub fn square(radius: i32) -> Self {
        Self::new(-radius, radius)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidGridRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    // Cells per side
    pub fn side(&self) -> usize {
        if self.min > self.max {
            0
        } else {
            (self.max as i64 - self.min as i64 + 1) as usize
        }
    }

    pub fn cell_count(&self) -> usize {
        self.side() * self.side()
    }

    // Row-major: `i` outer, `j` inner
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + use<> {
        let (min, max) = (self.min, self.max);
        (min..=max).flat_map(move |i| (min..=max).map(move |j| GridCell::new(i, j)))
    }
}

impl Default for GridRange {
    fn default() -> Self {
        Self::square(10)
    }
}

// Which noise field(s) a terrain pass samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoisePolicy {
    // One field for the whole grid, neighbouring tiles stay continuous
    #[default]
    Shared,
    // A fresh field per cell seeded from (seed, i, j); tiles are uncorrelated
    PerCell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: u64,
    // Grid step to noise-space scale
    pub frequency: f64,
    pub persistence: f64,
    pub octaves: usize,
    // Power curve applied to the normalized height
    pub exponent: f64,
    pub policy: NoisePolicy,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            frequency: 0.1,
            persistence: 0.5,
            octaves: 1,
            exponent: 1.0,
            policy: NoisePolicy::Shared,
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("frequency", self.frequency, self.frequency.is_finite()),
            (
                "persistence",
                self.persistence,
                self.persistence.is_finite() && self.persistence > 0.0,
            ),
            ("octaves", self.octaves as f64, self.octaves > 0),
            (
                "exponent",
                self.exponent,
                self.exponent.is_finite() && self.exponent > 0.0,
            ),
        ];
        for (name, value, ok) in checks {
            if !ok {
                return Err(ConfigError::InvalidNoise { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub max_height: f64,
    pub hex_radius: f32,
    pub grid: GridRange,
    pub noise: NoiseConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            max_height: 10.0,
            hex_radius: 1.0,
            grid: GridRange::default(),
            noise: NoiseConfig::default(),
        }
    }
}

impl TerrainConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: TerrainConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        validate_max_height(self.max_height)?;
        if !(self.hex_radius.is_finite() && self.hex_radius > 0.0) {
            return Err(ConfigError::InvalidHexRadius(self.hex_radius));
        }
        self.noise.validate()
    }
}

pub(crate) fn validate_max_height(max_height: f64) -> Result<(), ConfigError> {
    if max_height.is_finite() && max_height >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidMaxHeight(max_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_grid() {
        let config = TerrainConfig::default();
        assert_eq!(config.grid, GridRange::new(-10, 10));
        assert_eq!(config.grid.side(), 21);
        assert_eq!(config.max_height, 10.0);
        assert_eq!(config.hex_radius, 1.0);
        assert_eq!(config.noise.policy, NoisePolicy::Shared);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cells_are_row_major() {
        let cells: Vec<_> = GridRange::new(0, 1).cells().map(|c| (c.i, c.j)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = TerrainConfig::from_toml_str(
            r#"
            max_height = 4.0
            [noise]
            seed = 7
            policy = "per_cell"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_height, 4.0);
        assert_eq!(config.noise.seed, 7);
        assert_eq!(config.noise.policy, NoisePolicy::PerCell);
        assert_eq!(config.grid, GridRange::default());
        assert_eq!(config.noise.frequency, 0.1);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let err = TerrainConfig::from_toml_str(
            r#"
            [grid]
            min = 3
            max = -3
            "#,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidGridRange { min: 3, max: -3 });
    }

    #[test]
    fn negative_height_is_rejected() {
        let config = TerrainConfig {
            max_height: -1.0,
            ..TerrainConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxHeight(-1.0)));
    }

    #[test]
    fn zero_octaves_are_rejected() {
        let mut config = TerrainConfig::default();
        config.noise.octaves = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNoise { name: "octaves", .. })
        ));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = TerrainConfig::from_toml_str("max_height = \"tall\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn serializes_back_to_toml() {
        let toml_str = toml::to_string(&TerrainConfig::default()).unwrap();
        assert!(toml_str.contains("max_height"));
        assert!(toml_str.contains("policy = \"shared\""));
    }
}

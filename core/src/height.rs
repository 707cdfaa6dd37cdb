use crate::config::{NoiseConfig, NoisePolicy, validate_max_height};
use crate::error::{ConfigError, Result, SampleError};
use crate::{NoiseGenerator, Simplex2D};

enum Field {
    Shared(Box<dyn NoiseGenerator>),
    PerCell {
        seed: u64,
        persistence: f64,
        octaves: usize,
    },
}

// Grid cell -> column height in [0, max_height]
pub struct HeightSampler {
    field: Field,
    frequency: f64,
    exponent: f64,
}

impl HeightSampler {
    pub fn from_config(noise: &NoiseConfig) -> std::result::Result<Self, ConfigError> {
        noise.validate()?;
        let field = match noise.policy {
            NoisePolicy::Shared => Field::Shared(Box::new(Simplex2D::new(
                noise.seed,
                1.0,
                noise.persistence,
                noise.octaves,
            ))),
            NoisePolicy::PerCell => Field::PerCell {
                seed: noise.seed,
                persistence: noise.persistence,
                octaves: noise.octaves,
            },
        };
        Ok(Self {
            field,
            frequency: noise.frequency,
            exponent: noise.exponent,
        })
    }

    // Sample any noise field shared by the whole grid
    pub fn shared(field: impl NoiseGenerator + 'static, frequency: f64, exponent: f64) -> Self {
        Self {
            field: Field::Shared(Box::new(field)),
            frequency,
            exponent,
        }
    }

    fn raw(&self, i: i32, j: i32) -> f64 {
        let x = i as f64 * self.frequency;
        let y = j as f64 * self.frequency;
        match &self.field {
            Field::Shared(noise) => noise.get2(x, y),
            Field::PerCell {
                seed,
                persistence,
                octaves,
            } => Simplex2D::new(cell_seed(*seed, i, j), 1.0, *persistence, *octaves).get2(x, y),
        }
    }

    pub fn sample_height(&self, i: i32, j: i32, max_height: f64) -> Result<f64> {
        validate_max_height(max_height)?;
        let n = self.raw(i, j);
        if !n.is_finite() {
            return Err(SampleError::NonFinite { i, j }.into());
        }
        let unit = ((n + 1.0) * 0.5).clamp(0.0, 1.0);
        Ok(unit.powf(self.exponent) * max_height)
    }
}

// splitmix64 over the seed and both coordinates
fn cell_seed(seed: u64, i: i32, j: i32) -> u64 {
    let mut z = seed
        ^ (i as u32 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (j as u32 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F).rotate_left(32);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

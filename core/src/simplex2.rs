use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::NoiseGenerator;

// Skew / unskew factors for the 2D simplex grid
const F2: f64 = 0.366_025_403_784_438_6; // (sqrt(3) - 1) / 2
const G2: f64 = 0.211_324_865_405_187_1; // (3 - sqrt(3)) / 6

// Edge midpoints of a cube projected onto xy, 12 entries
const GRADIENTS: [(f64, f64); 12] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

// Seeded 2D simplex noise, optionally summed over octaves
// A single octave at frequency 1.0 matches a plain `noise2D(x, y)` field
#[derive(Debug, Clone)]
pub struct Simplex2D {
    seed: u64,
    frequency: f64,
    persistence: f64,
    octaves: usize,
    perm: [u8; 512],
}

impl Simplex2D {
    pub fn new(seed: u64, frequency: f64, persistence: f64, octaves: usize) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut StdRng::seed_from_u64(seed));

        // doubled so corner lookups never wrap
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }

        Self {
            seed,
            frequency,
            persistence,
            octaves: octaves.max(1),
            perm,
        }
    }

    // One octave, frequency 1.0
    pub fn single(seed: u64) -> Self {
        Self::new(seed, 1.0, 0.5, 1)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn corner(&self, x: f64, y: f64, gi: usize) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t <= 0.0 {
            return 0.0;
        }
        let (gx, gy) = GRADIENTS[gi];
        let t2 = t * t;
        t2 * t2 * (gx * x + gy * y)
    }

    // Single octave at (x, y), roughly in [-1, 1]
    fn raw(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;

        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let p = &self.perm;
        let g0 = p[ii + p[jj] as usize] as usize % 12;
        let g1 = p[ii + i1 + p[jj + j1] as usize] as usize % 12;
        let g2 = p[ii + 1 + p[jj + 1] as usize] as usize % 12;

        70.0 * (self.corner(x0, y0, g0) + self.corner(x1, y1, g1) + self.corner(x2, y2, g2))
    }
}

impl NoiseGenerator for Simplex2D {
    fn get2(&self, x: f64, y: f64) -> f64 {
        let mut amplitude = 1.0;
        let mut freq = self.frequency;
        let mut total = 0.0;
        let mut norm = 0.0;

        for _ in 0..self.octaves {
            total += self.raw(x * freq, y * freq) * amplitude;
            norm += amplitude;
            amplitude *= self.persistence;
            freq *= 2.0;
        }

        total / norm
    }
}

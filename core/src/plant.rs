use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::error::Result;
use crate::presets::Preset;
use crate::turtle::{PlantGeometry, TurtleState, interpret};

// Plants grow straight up from just above the terrain
pub const PLANT_START: TurtleState = TurtleState {
    position: Vec3::new(0.0, 6.0, 0.0),
    direction: Vec3::Y,
};

// Expand the preset grammar and walk it from `PLANT_START`
pub fn generate_plant(preset: &Preset, seed: Option<u64>) -> Result<PlantGeometry> {
    preset.validate()?;
    let symbols = preset.grammar.expand_seeded(seed)?;
    debug!(symbols = symbols.len(), ?seed, "plant string expanded");
    interpret(&symbols, &preset.turtle, PLANT_START)
}

// Same as `generate_plant` but drawing alternatives from a caller-owned RNG
pub fn generate_plant_with<R: Rng + ?Sized>(
    preset: &Preset,
    rng: &mut R,
    start: TurtleState,
) -> Result<PlantGeometry> {
    let symbols = preset.grammar.expand(rng)?;
    interpret(&symbols, &preset.turtle, start)
}

// core holds the plant grammar, the turtle and the hex terrain builders
pub mod config;
pub mod error;
pub mod grammar;
pub mod height;
pub mod hexmesh;
pub mod plant;
pub mod presets;
pub mod simplex2;
pub mod turtle;
pub mod utils;

pub use config::{GridRange, NoiseConfig, NoisePolicy, TerrainConfig};
pub use error::{ConfigError, Error, Result, SampleError, StructuralError};
pub use grammar::{Alternative, Grammar, Production};
pub use height::HeightSampler;
pub use hexmesh::{
    ColumnInfo, GridCell, HexMesh, TerrainBuilder, TerrainMesh, build_grid, build_terrain,
    tile_to_position,
};
pub use plant::{PLANT_START, generate_plant};
pub use presets::{Preset, PresetRegistry};
pub use simplex2::Simplex2D;
pub use turtle::{PlantGeometry, Segment, TurtleConfig, TurtleState, interpret};

// A coherent 2D noise field
// Implementations should stay roughly within [-1, 1]
pub trait NoiseGenerator {
    fn get2(&self, x: f64, y: f64) -> f64;
}

impl<N: NoiseGenerator + ?Sized> NoiseGenerator for &N {
    fn get2(&self, x: f64, y: f64) -> f64 {
        (**self).get2(x, y)
    }
}

impl<N: NoiseGenerator + ?Sized> NoiseGenerator for Box<N> {
    fn get2(&self, x: f64, y: f64) -> f64 {
        (**self).get2(x, y)
    }
}

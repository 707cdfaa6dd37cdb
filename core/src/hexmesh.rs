use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use tracing::{debug, info};

use crate::config::TerrainConfig;
use crate::error::Result;
use crate::height::HeightSampler;

pub const HEX_SIDES: usize = 6;
// Side wall: 2 rings of 7 (seam duplicated); each cap: 6 centres + 7 rim
pub const COLUMN_VERTICES: usize = 2 * (HEX_SIDES + 1) + 2 * (HEX_SIDES + HEX_SIDES + 1);
pub const COLUMN_INDICES: usize = HEX_SIDES * 6 + 2 * HEX_SIDES * 3;

// Spacing of the staggered tile layout
const COLUMN_SPACING: f32 = 1.75;
const ROW_SPACING: f32 = 1.535;
const ROW_OFFSET: f32 = 0.5 * 1.77;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub i: i32,
    pub j: i32,
}

impl GridCell {
    pub fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    pub fn position(&self) -> Vec2 {
        tile_to_position(self.i, self.j)
    }
}

// Cell -> tile centre on the ground plane, odd rows shifted half a tile
// `j % 2` truncates, so odd rows below zero shift the other way
pub fn tile_to_position(i: i32, j: i32) -> Vec2 {
    Vec2::new(
        COLUMN_SPACING * i as f32 + (j % 2) as f32 * ROW_OFFSET,
        ROW_SPACING * j as f32,
    )
}

// Indexed triangle mesh, Y up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HexMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl HexMesh {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.uvs.push(uv);
        index
    }

    // Six-sided prism standing on `base` (ground plane x/z), spanning y in [0, height]
    pub fn column(radius: f32, height: f32, base: Vec2) -> Self {
        let mut mesh = Self::with_capacity(COLUMN_VERTICES, COLUMN_INDICES);
        let half = height * 0.5;
        let centre = Vec3::new(base.x, half, base.y);
        let rim = |k: usize| {
            let theta = k as f32 / HEX_SIDES as f32 * TAU;
            (theta, Vec3::new(theta.sin(), 0.0, theta.cos()))
        };

        // side wall, top ring then bottom ring, `y` relative to the centre
        let mut rings = [[0u32; HEX_SIDES + 1]; 2];
        for (row, ring) in rings.iter_mut().enumerate() {
            let y = half - row as f32 * height;
            for (k, slot) in ring.iter_mut().enumerate() {
                let (_, dir) = rim(k);
                let u = k as f32 / HEX_SIDES as f32;
                *slot = mesh.push_vertex(
                    centre + dir * radius + Vec3::Y * y,
                    dir,
                    [u, 1.0 - row as f32],
                );
            }
        }
        for k in 0..HEX_SIDES {
            let (a, b) = (rings[0][k], rings[1][k]);
            let (c, d) = (rings[1][k + 1], rings[0][k + 1]);
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        for top in [true, false] {
            let sign = if top { 1.0 } else { -1.0 };
            let normal = Vec3::Y * sign;
            let level = centre + Vec3::Y * (half * sign);

            let first_centre = mesh.positions.len() as u32;
            for _ in 0..HEX_SIDES {
                mesh.push_vertex(level, normal, [0.5, 0.5]);
            }
            let first_rim = mesh.positions.len() as u32;
            for k in 0..=HEX_SIDES {
                let (theta, dir) = rim(k);
                mesh.push_vertex(
                    level + dir * radius,
                    normal,
                    [theta.cos() * 0.5 + 0.5, theta.sin() * 0.5 * sign + 0.5],
                );
            }
            for k in 0..HEX_SIDES as u32 {
                let c = first_centre + k;
                let r = first_rim + k;
                // wind outward-facing for both caps
                if top {
                    mesh.indices.extend_from_slice(&[r, r + 1, c]);
                } else {
                    mesh.indices.extend_from_slice(&[r + 1, r, c]);
                }
            }
        }

        mesh
    }

    // Append `other`, re-basing its indices past our vertices
    pub fn merge(&mut self, other: &HexMesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices
            .extend(other.indices.iter().map(|&index| index + offset));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnInfo {
    // `None` for columns placed directly by position
    pub cell: Option<GridCell>,
    pub position: Vec2,
    pub height: f32,
}

// Merged terrain plus per-column metadata in merge order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    pub mesh: HexMesh,
    pub columns: Vec<ColumnInfo>,
}

impl TerrainMesh {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn max_column_height(&self) -> f32 {
        self.columns.iter().map(|c| c.height).fold(0.0, f32::max)
    }
}

// Running merge target for one terrain pass
pub struct TerrainBuilder {
    hex_radius: f32,
    terrain: TerrainMesh,
}

impl TerrainBuilder {
    pub fn new(hex_radius: f32) -> Self {
        Self {
            hex_radius,
            terrain: TerrainMesh::default(),
        }
    }

    pub fn with_capacity(hex_radius: f32, columns: usize) -> Self {
        Self {
            hex_radius,
            terrain: TerrainMesh {
                mesh: HexMesh::with_capacity(columns * COLUMN_VERTICES, columns * COLUMN_INDICES),
                columns: Vec::with_capacity(columns),
            },
        }
    }

    pub fn add(&mut self, mesh: &HexMesh) {
        self.terrain.mesh.merge(mesh);
    }

    pub fn add_column(&mut self, height: f32, position: Vec2) {
        self.push_column(None, height, position);
    }

    // Column at the tile position of `cell`
    pub fn add_cell(&mut self, cell: GridCell, height: f32) {
        self.push_column(Some(cell), height, cell.position());
    }

    fn push_column(&mut self, cell: Option<GridCell>, height: f32, position: Vec2) {
        let column = HexMesh::column(self.hex_radius, height, position);
        self.add(&column);
        self.terrain.columns.push(ColumnInfo {
            cell,
            position,
            height,
        });
    }

    pub fn finalize(self) -> TerrainMesh {
        self.terrain
    }
}

// One column per cell of `config.grid`, merged row-major (`i` outer, `j` inner)
pub fn build_grid(config: &TerrainConfig, sampler: &HeightSampler) -> Result<TerrainMesh> {
    config.validate()?;

    let mut builder = TerrainBuilder::with_capacity(config.hex_radius, config.grid.cell_count());
    for cell in config.grid.cells() {
        let height = sampler.sample_height(cell.i, cell.j, config.max_height)?;
        builder.add_cell(cell, height as f32);
    }
    let terrain = builder.finalize();

    info!(
        columns = terrain.column_count(),
        vertices = terrain.mesh.vertex_count(),
        triangles = terrain.mesh.triangle_count(),
        "terrain grid built"
    );
    Ok(terrain)
}

// `build_grid` with the sampler described by `config.noise`
pub fn build_terrain(config: &TerrainConfig) -> Result<TerrainMesh> {
    let sampler = HeightSampler::from_config(&config.noise)?;
    debug!(policy = ?config.noise.policy, seed = config.noise.seed, "sampling terrain heights");
    build_grid(config, &sampler)
}

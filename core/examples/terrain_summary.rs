// Builds the default 21x21 hex terrain under both noise policies and
// prints a height map of the tiles (0-9 per tile)

use hexgrove::{NoisePolicy, TerrainConfig, build_terrain};

fn main() {
    for policy in [NoisePolicy::Shared, NoisePolicy::PerCell] {
        let mut config = TerrainConfig::default();
        config.noise.seed = 2025;
        config.noise.policy = policy;
        let terrain = build_terrain(&config).unwrap();

        println!(
            "=== {:?}: {} columns, {} vertices, {} triangles ===",
            policy,
            terrain.column_count(),
            terrain.mesh.vertex_count(),
            terrain.mesh.triangle_count()
        );

        let side = config.grid.side();
        // one line per `i`, `j` left to right
        for chunk in terrain.columns.chunks(side) {
            let line: String = chunk
                .iter()
                .map(|c| {
                    let level = (c.height / config.max_height as f32 * 9.0).round() as u32;
                    format!("{} ", level.min(9))
                })
                .collect();
            println!("{}", line);
        }
    }
}

use hexgrove::{
    Grammar, GridRange, HeightSampler, NoiseConfig, NoiseGenerator, NoisePolicy, Production,
    TerrainConfig, TurtleConfig, TurtleState, build_grid, interpret, tile_to_position,
};
use hexgrove::hexmesh::{COLUMN_INDICES, COLUMN_VERTICES};
use proptest::prelude::*;

struct Constant(f64);

impl NoiseGenerator for Constant {
    fn get2(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

// Balanced strings over the turtle alphabet
fn balanced() -> impl Strategy<Value = String> {
    let leaf = prop::sample::select(vec!["F", "+", "-", "/", "\\", "*", "^", "X"])
        .prop_map(str::to_string);
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop::collection::vec(inner, 1..6).prop_map(|parts| format!("F[{}]", parts.concat()))
    })
}

proptest! {
    #[test]
    fn height_stays_in_range(i in -1000i32..1000, j in -1000i32..1000, n in -1.0f64..=1.0, max in 0.0f64..100.0) {
        let sampler = HeightSampler::shared(Constant(n), 0.1, 1.0);
        let h = sampler.sample_height(i, j, max).unwrap();
        prop_assert!((0.0..=max).contains(&h));
    }

    #[test]
    fn simplex_heights_stay_in_range(i in -500i32..500, j in -500i32..500, seed in any::<u64>(), per_cell in any::<bool>()) {
        let config = NoiseConfig {
            seed,
            policy: if per_cell { NoisePolicy::PerCell } else { NoisePolicy::Shared },
            ..NoiseConfig::default()
        };
        let sampler = HeightSampler::from_config(&config).unwrap();
        let h = sampler.sample_height(i, j, 10.0).unwrap();
        prop_assert!((0.0..=10.0).contains(&h));
    }

    #[test]
    fn tile_position_is_deterministic(i in any::<i16>(), j in any::<i16>()) {
        let a = tile_to_position(i as i32, j as i32);
        let b = tile_to_position(i as i32, j as i32);
        prop_assert_eq!(a.x.to_bits(), b.x.to_bits());
        prop_assert_eq!(a.y.to_bits(), b.y.to_bits());
    }

    #[test]
    fn fixed_rule_length_is_predictable(axiom in "[FX+\\-\\[\\]]{1,20}") {
        let grammar = Grammar::new(axiom.clone(), 1)
            .with_rule('F', Production::fixed("FF"))
            .with_rule('X', Production::fixed("F[+X]FX"));
        let out = grammar.expand_seeded(Some(0)).unwrap();
        let expected: usize = axiom
            .chars()
            .map(|c| match c {
                'F' => 2,
                'X' => 7,
                _ => 1,
            })
            .sum();
        prop_assert_eq!(out.len(), expected);
    }

    #[test]
    fn balanced_strings_always_interpret(symbols in balanced()) {
        let config = TurtleConfig::jittered(15.0, 50.0, 1.0);
        let plant = interpret(&symbols, &config, TurtleState::default()).unwrap();
        let forwards = symbols.chars().filter(|&c| c == 'F').count();
        // each leaf replaces exactly one branch
        prop_assert_eq!(plant.branches.len() + plant.leaves.len(), forwards);
    }

    #[test]
    fn grid_size_fixes_geometry(radius in 0i32..4, height in 0.0f64..1.0) {
        let config = TerrainConfig {
            grid: GridRange::square(radius),
            ..TerrainConfig::default()
        };
        let sampler = HeightSampler::shared(Constant(height), 1.0, 1.0);
        let terrain = build_grid(&config, &sampler).unwrap();
        let cells = ((2 * radius + 1) * (2 * radius + 1)) as usize;
        prop_assert_eq!(terrain.column_count(), cells);
        prop_assert_eq!(terrain.mesh.vertex_count(), cells * COLUMN_VERTICES);
        prop_assert_eq!(terrain.mesh.indices.len(), cells * COLUMN_INDICES);
    }
}

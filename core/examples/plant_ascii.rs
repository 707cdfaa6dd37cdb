// Grows each built-in preset at a small iteration count and prints a
// front-view ASCII sketch (`#` branches, `*` leaves)

use hexgrove::utils::segment_bounds;
use hexgrove::{PresetRegistry, Segment, generate_plant};

const WIDTH: usize = 60;
const HEIGHT: usize = 30;

fn plot(canvas: &mut [Vec<char>], segments: &[Segment], mark: char, lo: (f32, f32), scale: (f32, f32)) {
    for seg in segments {
        let x1 = (seg.start.x - lo.0) * scale.0;
        let y1 = (seg.start.y - lo.1) * scale.1;
        let x2 = (seg.end.x - lo.0) * scale.0;
        let y2 = (seg.end.y - lo.1) * scale.1;
        let steps = (x2 - x1).abs().max((y2 - y1).abs()).ceil().max(1.0) as usize;
        for k in 0..=steps {
            let t = k as f32 / steps as f32;
            let x = (x1 + (x2 - x1) * t) as usize;
            let y = (y1 + (y2 - y1) * t) as usize;
            if x < WIDTH && y < HEIGHT {
                canvas[HEIGHT - 1 - y][x] = mark;
            }
        }
    }
}

fn main() {
    let registry = PresetRegistry::builtin();
    for name in registry.names() {
        let mut preset = registry.get(name).unwrap().clone();
        let iterations = preset.grammar.iterations().min(4);
        preset.grammar = preset.grammar.with_iterations(iterations);
        let plant = generate_plant(&preset, Some(2025)).unwrap();

        println!(
            "=== {} ({} branches, {} leaves) ===",
            name,
            plant.branches.len(),
            plant.leaves.len()
        );

        let Some((lo, hi)) = segment_bounds(plant.branches.iter().chain(&plant.leaves)) else {
            continue;
        };
        let scale = (
            (WIDTH - 1) as f32 / (hi.x - lo.x).max(0.001),
            (HEIGHT - 1) as f32 / (hi.y - lo.y).max(0.001),
        );
        let mut canvas = vec![vec![' '; WIDTH]; HEIGHT];
        plot(&mut canvas, &plant.branches, '#', (lo.x, lo.y), scale);
        plot(&mut canvas, &plant.leaves, '*', (lo.x, lo.y), scale);
        for row in &canvas {
            println!("{}", row.iter().collect::<String>());
        }
    }
}

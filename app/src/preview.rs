use glam::Vec2;
use hexgrove::utils::segment_bounds;
use hexgrove::{PlantGeometry, Segment, TerrainMesh};
use image::{Rgb, RgbImage};
use palette::{Gradient, LinSrgb};

const BACKGROUND: Rgb<u8> = Rgb([0xFF, 0xEE, 0xCC]);
const BRANCH: Rgb<u8> = Rgb([0x96, 0x4B, 0x00]);
const LEAF: Rgb<u8> = Rgb([0x92, 0xF9, 0x1B]);
const MARGIN: f32 = 0.05;

// Maps a world-space rectangle onto a square image, keeping aspect ratio
struct Viewport {
    origin: Vec2,
    scale: f32,
    size: u32,
}

impl Viewport {
    fn fit(lo: Vec2, hi: Vec2, size: u32) -> Self {
        let extent = (hi - lo).max_element().max(1e-3);
        let usable = size as f32 * (1.0 - 2.0 * MARGIN);
        let scale = usable / extent;
        // centre the content in the frame
        let centre = (lo + hi) * 0.5;
        let origin = centre - Vec2::splat(size as f32 * 0.5 / scale);
        Self {
            origin,
            scale,
            size,
        }
    }

    // Image y grows downward
    fn to_pixel(&self, p: Vec2) -> Vec2 {
        let v = (p - self.origin) * self.scale;
        Vec2::new(v.x, self.size as f32 - v.y)
    }

    fn to_world(&self, px: u32, py: u32) -> Vec2 {
        let v = Vec2::new(px as f32 + 0.5, self.size as f32 - (py as f32 + 0.5));
        v / self.scale + self.origin
    }
}

fn put(img: &mut RgbImage, p: Vec2, color: Rgb<u8>) {
    if p.x >= 0.0 && p.y >= 0.0 && (p.x as u32) < img.width() && (p.y as u32) < img.height() {
        img.put_pixel(p.x as u32, p.y as u32, color);
    }
}

fn draw_line(img: &mut RgbImage, a: Vec2, b: Vec2, color: Rgb<u8>) {
    let steps = (b - a).abs().max_element().ceil().max(1.0) as usize;
    for k in 0..=steps {
        put(img, a.lerp(b, k as f32 / steps as f32), color);
    }
}

// Front view (looking down -Z) of branch and leaf segments
pub fn render_plant(plant: &PlantGeometry, size: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(size, size, BACKGROUND);
    let Some((lo, hi)) = segment_bounds(plant.branches.iter().chain(&plant.leaves)) else {
        return img;
    };
    let view = Viewport::fit(lo.truncate(), hi.truncate(), size);

    let mut draw = |segments: &[Segment], color| {
        for s in segments {
            let a = view.to_pixel(s.start.truncate());
            let b = view.to_pixel(s.end.truncate());
            draw_line(&mut img, a, b, color);
        }
    };
    draw(plant.branches.as_slice(), BRANCH);
    draw(plant.leaves.as_slice(), LEAF);
    img
}

fn terrain_gradient() -> Gradient<LinSrgb> {
    Gradient::with_domain(vec![
        (0.00, LinSrgb::new(0.1, 0.3, 0.7)), // water
        (0.30, LinSrgb::new(0.8, 0.75, 0.5)), // sand
        (0.50, LinSrgb::new(0.3, 0.6, 0.2)), // grass
        (0.75, LinSrgb::new(0.45, 0.35, 0.25)), // dirt
        (1.00, LinSrgb::new(0.6, 0.6, 0.6)), // stone
    ])
}

// Pointy side along world z, matching the column mesh
fn inside_hex(d: Vec2, radius: f32) -> bool {
    let half_width = radius * 3f32.sqrt() * 0.5;
    let (dx, dz) = (d.x.abs(), d.y.abs());
    dx <= half_width && dz <= radius - dx / 3f32.sqrt()
}

// Top-down view of the tile layout, colored by height
pub fn render_terrain(terrain: &TerrainMesh, max_height: f32, hex_radius: f32, size: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(size, size, BACKGROUND);
    if terrain.columns.is_empty() {
        return img;
    }

    let (lo, hi) = terrain.columns.iter().fold(
        (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
        |(lo, hi), c| (lo.min(c.position), hi.max(c.position)),
    );
    let pad = Vec2::splat(hex_radius);
    let view = Viewport::fit(lo - pad, hi + pad, size);
    let gradient = terrain_gradient();

    for column in &terrain.columns {
        let t = if max_height > 0.0 {
            (column.height / max_height).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let rgb = gradient.get(t).into_format::<u8>();
        // taller tiles read lighter
        let light = 0.75 + 0.25 * t;
        let color = Rgb([
            (rgb.red as f32 * light) as u8,
            (rgb.green as f32 * light) as u8,
            (rgb.blue as f32 * light) as u8,
        ]);

        let a = view.to_pixel(column.position - pad);
        let b = view.to_pixel(column.position + pad);
        let (x0, x1) = (a.x.min(b.x).max(0.0) as u32, a.x.max(b.x).min(size as f32) as u32);
        let (y0, y1) = (a.y.min(b.y).max(0.0) as u32, a.y.max(b.y).min(size as f32) as u32);
        for py in y0..y1 {
            for px in x0..x1 {
                if inside_hex(view.to_world(px, py) - column.position, hex_radius) {
                    img.put_pixel(px, py, color);
                }
            }
        }
    }
    img
}

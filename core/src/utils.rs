use glam::Vec3;

use crate::turtle::Segment;

// Flatten segments into x, y, z triples, two points per segment
// The layout a line renderer uploads as one position attribute
pub fn flatten_segments(segments: &[Segment]) -> Vec<f32> {
    let mut buf = Vec::with_capacity(segments.len() * 6);
    for s in segments {
        buf.extend_from_slice(&s.start.to_array());
        buf.extend_from_slice(&s.end.to_array());
    }
    buf
}

// Axis-aligned (min, max) over every endpoint
pub fn segment_bounds<'a>(segments: impl IntoIterator<Item = &'a Segment>) -> Option<(Vec3, Vec3)> {
    segments.into_iter().fold(None, |acc, s| {
        let (lo, hi) = acc.unwrap_or((s.start, s.start));
        Some((lo.min(s.start).min(s.end), hi.max(s.start).max(s.end)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_keeps_pairs_in_order() {
        let segs = [
            Segment::new(Vec3::ZERO, Vec3::Y),
            Segment::new(Vec3::X, Vec3::Z),
        ];
        assert_eq!(
            flatten_segments(&segs),
            vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn bounds_cover_all_endpoints() {
        let segs = [
            Segment::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::Y),
            Segment::new(Vec3::X, Vec3::new(0.0, -3.0, 0.0)),
        ];
        let (lo, hi) = segment_bounds(&segs).unwrap();
        assert_eq!(lo, Vec3::new(-1.0, -3.0, 0.0));
        assert_eq!(hi, Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(segment_bounds(&[]), None);
    }
}

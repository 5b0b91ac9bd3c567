//! Footprint overlap measured as intersection over union.

use std::cmp::Ordering;
use std::f64::consts::PI;

use crate::candidate::Candidate;

/// Shape of the region a candidate covers around its centre.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FootprintShape {
    /// Disc whose diameter is the candidate size.
    #[default]
    Circle,
    /// Axis-aligned square whose side is the candidate size.
    Square,
}

impl FootprintShape {
    /// Intersection over union of the footprints of `a` and `b`.
    ///
    /// Returns a value in `[0, 1]`: 0 for disjoint or touching footprints and
    /// for zero-size footprints, 1 for identical ones.
    pub fn iou(self, a: &Candidate, b: &Candidate) -> f32 {
        // Evaluate in a canonical argument order so iou(a, b) == iou(b, a) bitwise.
        let (a, b) = if footprint_order(a, b) == Ordering::Greater {
            (b, a)
        } else {
            (a, b)
        };
        match self {
            FootprintShape::Circle => circle_iou(a, b),
            FootprintShape::Square => square_iou(a, b),
        }
    }
}

fn footprint_order(a: &Candidate, b: &Candidate) -> Ordering {
    a.size
        .total_cmp(&b.size)
        .then_with(|| a.x.total_cmp(&b.x))
        .then_with(|| a.y.total_cmp(&b.y))
}

fn circle_iou(a: &Candidate, b: &Candidate) -> f32 {
    // f64 keeps squared radii finite for any finite f32 size.
    let ra = f64::from(a.size) * 0.5;
    let rb = f64::from(b.size) * 0.5;
    if ra <= 0.0 || rb <= 0.0 {
        return 0.0;
    }
    let r_min = ra.min(rb);
    let r_max = ra.max(rb);
    let dist = (f64::from(a.x) - f64::from(b.x)).hypot(f64::from(a.y) - f64::from(b.y));

    if r_min + dist <= r_max {
        // One disc lies inside the other.
        return ((r_min * r_min) / (r_max * r_max)) as f32;
    }
    if dist >= ra + rb {
        return 0.0;
    }

    let ra2 = ra * ra;
    let rb2 = rb * rb;
    let dist2 = dist * dist;
    let cos_alpha = ((rb2 + dist2 - ra2) / (2.0 * rb * dist)).clamp(-1.0, 1.0);
    let cos_beta = ((ra2 + dist2 - rb2) / (2.0 * ra * dist)).clamp(-1.0, 1.0);
    let alpha = cos_alpha.acos();
    let beta = cos_beta.acos();

    let segment_a = ra2 * beta - ra2 * beta.sin() * cos_beta;
    let segment_b = rb2 * alpha - rb2 * alpha.sin() * cos_alpha;
    let intersection = segment_a + segment_b;
    let union = (ra2 + rb2) * PI - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    (intersection / union).clamp(0.0, 1.0) as f32
}

fn square_iou(a: &Candidate, b: &Candidate) -> f32 {
    let (sa, sb) = (f64::from(a.size), f64::from(b.size));
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (bx, by) = (f64::from(b.x), f64::from(b.y));
    let ha = sa * 0.5;
    let hb = sb * 0.5;
    let ix = ((ax + ha).min(bx + hb) - (ax - ha).max(bx - hb)).max(0.0);
    let iy = ((ay + ha).min(by + hb) - (ay - ha).max(by - hb)).max(0.0);
    let intersection = ix * iy;
    let union = sa * sa + sb * sb - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    (intersection / union).clamp(0.0, 1.0) as f32
}

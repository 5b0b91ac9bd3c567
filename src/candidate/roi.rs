//! Rectangular region-of-interest filtering.

use crate::candidate::Candidate;
use crate::util::{KptError, KptResult};

/// Half-open integer rectangle `[x, x + width) x [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Roi {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl Roi {
    /// Creates a region; an empty extent is rejected.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> KptResult<Self> {
        if width == 0 || height == 0 {
            return Err(KptError::InvalidRoi { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if the candidate centre, truncated to integer pixels,
    /// lies inside the region.
    pub fn contains(&self, candidate: &Candidate) -> bool {
        let px = candidate.x as i64;
        let py = candidate.y as i64;
        let x0 = i64::from(self.x);
        let y0 = i64::from(self.y);
        px >= x0
            && px < x0 + i64::from(self.width)
            && py >= y0
            && py < y0 + i64::from(self.height)
    }
}

/// Drops every candidate whose centre falls outside `roi`, preserving order.
pub fn retain_in_roi(candidates: &mut Vec<Candidate>, roi: &Roi) {
    candidates.retain(|candidate| roi.contains(candidate));
}

#[cfg(test)]
mod tests {
    use super::{retain_in_roi, Roi};
    use crate::candidate::Candidate;
    use crate::util::KptError;

    #[test]
    fn edges_are_half_open() {
        let roi = Roi::new(10, 20, 5, 5).unwrap();
        let at = |x: f32, y: f32| Candidate::new(x, y, 1.0, 1.0);
        assert!(roi.contains(&at(10.0, 20.0)));
        assert!(roi.contains(&at(14.9, 24.9)));
        assert!(!roi.contains(&at(15.0, 22.0)));
        assert!(!roi.contains(&at(9.5, 22.0)));
    }

    #[test]
    fn retain_keeps_order() {
        let roi = Roi::new(0, 0, 10, 10).unwrap();
        let mut kpts = vec![
            Candidate::new(1.0, 1.0, 1.0, 3.0),
            Candidate::new(50.0, 1.0, 1.0, 9.0),
            Candidate::new(2.0, 8.0, 1.0, 1.0),
        ];
        retain_in_roi(&mut kpts, &roi);
        assert_eq!(kpts.len(), 2);
        assert_eq!(kpts[0].score, 3.0);
        assert_eq!(kpts[1].score, 1.0);
    }

    #[test]
    fn rejects_empty_extent() {
        assert_eq!(
            Roi::new(0, 0, 0, 4).unwrap_err(),
            KptError::InvalidRoi {
                width: 0,
                height: 4
            }
        );
    }
}

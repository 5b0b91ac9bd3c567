//! Scored candidate regions and the filters that thin them out.
//!
//! A [`Candidate`] is a raw detector response: a position, a footprint
//! diameter and a confidence score. The submodules consolidate dense
//! responses into a sparse set (`nms`), keep only the strongest responses
//! (`topk`) and restrict responses to a rectangle (`roi`).

pub(crate) mod nms;
pub(crate) mod overlap;
pub(crate) mod roi;
pub(crate) mod topk;

use crate::util::{KptError, KptResult};

/// Scored 2D candidate region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// X coordinate (column) of the region centre.
    pub x: f32,
    /// Y coordinate (row) of the region centre.
    pub y: f32,
    /// Footprint diameter (circle) or side length (square).
    pub size: f32,
    /// Detector confidence; higher is stronger.
    pub score: f32,
}

impl Candidate {
    /// Creates a candidate from its centre, footprint size and score.
    pub fn new(x: f32, y: f32, size: f32, score: f32) -> Self {
        Self { x, y, size, score }
    }

    /// Checks that every attribute is usable for overlap and ranking.
    pub fn validate(&self) -> KptResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(KptError::InvalidCandidate {
                reason: "position must be finite",
            });
        }
        if !self.size.is_finite() || self.size < 0.0 {
            return Err(KptError::InvalidCandidate {
                reason: "size must be finite and non-negative",
            });
        }
        if self.score.is_nan() {
            return Err(KptError::InvalidCandidate {
                reason: "score must not be NaN",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Candidate;
    use crate::util::KptError;

    #[test]
    fn validate_rejects_bad_attributes() {
        assert!(Candidate::new(1.0, 2.0, 6.0, 0.5).validate().is_ok());
        assert!(Candidate::new(1.0, 2.0, 0.0, f32::NEG_INFINITY)
            .validate()
            .is_ok());

        let err = Candidate::new(f32::NAN, 0.0, 1.0, 1.0).validate().unwrap_err();
        assert_eq!(
            err,
            KptError::InvalidCandidate {
                reason: "position must be finite"
            }
        );
        assert!(Candidate::new(0.0, 0.0, -1.0, 1.0).validate().is_err());
        assert!(Candidate::new(0.0, 0.0, 1.0, f32::NAN).validate().is_err());
    }
}

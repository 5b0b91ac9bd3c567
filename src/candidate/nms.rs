//! Greedy non-maximum suppression over scored footprints.
//!
//! Candidates are processed in emission order against a growing set of kept
//! candidates. A candidate that overlaps no kept candidate by more than
//! `max_overlap` is kept. Otherwise it replaces the first overlapping kept
//! candidate with a strictly lower score, or is discarded if there is none.
//! The first-match replacement is intentional: the result depends on input
//! order and is not the global best of each cluster.

use crate::candidate::overlap::FootprintShape;
use crate::candidate::Candidate;
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{KptError, KptResult};

/// Configuration for [`suppress`] and [`Suppressor`].
#[derive(Clone, Debug, PartialEq)]
pub struct NmsConfig {
    /// Largest tolerated IoU between two kept candidates, in `[0, 1)`.
    /// Zero tolerates no overlap at all.
    pub max_overlap: f32,
    /// Footprint used to compute IoU.
    pub shape: FootprintShape,
    /// Candidates whose score is not strictly above this floor are dropped.
    pub min_score: Option<f32>,
    /// Process frames in parallel in [`suppress_frames`] (`rayon` feature).
    pub parallel: bool,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            max_overlap: 0.0,
            shape: FootprintShape::Circle,
            min_score: None,
            parallel: false,
        }
    }
}

impl NmsConfig {
    /// Checks that the overlap threshold lies in `[0, 1)`.
    pub fn validate(&self) -> KptResult<()> {
        let value = self.max_overlap;
        if !value.is_finite() || !(0.0..1.0).contains(&value) {
            return Err(KptError::InvalidOverlapThreshold { value });
        }
        Ok(())
    }
}

/// Outcome of offering one candidate to a [`Suppressor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offer {
    /// No kept candidate overlapped; the candidate was appended.
    Inserted,
    /// The candidate took the place of the kept candidate at `index`.
    Replaced { index: usize },
    /// The candidate overlapped the kept candidate at `index` (the first such
    /// one) and did not outscore any overlapping kept candidate.
    Discarded { index: usize },
    /// The score did not clear `min_score`.
    BelowScoreFloor,
}

/// Running counts of offer outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SuppressStats {
    pub inserted: usize,
    pub replaced: usize,
    pub discarded: usize,
    pub below_floor: usize,
}

impl SuppressStats {
    /// Total number of candidates offered.
    pub fn offered(&self) -> usize {
        self.inserted + self.replaced + self.discarded + self.below_floor
    }

    fn record(&mut self, offer: Offer) {
        match offer {
            Offer::Inserted => self.inserted += 1,
            Offer::Replaced { .. } => self.replaced += 1,
            Offer::Discarded { .. } => self.discarded += 1,
            Offer::BelowScoreFloor => self.below_floor += 1,
        }
    }
}

/// Incremental suppressor holding the kept candidates of one frame.
#[derive(Clone, Debug)]
pub struct Suppressor {
    config: NmsConfig,
    kept: Vec<Candidate>,
    stats: SuppressStats,
}

impl Suppressor {
    /// Creates an empty suppressor after validating `config`.
    pub fn new(config: NmsConfig) -> KptResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            kept: Vec::new(),
            stats: SuppressStats::default(),
        })
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &NmsConfig {
        &self.config
    }

    /// Kept candidates in confirmation order.
    pub fn kept(&self) -> &[Candidate] {
        &self.kept
    }

    pub fn stats(&self) -> SuppressStats {
        self.stats
    }

    /// Consumes the suppressor and returns the kept candidates.
    pub fn into_kept(self) -> Vec<Candidate> {
        self.kept
    }

    /// Offers the next candidate in emission order.
    pub fn offer(&mut self, candidate: Candidate) -> KptResult<Offer> {
        candidate.validate()?;
        let offer = self.place(candidate);
        self.stats.record(offer);
        Ok(offer)
    }

    fn place(&mut self, candidate: Candidate) -> Offer {
        if let Some(floor) = self.config.min_score {
            if candidate.score <= floor {
                return Offer::BelowScoreFloor;
            }
        }

        let shape = self.config.shape;
        let max_overlap = self.config.max_overlap;
        let mut first_overlap = None;
        for (index, kept) in self.kept.iter_mut().enumerate() {
            if shape.iou(&candidate, kept) <= max_overlap {
                continue;
            }
            if candidate.score > kept.score {
                trace_debug!(
                    "nms_replace",
                    index = index,
                    old_score = kept.score,
                    new_score = candidate.score
                );
                *kept = candidate;
                return Offer::Replaced { index };
            }
            first_overlap.get_or_insert(index);
        }

        match first_overlap {
            Some(index) => Offer::Discarded { index },
            None => {
                self.kept.push(candidate);
                Offer::Inserted
            }
        }
    }
}

/// Suppresses overlapping candidates of a single frame.
///
/// `candidates` is taken in detector emission order; the result holds the
/// kept candidates in confirmation order and is never longer than the input.
pub fn suppress(candidates: &[Candidate], config: &NmsConfig) -> KptResult<Vec<Candidate>> {
    let _span = trace_span!("suppress", candidates = candidates.len()).entered();

    let mut suppressor = Suppressor::new(config.clone())?;
    for candidate in candidates.iter().copied() {
        suppressor.offer(candidate)?;
    }

    let stats = suppressor.stats();
    trace_event!(
        "suppress_done",
        kept = suppressor.kept().len(),
        replaced = stats.replaced,
        discarded = stats.discarded,
        below_floor = stats.below_floor
    );
    Ok(suppressor.into_kept())
}

/// Suppresses each frame's candidates independently.
///
/// With the `rayon` feature and `config.parallel` set, frames are processed
/// in parallel; the output is identical to the sequential path.
pub fn suppress_frames(
    frames: &[Vec<Candidate>],
    config: &NmsConfig,
) -> KptResult<Vec<Vec<Candidate>>> {
    config.validate()?;

    #[cfg(feature = "rayon")]
    {
        if config.parallel {
            return suppress_frames_par(frames, config);
        }
    }

    let _span = trace_span!("suppress_frames", frames = frames.len(), parallel = false).entered();
    frames
        .iter()
        .map(|candidates| suppress(candidates, config))
        .collect()
}

/// Frame-parallel suppression (rayon).
#[cfg(feature = "rayon")]
fn suppress_frames_par(
    frames: &[Vec<Candidate>],
    config: &NmsConfig,
) -> KptResult<Vec<Vec<Candidate>>> {
    use rayon::prelude::*;

    let _span = trace_span!("suppress_frames", frames = frames.len(), parallel = true).entered();
    frames
        .par_iter()
        .map(|candidates| suppress(candidates, config))
        .collect()
}

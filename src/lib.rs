//! kptrack holds the reusable core of a keypoint tracking pipeline.
//!
//! Two independent pieces live here: [`RingBuffer`], a fixed-capacity history
//! of the most recent frame records that evicts the oldest on overflow, and a
//! greedy spatial non-maximum suppression ([`suppress`]) that consolidates
//! dense scored candidate regions into a sparse, non-overlapping set. Image
//! decoding, detection and description are left to the caller.

mod candidate;
pub mod history;
mod trace;
pub mod util;

pub use candidate::Candidate;
pub use history::RingBuffer;
pub use util::{KptError, KptResult};

pub use candidate::nms::{suppress, suppress_frames, NmsConfig, Offer, SuppressStats, Suppressor};
pub use candidate::overlap::FootprintShape;
pub use candidate::roi::{retain_in_roi, Roi};
pub use candidate::topk::retain_best;

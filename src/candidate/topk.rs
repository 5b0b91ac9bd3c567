//! Keep only the strongest candidates.

use std::cmp::Ordering;

use crate::candidate::Candidate;

/// Ranks stronger candidates first; ties go to the upper-left, then the
/// larger footprint.
fn candidate_cmp_desc(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.y.total_cmp(&b.y))
        .then_with(|| a.x.total_cmp(&b.x))
        .then_with(|| b.size.total_cmp(&a.size))
}

/// Keeps the `n` highest-scoring candidates, strongest first.
///
/// Ties are broken by position (row, then column) and then by the larger
/// footprint, so the result does not depend on input order. Selection is
/// O(len) before sorting the kept prefix.
pub fn retain_best(candidates: &[Candidate], n: usize) -> Vec<Candidate> {
    let mut kept = candidates.to_vec();
    if n == 0 {
        kept.clear();
        return kept;
    }
    if n < kept.len() {
        kept.select_nth_unstable_by(n - 1, candidate_cmp_desc);
        kept.truncate(n);
    }
    kept.sort_unstable_by(candidate_cmp_desc);
    kept
}

//! Associated-score aggregation
//!
//! Each ranked seed keyword splits its normalized score equally across its
//! associated terms (fan-out split). A term reachable from several seeds, or
//! listed more than once for one seed, receives the sum of every share.

use crate::keywords::{AssociatedScores, AssociationMap, RankedKeyword};

/// Compute the accumulated score of every associated term.
///
/// Seeds missing from `associations`, or mapped to an empty list, contribute
/// nothing. Shares are accumulated unrounded, and non-finite scores propagate
/// through the arithmetic unchanged.
pub fn aggregate(ranked_keywords: &[RankedKeyword], associations: &AssociationMap) -> AssociatedScores {
    let mut scores = AssociatedScores::default();

    for ranked in ranked_keywords {
        let terms = match associations.get(&ranked.keyword) {
            Some(terms) if !terms.is_empty() => terms,
            // Absent or empty: no terms to split across, and no division by zero.
            Some(_) | None => continue,
        };

        let share = ranked.normalized_score / terms.len() as f64;
        for term in terms {
            scores.accumulate(term, share);
        }
    }

    scores
}

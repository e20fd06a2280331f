//! # Quorum Evaluator
//!
//! Required quorum is `supply_at(snapshot) * numerator / denominator`,
//! rounded down. Abstentions count toward quorum but not the margin.

use super::tally::ProposalVote;
use super::value_objects::Weight;

/// Required quorum for a snapshot supply.
///
/// Computed in `u128` so the product cannot overflow.
#[must_use]
pub fn quorum_required(supply: Weight, numerator: u64, denominator: u64) -> u128 {
    if denominator == 0 {
        return u128::MAX;
    }
    u128::from(supply) * u128::from(numerator) / u128::from(denominator)
}

/// True when for + abstain meets the required quorum.
#[must_use]
pub fn quorum_reached(votes: &ProposalVote, required: u128) -> bool {
    votes.quorum_votes() >= required
}

/// Quorum reached and strict majority.
#[must_use]
pub fn is_successful(votes: &ProposalVote, required: u128) -> bool {
    quorum_reached(votes, required) && votes.vote_succeeded()
}

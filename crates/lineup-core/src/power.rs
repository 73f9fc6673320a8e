// Composite power score for a selected roster.
//
// The score blends average quality, positional balance (forwards weighted
// slightly higher) and roster completeness. A full XI keeps the weighted
// average intact; smaller rosters are scaled down linearly.

use crate::player::{Player, PositionCategory, ALL_CATEGORIES};

/// Roster size that earns the full completeness factor.
pub const FULL_SQUAD: usize = 11;

/// Compute the power score of `players`.
///
/// Players with an unrecognized position code count towards the mean rating
/// and completeness but belong to no category bucket. When no player lands
/// in a bucket the plain mean rating is used instead of the weighted one.
///
/// The result is not clamped: more than [`FULL_SQUAD`] players push the
/// completeness factor above 1 and the score can exceed 100.
pub fn compute_power_score(players: &[Player]) -> u32 {
    if players.is_empty() {
        return 0;
    }

    let count = players.len() as f64;
    let base_score = players.iter().map(|p| f64::from(p.rating)).sum::<f64>() / count;

    let mut weighted_score = 0.0;
    let mut total_weight = 0.0;

    for category in ALL_CATEGORIES {
        let (sum, n) = bucket_totals(players, category);
        if n == 0 {
            continue;
        }
        let position_rating = sum / n as f64;
        let weight = category.weight() * n as f64;
        weighted_score += position_rating * weight;
        total_weight += weight;
    }

    let final_score = if total_weight > 0.0 {
        weighted_score / total_weight
    } else {
        base_score
    };

    let completeness = count / FULL_SQUAD as f64;

    (final_score * completeness).round() as u32
}

/// Sum of ratings and head count for one category.
fn bucket_totals(players: &[Player], category: PositionCategory) -> (f64, usize) {
    players
        .iter()
        .filter(|p| p.category() == Some(category))
        .fold((0.0, 0), |(sum, n), p| (sum + f64::from(p.rating), n + 1))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use super::models::MemberModel;

/// Computes the derived ranking score for a member.
///
/// A member with no matches played scores 0; that is a valid input, not an
/// error. Otherwise the score is `5 * points / matches + 100 * medals` with
/// real-valued division. Pure function of the member's statistics: the same
/// snapshot always yields the same score.
pub fn compute_score(member: &MemberModel) -> f64 {
    if member.matches_played == 0 {
        return 0.0;
    }
    5.0 * f64::from(member.points_scored) / f64::from(member.matches_played)
        + 100.0 * f64::from(member.medals_won)
}

/// Rounds a score to two decimals for display. Sorting must always happen
/// on the unrounded value, so this is applied only when converting to a
/// wire response.
pub fn round_for_display(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

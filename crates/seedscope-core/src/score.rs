use crate::model::Objective;

/// Relative score reported for a valid run on a seed with no known reference.
/// The first valid run on a seed is its own baseline.
pub const BASELINE_RELATIVE_SCORE: f64 = 100.0;

/// Expresses `score` as a percentage of the reference score for its seed.
///
/// - `score <= 0` (WA) always yields `0`, as does a non-finite score.
/// - A missing or non-positive `reference` yields [`BASELINE_RELATIVE_SCORE`].
/// - Otherwise `score / reference * 100` for [`Objective::Max`] and
///   `reference / score * 100` for [`Objective::Min`].
///
/// The result is not capped: beating the reference gives more than 100.
pub fn relative_score(score: f64, reference: Option<f64>, objective: Objective) -> f64 {
    if !score.is_finite() || score <= 0.0 {
        return 0.0;
    }
    let reference = match reference {
        Some(r) if r > 0.0 => r,
        _ => return BASELINE_RELATIVE_SCORE,
    };
    match objective {
        Objective::Max => score / reference * 100.0,
        Objective::Min => reference / score * 100.0,
    }
}

use crate::config::MatchTuning;

/// Acceptance cutoff derived from the spread of best-match scores.
///
/// `clamp(mean - stddev, floor, ceiling)` with the population standard deviation; an empty
/// score list yields `default_threshold`.
pub fn dynamic_threshold(scores: &[f64], tuning: &MatchTuning) -> f64 {
    if scores.is_empty() {
        return tuning.default_threshold;
    }

    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    let raw = mean - variance.sqrt();

    // f64::clamp panics when floor > ceiling.
    raw.max(tuning.threshold_floor).min(tuning.threshold_ceiling)
}

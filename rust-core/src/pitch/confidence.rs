//! Agreement-based confidence from several pitch estimates

/// Confidence that independent estimates agree
///
/// confidence = 1 / (1 + σ/μ), where μ is the mean of the estimates and σ
/// their population standard deviation. Equal estimates give 1.0; the score
/// decays toward 0 as they spread relative to their mean.
///
/// Returns 0.0 when the mean is not positive (no method found a pitch).
pub fn combine_confidence(estimates: &[f64]) -> f64 {
    if estimates.is_empty() {
        return 0.0;
    }
    let count = estimates.len() as f64;
    let mean = estimates.iter().sum::<f64>() / count;
    if mean <= 0.0 {
        return 0.0;
    }

    let variance = estimates.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / count;
    1.0 / (1.0 + variance.sqrt() / mean)
}

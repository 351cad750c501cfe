//! Variance-normalized scores of coherence.
//!
//! Both window and region scores normalize a mean coherence by the standard error implied by
//! the branch variance, `statistic / sqrt(variance / n)`, where `n` is the number of sites
//! entering the statistic. Zero variance gives infinite scores, following floating point
//! semantics; callers should filter these as necessary.

pub mod region;
pub use region::RegionScores;

pub mod window;
pub use window::WindowScores;

/// Returns the z-score of a statistic computed from `n` sites of a branch with `variance`.
pub fn z_score(statistic: f64, variance: f64, n: usize) -> f64 {
    statistic / (variance / n as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_score() {
        assert_approx_eq!(z_score(1.0, 4.0, 4), 1.0);
        assert_approx_eq!(z_score(-0.5, 2.0, 8), -1.0);
    }

    #[test]
    fn test_z_score_zero_variance() {
        assert_eq!(z_score(1.0, 0.0, 3), f64::INFINITY);
        assert_eq!(z_score(-1.0, 0.0, 3), f64::NEG_INFINITY);
        assert!(z_score(0.0, 0.0, 3).is_nan());
    }
}

//! Sliding window scores.

use crate::{error::InvalidInput, sites::BranchSites, Branch, Error};

use super::z_score;

/// Centered sliding window scores of a branch.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowScores {
    branch: Branch,
    variance: f64,
    window: usize,
    sites: Vec<usize>,
    scores: Vec<f64>,
}

impl WindowScores {
    /// Computes window scores for the sites of a branch.
    ///
    /// Every window of `window` consecutive sites is summarized by its weighted mean coherence,
    /// see [`Weights`], normalized by the variance of the branch. The score of a window is
    /// reported at the site in its center, and sites at either end without a full window around
    /// them are undefined (NaN).
    ///
    /// # Errors
    ///
    /// If `window` is zero or larger than the number of sites.
    pub fn compute(sites: &BranchSites, window: usize) -> Result<Self, Error> {
        if window == 0 || window > sites.len() {
            return Err(InvalidInput::WindowSize {
                window,
                sites: sites.len(),
                branch: sites.branch().clone(),
            }
            .into());
        }

        let variance = sites.variance();
        let scores = centered_scores(&sites.coherence(), variance, window);

        log::trace!(
            "Computed {} window scores of size {window} for branch {}",
            scores.len(),
            sites.branch()
        );

        Ok(Self {
            branch: sites.branch().clone(),
            variance,
            window,
            sites: sites.sites().collect(),
            scores,
        })
    }

    /// Returns the branch.
    pub fn branch(&self) -> &Branch {
        &self.branch
    }

    /// Returns an iterator over sites and their scores, in site order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.sites.iter().copied().zip(self.scores.iter().copied())
    }

    /// Returns the scores, in site order.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Returns the variance of the branch.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Returns the window size.
    pub fn window(&self) -> usize {
        self.window
    }
}

/// Linearly decreasing window weights.
///
/// The first site of a window has weight 1.0 and the last has weight 0.5, so the smoothing
/// favours the start of each window.
#[derive(Clone, Debug, PartialEq)]
pub struct Weights(Vec<f64>);

impl Weights {
    /// Returns the weights for a window of the provided size.
    pub fn linear(window: usize) -> Self {
        const START: f64 = 1.0;
        const STOP: f64 = 0.5;

        match window {
            0 => Self(Vec::new()),
            1 => Self(vec![START]),
            n => {
                let step = (STOP - START) / (n - 1) as f64;
                let mut weights = (0..n).map(|i| START + i as f64 * step).collect::<Vec<_>>();
                weights[n - 1] = STOP;
                Self(weights)
            }
        }
    }

    /// Returns the weighted mean of values.
    ///
    /// The values must have the same length as the weights.
    pub fn mean(&self, values: &[f64]) -> f64 {
        let (sum, weight_sum) = values
            .iter()
            .zip(self.0.iter())
            .fold((0.0, 0.0), |(sum, weight_sum), (x, w)| {
                (sum + x * w, weight_sum + w)
            });

        sum / weight_sum
    }
}

impl AsRef<[f64]> for Weights {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Returns the centered window scores of a coherence sequence.
///
/// The output has the same length as `values`, with NaN at positions lacking a full window.
/// The window size must be in `1..=values.len()`.
pub fn centered_scores(values: &[f64], variance: f64, window: usize) -> Vec<f64> {
    let weights = Weights::linear(window);
    let shift = window / 2;

    let mut scores = vec![f64::NAN; values.len()];

    // A window ending at position `end` is centered at `end - shift`
    for (start, chunk) in values.windows(window).enumerate() {
        let end = start + window - 1;
        scores[end - shift] = z_score(weights.mean(chunk), variance, window);
    }

    scores
}

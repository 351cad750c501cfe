//! Region scores.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{missing::MissingData, region::Regions, sites::BranchSites, Branch};

use super::z_score;

/// One score per region for a branch.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionScores {
    branch: Branch,
    variance: f64,
    // Score and number of sites present for the branch, per region
    scores: IndexMap<String, (f64, usize)>,
}

impl RegionScores {
    /// Computes region scores for the sites of a branch.
    ///
    /// Each region is scored by the mean coherence over those of its sites that are present for
    /// the branch, normalized by the branch variance using the number of present sites. Sites
    /// absent for the branch are ignored, and a region with no present sites is undefined (NaN).
    pub fn compute(sites: &BranchSites, regions: &Regions) -> Self {
        let variance = sites.variance();

        let coherence = sites
            .records()
            .iter()
            .map(|record| (record.site, record.coherence))
            .collect::<HashMap<_, _>>();

        let scores = regions
            .iter()
            .map(|(name, region_sites)| {
                let resolved = region_sites
                    .iter()
                    .filter_map(|site| coherence.get(site).copied())
                    .collect::<Vec<_>>();

                let score = match resolved.len() {
                    0 => f64::NAN,
                    n => z_score(resolved.iter().sum::<f64>() / n as f64, variance, n),
                };

                (String::from(name), (score, resolved.len()))
            })
            .collect();

        Self {
            branch: sites.branch().clone(),
            variance,
            scores,
        }
    }

    /// Returns the branch.
    pub fn branch(&self) -> &Branch {
        &self.branch
    }

    /// Returns the score of a region, if the region exists.
    ///
    /// The score is NaN if the region has no sites on the branch.
    pub fn get(&self, region: &str) -> Option<f64> {
        self.scores.get(region).map(|&(score, _)| score)
    }

    /// Returns the number of sites of a region present for the branch, if the region exists.
    pub fn sites(&self, region: &str) -> Option<usize> {
        self.scores.get(region).map(|&(_, sites)| sites)
    }

    /// Returns an iterator over region names and scores, in region order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores
            .iter()
            .map(|(region, &(score, _))| (region.as_str(), score))
    }

    /// Returns the regions without any sites on the branch.
    pub fn missing(&self) -> impl Iterator<Item = MissingData> + '_ {
        self.scores
            .iter()
            .filter(|(_, (_, sites))| *sites == 0)
            .map(|(region, _)| MissingData::EmptyRegion {
                region: region.clone(),
                branch: self.branch.clone(),
            })
    }

    /// Returns the variance of the branch.
    pub fn variance(&self) -> f64 {
        self.variance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::sites::tests::{branch_sites, record};

    #[test]
    fn test_region_mean() {
        // Variance 2 for all sites
        let sites = branch_sites(&[1.0, 3.0, -2.0, 4.0]);
        let regions = Regions::from_iter([("a", 1), ("a", 2), ("b", 3), ("b", 4), ("b", 1)]);

        let scores = RegionScores::compute(&sites, &regions);

        assert_approx_eq!(scores.get("a").unwrap(), 2.0);
        assert_approx_eq!(scores.get("b").unwrap(), 1.0 / (2.0f64 / 3.0).sqrt());
        assert_eq!(scores.iter().map(|(r, _)| r).collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_absent_sites_dropped() {
        let sites = BranchSites::new(vec![
            record("(A1, Node1*)", 10, 3.0, "c1"),
            record("(A1, Node1*)", 11, 100.0, "c1"),
        ])
        .unwrap();
        let regions = Regions::from_iter([("r", 10), ("r", 999)]);

        let scores = RegionScores::compute(&sites, &regions);

        // Mean over site 10 only, with one effective site
        assert_approx_eq!(scores.get("r").unwrap(), 3.0 / 2.0f64.sqrt());
    }

    #[test]
    fn test_empty_region_undefined() {
        let sites = branch_sites(&[1.0, 2.0]);
        let regions = Regions::from_iter([("present", 1), ("absent", 7)]);

        let scores = RegionScores::compute(&sites, &regions);

        assert!(scores.get("absent").unwrap().is_nan());
        assert!(!scores.get("present").unwrap().is_nan());
        assert_eq!(
            scores.missing().collect::<Vec<_>>(),
            [MissingData::EmptyRegion {
                region: String::from("absent"),
                branch: Branch::new("A1", "Node1*"),
            }]
        );
    }

    #[test]
    fn test_undefined_score_with_sites_not_missing() {
        let mut record = record("(A1, Node1*)", 1, 0.0, "c1");
        record.category_variance = 0.0;
        let sites = BranchSites::new(vec![record]).unwrap();
        let regions = Regions::from_iter([("zero", 1), ("absent", 2)]);

        let scores = RegionScores::compute(&sites, &regions);

        assert!(scores.get("zero").unwrap().is_nan());
        assert_eq!(scores.sites("zero"), Some(1));
        assert_eq!(scores.sites("absent"), Some(0));
        assert_eq!(
            scores.missing().collect::<Vec<_>>(),
            [MissingData::EmptyRegion {
                region: String::from("absent"),
                branch: Branch::new("A1", "Node1*"),
            }]
        );
    }

    #[test]
    fn test_unknown_region() {
        let sites = branch_sites(&[1.0]);
        let scores = RegionScores::compute(&sites, &Regions::from_iter([("a", 1)]));

        assert_eq!(scores.get("b"), None);
    }
}

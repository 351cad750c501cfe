//! Rate-heterogeneity aware variance of a branch.
//!
//! Each site of a branch is assigned a rate category, and each category comes with its own
//! variance. The variance of the branch is the mixture of the category variances, each weighted
//! by the fraction of sites assigned to it.

use std::io;

use indexmap::IndexMap;

use crate::{
    error::InvalidInput,
    sites::{BranchSites, SiteRecord},
    table::format_score,
    Branch, Error,
};

/// The rate categories of a branch, in order of first appearance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RateCategories(IndexMap<String, Category>);

/// A single rate category.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Category {
    /// Variance of the category.
    pub variance: f64,
    /// Number of sites assigned to the category.
    pub sites: usize,
}

impl RateCategories {
    /// Collects the rate categories of site records.
    ///
    /// If the same category label is given different variances, the first one is used.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SiteRecord>,
    {
        let mut categories = IndexMap::<String, Category>::new();

        for record in records {
            categories
                .entry(record.rate_category.clone())
                .or_insert(Category {
                    variance: record.category_variance,
                    sites: 0,
                })
                .sites += 1;
        }

        Self(categories)
    }

    /// Returns the category with the provided label, if any.
    pub fn get(&self, label: &str) -> Option<&Category> {
        self.0.get(label)
    }

    /// Returns an iterator over category labels and categories.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Category)> {
        self.0.iter().map(|(label, category)| (label.as_str(), category))
    }

    /// Returns the number of categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no categories.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the total number of sites across categories.
    pub fn sites(&self) -> usize {
        self.0.values().map(|category| category.sites).sum()
    }

    /// Returns the mixture variance, or `None` if there are no sites.
    pub fn mixture_variance(&self) -> Option<f64> {
        let total = self.sites();

        (total > 0).then(|| {
            self.0
                .values()
                .map(|category| category.variance * category.sites as f64 / total as f64)
                .sum()
        })
    }
}

/// Returns the mixture variance of site records.
///
/// # Errors
///
/// If no records are provided.
pub fn mixture_variance(records: &[SiteRecord]) -> Result<f64, Error> {
    RateCategories::from_records(records)
        .mixture_variance()
        .ok_or(Error::InvalidInput(InvalidInput::NoSites))
}

/// The variance of a branch within a dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct BranchVariance {
    /// Dataset name.
    pub dataset: String,
    /// Branch.
    pub branch: Branch,
    /// Mixture variance of the branch.
    pub variance: f64,
}

impl BranchVariance {
    /// Computes the variance of the sites of a branch.
    pub fn from_sites<S>(dataset: S, sites: &BranchSites) -> Self
    where
        S: Into<String>,
    {
        Self {
            dataset: dataset.into(),
            branch: sites.branch().clone(),
            variance: sites.variance(),
        }
    }
}

/// Writes branch variances as CSV.
///
/// The columns are `dataset`, `branch`, and `variance`.
pub fn write_variances<W>(
    writer: W,
    variances: &[BranchVariance],
    precision: usize,
) -> Result<(), Error>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(["dataset", "branch", "variance"])?;

    for variance in variances {
        writer.write_record([
            variance.dataset.clone(),
            variance.branch.to_string(),
            format_score(variance.variance, precision),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::sites::tests::record;

    #[test]
    fn test_mixture_equal_weights() {
        let records = [
            record("(A1, Node1*)", 1, 0.0, "c1"),
            record("(A1, Node1*)", 2, 0.0, "c2"),
        ];

        assert_eq!(mixture_variance(&records).unwrap(), 3.0);
    }

    #[test]
    fn test_mixture_unequal_weights() {
        let records = [
            record("(A1, Node1*)", 1, 0.0, "c1"),
            record("(A1, Node1*)", 2, 0.0, "c1"),
            record("(A1, Node1*)", 3, 0.0, "c1"),
            record("(A1, Node1*)", 4, 0.0, "c2"),
        ];

        assert_approx_eq!(mixture_variance(&records).unwrap(), 2.5);
    }

    #[test]
    fn test_single_category() {
        let records = [
            record("(A1, Node1*)", 1, 0.0, "c2"),
            record("(A1, Node1*)", 2, 0.0, "c2"),
        ];

        assert_eq!(mixture_variance(&records).unwrap(), 4.0);
    }

    #[test]
    fn test_first_variance_wins() {
        let mut second = record("(A1, Node1*)", 2, 0.0, "c1");
        second.category_variance = 100.0;
        let records = [record("(A1, Node1*)", 1, 0.0, "c1"), second];

        let categories = RateCategories::from_records(&records);

        assert_eq!(categories.len(), 1);
        assert_eq!(
            categories.get("c1"),
            Some(&Category {
                variance: 2.0,
                sites: 2
            })
        );
        assert_eq!(categories.mixture_variance(), Some(2.0));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(
            mixture_variance(&[]),
            Err(Error::InvalidInput(InvalidInput::NoSites))
        ));
        assert_eq!(RateCategories::default().mixture_variance(), None);
    }

    #[test]
    fn test_write_variances() {
        let sites = BranchSites::new(vec![
            record("(A1, Node1*)", 1, 0.0, "c1"),
            record("(A1, Node1*)", 2, 0.0, "c2"),
        ])
        .unwrap();
        let variances = [BranchVariance::from_sites("gene", &sites)];

        let mut dest = Vec::new();
        write_variances(&mut dest, &variances, 2).unwrap();

        assert_eq!(
            String::from_utf8(dest).unwrap(),
            "dataset,branch,variance\ngene,\"(A1, Node1*)\",3.00\n"
        );
    }
}

//! Per-site records of the saturation test.

use std::{collections::BTreeMap, io, path::Path};

use serde::Deserialize;

use crate::{error::InvalidInput, variance::RateCategories, Branch, Error};

/// A single site of a single branch, as produced by the saturation test.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SiteRecord {
    /// The branch tested.
    pub branch: Branch,
    /// One-based alignment column.
    pub site: usize,
    /// Coherence of the site on the branch.
    pub coherence: f64,
    /// Rate category assigned to the site.
    pub rate_category: String,
    /// Variance associated with the rate category.
    pub category_variance: f64,
}

/// All site records of one dataset.
///
/// A dataset is the unit the scores are reported under, usually one run of the saturation test
/// for one alignment and tree. Records of several branches may be mixed in any order.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    name: String,
    records: Vec<SiteRecord>,
}

impl Dataset {
    /// Creates a new dataset.
    pub fn new<S>(name: S, records: Vec<SiteRecord>) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            records,
        }
    }

    /// Reads a dataset from a CSV reader.
    ///
    /// The CSV must have a header containing at least the columns `branch`, `site`, `coherence`,
    /// `rate_category`, and `category_variance`. Other columns are ignored.
    pub fn from_reader<S, R>(name: S, reader: R) -> Result<Self, Error>
    where
        S: Into<String>,
        R: io::Read,
    {
        let records = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_deserialize()
            .collect::<Result<Vec<SiteRecord>, _>>()?;

        Ok(Self::new(name, records))
    }

    /// Returns the name of the dataset.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the records of the dataset.
    pub fn records(&self) -> &[SiteRecord] {
        &self.records
    }

    /// Returns the distinct branches of the dataset, sorted.
    pub fn branches(&self) -> Vec<&Branch> {
        let mut branches = self.records.iter().map(|r| &r.branch).collect::<Vec<_>>();
        branches.sort();
        branches.dedup();
        branches
    }

    /// Splits the dataset into its branches, sorted by branch.
    pub fn split_branches(&self) -> Vec<BranchSites> {
        let mut groups = BTreeMap::<&Branch, Vec<SiteRecord>>::new();
        for record in self.records.iter() {
            groups.entry(&record.branch).or_default().push(record.clone());
        }

        groups
            .into_iter()
            .map(|(branch, records)| BranchSites::new_unchecked(branch.clone(), records))
            .collect()
    }

    /// Returns the sites of a single branch, or `None` if the branch has no records.
    pub fn branch(&self, branch: &Branch) -> Option<BranchSites> {
        let records = self
            .records
            .iter()
            .filter(|r| &r.branch == branch)
            .cloned()
            .collect::<Vec<_>>();

        (!records.is_empty()).then(|| BranchSites::new_unchecked(branch.clone(), records))
    }
}

/// Returns a dataset name from a path: the file name with all extensions removed.
///
/// For instance, `results/gene1.satute.components.csv` gives `gene1`.
pub fn dataset_name<P>(path: P) -> Option<String>
where
    P: AsRef<Path>,
{
    let file_name = path.as_ref().file_name()?.to_str()?;

    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => Some(String::from(stem)),
        _ => Some(String::from(file_name)),
    }
}

/// The site records of exactly one branch, sorted by site.
#[derive(Clone, Debug, PartialEq)]
pub struct BranchSites {
    branch: Branch,
    records: Vec<SiteRecord>,
}

impl BranchSites {
    /// Creates the sites of a branch from records.
    ///
    /// # Errors
    ///
    /// If `records` is empty, or if the records belong to more than one branch.
    pub fn new(records: Vec<SiteRecord>) -> Result<Self, Error> {
        let Some(branch) = records.first().map(|r| r.branch.clone()) else {
            return Err(InvalidInput::NoSites.into());
        };

        if records.iter().any(|r| r.branch != branch) {
            let mut branches = Vec::new();
            for record in records.iter() {
                if !branches.contains(&record.branch) {
                    branches.push(record.branch.clone());
                }
            }

            return Err(InvalidInput::MixedBranches { branches }.into());
        }

        Ok(Self::new_unchecked(branch, records))
    }

    fn new_unchecked(branch: Branch, mut records: Vec<SiteRecord>) -> Self {
        records.sort_by_key(|r| r.site);

        Self { branch, records }
    }

    /// Returns the branch.
    pub fn branch(&self) -> &Branch {
        &self.branch
    }

    /// Returns the coherence values, in site order.
    pub fn coherence(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.coherence).collect()
    }

    /// Returns the number of sites.
    ///
    /// This is never zero.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns the records, in site order.
    pub fn records(&self) -> &[SiteRecord] {
        &self.records
    }

    /// Returns an iterator over the site indices, in order.
    pub fn sites(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.iter().map(|r| r.site)
    }

    /// Returns the rate categories of the branch.
    pub fn rate_categories(&self) -> RateCategories {
        RateCategories::from_records(&self.records)
    }

    /// Returns the mixture variance of the branch.
    ///
    /// See [`RateCategories::mixture_variance`].
    pub fn variance(&self) -> f64 {
        // Never empty, so never fails
        self.rate_categories().mixture_variance().unwrap_or(f64::NAN)
    }
}

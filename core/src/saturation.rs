//! Summaries of saturation test decisions.
//!
//! The saturation test decides, per branch and rate category, whether the branch is saturated.
//! Summaries collect the saturated categories of each branch so that they can be written onto a
//! tree.

use std::{collections::BTreeMap, fmt, io};

use serde::Deserialize;

use crate::{newick::MetadataRow, Branch, Error};

/// The decision value marking a saturated branch.
pub const SATURATED: &str = "Saturated";

const SEPARATOR: &str = "|";

/// A single decision of the saturation test.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct TestRecord {
    /// The branch tested.
    pub branch: Branch,
    /// Rate category tested.
    pub rate_category: String,
    /// Decision of the test.
    pub decision_test: String,
    /// Decision of the test after Bonferroni correction.
    pub decision_bonferroni_corrected: String,
}

impl TestRecord {
    /// Reads test records from a CSV reader.
    ///
    /// The CSV must have a header containing at least the columns `branch`, `rate_category`,
    /// `decision_test`, and `decision_bonferroni_corrected`. Other columns are ignored.
    pub fn read_csv<R>(reader: R) -> Result<Vec<Self>, Error>
    where
        R: io::Read,
    {
        csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_deserialize()
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    /// Returns the decision of the test.
    pub fn decision(&self, decision: Decision) -> &str {
        match decision {
            Decision::Uncorrected => &self.decision_test,
            Decision::Corrected => &self.decision_bonferroni_corrected,
        }
    }
}

/// Which decision of the saturation test to use.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Decision {
    /// The decision without correction for multiple testing.
    #[default]
    Uncorrected,
    /// The decision after Bonferroni correction.
    Corrected,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Uncorrected => f.write_str("uncorrected"),
            Decision::Corrected => f.write_str("corrected"),
        }
    }
}

/// The saturated rate categories of a branch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BranchSummary {
    /// The branch.
    pub branch: Branch,
    /// Distinct saturated categories, in order of first appearance.
    pub categories: Vec<String>,
    /// Distinct decisions, in order of first appearance.
    pub results: Vec<String>,
    /// Distinct datasets, in order of first appearance.
    pub datasets: Vec<String>,
}

impl From<BranchSummary> for MetadataRow {
    fn from(summary: BranchSummary) -> Self {
        let pairs = [
            ("category", summary.categories),
            ("result_test", summary.results),
            ("dataset", summary.datasets),
        ]
        .into_iter()
        .map(|(key, values)| (String::from(key), values.join(SEPARATOR)))
        .collect();

        MetadataRow::new(summary.branch, pairs)
    }
}

/// Summarizes the saturated branches of several datasets.
///
/// Only records whose selected decision is [`SATURATED`] are kept. The summaries are sorted by
/// branch.
pub fn summarize<'a, I, S>(datasets: I, decision: Decision) -> Vec<BranchSummary>
where
    I: IntoIterator<Item = (S, &'a [TestRecord])>,
    S: AsRef<str>,
{
    let mut summaries = BTreeMap::<Branch, BranchSummary>::new();

    for (dataset, records) in datasets {
        for record in records.iter() {
            let result = record.decision(decision);

            if result != SATURATED {
                continue;
            }

            let summary = summaries
                .entry(record.branch.clone())
                .or_insert_with(|| BranchSummary {
                    branch: record.branch.clone(),
                    categories: Vec::new(),
                    results: Vec::new(),
                    datasets: Vec::new(),
                });

            push_distinct(&mut summary.categories, &record.rate_category);
            push_distinct(&mut summary.results, result);
            push_distinct(&mut summary.datasets, dataset.as_ref());
        }
    }

    log::debug!(
        "Found {} saturated branches using {decision} decisions",
        summaries.len()
    );

    summaries.into_values().collect()
}

/// Writes branch summaries as CSV.
///
/// The columns are `branch`, `category`, `result_test`, and `dataset`, with multiple values
/// joined by `|`.
pub fn write_summaries<W>(writer: W, summaries: &[BranchSummary]) -> Result<(), Error>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(["branch", "category", "result_test", "dataset"])?;

    for summary in summaries {
        writer.write_record([
            summary.branch.to_string(),
            summary.categories.join(SEPARATOR),
            summary.results.join(SEPARATOR),
            summary.datasets.join(SEPARATOR),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

fn push_distinct(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(String::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &[u8] = b"branch,rate_category,z_score,decision_test,decision_bonferroni_corrected\n\
        \"(B2, Node1*)\",c1,2.5,Saturated,Informative\n\
        \"(A1, Node1*)\",c2,3.1,Saturated,Saturated\n\
        \"(A1, Node1*)\",c1,2.9,Saturated,Saturated\n\
        \"(A1, Node1*)\",c2,3.0,Saturated,Saturated\n\
        \"(C3, Node1*)\",c1,0.1,Informative,Informative\n";

    #[test]
    fn test_read_csv() {
        let records = TestRecord::read_csv(RESULTS).unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(records[0].branch, Branch::new("B2", "Node1*"));
        assert_eq!(records[0].decision(Decision::Corrected), "Informative");
    }

    #[test]
    fn test_summarize_uncorrected() {
        let records = TestRecord::read_csv(RESULTS).unwrap();

        let summaries = summarize([("gene", records.as_slice())], Decision::Uncorrected);

        assert_eq!(
            summaries,
            [
                BranchSummary {
                    branch: Branch::new("A1", "Node1*"),
                    categories: vec![String::from("c2"), String::from("c1")],
                    results: vec![String::from(SATURATED)],
                    datasets: vec![String::from("gene")],
                },
                BranchSummary {
                    branch: Branch::new("B2", "Node1*"),
                    categories: vec![String::from("c1")],
                    results: vec![String::from(SATURATED)],
                    datasets: vec![String::from("gene")],
                },
            ]
        );
    }

    #[test]
    fn test_summarize_corrected() {
        let records = TestRecord::read_csv(RESULTS).unwrap();

        let summaries = summarize([("gene", records.as_slice())], Decision::Corrected);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].branch, Branch::new("A1", "Node1*"));
    }

    #[test]
    fn test_summarize_datasets() {
        let records = TestRecord::read_csv(RESULTS).unwrap();

        let summaries = summarize(
            [("gene1", records.as_slice()), ("gene2", &records[..1])],
            Decision::Uncorrected,
        );

        assert_eq!(summaries[0].datasets, ["gene1"]);
        assert_eq!(summaries[1].datasets, ["gene1", "gene2"]);
    }

    #[test]
    fn test_write_summaries() {
        let records = TestRecord::read_csv(RESULTS).unwrap();
        let summaries = summarize([("gene", records.as_slice())], Decision::Uncorrected);

        let mut dest = Vec::new();
        write_summaries(&mut dest, &summaries).unwrap();

        assert_eq!(
            String::from_utf8(dest).unwrap(),
            "branch,category,result_test,dataset\n\
            \"(A1, Node1*)\",c2|c1,Saturated,gene\n\
            \"(B2, Node1*)\",c1,Saturated,gene\n"
        );
    }

    #[test]
    fn test_summary_into_metadata() {
        let summary = BranchSummary {
            branch: Branch::new("A1", "Node1*"),
            categories: vec![String::from("c2"), String::from("c1")],
            results: vec![String::from(SATURATED)],
            datasets: vec![String::from("gene")],
        };

        let row = MetadataRow::from(summary);

        assert_eq!(row.branch, Branch::new("A1", "Node1*"));
        assert_eq!(
            row.pairs,
            [
                (String::from("category"), String::from("c2|c1")),
                (String::from("result_test"), String::from("Saturated")),
                (String::from("dataset"), String::from("gene")),
            ]
        );
    }
}

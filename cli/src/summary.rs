use std::path::PathBuf;

use anyhow::{Context, Error};

use clap::Parser;

use satz_core::{
    newick::MetadataRow,
    saturation::{summarize, write_summaries, Decision, TestRecord},
    Input,
};

use crate::files;

/// Write the saturated rate categories of each branch onto a tree.
///
/// Branches with at least one saturated rate category are annotated with the distinct saturated
/// categories ('category'), decisions ('result_test'), and dataset name ('dataset'). Multiple
/// values are separated by '|'.
#[derive(Debug, Parser)]
pub struct Summary {
    /// Input saturation test results.
    ///
    /// A CSV file with columns 'branch', 'rate_category', 'decision_test', and
    /// 'decision_bonferroni_corrected', as output by the saturation test. Other columns are
    /// ignored. The dataset name is the file name with all extensions removed. If no file is
    /// provided, stdin will be used.
    #[arg(value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Tree to annotate.
    ///
    /// Either a Newick tree or a NEXUS file with a trees block, in which case the first tree is
    /// annotated.
    #[arg(short = 't', long, value_name = "PATH")]
    pub tree: PathBuf,

    /// Use decisions after Bonferroni correction.
    #[arg(long)]
    pub corrected: bool,

    /// Output the Newick tree wrapped in a NEXUS trees block.
    #[arg(long)]
    pub nexus: bool,

    /// Output path.
    ///
    /// If no path is given, output is written to stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output path for a table of the saturated branches.
    ///
    /// The table has columns 'branch', 'category', 'result_test', and 'dataset', with the same
    /// values as written onto the tree.
    #[arg(long, value_name = "PATH")]
    pub table_output: Option<PathBuf>,
}

impl Summary {
    pub fn run(self) -> Result<(), Error> {
        let input = Input::new(self.input)?;
        let dataset = input.dataset_name();
        let records =
            TestRecord::read_csv(input.open()?).context("failed to read saturation test results")?;

        let decision = if self.corrected {
            Decision::Corrected
        } else {
            Decision::Uncorrected
        };

        let summaries = summarize([(dataset, records.as_slice())], decision);

        if summaries.is_empty() {
            log::info!("No saturated branches using {decision} decisions");
        } else {
            log::info!("Found {} saturated branches", summaries.len());
        }

        if let Some(path) = self.table_output {
            write_summaries(files::writer(Some(path.as_path()))?, &summaries)?;
        }

        let rows = summaries
            .into_iter()
            .map(MetadataRow::from)
            .collect::<Vec<_>>();

        let mut tree = files::read_tree_file(&self.tree)?;
        tree.annotate_rows(&rows)?;

        files::write_tree(files::writer(self.output.as_deref())?, &tree, self.nexus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::parse_subcmd;

    #[test]
    fn test_parse_summary() {
        let args = parse_subcmd::<Summary>("satz summary -t tree.nex --corrected results.csv");

        assert_eq!(args.tree, PathBuf::from("tree.nex"));
        assert!(args.corrected);
        assert_eq!(args.input, Some(PathBuf::from("results.csv")));
        assert_eq!(args.table_output, None);
    }

    #[test]
    fn test_parse_table_output() {
        let args = parse_subcmd::<Summary>("satz summary -t tree.nex --table-output sum.csv");

        assert_eq!(args.table_output, Some(PathBuf::from("sum.csv")));
        assert_eq!(args.input, None);
    }
}

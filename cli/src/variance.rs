use std::path::PathBuf;

use anyhow::Error;

use clap::Parser;

use satz_core::{
    variance::{write_variances, BranchVariance},
    Branch,
};

use crate::files;

/// Compute the rate-heterogeneity aware variance of branches.
#[derive(Debug, Parser)]
pub struct Variance {
    /// Input site records.
    ///
    /// A CSV file with columns 'branch', 'site', 'coherence', 'rate_category', and
    /// 'category_variance', as output by the saturation test. Other columns are ignored.
    /// If no file is provided, stdin will be used.
    #[arg(value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Branches to include.
    ///
    /// By default, all branches in the input are included, sorted. Branches are written as
    /// '(child, parent)' and may be provided multiple times, in which case they are output in the
    /// order given.
    #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
    pub branches: Vec<Branch>,

    /// Output path.
    ///
    /// If no path is given, output is written to stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Precision to use when printing variances.
    #[arg(short = 'p', long, default_value_t = 6, value_name = "INT")]
    pub precision: usize,
}

impl Variance {
    pub fn run(self) -> Result<(), Error> {
        let dataset = files::read_dataset(self.input)?;

        let variances = files::select_branches(&dataset, &self.branches)?
            .iter()
            .map(|sites| BranchVariance::from_sites(dataset.name(), sites))
            .collect::<Vec<_>>();

        write_variances(
            files::writer(self.output.as_deref())?,
            &variances,
            self.precision,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::parse_subcmd;

    #[test]
    fn test_parse_branches() {
        let args = parse_subcmd::<Variance>("satz variance -b (A1,Node1*) -b (B2,Node1*) in.csv");

        assert_eq!(
            args.branches,
            [Branch::new("A1", "Node1*"), Branch::new("B2", "Node1*")]
        );
        assert_eq!(args.precision, 6);
    }
}

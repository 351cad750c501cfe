use std::path::PathBuf;

use anyhow::{Context, Error};

use clap::Parser;

use satz_core::{
    variance::{write_variances, BranchVariance},
    Branch, ScoreTable, WindowScores,
};

use crate::files;

/// Compute centered sliding window scores along branches.
#[derive(Debug, Parser)]
pub struct Window {
    /// Input site records.
    ///
    /// A CSV file with columns 'branch', 'site', 'coherence', 'rate_category', and
    /// 'category_variance', as output by the saturation test. Other columns are ignored.
    /// If no file is provided, stdin will be used.
    #[arg(value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Window size.
    ///
    /// Must be at least one and at most the number of sites of every branch included. Sites near
    /// the ends of a branch without a full window around them are left empty.
    #[arg(short = 'w', long, value_name = "INT")]
    pub window: usize,

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

    /// Output path for the variance of each branch.
    #[arg(long, value_name = "PATH")]
    pub variance_output: Option<PathBuf>,

    /// Precision to use when printing scores.
    #[arg(short = 'p', long, default_value_t = 6, value_name = "INT")]
    pub precision: usize,
}

impl Window {
    pub fn run(self) -> Result<(), Error> {
        let dataset = files::read_dataset(self.input)?;
        let branches = files::select_branches(&dataset, &self.branches)?;

        let scores = branches
            .iter()
            .map(|sites| WindowScores::compute(sites, self.window))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("failed to score dataset '{}'", dataset.name()))?;

        log::info!(
            "Computed window scores of size {} for {} branches",
            self.window,
            scores.len()
        );

        ScoreTable::from_window_scores(&scores).write(
            files::writer(self.output.as_deref())?,
            "site",
            self.precision,
        )?;

        if let Some(path) = self.variance_output {
            let variances = branches
                .iter()
                .map(|sites| BranchVariance::from_sites(dataset.name(), sites))
                .collect::<Vec<_>>();

            write_variances(files::writer(Some(path.as_path()))?, &variances, self.precision)?;
        }

        Ok(())
    }
}

use std::path::PathBuf;

use anyhow::{Context, Error};

use clap::Parser;

use satz_core::{
    difference::{combine_topologies, pairwise_differences, write_differences},
    Input, ScoreTable,
};

use crate::files;

/// Compute pairwise differences of region scores.
///
/// Differences are computed between every pair of branches for each region. Alternatively, the
/// region scores of several topologies can be provided, in which case the differences are
/// computed between every pair of branches across all topologies.
#[derive(Debug, Parser)]
pub struct Diff {
    /// Input region scores.
    ///
    /// A CSV file with a 'region' column followed by one column of scores per branch, as output
    /// by the 'region' subcommand. If no file is provided, stdin will be used.
    #[arg(value_name = "PATH", conflicts_with = "topologies")]
    pub input: Option<PathBuf>,

    /// Region scores of a named topology.
    ///
    /// Provided as 'NAME=PATH', where the file is formatted as for the main input. May be provided
    /// multiple times. Columns are prefixed by the topology name, and only regions present for
    /// all topologies are kept.
    #[arg(
        short = 't',
        long = "topology",
        value_parser = parse_topology,
        value_name = "NAME=PATH"
    )]
    pub topologies: Vec<(String, PathBuf)>,

    /// Output path.
    ///
    /// If no path is given, output is written to stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Precision to use when printing differences.
    #[arg(short = 'p', long, default_value_t = 6, value_name = "INT")]
    pub precision: usize,
}

fn parse_topology(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((String::from(name), PathBuf::from(path)))
        }
        _ => Err(format!("expected 'NAME=PATH', found '{s}'")),
    }
}

impl Diff {
    pub fn run(self) -> Result<(), Error> {
        let table = if self.topologies.is_empty() {
            let input = Input::new(self.input)?;
            ScoreTable::from_reader(input.open()?).context("failed to read region scores")?
        } else {
            let tables = self
                .topologies
                .iter()
                .map(|(name, path)| {
                    ScoreTable::from_reader(files::open(path)?).with_context(|| {
                        format!("failed to read region scores of topology '{name}'")
                    })
                })
                .collect::<Result<Vec<_>, Error>>()?;

            let named = self
                .topologies
                .iter()
                .map(|(name, _)| name.as_str())
                .zip(tables)
                .collect::<Vec<_>>();

            combine_topologies(&named)?
        };

        let differences = pairwise_differences(&table);

        write_differences(
            files::writer(self.output.as_deref())?,
            &differences,
            self.precision,
        )?;

        Ok(())
    }
}

use std::path::PathBuf;

use anyhow::{Context, Error};

use clap::Parser;

use satz_core::{Branch, RegionScores, Regions, ScoreTable, Warnings};

use crate::files;

/// Compute scores over named regions of the alignment.
#[derive(Debug, Parser)]
pub struct Region {
    /// Input site records.
    ///
    /// A CSV file with columns 'branch', 'site', 'coherence', 'rate_category', and
    /// 'category_variance', as output by the saturation test. Other columns are ignored.
    /// If no file is provided, stdin will be used.
    #[arg(value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Region annotation.
    ///
    /// A CSV file with a header line, followed by lines of a one-based site and the name of the
    /// region it belongs to. Regions need not be contiguous, and a site may belong to several
    /// regions.
    #[arg(short = 'a', long, value_name = "PATH")]
    pub annotation: PathBuf,

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

    /// Precision to use when printing scores.
    #[arg(short = 'p', long, default_value_t = 6, value_name = "INT")]
    pub precision: usize,
}

impl Region {
    pub fn run(self) -> Result<(), Error> {
        let regions = Regions::from_path(&self.annotation).with_context(|| {
            format!(
                "failed to read region annotation '{}'",
                self.annotation.display()
            )
        })?;

        log::info!("Read {} regions", regions.len());

        let dataset = files::read_dataset(self.input)?;

        let mut warnings = Warnings::default();
        let scores = files::select_branches(&dataset, &self.branches)?
            .iter()
            .map(|sites| {
                let scores = RegionScores::compute(sites, &regions);
                warnings.extend(scores.missing());
                scores
            })
            .collect::<Vec<_>>();
        warnings.summarize();

        ScoreTable::from_region_scores(&scores).write(
            files::writer(self.output.as_deref())?,
            "region",
            self.precision,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind as ClapErrorKind;

    use crate::tests::{parse_subcmd, try_parse_subcmd};

    #[test]
    fn test_annotation_required() {
        let result = try_parse_subcmd::<Region>("satz region in.csv");

        assert_eq!(
            result.unwrap_err().kind(),
            ClapErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_parse_region() {
        let args = parse_subcmd::<Region>("satz region -a regions.csv -p 3 in.csv");

        assert_eq!(args.annotation, PathBuf::from("regions.csv"));
        assert_eq!(args.precision, 3);
    }
}

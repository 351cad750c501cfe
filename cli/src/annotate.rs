use std::path::PathBuf;

use anyhow::{Context, Error};

use clap::Parser;

use satz_core::newick::MetadataRow;

use crate::files;

/// Write results onto a tree.
///
/// Each row of the results annotates the node below its branch with the other columns of the
/// row, as 'key=value' pairs in a metadata block after the branch length. Existing metadata is
/// kept, and the tree is otherwise output exactly as read.
#[derive(Debug, Parser)]
pub struct Annotate {
    /// Input tree.
    ///
    /// Either a Newick tree or a NEXUS file with a trees block, in which case the first tree is
    /// annotated. If no file is provided, stdin will be used.
    #[arg(value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Results to write onto the tree.
    ///
    /// A CSV file with a 'branch' column, where branches are written as '(child, parent)'. Rows
    /// whose child node is not found in the tree are skipped with a warning.
    #[arg(short = 'r', long, value_name = "PATH")]
    pub results: PathBuf,

    /// Name unlabeled internal nodes before annotating.
    ///
    /// Internal nodes without a name, or with a numeric support value as name, are named
    /// 'Node<k>*' in pre-order, skipping names already present in the tree.
    #[arg(long)]
    pub name_internal: bool,

    /// Output the Newick tree wrapped in a NEXUS trees block.
    #[arg(long)]
    pub nexus: bool,

    /// Output path.
    ///
    /// If no path is given, output is written to stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl Annotate {
    pub fn run(self) -> Result<(), Error> {
        let rows = MetadataRow::read_csv(files::open(&self.results)?).with_context(|| {
            format!("failed to read results '{}'", self.results.display())
        })?;

        let mut tree = files::read_tree(self.input)?;

        if self.name_internal {
            let named = tree.name_internal_nodes()?;
            log::info!("Named {} internal nodes", named.len());
        }

        let summary = tree.annotate_rows(&rows)?;
        log::info!("Annotated {} of {} rows", summary.applied(), rows.len());

        files::write_tree(files::writer(self.output.as_deref())?, &tree, self.nexus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind as ClapErrorKind;

    use crate::tests::{parse_subcmd, try_parse_subcmd};

    #[test]
    fn test_results_required() {
        let result = try_parse_subcmd::<Annotate>("satz annotate tree.nwk");

        assert_eq!(
            result.unwrap_err().kind(),
            ClapErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_parse_annotate() {
        let args = parse_subcmd::<Annotate>("satz annotate -r res.csv --name-internal tree.nwk");

        assert_eq!(args.results, PathBuf::from("res.csv"));
        assert!(args.name_internal);
        assert!(!args.nexus);
    }
}

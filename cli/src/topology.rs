use std::{io::Write as _, path::PathBuf};

use anyhow::Error;

use clap::Parser;

use satz_core::{newick, Input};

use crate::files;

/// Extract the Newick tree from a tree file.
#[derive(Debug, Parser)]
pub struct Topology {
    /// Input tree.
    ///
    /// Either a Newick tree or a NEXUS file with a trees block, in which case the first tree is
    /// used. If no file is provided, stdin will be used.
    #[arg(value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Remove all metadata blocks from the tree.
    #[arg(long)]
    pub plain: bool,

    /// Output path.
    ///
    /// If no path is given, output is written to stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl Topology {
    pub fn run(self) -> Result<(), Error> {
        let text = Input::new(self.input)?.read_to_string()?;

        let newick = newick::extract(&text, self.plain)?;

        let mut writer = files::writer(self.output.as_deref())?;
        writeln!(writer, "{newick}")?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::parse_subcmd;

    #[test]
    fn test_parse_plain() {
        let args = parse_subcmd::<Topology>("satz topology --plain tree.nex");

        assert!(args.plain);
        assert_eq!(args.input, Some(PathBuf::from("tree.nex")));
    }
}

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Error};

use satz_core::{
    newick::{nexus, Tree},
    Branch, BranchSites, Dataset, Input,
};

/// Reads the site records of a dataset from a path or stdin.
pub fn read_dataset(path: Option<PathBuf>) -> Result<Dataset, Error> {
    let input = Input::new(path)?;
    let name = input.dataset_name();

    let dataset = Dataset::from_reader(name.clone(), input.open()?)
        .with_context(|| format!("failed to read site records of dataset '{name}'"))?;

    log::info!(
        "Read {} site records of {} branches from dataset '{}'",
        dataset.records().len(),
        dataset.branches().len(),
        dataset.name()
    );

    Ok(dataset)
}

/// Returns the sites of the requested branches of a dataset, or of all branches if none are
/// requested.
pub fn select_branches(dataset: &Dataset, branches: &[Branch]) -> Result<Vec<BranchSites>, Error> {
    if branches.is_empty() {
        return Ok(dataset.split_branches());
    }

    branches
        .iter()
        .map(|branch| {
            dataset
                .branch(branch)
                .with_context(|| format!("branch {branch} not found in dataset '{}'", dataset.name()))
        })
        .collect()
}

/// Opens a file for reading.
pub fn open<P>(path: P) -> Result<io::BufReader<File>, Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    File::open(path)
        .map(io::BufReader::new)
        .with_context(|| format!("failed to open file '{}'", path.display()))
}

/// Returns a writer to the provided path, or to stdout if no path is provided.
pub fn writer(path: Option<&Path>) -> Result<Box<dyn io::Write>, Error> {
    Ok(match path {
        Some(path) => Box::new(io::BufWriter::new(File::create(path).with_context(|| {
            format!("failed to create output file '{}'", path.display())
        })?)),
        None => Box::new(io::stdout().lock()),
    })
}

/// Reads a tree from a path or stdin.
pub fn read_tree(path: Option<PathBuf>) -> Result<Tree, Error> {
    let input = Input::new(path)?;
    let text = input.read_to_string()?;

    Tree::parse(text).map_err(Error::from)
}

/// Reads a tree from a file.
pub fn read_tree_file(path: &Path) -> Result<Tree, Error> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tree '{}'", path.display()))?;

    Tree::parse(text).map_err(Error::from)
}

/// Writes a tree, either as the full text read or wrapped in a NEXUS trees block.
pub fn write_tree<W>(mut writer: W, tree: &Tree, nexus: bool) -> Result<(), Error>
where
    W: io::Write,
{
    if nexus {
        nexus::write_nexus(&mut writer, tree.newick())?;
    } else {
        let text = tree.as_str();
        writer.write_all(text.as_bytes())?;

        if !text.ends_with('\n') {
            writeln!(writer)?;
        }
    }

    writer.flush()?;

    Ok(())
}

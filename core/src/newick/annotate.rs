use std::{fmt, io};

use crate::{
    error::InvalidInput,
    missing::{MissingData, Warnings},
    Branch, Error,
};

use super::{NodeId, Tree};

/// The outcome of annotating a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use]
pub enum Annotated {
    /// The node was found and annotated.
    Applied(NodeId),
    /// No node with the name and a branch length was found, and the tree is unchanged.
    Missed,
}

impl Tree {
    /// Adds metadata to the node with the provided name.
    ///
    /// The metadata is written as comma-separated `key=value` pairs in a `[...]` block directly
    /// after the branch length of the node. If such a block already exists, the pairs are
    /// appended to it; existing pairs are never replaced or deduplicated. Only nodes with a branch
    /// length can be annotated.
    ///
    /// # Errors
    ///
    /// If more than one node has the provided name, or if a key or value contains a square
    /// bracket. The tree is unchanged in either case.
    pub fn annotate<I, K, V>(&mut self, name: &str, pairs: I) -> Result<Annotated, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
        V: fmt::Display,
    {
        let Some(id) = self.find(name)? else {
            return Ok(Annotated::Missed);
        };
        let Some(length) = self.node(id).length.clone() else {
            return Ok(Annotated::Missed);
        };

        let pairs = pairs
            .into_iter()
            .map(|(k, v)| {
                let (k, v) = (k.to_string(), v.to_string());
                check_metadata_text(&k)?;
                check_metadata_text(&v)?;
                Ok(format!("{k}={v}"))
            })
            .collect::<Result<Vec<_>, Error>>()?
            .join(",");

        if pairs.is_empty() {
            return Ok(Annotated::Applied(id));
        }

        match self.node(id).metadata.clone() {
            Some(block) => {
                let close = block.end - 1;
                let content = &self.text[block.start + 1..close];

                let insertion = if content.trim().is_empty() {
                    pairs
                } else {
                    format!(",{pairs}")
                };

                self.splice(close..close, &insertion);
                self.nodes[id.0].metadata = Some(block.start..block.end + insertion.len());
            }
            None => {
                let block = format!("[{pairs}]");
                let start = length.end;

                self.splice(start..start, &block);
                self.nodes[id.0].metadata = Some(start..start + block.len());
            }
        }

        log::trace!("Annotated node '{name}'");

        Ok(Annotated::Applied(id))
    }

    /// Annotates the tree with rows of metadata, in order.
    ///
    /// Each row annotates the child node of its branch. Rows whose node is not found are skipped
    /// and reported.
    ///
    /// # Errors
    ///
    /// If the child node of a branch occurs more than once in the tree.
    pub fn annotate_rows<'a, I>(&mut self, rows: I) -> Result<AnnotationSummary, Error>
    where
        I: IntoIterator<Item = &'a MetadataRow>,
    {
        let mut summary = AnnotationSummary::default();

        for row in rows {
            let pairs = row.pairs.iter().map(|(k, v)| (k, v));

            match self.annotate(row.branch.child(), pairs)? {
                Annotated::Applied(_) => summary.applied += 1,
                Annotated::Missed => summary.warnings.warn_once(MissingData::MissingNode {
                    branch: row.branch.clone(),
                }),
            }
        }

        summary.warnings.summarize();

        Ok(summary)
    }
}

fn check_metadata_text(text: &str) -> Result<(), Error> {
    if text.contains(['[', ']']) {
        Err(InvalidInput::MetadataText {
            text: String::from(text),
        }
        .into())
    } else {
        Ok(())
    }
}

/// The result of annotating a tree with several rows of metadata.
#[derive(Clone, Debug, Default)]
pub struct AnnotationSummary {
    applied: usize,
    warnings: Warnings,
}

impl AnnotationSummary {
    /// Returns the number of rows applied.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Returns the rows whose node was not found.
    pub fn missing(&self) -> &[MissingData] {
        self.warnings.missing()
    }
}

/// Metadata for the child node of a branch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetadataRow {
    /// Branch annotated.
    pub branch: Branch,
    /// Key-value pairs, in order.
    pub pairs: Vec<(String, String)>,
}

impl MetadataRow {
    /// Creates a new row.
    pub fn new(branch: Branch, pairs: Vec<(String, String)>) -> Self {
        Self { branch, pairs }
    }

    /// Reads rows from a CSV reader.
    ///
    /// The CSV must have a `branch` column. Every other column becomes a key-value pair, keyed by
    /// the column name, in column order.
    pub fn read_csv<R>(reader: R) -> Result<Vec<Self>, Error>
    where
        R: io::Read,
    {
        const BRANCH: &str = "branch";

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let branch_column = headers.iter().position(|h| h == BRANCH).ok_or_else(|| {
            InvalidInput::MissingColumn {
                column: String::from(BRANCH),
            }
        })?;

        reader
            .into_records()
            .map(|record| -> Result<Self, Error> {
                let record = record?;

                let branch = record
                    .get(branch_column)
                    .unwrap_or_default()
                    .parse::<Branch>()?;

                let pairs = headers
                    .iter()
                    .zip(record.iter())
                    .enumerate()
                    .filter(|(i, _)| *i != branch_column)
                    .map(|(_, (k, v))| (String::from(k), String::from(v)))
                    .collect();

                Ok(Self::new(branch, pairs))
            })
            .collect()
    }
}

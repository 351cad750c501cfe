//! Errors.

use std::{fmt, io};

use crate::{branch::ParseBranchError, newick::ParseError, Branch};

/// An error associated with computing or rendering saturation scores.
#[derive(Debug)]
pub enum Error {
    /// Input that violates the preconditions of a computation.
    InvalidInput(InvalidInput),
    /// A node name occurs more than once in a tree.
    DuplicateNodeName {
        /// The duplicated name.
        name: String,
    },
    /// Tree text could not be parsed.
    ParseTree(ParseError),
    /// I/O error.
    Io(io::Error),
    /// CSV error.
    Csv(csv::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(e) => write!(f, "invalid input: {e}"),
            Error::DuplicateNodeName { name } => write!(f, "duplicate node name '{name}' in tree"),
            Error::ParseTree(e) => write!(f, "{e}"),
            Error::Io(e) => write!(f, "{e}"),
            Error::Csv(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<InvalidInput> for Error {
    fn from(e: InvalidInput) -> Self {
        Self::InvalidInput(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::ParseTree(e)
    }
}

impl From<ParseBranchError> for Error {
    fn from(e: ParseBranchError) -> Self {
        Self::InvalidInput(InvalidInput::Branch(e))
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

/// Input rejected before any computation took place.
#[derive(Debug)]
pub enum InvalidInput {
    /// No site records were provided for a branch.
    NoSites,
    /// Site records from more than one branch were provided where a single branch is required.
    MixedBranches {
        /// The distinct branches found, in order of first appearance.
        branches: Vec<Branch>,
    },
    /// Window size is zero or exceeds the number of sites.
    WindowSize {
        /// Requested window size.
        window: usize,
        /// Number of sites available for the branch.
        sites: usize,
        /// The branch scored.
        branch: Branch,
    },
    /// A branch identifier could not be parsed.
    Branch(ParseBranchError),
    /// A required column is missing from a table.
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },
    /// A table row has the wrong number of values.
    RowLength {
        /// Label of the row.
        row: String,
        /// Number of columns in the table.
        expected: usize,
        /// Number of values in the row.
        actual: usize,
    },
    /// A row label occurs more than once in a table.
    DuplicateRow {
        /// Label of the row.
        row: String,
    },
    /// A metadata key or value contains a bracket, which would end or nest the metadata block.
    MetadataText {
        /// The offending key or value.
        text: String,
    },
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::NoSites => f.write_str("no site records for branch"),
            InvalidInput::MixedBranches { branches } => {
                let branches = branches
                    .iter()
                    .map(|branch| branch.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");

                write!(f, "expected data for a single branch, found branches {branches}")
            }
            InvalidInput::WindowSize {
                window,
                sites,
                branch,
            } => write!(
                f,
                "window size {window} out of range for branch {branch} with {sites} sites"
            ),
            InvalidInput::Branch(e) => write!(f, "{e}"),
            InvalidInput::MissingColumn { column } => write!(f, "missing column '{column}'"),
            InvalidInput::RowLength {
                row,
                expected,
                actual,
            } => write!(
                f,
                "row '{row}' has {actual} values, expected {expected} values"
            ),
            InvalidInput::DuplicateRow { row } => write!(f, "duplicate row '{row}' in table"),
            InvalidInput::MetadataText { text } => {
                write!(f, "metadata '{text}' must not contain '[' or ']'")
            }
        }
    }
}

impl std::error::Error for InvalidInput {}

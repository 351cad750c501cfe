//! Soft misses.
//!
//! Some inputs legitimately fail to line up: a region may not cover any site present for a
//! branch, and a result table may name a node that does not occur in a tree. These are not errors;
//! the affected value is left undefined or the row is skipped, and the miss is reported through
//! the log.

use std::fmt;

use crate::Branch;

/// Missing data encountered while scoring or annotating.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MissingData {
    /// None of the sites of a region are present for a branch.
    EmptyRegion {
        /// Region name.
        region: String,
        /// Branch scored.
        branch: Branch,
    },
    /// The node below a branch does not occur in the tree, or has no branch length.
    MissingNode {
        /// Branch whose child node was looked up.
        branch: Branch,
    },
}

impl MissingData {
    fn kind(&self) -> Kind {
        match self {
            MissingData::EmptyRegion { .. } => Kind::EmptyRegion,
            MissingData::MissingNode { .. } => Kind::MissingNode,
        }
    }
}

impl fmt::Display for MissingData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingData::EmptyRegion { region, branch } => {
                write!(f, "region '{region}' has no sites on branch {branch}")
            }
            MissingData::MissingNode { branch } => write!(
                f,
                "node '{}' of branch {branch} not found in tree",
                branch.child()
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
enum Kind {
    EmptyRegion,
    MissingNode,
}

impl Kind {
    const N: usize = 2;
    const VARIANTS: [Kind; Self::N] = [Kind::EmptyRegion, Kind::MissingNode];

    fn consequence(&self) -> &'static str {
        match self {
            Kind::EmptyRegion => "Score left undefined",
            Kind::MissingNode => "Row skipped",
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Kind::EmptyRegion => "regions without sites on their branch",
            Kind::MissingNode => "result rows whose node was not found in the tree",
        }
    }
}

/// Collects missing data, logging the first miss of each kind and a summary at the end.
#[derive(Clone, Debug, Default)]
pub struct Warnings {
    counts: [usize; Kind::N],
    missing: Vec<MissingData>,
}

impl Warnings {
    /// Records missing data.
    pub fn warn_once(&mut self, missing: MissingData) {
        let kind = missing.kind();

        let consequence = kind.consequence();

        if self.counts[kind as usize] == 0 {
            log::warn!(
                "Missing data: {missing}. {consequence}. \
                This warning will be shown only once, with a summary at the end."
            );
        } else {
            log::debug!("Missing data: {missing}. {consequence}.");
        }

        self.counts[kind as usize] += 1;
        self.missing.push(missing);
    }

    /// Returns the missing data recorded so far, in order.
    pub fn missing(&self) -> &[MissingData] {
        &self.missing
    }

    /// Returns `true` if no missing data was recorded.
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    /// Logs the number of misses of each kind.
    pub fn summarize(&self) {
        for kind in Kind::VARIANTS {
            let count = self.counts[kind as usize];

            if count > 0 {
                let reason = kind.reason();

                log::warn!("Found {count} {reason}.");
            }
        }
    }
}

impl Extend<MissingData> for Warnings {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = MissingData>,
    {
        for missing in iter {
            self.warn_once(missing);
        }
    }
}

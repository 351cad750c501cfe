#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Tools for working with branch saturation scores.
//!
//! This serves as the core library implementation for the `satz` CLI, but can also be used as a
//! free-standing library for scoring the output of a saturation test and writing scores back
//! onto trees.
//!
//! # Overview
//!
//! The saturation test reports, per branch of a tree and per alignment site, a *coherence*
//! value together with the rate category of the site. The site records of one run are a
//! [`Dataset`], which splits into the [`BranchSites`] of each branch. From these, the
//! [`variance`] of a branch is a mixture over its rate categories, and the [`score`] module
//! normalizes coherence by this variance, either over a sliding [`WindowScores`] or over named
//! [`Regions`] of the alignment. Scores of several branches are collected in a [`ScoreTable`],
//! and can be compared with the [`difference`] module.
//!
//! Finally, the [`newick`] module writes results onto a tree, preserving everything else about
//! the tree text as is.
//!
//! # Example
//!
//! As a very brief introduction to the API, let's score two sites of a branch over a window,
//! and write the variance of the branch onto a tree.
//!
//! ```
//! use satz_core::{newick::Tree, Dataset};
//!
//! let csv = "\
//! branch,site,coherence,rate_category,category_variance
//! \"(A1, Node1*)\",1,1.0,c1,2.0
//! \"(A1, Node1*)\",2,0.5,c2,4.0
//! ";
//!
//! let dataset = Dataset::from_reader("gene", csv.as_bytes())?;
//! let sites = &dataset.split_branches()[0];
//!
//! // The variance mixes the two categories with equal weight
//! assert_eq!(sites.variance(), 3.0);
//!
//! let mut tree = Tree::parse("(A1:0.1,B2:0.2)Node1*;")?;
//! let _ = tree.annotate(sites.branch().child(), [("variance", sites.variance())])?;
//!
//! assert_eq!(tree.as_str(), "(A1:0.1[variance=3],B2:0.2)Node1*;");
//! # Ok::<(), satz_core::Error>(())
//! ```

#[cfg(test)]
#[macro_use]
pub(crate) mod approx;

pub mod branch;
pub use branch::Branch;

pub mod difference;
pub use difference::Difference;

pub mod error;
pub use error::Error;

pub mod input;
pub use input::Input;

pub mod missing;
pub use missing::{MissingData, Warnings};

pub mod newick;

pub mod region;
pub use region::Regions;

pub mod saturation;

pub mod score;
pub use score::{RegionScores, WindowScores};

pub mod sites;
pub use sites::{BranchSites, Dataset, SiteRecord};

pub mod table;
pub use table::ScoreTable;

pub mod variance;

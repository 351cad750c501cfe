//! Named regions of an alignment.

use std::{fs::File, io, path::Path};

use indexmap::{IndexMap, IndexSet};

use crate::Error;

/// Named sets of alignment sites, in order of first appearance.
///
/// Regions need not be contiguous and may overlap.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Regions(IndexMap<String, IndexSet<usize>>);

impl Regions {
    /// Reads regions from an annotation file.
    ///
    /// See [`Regions::from_reader`] for the format.
    pub fn from_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        Self::from_reader(File::open(path)?)
    }

    /// Reads regions from an annotation reader.
    ///
    /// The annotation has a single header line, followed by comma-separated lines of a site and
    /// the name of the region it belongs to. Region names may be quoted.
    pub fn from_reader<R>(reader: R) -> Result<Self, Error>
    where
        R: io::Read,
    {
        let mut regions = Self::default();

        for record in csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_records()
        {
            let record = record?;

            let (Some(site), Some(name)) = (record.get(0), record.get(1)) else {
                return Err(invalid_data(format!(
                    "expected site and region name in annotation line '{}'",
                    record.iter().collect::<Vec<_>>().join(",")
                )));
            };

            let site = site
                .parse::<usize>()
                .map_err(|_| invalid_data(format!("invalid site '{site}' in annotation")))?;

            regions.insert(name.trim_matches('"'), site);
        }

        Ok(regions)
    }

    /// Adds a site to a region, creating the region if necessary.
    pub fn insert<S>(&mut self, name: S, site: usize)
    where
        S: Into<String>,
    {
        self.0.entry(name.into()).or_default().insert(site);
    }

    /// Returns the sites of a region, if the region exists.
    pub fn get(&self, name: &str) -> Option<&IndexSet<usize>> {
        self.0.get(name)
    }

    /// Returns an iterator over region names and their sites.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<usize>)> {
        self.0.iter().map(|(name, sites)| (name.as_str(), sites))
    }

    /// Returns the region names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the number of regions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no regions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S> FromIterator<(S, usize)> for Regions
where
    S: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
    {
        let mut regions = Self::default();
        for (name, site) in iter {
            regions.insert(name, site);
        }
        regions
    }
}

fn invalid_data(msg: String) -> Error {
    Error::Io(io::Error::new(io::ErrorKind::InvalidData, msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_annotation() {
        let src = b"site,region_name\n1,\"stem\"\n2,stem\n3,loop\n5,stem\n";

        let regions = Regions::from_reader(&src[..]).unwrap();

        assert_eq!(regions.names().collect::<Vec<_>>(), ["stem", "loop"]);
        assert_eq!(
            regions.get("stem").unwrap().iter().copied().collect::<Vec<_>>(),
            [1, 2, 5]
        );
        assert_eq!(
            regions.get("loop").unwrap().iter().copied().collect::<Vec<_>>(),
            [3]
        );
    }

    #[test]
    fn test_read_annotation_invalid_site() {
        let src = b"site,region_name\none,stem\n";

        assert!(matches!(Regions::from_reader(&src[..]), Err(Error::Io(_))));
    }

    #[test]
    fn test_overlapping_regions() {
        let regions = Regions::from_iter([("a", 1), ("b", 1), ("a", 2), ("a", 1)]);

        assert_eq!(regions.len(), 2);
        assert_eq!(regions.get("a").unwrap().len(), 2);
        assert!(regions.get("b").unwrap().contains(&1));
    }
}

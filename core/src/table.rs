//! Tables of scores.
//!
//! A score table has one labeled row per site or region, and one column per branch (or
//! topology). Undefined values are NaN in memory and empty fields in CSV.

use std::{collections::BTreeMap, io};

use indexmap::IndexMap;

use crate::{
    error::InvalidInput,
    score::{RegionScores, WindowScores},
    Error,
};

/// A table of scores with labeled rows and columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreTable {
    columns: Vec<String>,
    rows: IndexMap<String, Vec<f64>>,
}

impl ScoreTable {
    /// Creates a new table with the provided columns and no rows.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: IndexMap::new(),
        }
    }

    /// Creates a table of region scores, with one column per branch.
    ///
    /// Rows follow the region order of the first branch; regions missing for a branch are NaN.
    pub fn from_region_scores(scores: &[RegionScores]) -> Self {
        let columns = scores.iter().map(|s| s.branch().to_string()).collect();
        let mut table = Self::new(columns);

        for (column, branch_scores) in scores.iter().enumerate() {
            for (region, score) in branch_scores.iter() {
                table.row_mut(region)[column] = score;
            }
        }

        table
    }

    /// Creates a table of window scores, with one column per branch.
    ///
    /// Rows are the sites of any branch, in increasing order; sites missing for a branch are NaN.
    pub fn from_window_scores(scores: &[WindowScores]) -> Self {
        let mut sites = BTreeMap::<usize, Vec<f64>>::new();

        for (column, branch_scores) in scores.iter().enumerate() {
            for (site, score) in branch_scores.iter() {
                sites.entry(site).or_insert_with(|| vec![f64::NAN; scores.len()])[column] = score;
            }
        }

        Self {
            columns: scores.iter().map(|s| s.branch().to_string()).collect(),
            rows: sites
                .into_iter()
                .map(|(site, values)| (site.to_string(), values))
                .collect(),
        }
    }

    /// Reads a table from CSV.
    ///
    /// The first column holds row labels and the remaining columns hold scores. Empty fields are
    /// read as NaN.
    pub fn from_reader<R>(reader: R) -> Result<Self, Error>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = reader
            .headers()?
            .iter()
            .skip(1)
            .map(String::from)
            .collect::<Vec<_>>();

        let mut table = Self::new(columns);

        for record in reader.into_records() {
            let record = record?;
            let label = record.get(0).unwrap_or_default();

            let values = record
                .iter()
                .skip(1)
                .map(parse_score)
                .collect::<Result<Vec<_>, _>>()?;

            table.push_row(label, values)?;
        }

        Ok(table)
    }

    /// Writes the table as CSV, with `key` as the header of the label column.
    pub fn write<W>(&self, writer: W, key: &str, precision: usize) -> Result<(), Error>
    where
        W: io::Write,
    {
        let mut writer = csv::Writer::from_writer(writer);

        writer.write_record(std::iter::once(key).chain(self.columns.iter().map(String::as_str)))?;

        for (label, values) in self.rows.iter() {
            writer.write_record(
                std::iter::once(label.clone())
                    .chain(values.iter().map(|&x| format_score(x, precision))),
            )?;
        }

        writer.flush()?;

        Ok(())
    }

    /// Returns the column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the value at a row and column, if both exist.
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let column = self.column_index(column)?;
        self.rows.get(row).map(|values| values[column])
    }

    /// Returns the values of a row, if the row exists.
    pub fn row(&self, label: &str) -> Option<&[f64]> {
        self.rows.get(label).map(Vec::as_slice)
    }

    /// Returns an iterator over row labels and values, in row order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.rows
            .iter()
            .map(|(label, values)| (label.as_str(), values.as_slice()))
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Adds a row to the table.
    ///
    /// # Errors
    ///
    /// If the number of values does not match the number of columns, or if the table already has
    /// a row with the same label.
    pub fn push_row<S>(&mut self, label: S, values: Vec<f64>) -> Result<(), Error>
    where
        S: Into<String>,
    {
        let label = label.into();

        if self.rows.contains_key(&label) {
            return Err(InvalidInput::DuplicateRow { row: label }.into());
        }

        if values.len() != self.columns.len() {
            return Err(InvalidInput::RowLength {
                row: label,
                expected: self.columns.len(),
                actual: values.len(),
            }
            .into());
        }

        self.rows.insert(label, values);

        Ok(())
    }

    fn row_mut(&mut self, label: &str) -> &mut Vec<f64> {
        let width = self.columns.len();

        self.rows
            .entry(String::from(label))
            .or_insert_with(|| vec![f64::NAN; width])
    }
}

/// Formats a score with the provided precision, writing undefined scores as an empty string.
pub fn format_score(x: f64, precision: usize) -> String {
    if x.is_nan() {
        String::new()
    } else {
        format!("{x:.precision$}")
    }
}

fn parse_score(s: &str) -> Result<f64, Error> {
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("na") {
        Ok(f64::NAN)
    } else {
        s.parse::<f64>().map_err(|_| {
            Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to parse '{s}' as score"),
            ))
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use crate::{
        region::Regions,
        sites::{tests::record, BranchSites},
    };

    pub(crate) fn table(columns: &[&str], rows: &[(&str, &[f64])]) -> ScoreTable {
        let mut table = ScoreTable::new(columns.iter().map(|&c| String::from(c)).collect());
        for (label, values) in rows {
            table.push_row(*label, values.to_vec()).unwrap();
        }
        table
    }

    #[test]
    fn test_read_table() {
        let src = b"region,\"(A1, Node1*)\",\"(B2, Node1*)\"\nstem,1.5,\nloop,-2,0.25\n";

        let table = ScoreTable::from_reader(&src[..]).unwrap();

        assert_eq!(table.columns(), ["(A1, Node1*)", "(B2, Node1*)"].map(String::from));
        assert_eq!(table.get("stem", "(A1, Node1*)"), Some(1.5));
        assert!(table.get("stem", "(B2, Node1*)").unwrap().is_nan());
        assert_eq!(table.get("loop", "(A1, Node1*)"), Some(-2.0));
        assert_eq!(table.get("loop", "(C3, Node2*)"), None);
    }

    #[test]
    fn test_write_table() {
        let table = table(&["(A1, Node1*)", "x"], &[("1", &[0.5, f64::NAN]), ("2", &[-1.0, 2.0])]);

        let mut dest = Vec::new();
        table.write(&mut dest, "site", 2).unwrap();

        assert_eq!(
            String::from_utf8(dest).unwrap(),
            "site,\"(A1, Node1*)\",x\n1,0.50,\n2,-1.00,2.00\n"
        );
    }

    #[test]
    fn test_push_row_length_mismatch() {
        let mut table = ScoreTable::new(vec![String::from("a")]);

        assert!(table.push_row("r", vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_push_row_duplicate_label() {
        let mut table = table(&["a"], &[("stem", &[1.0])]);

        assert!(matches!(
            table.push_row("stem", vec![2.0]),
            Err(Error::InvalidInput(InvalidInput::DuplicateRow { row })) if row == "stem"
        ));
        assert_eq!(table.get("stem", "a"), Some(1.0));
    }

    #[test]
    fn test_read_table_duplicate_label() {
        let src = b"region,a\nstem,1.0\nloop,2.0\nstem,3.0\n";

        assert!(matches!(
            ScoreTable::from_reader(&src[..]),
            Err(Error::InvalidInput(InvalidInput::DuplicateRow { .. }))
        ));
    }

    #[test]
    fn test_from_window_scores_union_of_sites() {
        let a = BranchSites::new(vec![
            record("(A1, Node1*)", 1, 1.0, "c1"),
            record("(A1, Node1*)", 2, 1.0, "c1"),
        ])
        .unwrap();
        let b = BranchSites::new(vec![
            record("(B2, Node1*)", 2, 1.0, "c1"),
            record("(B2, Node1*)", 3, 1.0, "c1"),
        ])
        .unwrap();

        let scores = [
            WindowScores::compute(&a, 1).unwrap(),
            WindowScores::compute(&b, 1).unwrap(),
        ];
        let table = ScoreTable::from_window_scores(&scores);

        assert_eq!(table.rows().map(|(site, _)| site).collect::<Vec<_>>(), ["1", "2", "3"]);
        assert!(table.get("1", "(B2, Node1*)").unwrap().is_nan());
        assert!(table.get("3", "(A1, Node1*)").unwrap().is_nan());
        assert!(table.get("2", "(B2, Node1*)").unwrap().is_finite());
    }

    #[test]
    fn test_from_region_scores() {
        let regions = Regions::from_iter([("stem", 1), ("loop", 2)]);
        let a = BranchSites::new(vec![record("(A1, Node1*)", 1, 2.0, "c1")]).unwrap();
        let b = BranchSites::new(vec![record("(B2, Node1*)", 2, 2.0, "c1")]).unwrap();

        let table = ScoreTable::from_region_scores(&[
            RegionScores::compute(&a, &regions),
            RegionScores::compute(&b, &regions),
        ]);

        assert_eq!(table.columns(), ["(A1, Node1*)", "(B2, Node1*)"].map(String::from));
        assert_eq!(table.rows().map(|(r, _)| r).collect::<Vec<_>>(), ["stem", "loop"]);
        assert_approx_eq!(table.get("stem", "(A1, Node1*)").unwrap(), 2.0 / 2.0f64.sqrt());
        assert!(table.get("loop", "(A1, Node1*)").unwrap().is_nan());
    }
}

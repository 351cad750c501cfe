//! Differences of scores between branches and between topologies.

use std::io;

use crate::{table::format_score, table::ScoreTable, Error};

/// The difference between the scores of two columns in one row.
#[derive(Clone, Debug, PartialEq)]
pub struct Difference {
    /// Row label, usually a region name.
    pub region: String,
    /// Score of the first column minus the score of the second.
    pub difference: f64,
    /// First column.
    pub one: String,
    /// Second column.
    pub two: String,
}

/// Returns the differences between every pair of columns, for every row.
///
/// Rows are visited in table order. Within a row, columns are sorted by name and each unordered
/// pair is visited once, with the earlier column first, so the result does not depend on the
/// order of the columns in the table.
pub fn pairwise_differences(table: &ScoreTable) -> Vec<Difference> {
    let mut columns = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect::<Vec<_>>();
    columns.sort();

    let mut differences = Vec::new();

    for (region, values) in table.rows() {
        for (k, &(one, i)) in columns.iter().enumerate() {
            for &(two, j) in columns[k + 1..].iter() {
                differences.push(Difference {
                    region: String::from(region),
                    difference: values[i] - values[j],
                    one: String::from(one),
                    two: String::from(two),
                });
            }
        }
    }

    log::debug!(
        "Computed {} differences between {} columns over {} rows",
        differences.len(),
        columns.len(),
        table.len()
    );

    differences
}

/// Combines score tables of several topologies into one.
///
/// Each column is prefixed by the name of its topology as `<topology>_<column>`. Only rows
/// present in all tables are kept, in the order of the first table.
pub fn combine_topologies<S>(tables: &[(S, ScoreTable)]) -> Result<ScoreTable, Error>
where
    S: AsRef<str>,
{
    let columns = tables
        .iter()
        .flat_map(|(topology, table)| {
            table
                .columns()
                .iter()
                .map(move |column| format!("{}_{column}", topology.as_ref()))
        })
        .collect();

    let mut combined = ScoreTable::new(columns);

    let Some(((_, first), rest)) = tables.split_first() else {
        return Ok(combined);
    };

    'rows: for (region, values) in first.rows() {
        let mut row = values.to_vec();

        for (_, table) in rest.iter() {
            match table.row(region) {
                Some(values) => row.extend_from_slice(values),
                None => continue 'rows,
            }
        }

        combined.push_row(region, row)?;
    }

    if combined.len() < first.len() {
        log::info!(
            "Dropped {} rows not present in all topologies",
            first.len() - combined.len()
        );
    }

    Ok(combined)
}

/// Writes differences as CSV.
///
/// The columns are `region`, `zscore_difference`, `branch_one`, and `branch_two`.
pub fn write_differences<W>(
    writer: W,
    differences: &[Difference],
    precision: usize,
) -> Result<(), Error>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(["region", "zscore_difference", "branch_one", "branch_two"])?;

    for difference in differences {
        writer.write_record([
            difference.region.as_str(),
            format_score(difference.difference, precision).as_str(),
            difference.one.as_str(),
            difference.two.as_str(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

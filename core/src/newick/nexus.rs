//! NEXUS containers.

use std::io;

use super::ParseError;

const BEGIN_TREES: &str = "BEGIN TREES;";
const END: &str = "END;";

/// Returns the start of the first Newick tree in the text.
///
/// If the text has a NEXUS trees block, the tree is searched for in that block, otherwise
/// anywhere in the text. The tree starts at the first opening parenthesis.
pub(super) fn locate(text: &str) -> Result<usize, ParseError> {
    // ASCII case folding keeps byte offsets intact
    let upper = text.to_ascii_uppercase();

    let section = match upper.find(BEGIN_TREES) {
        Some(begin) => {
            let start = begin + BEGIN_TREES.len();
            let end = upper[start..]
                .find(END)
                .map_or(text.len(), |offset| start + offset);

            start..end
        }
        None => 0..text.len(),
    };

    text[section.clone()]
        .find('(')
        .map(|offset| section.start + offset)
        .ok_or_else(|| ParseError::new(section.start, "no tree found"))
}

/// Writes a Newick tree wrapped in a minimal NEXUS trees block.
pub fn write_nexus<W>(mut writer: W, newick: &str) -> io::Result<()>
where
    W: io::Write,
{
    writer.write_all(to_nexus(newick).as_bytes())
}

/// Returns a Newick tree wrapped in a minimal NEXUS trees block.
pub fn to_nexus(newick: &str) -> String {
    format!("#NEXUS\n{BEGIN_TREES}\nTree tree1 = {newick}\nEND TREES;\n")
}

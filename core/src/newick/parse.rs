use std::{error, fmt, ops::Range};

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::recognize,
    multi::many0,
    number::complete::recognize_float,
    sequence::{delimited, tuple},
    IResult,
};

use super::{Node, NodeId};

/// An error parsing a Newick tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    position: usize,
    message: String,
}

impl ParseError {
    pub(crate) fn new<S>(position: usize, message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            position,
            message: message.into(),
        }
    }

    /// Returns the byte offset in the text at which parsing failed.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to parse tree at position {}: {}",
            self.position, self.message
        )
    }
}

impl error::Error for ParseError {}

/// Parses the tree starting at `start`, returning its nodes in pre-order and the end of the tree.
///
/// The end is the position just past the terminating semicolon.
pub(super) fn parse(text: &str, start: usize) -> Result<(Vec<Node>, usize), ParseError> {
    let mut parser = Parser {
        text,
        rest: &text[start..],
        nodes: Vec::new(),
    };

    parser.tree()?;
    parser.skip_comments();
    parser.expect(';')?;

    let end = parser.position();

    Ok((parser.nodes, end))
}

struct Parser<'a> {
    text: &'a str,
    rest: &'a str,
    nodes: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn position(&self) -> usize {
        self.text.len() - self.rest.len()
    }

    fn error<S>(&self, message: S) -> ParseError
    where
        S: Into<String>,
    {
        ParseError::new(self.position(), message)
    }

    /// Runs a token parser, returning the span of its match.
    fn token<F>(&mut self, mut f: F) -> Option<Range<usize>>
    where
        F: FnMut(&'a str) -> IResult<&'a str, &'a str>,
    {
        let start = self.position();
        let (rest, _) = f(self.rest).ok()?;
        self.rest = rest;
        Some(start..self.position())
    }

    fn skip_whitespace(&mut self) {
        self.token(multispace0);
    }

    fn skip_comments(&mut self) {
        self.skip_whitespace();
        while self.token(metadata).is_some() {
            self.skip_whitespace();
        }
    }

    fn expect(&mut self, c: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        self.token(|s| recognize(char(c))(s))
            .map(|_| ())
            .ok_or_else(|| self.error(format!("expected '{c}'")))
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Parses all nodes of the tree in pre-order.
    ///
    /// Nesting is tracked with an explicit stack of open internal nodes, so arbitrarily deep
    /// trees do not exhaust the call stack.
    fn tree(&mut self) -> Result<(), ParseError> {
        let mut open = Vec::new();
        let mut parent = None;

        loop {
            let id = self.push_node(parent);

            self.skip_whitespace();
            if self.peek() == Some('(') {
                self.expect('(')?;
                open.push(id);
                parent = Some(id);
                continue;
            }

            self.label_and_length(id)?;

            // Close internal nodes until the next sibling, or the end of the tree
            loop {
                let Some(&top) = open.last() else {
                    return Ok(());
                };

                self.skip_whitespace();
                match self.peek() {
                    Some(',') => {
                        self.expect(',')?;
                        parent = Some(top);
                        break;
                    }
                    Some(')') => {
                        self.expect(')')?;
                        open.pop();
                        self.label_and_length(top)?;
                    }
                    _ => return Err(self.error("expected ',' or ')'")),
                }
            }
        }
    }

    fn push_node(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            ..Default::default()
        });

        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }

        id
    }

    fn label_and_length(&mut self, id: NodeId) -> Result<(), ParseError> {
        self.skip_whitespace();
        let position = self.position();
        let name = self.token(label).unwrap_or(position..position);

        self.skip_comments();
        let mut length = None;
        let mut metadata_block = None;
        if self.token(|s| recognize(char(':'))(s)).is_some() {
            self.skip_whitespace();
            let span = self
                .token(recognize_float)
                .ok_or_else(|| self.error("expected branch length"))?;
            metadata_block = self.token(metadata);
            length = Some(span);
            self.skip_comments();
        }

        let node = &mut self.nodes[id.0];
        node.name = name;
        node.length = length;
        node.metadata = metadata_block;

        Ok(())
    }
}

fn label(s: &str) -> IResult<&str, &str> {
    alt((
        recognize(delimited(
            char('\''),
            many0(alt((is_not("'"), tag("''")))),
            char('\''),
        )),
        take_while1(|c: char| !c.is_whitespace() && !"()[]':;,".contains(c)),
    ))(s)
}

fn metadata(s: &str) -> IResult<&str, &str> {
    recognize(tuple((char('['), take_while(|c: char| c != ']'), char(']'))))(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(s: &str) -> Result<Vec<Node>, ParseError> {
        parse(s, 0).map(|(nodes, _)| nodes)
    }

    #[test]
    fn test_label() {
        assert_eq!(label("A1:0.1"), Ok((":0.1", "A1")));
        assert_eq!(label("'A B'':'x"), Ok(("x", "'A B'':'")));
        assert!(label(":0.1").is_err());
    }

    #[test]
    fn test_metadata() {
        assert_eq!(metadata("[&x=1,y=2],"), Ok((",", "[&x=1,y=2]")));
        assert!(metadata("[unterminated").is_err());
    }

    #[test]
    fn test_parse_spans() {
        let text = "(A1:0.1[x=1],B2:2e-3)R;";
        let nodes = parse_str(text).unwrap();

        assert_eq!(nodes.len(), 3);
        assert_eq!(&text[nodes[0].name.clone()], "R");
        assert_eq!(&text[nodes[1].name.clone()], "A1");
        assert_eq!(&text[nodes[1].length.clone().unwrap()], "0.1");
        assert_eq!(&text[nodes[1].metadata.clone().unwrap()], "[x=1]");
        assert_eq!(&text[nodes[2].length.clone().unwrap()], "2e-3");
        assert_eq!(nodes[2].metadata, None);
    }

    #[test]
    fn test_parse_whitespace() {
        let nodes = parse_str("( A1 : 0.1 ,\n  B2:0.2 ) ;").unwrap();

        assert_eq!(nodes.len(), 3);
        assert!(nodes[1].length.is_some());
    }

    #[test]
    fn test_parse_end() {
        let text = "(A:1,B:2);\nEND;";

        assert_eq!(parse(text, 0).unwrap().1, 10);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_str("(A:1,B:2)").is_err());
        assert!(parse_str("(A:1,B:2;").is_err());
        assert!(parse_str("(A:x,B:2);").is_err());

        let e = parse_str("(A:1 B:2);").unwrap_err();
        assert_eq!(e.position(), 5);
    }

    #[test]
    fn test_parse_deep_nesting() {
        let depth = 100_000;
        let text = format!("{}A:1{};", "(".repeat(depth), "):1".repeat(depth));

        let nodes = parse_str(&text).unwrap();

        assert_eq!(nodes.len(), depth + 1);
        assert_eq!(nodes[depth].parent, Some(NodeId(depth - 1)));
        assert_eq!(&text[nodes[depth].name.clone()], "A");
        assert_eq!(nodes[0].children, [NodeId(1)]);
    }

    #[test]
    fn test_parse_pre_order() {
        let text = "((A,B)C,(D)E)R;";
        let nodes = parse_str(text).unwrap();

        let names = nodes
            .iter()
            .map(|node| &text[node.name.clone()])
            .collect::<Vec<_>>();
        assert_eq!(names, ["R", "C", "A", "B", "E", "D"]);
        assert_eq!(nodes[0].children, [NodeId(1), NodeId(4)]);
        assert_eq!(nodes[5].parent, Some(NodeId(4)));
    }
}

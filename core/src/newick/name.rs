use std::collections::HashSet;

use crate::Error;

use super::{NodeId, Tree};

/// Prefix of generated internal node names.
///
/// Generated names have the form `Node<k>*`.
pub const NODE_PREFIX: &str = "Node";

impl Tree {
    /// Names all unlabeled internal nodes.
    ///
    /// Internal nodes that are unnamed, or whose label is a numeric support value, are named
    /// `Node<k>*` in pre-order, with the lowest `k` not already used by any node of the tree.
    /// Leaves and nodes already carrying the `Node` prefix are left as is.
    ///
    /// Returns the renamed nodes, in pre-order.
    ///
    /// # Errors
    ///
    /// If any node name occurs more than once after naming.
    pub fn name_internal_nodes(&mut self) -> Result<Vec<NodeId>, Error> {
        let mut seen = self
            .nodes()
            .map(|id| self.name(id).into_owned())
            .filter(|name| !name.is_empty())
            .collect::<HashSet<_>>();

        let unlabeled = self
            .nodes()
            .filter(|&id| !self.is_leaf(id))
            .filter(|&id| {
                let name = self.name(id);
                !name.starts_with(NODE_PREFIX) && is_unlabeled(&name)
            })
            .collect::<Vec<_>>();

        let mut k = 1;
        for &id in unlabeled.iter() {
            let name = loop {
                let candidate = format!("{NODE_PREFIX}{k}*");
                k += 1;

                if !seen.contains(&candidate) {
                    break candidate;
                }
            };

            log::trace!("Naming internal node {} '{name}'", id.index());

            self.rename(id, &name);
            seen.insert(name);
        }

        if !unlabeled.is_empty() {
            log::debug!("Named {} internal nodes", unlabeled.len());
        }

        self.check_unique_names()?;

        Ok(unlabeled)
    }

    /// Checks that no node name occurs more than once.
    ///
    /// Unnamed nodes are not considered.
    pub fn check_unique_names(&self) -> Result<(), Error> {
        let mut seen = HashSet::new();

        for id in self.nodes() {
            let name = self.name(id);

            if !name.is_empty() && !seen.insert(name.clone()) {
                return Err(Error::DuplicateNodeName {
                    name: name.into_owned(),
                });
            }
        }

        Ok(())
    }
}

fn is_unlabeled(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_digit() || c == '.')
}

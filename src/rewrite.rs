use std::fmt::Display;

use crate::{
    error::WffError,
    formula::Formula,
    matching::MatchGroup,
    pattern::Pattern,
    tree::{Node, NodeId, Tree},
};

/// A search pattern paired with the formula that replaces its occurrences.
///
/// Variables of the replacement refer to whatever the search pattern captured
/// under the same name.
#[derive(Debug, Clone)]
pub struct Rewrite {
    search: Pattern,
    replacement: Formula,
}

impl Rewrite {
    pub fn new(search: &str, replacement: &str) -> Result<Self, WffError> {
        Ok(Self {
            search: Pattern::new(search)?,
            replacement: Formula::new(replacement)?,
        })
    }

    pub fn search(&self) -> &Pattern {
        &self.search
    }

    /// Pick occurrence `index` out of the groups found for this rewrite.
    pub fn select<'g, 'f>(
        &self,
        groups: &'g [MatchGroup<'f>],
        index: usize,
    ) -> Result<&'g MatchGroup<'f>, WffError> {
        if groups.is_empty() {
            return Err(WffError::NoMatch(self.search.source().to_owned()));
        }
        groups.get(index).ok_or(WffError::IndexOutOfRange {
            index,
            count: groups.len(),
        })
    }

    /// Build the replacement as a standalone tree, with every bare variable
    /// swapped for a copy of the subtree `group` captured for it.
    pub fn instantiate(&self, group: &MatchGroup<'_>) -> Result<(Tree, NodeId), WffError> {
        let template = self.replacement.tree();
        let mut fragment = Tree::new();
        let mut built = Vec::new();
        let mut stack = vec![(self.replacement.root_id(), false)];
        while let Some((id, entered)) = stack.pop() {
            let node = match (&template[id], template.bare_variable(id)) {
                (_, Some(var)) => {
                    let captured = group
                        .binding(var)
                        .ok_or(WffError::UnboundReplacementVariable(var))?
                        .subtree;
                    captured.tree().copy_subtree(captured.id(), &mut fragment)
                }
                (Node::Terminal(token), None) => fragment.terminal(*token),
                (Node::Nonterminal(children), None) if entered => {
                    let children = built.split_off(built.len() - children.len());
                    fragment.nonterminal(children)
                }
                (Node::Nonterminal(children), None) => {
                    stack.push((id, true));
                    stack.extend(children.iter().rev().map(|&child| (child, false)));
                    continue;
                }
            };
            built.push(node);
        }
        match built.pop() {
            Some(root) => Ok((fragment, root)),
            None => unreachable!("the replacement root is built last"),
        }
    }
}

impl Display for Rewrite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ==> {}", self.search, self.replacement)
    }
}

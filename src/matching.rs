use tracing::{debug, trace};

use crate::{
    language::Var,
    pattern::{Pattern, PatternId, PatternNode},
    tree::{Node, NodeId, NodeRef, Tree},
};

/// One captured subformula and the pattern variable it was captured for.
#[derive(Clone, Copy, Debug)]
pub struct Binding<'f> {
    pub var: Var,
    pub subtree: NodeRef<'f>,
}

/// The bindings of one successful match, rooted at one node of the searched tree.
#[derive(Clone, Debug)]
pub struct MatchGroup<'f> {
    root: NodeRef<'f>,
    bindings: Vec<Binding<'f>>,
}

impl<'f> MatchGroup<'f> {
    /// The substitution root: where the pattern occurrence begins.
    pub fn root(&self) -> NodeRef<'f> {
        self.root
    }

    /// One binding per distinct pattern variable, in order of first occurrence.
    pub fn bindings(&self) -> &[Binding<'f>] {
        &self.bindings
    }

    pub fn binding(&self, var: Var) -> Option<&Binding<'f>> {
        self.bindings.iter().find(|b| b.var == var)
    }

    pub fn into_bindings(self) -> Vec<Binding<'f>> {
        self.bindings
    }
}

/// Match the pattern node `from` against the subtree at `target`, extending
/// `bindings`.
///
/// A wildcard seen before must capture a structurally equal subtree. Pairs are
/// visited depth first, left to right, and the first failure stops the match;
/// bindings appended before the failure are kept, so callers start from a
/// fresh list for every attempt.
pub fn node_match<'f>(
    tree: &'f Tree,
    target: NodeId,
    pattern: &Pattern,
    from: PatternId,
    bindings: &mut Vec<Binding<'f>>,
) -> bool {
    let mut pending = vec![(target, from)];
    while let Some((target, from)) = pending.pop() {
        let matched = match (&pattern[from], &tree[target]) {
            (PatternNode::Wildcard(var), _) => bind(tree.get(target), *var, bindings),
            (PatternNode::Literal(expected), Node::Terminal(token)) => expected == token,
            (PatternNode::Literal(_), Node::Nonterminal(_)) => false,
            (PatternNode::Group(patterns), Node::Terminal(_)) => patterns.is_empty(),
            (PatternNode::Group(patterns), Node::Nonterminal(children)) => {
                let same_shape = patterns.len() == children.len();
                if same_shape {
                    pending.extend(children.iter().copied().zip(patterns.iter().copied()).rev());
                }
                same_shape
            }
        };
        if !matched {
            return false;
        }
    }
    true
}

fn bind<'f>(subtree: NodeRef<'f>, var: Var, bindings: &mut Vec<Binding<'f>>) -> bool {
    match bindings.iter().find(|b| b.var == var) {
        Some(previous) => {
            let consistent = previous.subtree.structurally_eq(&subtree);
            if !consistent {
                trace!(%var, bound = %previous.subtree, found = %subtree, "inconsistent binding");
            }
            consistent
        }
        None => {
            bindings.push(Binding { var, subtree });
            true
        }
    }
}

/// Every occurrence of `pattern` in the tree below `root`, nonterminals visited
/// in pre-order. Occurrences may overlap or nest.
pub fn search<'f>(tree: &'f Tree, root: NodeId, pattern: &Pattern) -> Vec<MatchGroup<'f>> {
    let groups: Vec<_> = tree
        .preorder(root)
        .filter(|&id| matches!(tree[id], Node::Nonterminal(_)))
        .filter_map(|id| {
            let mut bindings = Vec::with_capacity(pattern.var_count());
            node_match(tree, id, pattern, pattern.root(), &mut bindings).then(|| MatchGroup {
                root: tree.get(id),
                bindings,
            })
        })
        .collect();
    debug!(pattern = %pattern, groups = groups.len(), "searched formula");
    groups
}

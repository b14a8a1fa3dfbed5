use std::{fmt::Display, str::FromStr};

use tracing::debug;

use crate::{
    error::WffError,
    language::{Token, Var},
    matching::{self, Binding, MatchGroup},
    parser,
    pattern::Pattern,
    rewrite::Rewrite,
    tree::{Node, NodeId, NodeRef, Tree},
};

/// A well-formed formula: its source string and the parse tree that owns all
/// of its nodes.
#[derive(Debug, Clone)]
pub struct Formula {
    source: String,
    tree: Tree,
    root: NodeId,
    var_count: usize,
}

/// Where a propositional variable appears in a formula.
#[derive(Clone, Copy, Debug)]
pub struct Occurrence<'f> {
    pub var: Var,
    /// The proposition terminal.
    pub node: NodeRef<'f>,
}

impl Formula {
    /// Tokenize and parse `source`. Either the whole string is a formula or
    /// nothing is built.
    pub fn new(source: &str) -> Result<Self, WffError> {
        let (tree, root) = parser::parse(source)?;
        let formula = Self::from_tree(source.to_owned(), tree, root);
        debug!(source, vars = formula.var_count, "created formula");
        Ok(formula)
    }

    fn from_tree(source: String, tree: Tree, root: NodeId) -> Self {
        let mut formula = Self {
            source,
            tree,
            root,
            var_count: 0,
        };
        formula.var_count = formula.variables().len();
        formula
    }

    /// The string this formula was built from. After a substitution this is
    /// the canonical rendering of the rewritten formula.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.tree.get(self.root)
    }

    /// Number of distinct variables.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// Distinct variables in order of first occurrence.
    pub fn variables(&self) -> Vec<Var> {
        let mut vars = Vec::new();
        for occurrence in self.variable_occurrences() {
            if !vars.contains(&occurrence.var) {
                vars.push(occurrence.var);
            }
        }
        vars
    }

    /// Canonical form: the terminals left to right, without whitespace.
    pub fn render(&self) -> String {
        self.root().to_string()
    }

    /// One formula per nonterminal node, children before their parent. The
    /// last item is the formula itself. Repeats are kept.
    pub fn subformulas(&self) -> Vec<Formula> {
        self.tree
            .postorder_nonterminals(self.root)
            .into_iter()
            .map(|id| {
                let (tree, root) = self.tree.compact(id);
                let source = tree.get(root).to_string();
                Self::from_tree(source, tree, root)
            })
            .collect()
    }

    /// Like [`Formula::subformulas`], keeping only the first of equal renderings.
    pub fn unique_subformulas(&self) -> Vec<Formula> {
        let mut unique: Vec<Formula> = Vec::new();
        for subformula in self.subformulas() {
            if !unique.iter().any(|seen| seen.source == subformula.source) {
                unique.push(subformula);
            }
        }
        unique
    }

    /// Every proposition terminal, left to right.
    pub fn variable_occurrences(&self) -> Vec<Occurrence<'_>> {
        self.tree
            .preorder(self.root)
            .filter_map(|id| match &self.tree[id] {
                Node::Terminal(Token::Proposition(var)) => Some(Occurrence {
                    var: *var,
                    node: self.tree.get(id),
                }),
                _ => None,
            })
            .collect()
    }

    /// All occurrences of a compiled pattern, grouped per occurrence.
    pub fn match_groups(&self, pattern: &Pattern) -> Vec<MatchGroup<'_>> {
        matching::search(&self.tree, self.root, pattern)
    }

    /// Bindings of every occurrence of `pattern`, flattened in occurrence order.
    /// No occurrence is not an error: the result is simply empty.
    pub fn matches(&self, pattern: &str) -> Result<Vec<Binding<'_>>, WffError> {
        let pattern = Pattern::new(pattern)?;
        Ok(self
            .match_groups(&pattern)
            .into_iter()
            .flat_map(MatchGroup::into_bindings)
            .collect())
    }

    /// Replace occurrence `index` of `search` with `replacement`, whose
    /// variables stand for the subformulas the search captured.
    ///
    /// On error the formula is left untouched.
    pub fn substitute(
        &mut self,
        search: &str,
        replacement: &str,
        index: usize,
    ) -> Result<(), WffError> {
        let rewrite = Rewrite::new(search, replacement)?;
        self.rewrite(&rewrite, index)
    }

    /// [`Formula::substitute`] with an already parsed search/replacement pair.
    pub fn rewrite(&mut self, rewrite: &Rewrite, index: usize) -> Result<(), WffError> {
        let (target, fragment, fragment_root) = {
            let groups = self.match_groups(rewrite.search());
            let group = rewrite.select(&groups, index)?;
            let (fragment, fragment_root) = rewrite.instantiate(group)?;
            (group.root().id(), fragment, fragment_root)
        };

        let before = self.render();
        self.tree.graft(target, &fragment, fragment_root);
        let (tree, root) = self.tree.compact(self.root);
        self.tree = tree;
        self.root = root;
        self.source = self.render();
        self.var_count = self.variables().len();
        debug!(%before, after = %self.source, index, "substituted");
        Ok(())
    }
}

impl FromStr for Formula {
    type Err = WffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root())
    }
}

/// Structural equality; whitespace in the sources is irrelevant.
impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.tree.subtree_eq(self.root, &other.tree, other.root)
    }
}

impl Eq for Formula {}

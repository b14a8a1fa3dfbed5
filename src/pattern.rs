use std::{fmt::Display, ops::Index, str::FromStr};

use crate::{
    error::WffError,
    formula::Formula,
    language::{Token, Var},
    tree::{Node, NodeId, Tree},
};

/// Index of a node in a [`Pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternId(usize);

/// A node of a compiled search pattern.
///
/// Wildcards only exist here: a plain [`Tree`] can never contain one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternNode {
    /// A terminal that must match exactly.
    Literal(Token),
    /// Connective structure that must match child by child.
    Group(Vec<PatternId>),
    /// Stands for any subformula, captured under this variable.
    Wildcard(Var),
}

/// A formula compiled for searching: every bare variable became a wildcard.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    nodes: Vec<PatternNode>,
    root: PatternId,
    vars: Vec<Var>,
}

impl Index<PatternId> for Pattern {
    type Output = PatternNode;

    fn index(&self, id: PatternId) -> &PatternNode {
        &self.nodes[id.0]
    }
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, WffError> {
        Ok(Self::compile(Formula::new(source)?))
    }

    /// Turn a parsed formula into a pattern. The formula is consumed: once
    /// compiled it is only ever used for matching.
    pub fn compile(formula: Formula) -> Self {
        let mut pattern = Self {
            source: formula.source().to_owned(),
            nodes: Vec::new(),
            root: PatternId(0),
            vars: Vec::new(),
        };
        pattern.root = pattern.compile_tree(formula.tree(), formula.root_id());
        pattern
    }

    /// Bare-variable nodes become wildcards and are not descended into.
    fn compile_tree(&mut self, tree: &Tree, root: NodeId) -> PatternId {
        let mut compiled = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((id, entered)) = stack.pop() {
            let node = match (&tree[id], tree.bare_variable(id)) {
                (_, Some(var)) => {
                    if !self.vars.contains(&var) {
                        self.vars.push(var);
                    }
                    PatternNode::Wildcard(var)
                }
                (Node::Terminal(token), None) => PatternNode::Literal(*token),
                (Node::Nonterminal(children), None) if entered => {
                    PatternNode::Group(compiled.split_off(compiled.len() - children.len()))
                }
                (Node::Nonterminal(children), None) => {
                    stack.push((id, true));
                    stack.extend(children.iter().rev().map(|&child| (child, false)));
                    continue;
                }
            };
            compiled.push(self.push(node));
        }
        // The root is compiled last.
        PatternId(self.nodes.len() - 1)
    }

    fn push(&mut self, node: PatternNode) -> PatternId {
        let id = PatternId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> PatternId {
        self.root
    }

    /// Distinct wildcard variables in order of first occurrence.
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }
}

impl FromStr for Pattern {
    type Err = WffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match &self[id] {
                PatternNode::Literal(token) => write!(f, "{token}")?,
                PatternNode::Wildcard(var) => write!(f, "{var}")?,
                PatternNode::Group(children) => stack.extend(children.iter().rev()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    /// Nested rendering with groups in brackets and wildcards marked `?`.
    fn shape(pattern: &Pattern, id: PatternId) -> String {
        match &pattern[id] {
            PatternNode::Literal(token) => token.to_string(),
            PatternNode::Wildcard(var) => format!("?{var}"),
            PatternNode::Group(children) => {
                let children: Vec<_> = children.iter().map(|&c| shape(pattern, c)).collect();
                format!("[{}]", children.join(" "))
            }
        }
    }

    #[test]
    fn lone_variable_is_a_wildcard() {
        let pattern = Pattern::new("a").unwrap();
        assert_eq!(pattern[pattern.root()], PatternNode::Wildcard(Var('a')));
        assert_eq!(pattern.vars(), &[Var('a')]);
    }

    #[test]
    fn connectives_stay_literal() {
        let pattern = Pattern::new("(a ^ ~b)").unwrap();
        assert_snapshot!(shape(&pattern, pattern.root()), @"[( ?a ^ [~ ?b] )]");
        assert_eq!(pattern.to_string(), "(a^~b)");
    }

    #[test]
    fn repeated_variables_are_counted_once() {
        let pattern: Pattern = "((b v a) => (a v b))".parse().unwrap();
        assert_eq!(pattern.vars(), &[Var('b'), Var('a')]);
        assert_eq!(pattern.var_count(), 2);
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(matches!(Pattern::new("(a ^)"), Err(WffError::Grammar(_))));
        assert!(matches!(Pattern::new("a & b"), Err(WffError::Lex(_))));
    }

    #[test]
    fn deep_patterns_compile() {
        let source = format!("{}a", "~".repeat(100_000));
        let pattern = Pattern::new(&source).unwrap();
        assert_eq!(pattern.to_string(), source);
        assert_eq!(pattern.vars(), &[Var('a')]);
    }
}

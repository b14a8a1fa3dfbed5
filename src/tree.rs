//! Arena-allocated parse trees.
//!
//! Every node of a formula lives in one [`Tree`] and is addressed by a
//! [`NodeId`]. Children are stored as ids, so detaching and reattaching
//! subtrees never leaves a dangling link; at worst it leaves unreachable
//! nodes behind, which [`Tree::compact`] drops.

use std::{fmt::Display, ops::Index};

use crate::language::{Token, Var};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A parse tree node.
///
/// Nonterminals have one child (`p`), two (`~ f`) or five (`( f op f )`)
/// children, following the three productions of the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Terminal(Token),
    Nonterminal(Vec<NodeId>),
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn terminal(&mut self, token: Token) -> NodeId {
        self.push(Node::Terminal(token))
    }

    pub fn nonterminal(&mut self, children: Vec<NodeId>) -> NodeId {
        self.push(Node::Nonterminal(children))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self[id] {
            Node::Terminal(_) => &[],
            Node::Nonterminal(children) => children,
        }
    }

    /// The variable of a bare-proposition node (`formula := PROPOSITION`).
    pub fn bare_variable(&self, id: NodeId) -> Option<Var> {
        match self.children(id) {
            [only] => match &self[*only] {
                Node::Terminal(token) => token.as_var(),
                Node::Nonterminal(_) => None,
            },
            _ => None,
        }
    }

    /// Deep structural equality of `id` in this tree and `other_id` in `other`.
    pub fn subtree_eq(&self, id: NodeId, other: &Tree, other_id: NodeId) -> bool {
        let mut pending = vec![(id, other_id)];
        while let Some((a, b)) = pending.pop() {
            match (&self[a], &other[b]) {
                (Node::Terminal(x), Node::Terminal(y)) if x == y => {}
                (Node::Nonterminal(xs), Node::Nonterminal(ys)) if xs.len() == ys.len() => {
                    pending.extend(xs.iter().copied().zip(ys.iter().copied()));
                }
                _ => return false,
            }
        }
        true
    }

    /// Deep-copy the subtree at `id` into `into`, returning the id of the copy.
    pub fn copy_subtree(&self, id: NodeId, into: &mut Tree) -> NodeId {
        let mut copies = Vec::new();
        for step in self.walk(id) {
            match step {
                Step::Leaf(id) | Step::Exit(id) => {
                    let copy = match &self[id] {
                        Node::Terminal(token) => into.terminal(*token),
                        Node::Nonterminal(children) => {
                            let children = copies.split_off(copies.len() - children.len());
                            into.nonterminal(children)
                        }
                    };
                    copies.push(copy);
                }
                Step::Enter(_) => {}
            }
        }
        // The walk finishes with `id` itself.
        NodeId(into.nodes.len() - 1)
    }

    /// Overwrite the node at `target` with a copy of `source_id` from `source`.
    ///
    /// `target` keeps its id, so references to it from a parent stay valid; its
    /// previous descendants become unreachable.
    pub fn graft(&mut self, target: NodeId, source: &Tree, source_id: NodeId) {
        let node = match &source[source_id] {
            Node::Terminal(token) => Node::Terminal(*token),
            Node::Nonterminal(children) => Node::Nonterminal(
                children
                    .iter()
                    .map(|&child| source.copy_subtree(child, self))
                    .collect(),
            ),
        };
        self.nodes[target.0] = node;
    }

    /// A fresh tree holding only the nodes reachable from `root`.
    pub fn compact(&self, root: NodeId) -> (Tree, NodeId) {
        let mut tree = Tree::new();
        let root = self.copy_subtree(root, &mut tree);
        (tree, root)
    }

    /// Depth-first pre-order walk over every node below (and including) `root`.
    pub fn preorder(&self, root: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![root],
        }
    }

    /// Nonterminals below (and including) `root`, children before parents.
    pub fn postorder_nonterminals(&self, root: NodeId) -> Vec<NodeId> {
        self.walk(root)
            .filter_map(|step| match step {
                Step::Exit(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Depth-first walk that reports entering and leaving every nonterminal.
    pub fn walk(&self, root: NodeId) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![(root, false)],
        }
    }
}

/// One event of [`Tree::walk`]. Children of a nonterminal are reported, left
/// to right, between its `Enter` and its `Exit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Leaf(NodeId),
    Enter(NodeId),
    Exit(NodeId),
}

pub struct Walk<'t> {
    tree: &'t Tree,
    stack: Vec<(NodeId, bool)>,
}

impl Iterator for Walk<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let (id, entered) = self.stack.pop()?;
        Some(match &self.tree[id] {
            Node::Terminal(_) => Step::Leaf(id),
            Node::Nonterminal(_) if entered => Step::Exit(id),
            Node::Nonterminal(children) => {
                self.stack.push((id, true));
                self.stack
                    .extend(children.iter().rev().map(|&child| (child, false)));
                Step::Enter(id)
            }
        })
    }
}

pub struct Preorder<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// A borrowed view of one subtree.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn node(&self) -> &'t Node {
        &self.tree[self.id]
    }

    pub fn token(&self) -> Option<Token> {
        match self.node() {
            Node::Terminal(token) => Some(*token),
            Node::Nonterminal(_) => None,
        }
    }

    pub fn structurally_eq(&self, other: &NodeRef<'_>) -> bool {
        self.tree.subtree_eq(self.id, other.tree, other.id)
    }
}

impl Display for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.tree
            .preorder(self.id)
            .filter_map(|id| self.tree.get(id).token())
            .try_for_each(|token| write!(f, "{token}"))
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeRef({} {:?})", self.id, self.to_string())
    }
}

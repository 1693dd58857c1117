use std::{
    fmt::{self, Display},
    mem,
};

use indexmap::IndexSet;
use itertools::Itertools;
use termtree::Tree;

use crate::{error::WffError, operators::Associativity, token::Token};

/// Path from the root to a node: the child index taken at every level.
///
/// Positions are the handles through which a node is located and replaced
/// in place; they stay valid until the tree above them is rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(Vec<usize>);

impl Position {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Position(path)
    }

    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for Position {
    fn from(path: Vec<usize>) -> Self {
        Position(path)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "ε")
        } else {
            write!(f, "{}", self.0.iter().join("."))
        }
    }
}

/// A tree node. Its child count always equals the operand count of its
/// token: zero for symbols, one or two for operators.
#[derive(Debug, Clone, Eq)]
pub struct Node {
    token: Token,
    children: Vec<Node>,
}

impl Node {
    pub fn new(token: Token, children: Vec<Node>) -> Result<Self, WffError> {
        let expected = token.operand_count();

        if children.len() != expected {
            return Err(WffError::ArityMismatch {
                lexeme: token.lexeme().to_owned(),
                expected,
                found: children.len(),
            });
        }

        Ok(Self { token, children })
    }

    pub fn leaf(token: Token) -> Result<Self, WffError> {
        Self::new(token, Vec::new())
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn lexeme(&self) -> &str {
        self.token.lexeme()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    pub fn get_tree(&self) -> Tree<String> {
        Tree::new(self.lexeme().to_owned())
            .with_leaves(self.children.iter().map(|child| child.get_tree()))
    }

    /// Leaves of this node that are variables (not constants), in order of
    /// first appearance.
    pub fn variables(&self) -> IndexSet<&str> {
        let mut variables = IndexSet::new();
        self.collect_variables(&mut variables);
        variables
    }

    fn collect_variables<'a>(&'a self, variables: &mut IndexSet<&'a str>) {
        if let Token::Variable(name) = &self.token {
            variables.insert(name);
        }

        for child in &self.children {
            child.collect_variables(variables);
        }
    }

    fn needs_parentheses(&self, child: &Node) -> bool {
        match (&self.token, &child.token) {
            (Token::Operator(parent), Token::Operator(operator)) => {
                !operator.is_unary()
                    && (parent.lexeme() != operator.lexeme()
                        || operator.associativity() == Associativity::NonAssociative)
            }
            _ => false,
        }
    }

    fn write_child(&self, child: &Node, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_parentheses(child) {
            write!(f, "({child})")
        } else {
            write!(f, "{child}")
        }
    }
}

/// Nodes are equal when their lexemes agree and their children are pairwise
/// equal. Equal operator lexemes imply equal arity.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.lexeme() == other.lexeme() && self.children == other.children
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Token::Operator(operator) if operator.is_unary() => {
                write!(f, "{operator}")?;

                for child in &self.children {
                    self.write_child(child, f)?;
                }

                Ok(())
            }
            Token::Operator(operator) => {
                for (index, child) in self.children.iter().enumerate() {
                    if index > 0 {
                        write!(f, "{operator}")?;
                    }

                    self.write_child(child, f)?;
                }

                Ok(())
            }
            token => write!(f, "{token}"),
        }
    }
}

/// A formula tree. Every `Ast` owns its nodes outright; cloning copies the
/// whole tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    root: Node,
}

impl Ast {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn get(&self, position: &Position) -> Option<&Node> {
        position
            .indices()
            .iter()
            .try_fold(&self.root, |node, &index| node.children.get(index))
    }

    fn get_mut(&mut self, position: &Position) -> Option<&mut Node> {
        position
            .indices()
            .iter()
            .try_fold(&mut self.root, |node, &index| node.children.get_mut(index))
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.get(position).is_some()
    }

    /// Overwrites the node at `position` with `replacement`, returning the
    /// subtree that was there. Fails if no node sits at `position`.
    pub fn replace(&mut self, position: &Position, replacement: Node) -> Result<Node, WffError> {
        let node = self
            .get_mut(position)
            .ok_or_else(|| WffError::NodeNotFound {
                position: position.clone(),
            })?;

        Ok(mem::replace(node, replacement))
    }

    /// Positions of every node in pre-order.
    pub fn positions(&self) -> Vec<Position> {
        fn visit(node: &Node, position: &mut Position, positions: &mut Vec<Position>) {
            positions.push(position.clone());

            for (index, child) in node.children.iter().enumerate() {
                position.push(index);
                visit(child, position, positions);
                position.pop();
            }
        }

        let mut positions = Vec::new();
        visit(&self.root, &mut Position::root(), &mut positions);
        positions
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn variables(&self) -> IndexSet<&str> {
        self.root.variables()
    }

    pub fn get_tree(&self) -> Tree<String> {
        self.root.get_tree()
    }
}

impl Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl From<Node> for Ast {
    fn from(root: Node) -> Self {
        Ast::new(root)
    }
}

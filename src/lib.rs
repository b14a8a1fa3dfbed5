//! Propositional-logic formulas ("wffs"): parsing, pattern search with
//! capturing variables, and rewriting of matched occurrences.
//!
//! ```
//! use wff::Formula;
//!
//! let mut formula = Formula::new("~(p v q)").unwrap();
//! formula.substitute("~(a v b)", "(~a ^ ~b)", 0).unwrap();
//! assert_eq!(formula.render(), "(~p^~q)");
//! ```

use lalrpop_util::lalrpop_mod;

pub mod error;
pub mod formula;
pub mod language;
pub mod lexer;
pub mod matching;
pub mod parser;
pub mod pattern;
pub mod rewrite;
pub mod tree;

lalrpop_mod!(#[allow(unused_imports)] grammar);

pub use error::{GrammarError, LexError, WffError};
pub use formula::{Formula, Occurrence};
pub use language::{Operator, Token, Var};
pub use matching::{Binding, MatchGroup};
pub use pattern::{Pattern, PatternId, PatternNode};
pub use rewrite::Rewrite;
pub use tree::{Node, NodeId, NodeRef, Step, Tree};

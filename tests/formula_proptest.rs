//! Property-based tests over generated well-formed formulas.

use proptest::prelude::*;
use wff::{lexer, parser, Formula, Var, WffError};

fn connective_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["^", "v", "=>", "<=>"])
}

/// Well-formed formulas written with spaces around binary connectives.
fn formula_strategy() -> impl Strategy<Value = String> {
    let leaf =
        prop::sample::select(vec!["p", "q", "r", "s", "A", "B"]).prop_map(|s| s.to_owned());
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|f| format!("~{f}")),
            (inner.clone(), connective_strategy(), inner)
                .prop_map(|(a, op, b)| format!("({a} {op} {b})")),
        ]
    })
}

proptest! {
    #[test]
    fn render_drops_only_whitespace(source in formula_strategy()) {
        let formula = Formula::new(&source).unwrap();
        prop_assert_eq!(formula.render(), source.replace(' ', ""));
    }

    #[test]
    fn render_is_stable(source in formula_strategy()) {
        let formula = Formula::new(&source).unwrap();
        let rendered = formula.render();
        prop_assert_eq!(&formula.render(), &rendered);
        prop_assert_eq!(Formula::new(&rendered).unwrap(), formula);
    }

    #[test]
    fn token_slices_parse_like_strings(source in formula_strategy()) {
        let tokens = lexer::tokenize(&source).unwrap();
        let (tree, root) = parser::parse_tokens(&tokens).unwrap();
        prop_assert_eq!(tree.get(root).to_string(), source.replace(' ', ""));
    }

    #[test]
    fn lone_variable_matches_every_subformula(source in formula_strategy()) {
        let formula = Formula::new(&source).unwrap();
        let bindings = formula.matches("a").unwrap();
        prop_assert_eq!(bindings.len(), formula.subformulas().len());
        prop_assert!(bindings.iter().all(|b| b.var == Var('a')));
    }

    #[test]
    fn identity_rewrite_changes_nothing(
        source in formula_strategy(),
        index in any::<prop::sample::Index>(),
    ) {
        let mut formula = Formula::new(&source).unwrap();
        let before = formula.clone();
        let index = index.index(formula.subformulas().len());
        formula.substitute("a", "a", index).unwrap();
        prop_assert_eq!(&formula, &before);
        prop_assert_eq!(formula.render(), before.render());
    }

    #[test]
    fn failed_substitution_changes_nothing(source in formula_strategy()) {
        let mut formula = Formula::new(&source).unwrap();
        let before = formula.render();
        let count = formula.subformulas().len();

        let out_of_range = formula.substitute("a", "~a", count);
        prop_assert_eq!(out_of_range, Err(WffError::IndexOutOfRange { index: count, count }));
        prop_assert_eq!(formula.render(), before.clone());

        let unbound = formula.substitute("a", "(a ^ b)", 0);
        prop_assert_eq!(unbound, Err(WffError::UnboundReplacementVariable(Var('b'))));
        prop_assert_eq!(formula.render(), before);
        prop_assert_eq!(formula.source(), source.as_str());
    }
}

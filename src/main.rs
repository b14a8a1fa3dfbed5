use anyhow::Context;
use clap::Parser;
use prettytable::{format::Alignment, Cell, Row, Table};
use tracing_subscriber::EnvFilter;

use wff::{Formula, MatchGroup, Pattern};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The formula to work on, e.g. "((p v q) => ~r)"
    formula: String,
    /// Pattern to search for; its variables match any subformula
    #[arg(long, short)]
    search: Option<String>,
    /// Replacement for the selected occurrence of the search pattern
    #[arg(long, short, requires = "search")]
    replace: Option<String>,
    /// Which occurrence to replace, counting from 0
    #[arg(long, short, default_value_t = 0)]
    index: usize,
    /// List the distinct subformulas
    #[arg(long, default_value_t = false)]
    subformulas: bool,
    #[arg(long, short, default_value_t = false)]
    no_table: bool,
}

fn match_table(pattern: &Pattern, groups: &[MatchGroup<'_>]) -> Table {
    let mut table = Table::new();
    let mut header = Row::new(vec![Cell::new("#"), Cell::new("occurrence")]);
    for var in pattern.vars() {
        header.add_cell(Cell::new(&var.to_string()).style_spec("b"));
    }
    table.set_titles(header);

    for (i, group) in groups.iter().enumerate() {
        let mut index = Cell::new(&i.to_string());
        index.align(Alignment::RIGHT);
        let mut row = Row::new(vec![index, Cell::new(&group.root().to_string())]);
        for binding in group.bindings() {
            row.add_cell(Cell::new(&binding.subtree.to_string()).style_spec("Fg"));
        }
        table.add_row(row);
    }
    table
}

fn print_matches(pattern: &Pattern, groups: &[MatchGroup<'_>]) {
    for (i, group) in groups.iter().enumerate() {
        let bindings = group
            .bindings()
            .iter()
            .map(|b| format!("{} = {}", b.var, b.subtree))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{i}: {} ({bindings})", group.root());
    }
    if groups.is_empty() {
        println!("'{pattern}' does not occur");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let mut formula = Formula::new(&args.formula)
        .with_context(|| format!("'{}' is not a well-formed formula", args.formula))?;
    println!("{formula}");

    if args.subformulas {
        for subformula in formula.unique_subformulas() {
            println!("  {subformula}");
        }
    }

    let Some(search) = &args.search else {
        return Ok(());
    };
    let pattern = Pattern::new(search).with_context(|| format!("invalid pattern '{search}'"))?;
    let groups = formula.match_groups(&pattern);
    if args.no_table || groups.is_empty() {
        print_matches(&pattern, &groups);
    } else {
        match_table(&pattern, &groups).printstd();
    }

    if let Some(replacement) = &args.replace {
        let before = formula.render();
        formula
            .substitute(search, replacement, args.index)
            .with_context(|| format!("cannot replace occurrence {} of '{search}'", args.index))?;
        println!("{before} ==> {formula}");
    }
    Ok(())
}

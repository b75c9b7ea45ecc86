use crate::{CheckArgs, Error};
use tingen::grammar::Grammar;
use tingen::lr0::Lr0;
use tingen::slr1::{Slr1, Validity};

pub fn run(args: &CheckArgs) -> Result<(), Error> {
    let pattern = crate::load_pattern(&args.pattern)?;
    let grammar = Grammar::from_pattern(&pattern)?;

    let list = |set: &std::collections::BTreeSet<std::rc::Rc<str>>| {
        set.iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(" ")
    };
    println!("Terminals: {}", list(grammar.terminals()));
    println!("Non-terminals: {}", list(grammar.non_terminals()));

    println!("\nFirst sets:");
    for non_terminal in grammar.non_terminals() {
        if let Some(first) = grammar.first(non_terminal) {
            println!("{non_terminal}: {}", list(first));
        }
    }
    println!("\nFollow sets:");
    for non_terminal in grammar.non_terminals() {
        if let Some(follow) = grammar.follow(non_terminal) {
            println!("{non_terminal}: {}", list(follow));
        }
    }

    let parser = Slr1::new(Lr0::new(grammar)?);
    println!("\nItemSet:");
    for item_set in parser.tables().item_sets() {
        println!("{item_set}");
        for (symbol, target) in &parser.tables().transitions()[item_set.index()] {
            println!("-- {symbol} -> {target}");
        }
        println!();
    }

    let verdict = parser.check();
    println!("Verdict: {verdict}");
    if verdict != Validity::Ok {
        return Err(Error::Conflict(verdict));
    }
    Ok(())
}

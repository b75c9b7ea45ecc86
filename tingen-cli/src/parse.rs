use crate::{Error, ParseArgs};
use std::fs;
use tingen::grammar::Grammar;
use tingen::lr0::Lr0;
use tingen::slr1::{Slr1, Validity};

pub fn run(args: &ParseArgs) -> Result<(), Error> {
    let pattern = crate::load_pattern(&args.pattern)?;
    let grammar = Grammar::from_pattern(&pattern)?;
    let parser = Slr1::new(Lr0::new(grammar)?);

    let verdict = parser.check();
    if verdict != Validity::Ok {
        return Err(Error::Conflict(verdict));
    }

    let text = fs::read_to_string(&args.tokens)
        .map_err(|e| Error::File(args.tokens.clone(), e))?;
    let tokens =
        tingen::parser::tokens(&text).map_err(|e| Error::Tokens(e.to_string()))?;

    let tree = parser.parse(&tokens)?;
    println!("Parse succeeded: {} tokens", tree.leaves().len());
    if args.pseudocode {
        for line in tree.to_pseudocode() {
            println!("{line}");
        }
    }
    Ok(())
}

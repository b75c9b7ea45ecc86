use crate::{Error, LexArgs};
use std::fs;
use tingen::codegen::generate_lexer;
use tingen::lexer::Lexer;

pub fn run(args: &LexArgs) -> Result<(), Error> {
    let pattern = crate::load_pattern(&args.pattern)?;
    let lexer = Lexer::new(pattern)?;

    for lexeme in &args.tests {
        match lexer.accept_tag(lexeme) {
            Some(tag) => println!("{lexeme}: Accept({tag})"),
            None => println!("{lexeme}: Reject"),
        }
    }

    if let Some(input) = &args.input {
        let source = fs::read_to_string(input)
            .map_err(|e| Error::File(input.clone(), e))?;
        for scanned in lexer.scan(&source) {
            println!("{scanned}");
        }
    }

    if let Some(target) = &args.emit {
        fs::write(target, generate_lexer(&lexer))
            .map_err(|e| Error::File(target.clone(), e))?;
    }

    Ok(())
}

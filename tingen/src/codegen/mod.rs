//! # Emitted lexer source
//! [generate_lexer] renders a [Lexer](crate::lexer::Lexer) as the source of
//! a self-contained Rust program: the minimized DFA becomes one dispatch
//! function per state, and a `main` reads `input.txt`, splits it with the
//! same whitespace-and-symbol splitter as [Lexer::split], and prints one
//! line per candidate lexeme — `Token: <tag>`, `Token: <tag> -> <lexeme>`
//! for identifiers and numbers, or `Invalid token: <lexeme>`.
//!
//! The generated program has no dependencies beyond the standard library and
//! is meant to be handed to `rustc` as-is.

use crate::lexer::Lexer;

/// Renders the recognizer as a standalone program. The output is a complete
/// `main.rs`.
pub fn generate_lexer(lexer: &Lexer) -> String {
    let dfa = lexer.dfa();
    let pattern = lexer.pattern();
    let mut code = String::new();

    code.push_str("//! Lexer generated by tingen. Reads input.txt and prints one token per line.\n\n");
    code.push_str("use std::fs;\n\n");

    let delimiters: String = [
        pattern.comment.as_deref(),
        pattern.lcomment.as_deref(),
        pattern.rcomment.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    let split_chars: Vec<char> = pattern
        .symbol_chars()
        .into_iter()
        .filter(|c| !delimiters.contains(*c))
        .collect();

    code.push_str(&format!("const START: usize = {};\n", dfa.start_index()));
    code.push_str(&format!("const SPLIT_CHARS: &[char] = &{split_chars:?};\n"));
    code.push_str(&format!(
        "const LCOMMENT: Option<&str> = {};\n",
        option_literal(pattern.lcomment.as_deref())
    ));
    code.push_str(&format!(
        "const RCOMMENT: Option<&str> = {};\n",
        option_literal(pattern.rcomment.as_deref())
    ));
    code.push_str(&format!(
        "const COMMENT: Option<&str> = {};\n\n",
        option_literal(pattern.comment.as_deref())
    ));

    for (id, state) in dfa.states().iter().enumerate() {
        code.push_str(&format!(
            "fn state_{id}(symbol: char) -> Option<usize> {{\n    match symbol {{\n"
        ));
        for (symbol, target) in state.transitions() {
            code.push_str(&format!("        {symbol:?} => Some({target}),\n"));
        }
        code.push_str("        _ => None,\n    }\n}\n\n");
    }

    code.push_str("fn step(state: usize, symbol: char) -> Option<usize> {\n    match state {\n");
    for id in 0..dfa.states().len() {
        code.push_str(&format!("        {id} => state_{id}(symbol),\n"));
    }
    code.push_str("        _ => None,\n    }\n}\n\n");

    code.push_str("fn accept_tag(state: usize) -> Option<&'static str> {\n    match state {\n");
    for (id, state) in dfa.states().iter().enumerate() {
        if let Some(tag) = state.tag() {
            code.push_str(&format!("        {id} => Some({tag:?}),\n"));
        }
    }
    code.push_str("        _ => None,\n    }\n}\n\n");

    code.push_str(DRIVER);
    code
}

fn option_literal(value: Option<&str>) -> String {
    match value {
        Some(value) => format!("Some({value:?})"),
        None => "None".to_string(),
    }
}

/// The fixed tail of the generated program: classification, the splitter
/// and `main`. Parameterized only through the constants emitted above.
const DRIVER: &str = r#"fn classify(lexeme: &str) -> Option<&'static str> {
    let mut state = START;
    for symbol in lexeme.chars() {
        state = step(state, symbol)?;
    }
    accept_tag(state)
}

fn matches_at(chars: &[char], position: usize, needle: &str) -> bool {
    let mut offset = position;
    for c in needle.chars() {
        if chars.get(offset) != Some(&c) {
            return false;
        }
        offset += 1;
    }
    offset > position
}

fn split(source: &str) -> Vec<String> {
    let chars: Vec<char> = source.chars().collect();
    let mut lexemes: Vec<String> = Vec::new();
    let mut token = String::new();
    let mut inside_comment = false;
    let mut position = 0;

    fn flush(token: &mut String, lexemes: &mut Vec<String>) {
        if !token.is_empty() {
            lexemes.push(std::mem::take(token));
        }
    }

    while position < chars.len() {
        if inside_comment {
            if let Some(close) = RCOMMENT {
                if matches_at(&chars, position, close) {
                    token.push_str(close);
                    position += close.chars().count();
                    flush(&mut token, &mut lexemes);
                    inside_comment = false;
                    continue;
                }
            }
            token.push(chars[position]);
            position += 1;
            continue;
        }

        if let Some(open) = LCOMMENT {
            if matches_at(&chars, position, open) {
                flush(&mut token, &mut lexemes);
                token.push_str(open);
                position += open.chars().count();
                inside_comment = true;
                continue;
            }
        }
        if let Some(line) = COMMENT {
            if matches_at(&chars, position, line) {
                flush(&mut token, &mut lexemes);
                while position < chars.len() && chars[position] != '\n' {
                    token.push(chars[position]);
                    position += 1;
                }
                flush(&mut token, &mut lexemes);
                continue;
            }
        }

        let c = chars[position];
        if c.is_whitespace() {
            flush(&mut token, &mut lexemes);
        } else if SPLIT_CHARS.contains(&c) {
            flush(&mut token, &mut lexemes);
            lexemes.push(c.to_string());
        } else {
            token.push(c);
        }
        position += 1;
    }
    flush(&mut token, &mut lexemes);
    lexemes
}

fn main() {
    let source = fs::read_to_string("input.txt").unwrap_or_default();
    for lexeme in split(&source) {
        match classify(&lexeme) {
            Some(tag) if tag == "id" || tag == "num" => {
                println!("Token: {tag} -> {lexeme}")
            }
            Some(tag) => println!("Token: {tag}"),
            None => println!("Invalid token: {lexeme}"),
        }
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;

    #[test]
    fn generated_source_embeds_the_whole_automaton() {
        let pattern: Pattern = crate::parser::pattern(
            "keywords: if\nsymbols: + ;\nidentifier: l(l|d)*\nnumber: d+\nlcomment: {\nrcomment: }\n",
        )
        .unwrap()
        .try_into()
        .unwrap();
        let lexer = Lexer::new(pattern).unwrap();
        let code = generate_lexer(&lexer);

        for id in 0..lexer.dfa().states().len() {
            assert!(code.contains(&format!("fn state_{id}(")));
        }
        assert!(code.contains("const START: usize = 0;"));
        assert!(code.contains("LCOMMENT: Option<&str> = Some(\"{\")"));
        assert!(code.contains("Some(\"if\")"));
        assert!(code.contains("Some(\"id\")"));
        assert!(code.contains("Some(\"num\")"));
        assert!(code.contains("fn main()"));
    }

    #[test]
    fn split_characters_exclude_comment_delimiters() {
        let pattern: Pattern = crate::parser::pattern(
            "symbols: + { }\nidentifier: l\nlcomment: {\nrcomment: }\n",
        )
        .unwrap()
        .try_into()
        .unwrap();
        let lexer = Lexer::new(pattern).unwrap();
        let code = generate_lexer(&lexer);
        assert!(code.contains("const SPLIT_CHARS: &[char] = &['+'];"));
    }
}

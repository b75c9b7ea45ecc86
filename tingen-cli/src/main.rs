use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{fs, io};
use thiserror::Error;
use tingen::pattern::Pattern;

mod check;
mod lex;
mod parse;

#[derive(Parser)]
#[command(
    name = "tingen",
    version,
    about = "Lexer and SLR(1) parser generator for a TINY-like language"
)]
pub struct TingenArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the recognizer from a pattern file, classify lexemes or scan a
    /// source file, and optionally emit a standalone lexer program
    Lex(LexArgs),
    /// Parse a token-stream file with the grammar of a pattern file
    Parse(ParseArgs),
    /// Print the grammar sets, item sets and the SLR(1) verdict
    Check(CheckArgs),
}

#[derive(Args)]
pub struct LexArgs {
    /// The pattern file
    pub pattern: PathBuf,
    /// Source file to scan into `Token:` lines
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Write the generated lexer program to this path
    #[arg(long)]
    pub emit: Option<PathBuf>,
    /// Candidate lexemes to classify one by one
    #[arg(long = "test")]
    pub tests: Vec<String>,
}

#[derive(Args)]
pub struct ParseArgs {
    /// The pattern file with the grammar rules
    pub pattern: PathBuf,
    /// The token-stream file to parse
    #[arg(long)]
    pub tokens: PathBuf,
    /// Also print the three-address pseudocode of the tree
    #[arg(long)]
    pub pseudocode: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// The pattern file with the grammar rules
    pub pattern: PathBuf,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error loading file {0}: {1}")]
    File(PathBuf, io::Error),
    #[error("Error in pattern file: {0}")]
    Pattern(String),
    #[error("Error building lexer: {0}")]
    Lexer(#[from] tingen::lexer::LexerError),
    #[error("Error in grammar: {0}")]
    Grammar(#[from] tingen::grammar::GrammarError),
    #[error("Error building tables: {0}")]
    Table(#[from] tingen::lr0::TableError),
    #[error("Error in token stream: {0}")]
    Tokens(String),
    #[error("Grammar is not SLR(1): {0}")]
    Conflict(tingen::slr1::Validity),
    #[error("Parse error: {0}")]
    Parse(#[from] tingen::slr1::ParseError),
}

/// Reads and validates a pattern file.
pub fn load_pattern(path: &Path) -> Result<Pattern, Error> {
    let text =
        fs::read_to_string(path).map_err(|e| Error::File(path.to_path_buf(), e))?;
    let parsed =
        tingen::parser::pattern(&text).map_err(|e| Error::Pattern(e.to_string()))?;
    let pattern: Pattern = parsed
        .try_into()
        .map_err(|e: tingen::pattern::PatternError| Error::Pattern(e.to_string()))?;
    Ok(pattern)
}

fn main() -> ExitCode {
    let args = TingenArgs::parse();
    let result = match &args.command {
        Command::Lex(lex_args) => lex::run(lex_args),
        Command::Parse(parse_args) => parse::run(parse_args),
        Command::Check(check_args) => check::run(check_args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

//! Grammar text format parser: lines of `head -> body_1 | body_2 | ... |
//! body_n`, capital-initial tokens are variables, everything else is a
//! terminal, and epsilon may be spelled `epsilon`, `$`, `ε`, `ϵ` or `Є`. Kept
//! deliberately small and separate from the core algorithms, which never
//! depend on a particular surface syntax; built on `nom`, already in the
//! dependency stack for the regex parser.
use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{eof, map, opt},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::grammar::cfg::{Cfg, Symbol};

fn is_epsilon_token(token: &str) -> bool {
    matches!(token, "epsilon" | "$" | "ε" | "ϵ" | "Є")
}

/// A token is a variable reference iff its first character is uppercase;
/// everything else (including epsilon spellings) is a terminal. Shared with
/// the ECFG parser, which uses the same convention to tell terminal letters
/// apart from nonterminal references inside a regex body.
pub(crate) fn is_variable_token(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_uppercase())
}

fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != '|')(input)
}

/// An intermediate, not-yet-interned symbol spelled out by the parser.
/// Real interning into a `Symbol::Var`/`Symbol::Term` happens per-grammar in
/// [`parse_grammar`], since a `VarId` only makes sense relative to the `Cfg`
/// being built.
enum SymbolSpec {
    Var(String),
    Term(String),
}

fn alternatives(input: &str) -> IResult<&str, Vec<Vec<SymbolSpec>>> {
    separated_list1(
        delimited(multispace0, char('|'), multispace0),
        raw_concatenation,
    )(input)
}

fn raw_concatenation(input: &str) -> IResult<&str, Vec<SymbolSpec>> {
    let (input, tokens) = separated_list1(
        nom::character::complete::space1,
        delimited(multispace0, token, multispace0),
    )(input)?;
    let mut symbols = Vec::new();
    for t in tokens {
        if is_epsilon_token(t) {
            continue;
        } else if is_variable_token(t) {
            symbols.push(SymbolSpec::Var(t.to_string()));
        } else {
            symbols.push(SymbolSpec::Term(t.to_string()));
        }
    }
    Ok((input, symbols))
}

fn grammar_line(input: &str) -> IResult<&str, (&str, Vec<Vec<SymbolSpec>>)> {
    map(
        tuple((
            delimited(multispace0, token, multispace0),
            tag("->"),
            delimited(multispace0, alternatives, multispace0),
        )),
        |(head, _, alts)| (head, alts),
    )(input)
}

fn grammar_text(input: &str) -> IResult<&str, Vec<(&str, Vec<Vec<SymbolSpec>>)>> {
    let (input, lines) = many0(delimited(
        multispace0,
        grammar_line,
        opt(preceded(multispace0, char(';'))),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, lines))
}

/// Parse the grammar text format into a [`Cfg`] whose start symbol is
/// `default_start`, unless a line headed by that symbol is absent and `S` by
/// convention should be used instead — callers pass whichever default their
/// [`crate::config::Config`] specifies.
pub fn parse_grammar(text: &str, default_start: &str) -> Result<Cfg> {
    let (_, lines) = grammar_text(text).map_err(|e| Error::InvalidGrammarText(e.to_string()))?;
    if lines.is_empty() {
        return Err(Error::InvalidGrammarText("grammar text is empty".to_string()));
    }
    let mut cfg = Cfg::new(default_start);
    for (head, _) in &lines {
        cfg.intern_var(head);
    }
    for (head, alts) in lines {
        let head_id = cfg.intern_var(head);
        for alt in alts {
            let body: Vec<Symbol> = alt
                .into_iter()
                .map(|s| match s {
                    SymbolSpec::Var(name) => Symbol::Var(cfg.intern_var(&name)),
                    SymbolSpec::Term(t) => Symbol::Term(t),
                })
                .collect();
            cfg.add_production(head_id, body);
        }
    }
    Ok(cfg)
}

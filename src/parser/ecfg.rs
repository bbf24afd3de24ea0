//! ECFG text format parser: exactly one `head -> regex` line per variable.
use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::multispace0,
    combinator::{eof, map},
    multi::many0,
    sequence::{delimited, tuple},
    IResult,
};

use crate::automaton::regex::Regex;
use crate::error::{Error, Result};
use crate::grammar::rsm::{Ecfg, NONTERMINAL_PREFIX};
use crate::parser::grammar::is_variable_token;
use crate::parser::regex::parse_regex;

/// Rewrite every literal token that looks like a variable reference (the
/// same capital-initial convention the grammar text parser uses) into a
/// prefixed literal, so the regex built from ECFG text agrees with the one
/// [`crate::grammar::rsm::cfg_to_ecfg`] builds from a `Cfg`.
fn mark_nonterminals(regex: Regex) -> Regex {
    match regex {
        Regex::Epsilon => Regex::Epsilon,
        Regex::Literal(lit) => {
            if is_variable_token(&lit) {
                Regex::Literal(format!("{NONTERMINAL_PREFIX}{lit}"))
            } else {
                Regex::Literal(lit)
            }
        }
        Regex::Concat(a, b) => {
            Regex::Concat(Box::new(mark_nonterminals(*a)), Box::new(mark_nonterminals(*b)))
        }
        Regex::Union(a, b) => {
            Regex::Union(Box::new(mark_nonterminals(*a)), Box::new(mark_nonterminals(*b)))
        }
        Regex::Star(a) => Regex::Star(Box::new(mark_nonterminals(*a))),
    }
}

fn head(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

fn rest_of_line(input: &str) -> IResult<&str, &str> {
    nom::character::complete::not_line_ending(input)
}

fn ecfg_line(input: &str) -> IResult<&str, (&str, &str)> {
    map(
        tuple((
            delimited(multispace0, head, multispace0),
            tag("->"),
            delimited(multispace0, rest_of_line, multispace0),
        )),
        |(h, _, body)| (h, body),
    )(input)
}

fn ecfg_text(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    let (input, lines) = many0(ecfg_line)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, lines))
}

/// Parse ECFG text into an [`Ecfg`], routing each body through the regex
/// text parser.
pub fn parse_ecfg(text: &str, start_symbol: &str) -> Result<Ecfg> {
    let (_, lines) = ecfg_text(text).map_err(|e| Error::InvalidGrammarText(e.to_string()))?;
    if lines.is_empty() {
        return Err(Error::InvalidGrammarText("ECFG text is empty".to_string()));
    }
    let mut cfg = crate::grammar::cfg::Cfg::new(start_symbol);
    let mut bodies = Vec::new();
    for (h, _) in &lines {
        cfg.intern_var(h);
    }
    for (h, body_text) in lines {
        let head_id = cfg.intern_var(h);
        let regex = mark_nonterminals(parse_regex(body_text)?);
        bodies.push((head_id, regex));
    }
    Ok(Ecfg::from_parts(cfg, bodies))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_regex_per_head() {
        let ecfg = parse_ecfg("S -> a*\nT -> b|c", "S").unwrap();
        assert_eq!(ecfg.variables().count(), 2);
    }

    #[test]
    fn rejects_empty_text() {
        assert!(parse_ecfg("", "S").is_err());
    }
}

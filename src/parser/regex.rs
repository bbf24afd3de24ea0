//! Regex text format parser: alternation `|` (lowest precedence),
//! concatenation by adjacency or whitespace, Kleene `*` (postfix, highest
//! precedence unary), parentheses, and literal tokens. Unknown operators are
//! `Error::InvalidRegex`, never silently ignored.
use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{eof, map, opt},
    multi::{many1, separated_list1},
    sequence::{delimited, pair},
    IResult,
};

use crate::automaton::regex::Regex;
use crate::error::{Error, Result};

fn literal(input: &str) -> IResult<&str, Regex> {
    map(
        take_while1(|c: char| c.is_alphanumeric() || c == '_'),
        |s: &str| Regex::Literal(s.to_string()),
    )(input)
}

fn atom(input: &str) -> IResult<&str, Regex> {
    nom::branch::alt((
        delimited(
            delimited(multispace0, char('('), multispace0),
            union,
            delimited(multispace0, char(')'), multispace0),
        ),
        delimited(multispace0, literal, multispace0),
    ))(input)
}

fn starred(input: &str) -> IResult<&str, Regex> {
    map(pair(atom, opt(char('*'))), |(r, star)| {
        if star.is_some() {
            r.star()
        } else {
            r
        }
    })(input)
}

fn concatenation(input: &str) -> IResult<&str, Regex> {
    map(many1(starred), |parts| {
        parts
            .into_iter()
            .reduce(Regex::concat)
            .unwrap_or(Regex::Epsilon)
    })(input)
}

fn union(input: &str) -> IResult<&str, Regex> {
    map(
        separated_list1(delimited(multispace0, char('|'), multispace0), concatenation),
        |parts| parts.into_iter().reduce(Regex::union).unwrap_or(Regex::Epsilon),
    )(input)
}

fn full_regex(input: &str) -> IResult<&str, Regex> {
    let (input, re) = delimited(multispace0, union, multispace0)(input)?;
    let (input, _) = eof(input)?;
    Ok((input, re))
}

/// Parse regex text into a [`Regex`] AST.
pub fn parse_regex(text: &str) -> Result<Regex> {
    full_regex(text)
        .map(|(_, re)| re)
        .map_err(|e| Error::InvalidRegex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_star_and_union_with_correct_precedence() {
        let re = parse_regex("X*|Y").unwrap();
        let dfa = crate::automaton::dfa::Dfa::from_nfa(&re.to_nfa()).minimize();
        assert!(dfa.accepts(&[]));
        assert!(dfa.accepts(&["X".to_string(), "X".to_string()]));
        assert!(dfa.accepts(&["Y".to_string()]));
        assert!(!dfa.accepts(&["X".to_string(), "Y".to_string()]));
    }

    #[test]
    fn parses_parens_and_concatenation() {
        let re = parse_regex("(a|b) c").unwrap();
        let dfa = crate::automaton::dfa::Dfa::from_nfa(&re.to_nfa()).minimize();
        assert!(dfa.accepts(&["a".to_string(), "c".to_string()]));
        assert!(dfa.accepts(&["b".to_string(), "c".to_string()]));
        assert!(!dfa.accepts(&["c".to_string()]));
    }

    #[test]
    fn rejects_malformed_regex() {
        assert!(parse_regex("(a").is_err());
        assert!(parse_regex("").is_err());
    }
}

use winnow::ascii::till_line_ending;
use winnow::combinator::{alt, cut_err, fail, opt, preceded, repeat};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_while};

use crate::types::wildcard::Token;

use super::parser::{RawEntry, RawTriple};

// -- Wildcard tokens --------------------------------------------------------

fn stars(input: &mut &str) -> ModalResult<Token> {
    let checkpoint = input.checkpoint();
    let run = take_while(1.., '*').parse_next(input)?;
    match run.len() {
        1 => Ok(Token::Star),
        2 => Ok(Token::StarStar),
        _ => {
            input.reset(&checkpoint);
            cut_err(fail)
                .context(StrContext::Expected(StrContextValue::Description(
                    "at most two consecutive '*'",
                )))
                .parse_next(input)
        }
    }
}

fn escaped(input: &mut &str) -> ModalResult<Token> {
    preceded(
        '\\',
        cut_err(any).context(StrContext::Expected(StrContextValue::Description(
            "character after '\\'",
        ))),
    )
    .map(Token::Literal)
    .parse_next(input)
}

fn wildcard_token(input: &mut &str, separator: Option<char>) -> ModalResult<Token> {
    alt((
        stars,
        '?'.value(Token::Question),
        '+'.value(Token::Plus),
        escaped,
        any.map(|c: char| {
            if Some(c) == separator {
                Token::Separator
            } else {
                Token::Literal(c)
            }
        }),
    ))
    .parse_next(input)
}

pub(crate) fn wildcard_tokens(
    separator: Option<char>,
) -> impl FnMut(&mut &str) -> ModalResult<Vec<Token>> {
    move |input: &mut &str| {
        repeat(0.., |i: &mut &str| wildcard_token(i, separator)).parse_next(input)
    }
}

// -- Pointcut text ----------------------------------------------------------

fn blank(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

fn inline_space(input: &mut &str) -> ModalResult<()> {
    take_while(0.., [' ', '\t']).void().parse_next(input)
}

fn part(input: &mut &str) -> ModalResult<Option<String>> {
    take_till(0.., |c: char| matches!(c, '@' | '^' | '\n' | '\r'))
        .map(|s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        })
        .parse_next(input)
}

fn triple(input: &mut &str) -> ModalResult<RawTriple> {
    let route = part.parse_next(input)?;
    let component = opt(preceded('@', part)).parse_next(input)?.flatten();
    let operation = opt(preceded('^', part)).parse_next(input)?.flatten();
    Ok(RawTriple {
        route,
        component,
        operation,
    })
}

fn entry(input: &mut &str) -> ModalResult<RawEntry> {
    let include = alt(('+'.value(true), '-'.value(false))).parse_next(input)?;
    inline_space.parse_next(input)?;
    let triple = cut_err(triple.verify(|t: &RawTriple| !t.is_empty()))
        .context(StrContext::Expected(StrContextValue::Description(
            "route@component^operation",
        )))
        .parse_next(input)?;
    Ok(RawEntry { include, triple })
}

pub(crate) fn single_triple(input: &mut &str) -> ModalResult<RawTriple> {
    inline_space.parse_next(input)?;
    let t = triple
        .verify(|t: &RawTriple| !t.is_empty())
        .context(StrContext::Expected(StrContextValue::Description(
            "route@component^operation",
        )))
        .parse_next(input)?;
    inline_space.parse_next(input)?;
    Ok(t)
}

pub(crate) fn pointcut_entries(input: &mut &str) -> ModalResult<Vec<RawEntry>> {
    let entries: Vec<RawEntry> = repeat(0.., preceded(blank, entry)).parse_next(input)?;
    blank.parse_next(input)?;
    Ok(entries)
}

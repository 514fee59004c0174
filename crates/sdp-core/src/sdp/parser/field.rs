//! Field parser combinators
//!
//! Every SDP line has the form `<type>=<value>` terminated by CRLF, where type
//! is a single character. The combinators here consume one such line (or a
//! run of them) from the front of the buffer:
//!
//! - [`required_field`] fails when the line is absent or not CRLF terminated
//! - [`optional_field`] succeeds without consuming anything on a mismatch
//! - [`repeated_field`] collects consecutive matching lines
//!
//! Grammar levels are expressed as ordered slices of [`FieldParser`]s that
//! write into an accumulator; [`run_pipeline`] threads the buffer through them
//! and stops at the first failure.

use nom::{
    IResult,
    bytes::complete::take_till,
    character::complete::{char, crlf},
    sequence::{delimited, pair},
};
use tracing::trace;

use crate::error::{Error, Result};

/// Result of a parsing step: the unconsumed input and the parsed value.
///
/// On failure no partial value is returned.
pub type ParseOutcome<'a, T> = Result<(&'a str, T)>;

/// Matches `<tag>=<value>\r\n` at the start of `input`.
fn field_line(tag: char, input: &str) -> IResult<&str, &str> {
    delimited(
        pair(char(tag), char('=')),
        take_till(|c| c == '\r' || c == '\n'),
        crlf,
    )(input)
}

/// Parses a mandatory `<tag>=` line.
pub fn required_field<'a>(tag: char, name: &'static str, input: &'a str) -> ParseOutcome<'a, &'a str> {
    field_line(tag, input).map_err(|_| Error::grammar(name, input))
}

/// Parses an optional `<tag>=` line; a mismatch consumes nothing.
pub fn optional_field(tag: char, input: &str) -> ParseOutcome<'_, Option<&str>> {
    match field_line(tag, input) {
        Ok((rest, value)) => Ok((rest, Some(value))),
        Err(_) => Ok((input, None)),
    }
}

/// Parses zero or more consecutive `<tag>=` lines.
pub fn repeated_field(tag: char, input: &str) -> ParseOutcome<'_, Vec<&str>> {
    let mut values = Vec::new();
    let mut rest = input;
    loop {
        let (next, value) = optional_field(tag, rest)?;
        let Some(value) = value else {
            return Ok((rest, values));
        };
        if next.len() >= rest.len() {
            return Err(Error::LoopInvariant(tag));
        }
        values.push(value);
        rest = next;
    }
}

/// One step of a grammar level.
///
/// Implementations consume their field(s) from the front of `input`, store the
/// result in the accumulator and return the remaining input.
pub trait FieldParser<A> {
    /// Grammar element name, used in logs
    fn name(&self) -> &'static str;

    fn parse<'a>(&self, input: &'a str, acc: &mut A) -> Result<&'a str>;
}

/// An ordered grammar level.
pub type Grammar<A> = [&'static (dyn FieldParser<A> + Sync)];

/// Runs each parser of `grammar` in order, threading the remaining input.
///
/// The first failure aborts the pipeline; no step is retried or skipped.
pub fn run_pipeline<'a, A: 'static>(grammar: &Grammar<A>, input: &'a str, acc: &mut A) -> Result<&'a str> {
    grammar.iter().try_fold(input, |rest, parser| {
        let next = parser.parse(rest, acc)?;
        trace!(field = parser.name(), consumed = rest.len() - next.len(), "field parsed");
        Ok(next)
    })
}

/// A mandatory single-line field.
pub struct Required<A> {
    pub tag: char,
    pub name: &'static str,
    pub assign: fn(&mut A, String),
}

impl<A> FieldParser<A> for Required<A> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn parse<'a>(&self, input: &'a str, acc: &mut A) -> Result<&'a str> {
        let (rest, value) = required_field(self.tag, self.name, input)?;
        (self.assign)(acc, value.to_string());
        Ok(rest)
    }
}

/// An optional single-line field.
pub struct Optional<A> {
    pub tag: char,
    pub name: &'static str,
    pub assign: fn(&mut A, String),
}

impl<A> FieldParser<A> for Optional<A> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn parse<'a>(&self, input: &'a str, acc: &mut A) -> Result<&'a str> {
        let (rest, value) = optional_field(self.tag, input)?;
        if let Some(value) = value {
            (self.assign)(acc, value.to_string());
        }
        Ok(rest)
    }
}

/// A field that may repeat, collected in document order.
pub struct Repeated<A> {
    pub tag: char,
    pub name: &'static str,
    pub assign: fn(&mut A, Vec<String>),
}

impl<A> FieldParser<A> for Repeated<A> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn parse<'a>(&self, input: &'a str, acc: &mut A) -> Result<&'a str> {
        let (rest, values) = repeated_field(self.tag, input)?;
        (self.assign)(acc, values.into_iter().map(str::to_string).collect());
        Ok(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq)]
    struct Acc {
        name: Option<String>,
        info: Option<String>,
        emails: Vec<String>,
    }

    static GRAMMAR: &Grammar<Acc> = &[
        &Required { tag: 's', name: "session name", assign: |acc: &mut Acc, v| acc.name = Some(v) },
        &Optional { tag: 'i', name: "information", assign: |acc: &mut Acc, v| acc.info = Some(v) },
        &Repeated { tag: 'e', name: "emails", assign: |acc: &mut Acc, v| acc.emails = v },
    ];

    #[test]
    fn test_required_field() {
        let (rest, value) = required_field('s', "session name", "s=Seminar\r\nt=0 0\r\n").unwrap();
        assert_eq!(value, "Seminar");
        assert_eq!(rest, "t=0 0\r\n");

        // Empty values are legal
        let (rest, value) = required_field('s', "session name", "s=\r\n").unwrap();
        assert_eq!(value, "");
        assert_eq!(rest, "");
    }

    #[test]
    fn test_required_field_failures() {
        let err = required_field('s', "session name", "t=0 0\r\n").unwrap_err();
        assert_eq!(err.to_string(), "cannot parse session name: t=0 0");

        // LF only is not a valid terminator
        assert!(required_field('s', "session name", "s=Seminar\nt=0 0\r\n").is_err());
        // Missing terminator
        assert!(required_field('s', "session name", "s=Seminar").is_err());
    }

    #[test]
    fn test_optional_field() {
        let (rest, value) = optional_field('i', "i=info\r\nu=x\r\n").unwrap();
        assert_eq!(value, Some("info"));
        assert_eq!(rest, "u=x\r\n");

        let (rest, value) = optional_field('i', "u=x\r\n").unwrap();
        assert_eq!(value, None);
        assert_eq!(rest, "u=x\r\n");

        let (rest, value) = optional_field('i', "").unwrap();
        assert_eq!(value, None);
        assert_eq!(rest, "");
    }

    #[test]
    fn test_repeated_field() {
        let (rest, values) = repeated_field('a', "a=rtcp-mux\r\na=mid:0\r\nm=video 9 RTP/AVP 96\r\n").unwrap();
        assert_eq!(values, vec!["rtcp-mux", "mid:0"]);
        assert_eq!(rest, "m=video 9 RTP/AVP 96\r\n");

        let (rest, values) = repeated_field('a', "t=0 0\r\n").unwrap();
        assert!(values.is_empty());
        assert_eq!(rest, "t=0 0\r\n");
    }

    #[test]
    fn test_repeated_field_stops_at_unterminated_line() {
        let (rest, values) = repeated_field('a', "a=one\r\na=two").unwrap();
        assert_eq!(values, vec!["one"]);
        assert_eq!(rest, "a=two");
    }

    #[test]
    fn test_pipeline_accumulates_in_order() {
        let mut acc = Acc::default();
        let rest = run_pipeline(GRAMMAR, "s=name\r\ne=a@example.com\r\ne=b@example.com\r\nt=0 0\r\n", &mut acc).unwrap();
        assert_eq!(rest, "t=0 0\r\n");
        assert_eq!(
            acc,
            Acc {
                name: Some("name".to_string()),
                info: None,
                emails: vec!["a@example.com".to_string(), "b@example.com".to_string()],
            }
        );
    }

    #[test]
    fn test_pipeline_aborts_on_first_failure() {
        let mut acc = Acc::default();
        let err = run_pipeline(GRAMMAR, "i=info\r\ns=name\r\n", &mut acc).unwrap_err();
        assert_eq!(
            err,
            Error::Grammar { field: "session name", fragment: "i=info".to_string() }
        );
        assert_eq!(acc, Acc::default());
    }

    #[test]
    fn test_pipeline_does_not_reorder() {
        // The email line comes before the information line, so information is
        // skipped and the i= line is left for whoever runs next.
        let mut acc = Acc::default();
        let rest = run_pipeline(GRAMMAR, "s=name\r\ne=a@b\r\ni=late\r\n", &mut acc).unwrap();
        assert_eq!(rest, "i=late\r\n");
        assert_eq!(acc.info, None);
    }
}

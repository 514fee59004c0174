//! Media-level SDP grammar
//!
//! ```text
//! media-description = media-field
//!                     information-field
//!                     *connection-field
//!                     bandwidth-fields
//!                     key-field
//!                     attribute-fields
//!
//! media-field = "m=" media SP port ["/" integer] SP proto 1*(SP fmt) CRLF
//! ```

use nom::{
    IResult,
    bytes::complete::is_not,
    character::complete::char,
    combinator::{opt, rest},
    sequence::{preceded, terminated, tuple},
};
use tracing::trace;

use crate::error::{Error, Result};
use crate::sdp::parser::field::{FieldParser, Grammar, Optional, Repeated, required_field, run_pipeline};
use crate::sdp::parser::session::{BandwidthFields, SessionBuilder, connection_field};
use crate::types::sdp::{Bandwidth, ConnectionData, MediaDescriptor};

/// Fields of the `m=` line itself
#[derive(Debug, Clone, PartialEq, Eq)]
struct MediaLine {
    media: String,
    port: u16,
    port_count: Option<u16>,
    protocol: String,
    formats: Vec<u32>,
}

#[derive(Debug, Default)]
struct MediaBuilder {
    line: Option<MediaLine>,
    information: Option<String>,
    connections: Vec<ConnectionData>,
    bandwidths: Vec<Bandwidth>,
    encryption_key: Option<String>,
    attributes: Vec<String>,
}

impl MediaBuilder {
    fn set_line(&mut self, line: MediaLine) {
        debug_assert!(self.line.is_none());
        self.line = Some(line);
    }

    fn set_information(&mut self, information: String) {
        self.information = Some(information);
    }

    fn set_bandwidths(&mut self, bandwidths: Vec<Bandwidth>) {
        self.bandwidths = bandwidths;
    }

    fn set_encryption_key(&mut self, key: String) {
        self.encryption_key = Some(key);
    }

    fn set_attributes(&mut self, attributes: Vec<String>) {
        self.attributes = attributes;
    }

    fn build(self) -> Result<MediaDescriptor> {
        let line = self.line.ok_or_else(|| Error::grammar("media", ""))?;
        Ok(MediaDescriptor {
            media: line.media,
            port: line.port,
            port_count: line.port_count,
            protocol: line.protocol,
            formats: line.formats,
            information: self.information,
            connections: self.connections,
            bandwidths: self.bandwidths,
            encryption_key: self.encryption_key,
            attributes: self.attributes,
        })
    }
}

/// Splits an `m=` value into media, port, optional port count, proto and the
/// space separated format list.
fn media_tokens(input: &str) -> IResult<&str, (&str, &str, Option<&str>, &str, &str)> {
    tuple((
        terminated(is_not(" "), char(' ')),
        is_not(" /"),
        opt(preceded(char('/'), is_not(" "))),
        preceded(char(' '), is_not(" ")),
        preceded(char(' '), rest),
    ))(input)
}

fn parse_media_line(input: &str) -> Result<(&str, MediaLine)> {
    let (rest, value) = required_field('m', "media", input)?;
    let (_, (media, port, port_count, protocol, formats)) =
        media_tokens(value).map_err(|_| Error::grammar("media", input))?;

    let port = port.parse::<u16>().map_err(|_| Error::grammar("media port", input))?;
    let port_count = port_count
        .map(|count| count.parse::<u16>())
        .transpose()
        .map_err(|_| Error::grammar("media port", input))?;
    let formats = formats
        .split(' ')
        .map(str::parse::<u32>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| Error::Grammar {
            field: "media formats",
            fragment: formats.to_string(),
        })?;

    Ok((
        rest,
        MediaLine {
            media: media.to_string(),
            port,
            port_count,
            protocol: protocol.to_string(),
            formats,
        },
    ))
}

struct MediaField;

impl FieldParser<MediaBuilder> for MediaField {
    fn name(&self) -> &'static str {
        "media"
    }

    fn parse<'a>(&self, input: &'a str, acc: &mut MediaBuilder) -> Result<&'a str> {
        let (rest, line) = parse_media_line(input)?;
        acc.set_line(line);
        Ok(rest)
    }
}

/// Zero or more media-level `c=` lines.
struct MediaConnections;

impl FieldParser<MediaBuilder> for MediaConnections {
    fn name(&self) -> &'static str {
        "connection"
    }

    fn parse<'a>(&self, input: &'a str, acc: &mut MediaBuilder) -> Result<&'a str> {
        let mut rest = input;
        while let (next, Some(connection)) = connection_field(rest)? {
            acc.connections.push(connection);
            rest = next;
        }
        Ok(rest)
    }
}

static MEDIA_GRAMMAR: &Grammar<MediaBuilder> = &[
    &MediaField,
    &Optional { tag: 'i', name: "information", assign: MediaBuilder::set_information },
    &MediaConnections,
    &BandwidthFields { assign: MediaBuilder::set_bandwidths },
    &Optional { tag: 'k', name: "key", assign: MediaBuilder::set_encryption_key },
    &Repeated { tag: 'a', name: "attribute", assign: MediaBuilder::set_attributes },
];

/// Parses one media description from the front of `input`.
pub(crate) fn parse_media_description(input: &str) -> Result<(&str, MediaDescriptor)> {
    let mut builder = MediaBuilder::default();
    let rest = run_pipeline(MEDIA_GRAMMAR, input, &mut builder)?;
    Ok((rest, builder.build()?))
}

/// The trailing `*(media-description)` of a session.
///
/// Media descriptions are parsed for as long as the input starts with an
/// `m=` line. Anything else is left for the caller.
pub(crate) struct MediaDescriptions;

impl FieldParser<SessionBuilder> for MediaDescriptions {
    fn name(&self) -> &'static str {
        "media descriptions"
    }

    fn parse<'a>(&self, input: &'a str, acc: &mut SessionBuilder) -> Result<&'a str> {
        let mut rest = input;
        while rest.starts_with("m=") {
            let (next, media) = parse_media_description(rest)?;
            if next.len() >= rest.len() {
                return Err(Error::LoopInvariant('m'));
            }
            trace!(media = %media.media, port = media.port, "media description parsed");
            acc.push_media(media);
            rest = next;
        }
        Ok(rest)
    }
}

//! Session-level SDP grammar
//!
//! ```text
//! session-description = proto-version
//!                       origin-field
//!                       session-name-field
//!                       information-field
//!                       uri-field
//!                       email-fields
//!                       phone-fields
//!                       connection-field
//!                       bandwidth-fields
//!                       time-fields
//!                       zone-field
//!                       key-field
//!                       attribute-fields
//!                       media-descriptions
//! ```

use tracing::debug;

use crate::error::{Error, Result};
use crate::sdp::parser::field::{
    FieldParser, Grammar, Optional, ParseOutcome, Repeated, Required, optional_field, repeated_field,
    required_field, run_pipeline,
};
use crate::sdp::parser::media::MediaDescriptions;
use crate::types::sdp::{Bandwidth, ConnectionData, MediaDescriptor, Origin, SessionDescription};

const PROTOCOL_VERSION_LINE: &str = "v=0\r\n";

/// Accumulates session-level fields while the grammar runs.
///
/// Every grammar step owns a distinct set of fields, so a setter never
/// overwrites a value produced by an earlier step.
#[derive(Debug, Default)]
pub(crate) struct SessionBuilder {
    version: Option<u8>,
    origin: Option<Origin>,
    session_name: Option<String>,
    information: Option<String>,
    uri: Option<String>,
    emails: Vec<String>,
    phones: Vec<String>,
    connection: Option<ConnectionData>,
    bandwidths: Vec<Bandwidth>,
    timing: Vec<String>,
    zone: Option<String>,
    encryption_key: Option<String>,
    attributes: Vec<String>,
    media: Vec<MediaDescriptor>,
}

impl SessionBuilder {
    fn set_version(&mut self, version: u8) {
        debug_assert!(self.version.is_none());
        self.version = Some(version);
    }

    fn set_origin(&mut self, origin: Origin) {
        debug_assert!(self.origin.is_none());
        self.origin = Some(origin);
    }

    fn set_session_name(&mut self, name: String) {
        debug_assert!(self.session_name.is_none());
        self.session_name = Some(name);
    }

    fn set_information(&mut self, information: String) {
        self.information = Some(information);
    }

    fn set_uri(&mut self, uri: String) {
        self.uri = Some(uri);
    }

    fn set_emails(&mut self, emails: Vec<String>) {
        self.emails = emails;
    }

    fn set_phones(&mut self, phones: Vec<String>) {
        self.phones = phones;
    }

    fn set_connection(&mut self, connection: ConnectionData) {
        self.connection = Some(connection);
    }

    fn set_bandwidths(&mut self, bandwidths: Vec<Bandwidth>) {
        self.bandwidths = bandwidths;
    }

    fn set_timing(&mut self, timing: Vec<String>) {
        self.timing = timing;
    }

    fn set_zone(&mut self, zone: String) {
        self.zone = Some(zone);
    }

    fn set_encryption_key(&mut self, key: String) {
        self.encryption_key = Some(key);
    }

    fn set_attributes(&mut self, attributes: Vec<String>) {
        self.attributes = attributes;
    }

    pub(crate) fn push_media(&mut self, media: MediaDescriptor) {
        self.media.push(media);
    }

    pub(crate) fn build(self) -> Result<SessionDescription> {
        Ok(SessionDescription {
            version: self.version.ok_or_else(|| Error::grammar("protocol version", ""))?,
            origin: self.origin.ok_or_else(|| Error::grammar("origin", ""))?,
            session_name: self.session_name.ok_or_else(|| Error::grammar("session name", ""))?,
            information: self.information,
            uri: self.uri,
            emails: self.emails,
            phones: self.phones,
            connection: self.connection,
            bandwidths: self.bandwidths,
            timing: self.timing,
            zone: self.zone,
            encryption_key: self.encryption_key,
            attributes: self.attributes,
            media: self.media,
        })
    }
}

/// `v=0` - the only protocol version defined
struct ProtocolVersion;

impl FieldParser<SessionBuilder> for ProtocolVersion {
    fn name(&self) -> &'static str {
        "protocol version"
    }

    fn parse<'a>(&self, input: &'a str, acc: &mut SessionBuilder) -> Result<&'a str> {
        let rest = input
            .strip_prefix(PROTOCOL_VERSION_LINE)
            .ok_or_else(|| Error::grammar(self.name(), input))?;
        acc.set_version(0);
        Ok(rest)
    }
}

/// `o=<username> <sess-id> <sess-version> <nettype> <addrtype> <unicast-address>`
struct OriginField;

impl FieldParser<SessionBuilder> for OriginField {
    fn name(&self) -> &'static str {
        "origin"
    }

    fn parse<'a>(&self, input: &'a str, acc: &mut SessionBuilder) -> Result<&'a str> {
        let (rest, value) = required_field('o', self.name(), input)?;
        let origin = parse_origin(value).ok_or_else(|| Error::grammar(self.name(), input))?;
        acc.set_origin(origin);
        Ok(rest)
    }
}

/// Splits an origin value into its six tokens.
///
/// The last five tokens are taken from the right, so the username keeps any
/// embedded spaces.
pub(crate) fn parse_origin(value: &str) -> Option<Origin> {
    let mut parts = value.rsplitn(6, ' ');
    let unicast_address = parts.next()?;
    let addr_type = parts.next()?;
    let net_type = parts.next()?;
    let session_version = parts.next()?;
    let session_id = parts.next()?;
    let username = parts.next()?;
    Some(Origin {
        username: username.to_string(),
        session_id: session_id.to_string(),
        session_version: session_version.to_string(),
        net_type: net_type.to_string(),
        addr_type: addr_type.to_string(),
        unicast_address: unicast_address.to_string(),
    })
}

/// Splits a connection value `<nettype> <addrtype> <connection-address>`.
pub(crate) fn parse_connection(value: &str) -> Option<ConnectionData> {
    let mut parts = value.rsplitn(3, ' ');
    let connection_address = parts.next()?;
    let addr_type = parts.next()?;
    let net_type = parts.next()?;
    Some(ConnectionData {
        net_type: net_type.to_string(),
        addr_type: addr_type.to_string(),
        connection_address: connection_address.to_string(),
    })
}

/// Parses an optional `c=` line.
///
/// Absence consumes nothing; a `c=` line that does not hold three tokens or
/// lacks its CRLF is an error.
pub(crate) fn connection_field(input: &str) -> ParseOutcome<'_, Option<ConnectionData>> {
    if !input.starts_with("c=") {
        return Ok((input, None));
    }
    let (rest, value) = optional_field('c', input)?;
    value
        .and_then(parse_connection)
        .map(|connection| (rest, Some(connection)))
        .ok_or_else(|| Error::grammar("connection", input))
}

/// Session-level `c=`: at most one.
struct SessionConnection;

impl FieldParser<SessionBuilder> for SessionConnection {
    fn name(&self) -> &'static str {
        "connection"
    }

    fn parse<'a>(&self, input: &'a str, acc: &mut SessionBuilder) -> Result<&'a str> {
        let (rest, connection) = connection_field(input)?;
        if let Some(connection) = connection {
            acc.set_connection(connection);
        }
        Ok(rest)
    }
}

/// Parses consecutive `b=<bwtype>:<bandwidth>` lines.
pub(crate) fn bandwidth_fields(input: &str) -> ParseOutcome<'_, Vec<Bandwidth>> {
    let (rest, values) = repeated_field('b', input)?;
    let bandwidths = values
        .into_iter()
        .map(|value| {
            value
                .split_once(':')
                .map(|(bw_type, bandwidth)| Bandwidth {
                    bw_type: bw_type.to_string(),
                    value: bandwidth.to_string(),
                })
                .ok_or_else(|| Error::AttributeFormat {
                    kind: "bandwidth",
                    value: value.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((rest, bandwidths))
}

/// Repeated `b=` lines, usable at both grammar levels.
pub(crate) struct BandwidthFields<A> {
    pub(crate) assign: fn(&mut A, Vec<Bandwidth>),
}

impl<A> FieldParser<A> for BandwidthFields<A> {
    fn name(&self) -> &'static str {
        "bandwidth"
    }

    fn parse<'a>(&self, input: &'a str, acc: &mut A) -> Result<&'a str> {
        let (rest, bandwidths) = bandwidth_fields(input)?;
        (self.assign)(acc, bandwidths);
        Ok(rest)
    }
}

static SESSION_GRAMMAR: &Grammar<SessionBuilder> = &[
    &ProtocolVersion,
    &OriginField,
    &Required { tag: 's', name: "session name", assign: SessionBuilder::set_session_name },
    &Optional { tag: 'i', name: "information", assign: SessionBuilder::set_information },
    &Optional { tag: 'u', name: "uri", assign: SessionBuilder::set_uri },
    &Repeated { tag: 'e', name: "email", assign: SessionBuilder::set_emails },
    &Repeated { tag: 'p', name: "phone", assign: SessionBuilder::set_phones },
    &SessionConnection,
    &BandwidthFields { assign: SessionBuilder::set_bandwidths },
    &Repeated { tag: 't', name: "timing", assign: SessionBuilder::set_timing },
    &Optional { tag: 'z', name: "zone", assign: SessionBuilder::set_zone },
    &Optional { tag: 'k', name: "key", assign: SessionBuilder::set_encryption_key },
    &Repeated { tag: 'a', name: "attribute", assign: SessionBuilder::set_attributes },
    &MediaDescriptions,
];

/// Parses a complete SDP session description.
///
/// The whole input must be consumed by the grammar: lines left over after the
/// last media description are reported as [`Error::TrailingInput`].
///
/// # Examples
///
/// ```
/// use echo_sdp_core::sdp::parse_sdp;
///
/// let sdp = "v=0\r\n\
///     o=- 0 0 IN IP4 127.0.0.1\r\n\
///     s=-\r\n\
///     t=0 0\r\n\
///     m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n\
///     a=mid:0\r\n";
///
/// let session = parse_sdp(sdp).unwrap();
/// assert_eq!(session.media().len(), 1);
/// assert_eq!(session.media()[0].mid(), Some("0"));
/// ```
pub fn parse_sdp(sdp: &str) -> Result<SessionDescription> {
    let mut builder = SessionBuilder::default();
    let rest = run_pipeline(SESSION_GRAMMAR, sdp, &mut builder)?;
    if !rest.is_empty() {
        return Err(Error::TrailingInput(rest.to_string()));
    }
    let session = builder.build()?;
    debug!(
        media = session.media.len(),
        attributes = session.attributes.len(),
        "SDP parsed"
    );
    Ok(session)
}

/// Parses an SDP payload received as raw bytes.
pub fn parse_sdp_bytes(sdp: &[u8]) -> Result<SessionDescription> {
    let text = std::str::from_utf8(sdp).map_err(|e| Error::Grammar {
        field: "utf-8 payload",
        fragment: e.to_string(),
    })?;
    parse_sdp(text)
}

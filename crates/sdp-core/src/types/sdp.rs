//! SDP document model (RFC 4566 subset).
//!
//! A [`SessionDescription`] is produced by the grammar parser or by the answer
//! generator and is read-only afterwards: its fields are only reachable through
//! getters. The component records ([`Origin`], [`ConnectionData`],
//! [`Bandwidth`]) are plain values.
//!
//! Attribute lines are kept as raw `name` / `name:value` text. Their meaning is
//! attribute specific and is resolved by higher layers such as
//! [`crate::webrtc`].
use serde::{Deserialize, Serialize};

/// Represents the Origin (o=) field in an SDP message.
///
/// Format: `o=<username> <sess-id> <sess-version> <nettype> <addrtype> <unicast-address>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Origin {
    /// Username of the originator (often "-")
    pub username: String,
    /// Session ID
    pub session_id: String,
    /// Session version
    pub session_version: String,
    /// Network type (typically "IN")
    pub net_type: String,
    /// Address type ("IP4" or "IP6")
    pub addr_type: String,
    /// Unicast address of the originating host
    pub unicast_address: String,
}

/// Represents the Connection Data (c=) field in an SDP message.
///
/// Format: `c=<nettype> <addrtype> <connection-address>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionData {
    /// Network type (typically "IN")
    pub net_type: String,
    /// Address type ("IP4" or "IP6")
    pub addr_type: String,
    /// Connection address, possibly with TTL/count suffixes
    pub connection_address: String,
}

/// A bandwidth (b=) entry: `<bwtype>:<bandwidth>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bandwidth {
    /// Bandwidth type, e.g. "AS" or "CT"
    pub bw_type: String,
    /// Bandwidth value, kept as text
    pub value: String,
}

/// A parsed SDP session description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionDescription {
    pub(crate) version: u8,
    pub(crate) origin: Origin,
    pub(crate) session_name: String,
    pub(crate) information: Option<String>,
    pub(crate) uri: Option<String>,
    pub(crate) emails: Vec<String>,
    pub(crate) phones: Vec<String>,
    pub(crate) connection: Option<ConnectionData>,
    pub(crate) bandwidths: Vec<Bandwidth>,
    pub(crate) timing: Vec<String>,
    pub(crate) zone: Option<String>,
    pub(crate) encryption_key: Option<String>,
    pub(crate) attributes: Vec<String>,
    pub(crate) media: Vec<MediaDescriptor>,
}

impl SessionDescription {
    /// Protocol version (always 0)
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn information(&self) -> Option<&str> {
        self.information.as_deref()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn emails(&self) -> &[String] {
        &self.emails
    }

    pub fn phones(&self) -> &[String] {
        &self.phones
    }

    /// Session-level connection data, at most one
    pub fn connection(&self) -> Option<&ConnectionData> {
        self.connection.as_ref()
    }

    pub fn bandwidths(&self) -> &[Bandwidth] {
        &self.bandwidths
    }

    /// Raw `t=` values in document order
    pub fn timing(&self) -> &[String] {
        &self.timing
    }

    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    pub fn encryption_key(&self) -> Option<&str> {
        self.encryption_key.as_deref()
    }

    /// Raw session-level attribute text (without the `a=` prefix)
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn media(&self) -> &[MediaDescriptor] {
        &self.media
    }

    /// Value of the first session-level attribute called `name`.
    ///
    /// Returns `Some("")` for a flag attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name)
    }

    /// Finds the media descriptor tagged with `a=mid:<mid>`.
    pub fn media_by_mid(&self, mid: &str) -> Option<&MediaDescriptor> {
        self.media.iter().find(|m| m.has_mid(mid))
    }
}

/// One media description (`m=` line and the fields that follow it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaDescriptor {
    pub(crate) media: String,
    pub(crate) port: u16,
    pub(crate) port_count: Option<u16>,
    pub(crate) protocol: String,
    pub(crate) formats: Vec<u32>,
    pub(crate) information: Option<String>,
    pub(crate) connections: Vec<ConnectionData>,
    pub(crate) bandwidths: Vec<Bandwidth>,
    pub(crate) encryption_key: Option<String>,
    pub(crate) attributes: Vec<String>,
}

impl MediaDescriptor {
    /// Media kind, e.g. "audio", "video" or "application"
    pub fn media(&self) -> &str {
        &self.media
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Number of ports from a `<port>/<count>` media line
    pub fn port_count(&self) -> Option<u16> {
        self.port_count
    }

    /// Transport protocol, e.g. "UDP/TLS/RTP/SAVPF"
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn formats(&self) -> &[u32] {
        &self.formats
    }

    pub fn information(&self) -> Option<&str> {
        self.information.as_deref()
    }

    /// Media-level connection data; the grammar allows several `c=` lines here
    pub fn connections(&self) -> &[ConnectionData] {
        &self.connections
    }

    pub fn bandwidths(&self) -> &[Bandwidth] {
        &self.bandwidths
    }

    pub fn encryption_key(&self) -> Option<&str> {
        self.encryption_key.as_deref()
    }

    /// Raw media-level attribute text (without the `a=` prefix)
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Value of the first media-level attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name)
    }

    /// Whether an attribute line equal to `line` is present.
    pub fn has_attribute(&self, line: &str) -> bool {
        self.attributes.iter().any(|a| a == line)
    }

    /// Media identification tag (`a=mid:<mid>`)
    pub fn mid(&self) -> Option<&str> {
        self.attribute("mid")
    }

    pub(crate) fn has_mid(&self, mid: &str) -> bool {
        self.attributes
            .iter()
            .any(|a| a.strip_prefix("mid:") == Some(mid))
    }
}

/// Splits raw attribute text into name and optional value.
pub fn split_attribute(attr: &str) -> (&str, Option<&str>) {
    match attr.split_once(':') {
        Some((name, value)) => (name, Some(value)),
        None => (attr, None),
    }
}

fn find_attribute<'a>(attrs: &'a [String], name: &str) -> Option<&'a str> {
    attrs.iter().find_map(|a| match split_attribute(a) {
        (n, value) if n == name => Some(value.unwrap_or("")),
        _ => None,
    })
}

//! SDP serialization
//!
//! Every type of the document model implements [`fmt::Display`] and renders
//! its lines in grammar order, each terminated by CRLF. Serializing a parsed
//! description yields text that parses back to an equal value.

use std::fmt;

use crate::types::sdp::{Bandwidth, ConnectionData, MediaDescriptor, Origin, SessionDescription};

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.username,
            self.session_id,
            self.session_version,
            self.net_type,
            self.addr_type,
            self.unicast_address
        )
    }
}

impl fmt::Display for ConnectionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.net_type, self.addr_type, self.connection_address)
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.bw_type, self.value)
    }
}

impl fmt::Display for MediaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m={} {}", self.media, self.port)?;
        if let Some(count) = self.port_count {
            write!(f, "/{}", count)?;
        }
        write!(f, " {}", self.protocol)?;
        for format in &self.formats {
            write!(f, " {}", format)?;
        }
        write!(f, "\r\n")?;

        if let Some(info) = &self.information {
            write!(f, "i={}\r\n", info)?;
        }
        for conn in &self.connections {
            write!(f, "c={}\r\n", conn)?;
        }
        for bw in &self.bandwidths {
            write!(f, "b={}\r\n", bw)?;
        }
        if let Some(key) = &self.encryption_key {
            write!(f, "k={}\r\n", key)?;
        }
        for attr in &self.attributes {
            write!(f, "a={}\r\n", attr)?;
        }
        Ok(())
    }
}

impl fmt::Display for SessionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Mandatory lines
        write!(f, "v={}\r\n", self.version)?;
        write!(f, "o={}\r\n", self.origin)?;
        write!(f, "s={}\r\n", self.session_name)?;

        if let Some(info) = &self.information {
            write!(f, "i={}\r\n", info)?;
        }
        if let Some(uri) = &self.uri {
            write!(f, "u={}\r\n", uri)?;
        }
        for email in &self.emails {
            write!(f, "e={}\r\n", email)?;
        }
        for phone in &self.phones {
            write!(f, "p={}\r\n", phone)?;
        }
        if let Some(conn) = &self.connection {
            write!(f, "c={}\r\n", conn)?;
        }
        for bw in &self.bandwidths {
            write!(f, "b={}\r\n", bw)?;
        }
        for time in &self.timing {
            write!(f, "t={}\r\n", time)?;
        }
        if let Some(zone) = &self.zone {
            write!(f, "z={}\r\n", zone)?;
        }
        if let Some(key) = &self.encryption_key {
            write!(f, "k={}\r\n", key)?;
        }
        for attr in &self.attributes {
            write!(f, "a={}\r\n", attr)?;
        }

        for media in &self.media {
            write!(f, "{}", media)?;
        }
        Ok(())
    }
}

/// Renders a session description as SDP text.
pub fn serialize_sdp(session: &SessionDescription) -> String {
    session.to_string()
}

//! BUNDLE transport extraction
//!
//! A `a=group:BUNDLE <mid> <mid> ...` session attribute declares that the
//! listed media share one ICE/DTLS transport. [`extract_bundles`] resolves
//! every group to its media, collects the transport attributes of each and
//! checks that all members agree on the transport identity. Only media-level
//! transport attributes are read.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::sdp::{MediaDescriptor, SessionDescription, split_attribute};

const BUNDLE_GROUP_PREFIX: &str = "group:BUNDLE";

/// ICE credentials, options and candidates of a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IceParameters {
    pub ufrag: Option<String>,
    pub pwd: Option<String>,
    /// `a=ice-options` tokens; order is not significant
    pub options: BTreeSet<String>,
    /// Raw `candidate` attribute values in document order
    pub candidates: Vec<String>,
}

/// DTLS identity of a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DtlsParameters {
    /// Certificate fingerprint, e.g. `sha-256 AA:BB:...`
    pub fingerprint: Option<String>,
    /// Setup role as written in the offer
    pub setup: Option<String>,
}

/// One BUNDLE group resolved to its shared transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bundle {
    /// MIDs of the group in declaration order
    pub mids: Vec<String>,
    pub ice: IceParameters,
    pub dtls: DtlsParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Transport {
    ice: IceParameters,
    dtls: DtlsParameters,
}

impl Transport {
    /// Whether `other` describes the same transport identity.
    ///
    /// Candidates are not compared; each media may list its own.
    fn same_identity(&self, other: &Transport) -> bool {
        self.ice.ufrag == other.ice.ufrag
            && self.ice.pwd == other.ice.pwd
            && self.ice.options == other.ice.options
            && self.dtls.setup == other.dtls.setup
            && self.dtls.fingerprint == other.dtls.fingerprint
    }

    /// Applies one raw attribute; unrelated attributes are ignored.
    fn apply(&mut self, attr: &str) -> Result<()> {
        let (name, value) = split_attribute(attr);
        let slot = match name {
            "ice-ufrag" | "ice-pwd" | "ice-options" | "setup" | "fingerprint" | "candidate"
            | "ice-candidate" => name,
            _ => return Ok(()),
        };
        let value = value.ok_or_else(|| Error::AttributeFormat {
            kind: "transport attribute",
            value: attr.to_string(),
        })?;

        match slot {
            "ice-ufrag" => self.ice.ufrag = Some(value.to_string()),
            "ice-pwd" => self.ice.pwd = Some(value.to_string()),
            "ice-options" => {
                self.ice.options = value.split_whitespace().map(str::to_string).collect();
            }
            "setup" => self.dtls.setup = Some(value.to_string()),
            "fingerprint" => self.dtls.fingerprint = Some(value.to_string()),
            _ => self.ice.candidates.push(value.to_string()),
        }
        Ok(())
    }
}

fn media_transport(media: &MediaDescriptor) -> Result<Transport> {
    let mut transport = Transport::default();
    for attr in media.attributes() {
        transport.apply(attr)?;
    }
    Ok(transport)
}

/// MID lists of every `a=group:BUNDLE` attribute, in document order.
///
/// Session-level groups come first. A group attribute placed in a media
/// section is accepted too and follows them.
pub fn bundle_groups(session: &SessionDescription) -> Vec<Vec<&str>> {
    let media_attributes = session.media().iter().flat_map(|m| m.attributes());
    session
        .attributes()
        .iter()
        .chain(media_attributes)
        .filter_map(|attr| attr.strip_prefix(BUNDLE_GROUP_PREFIX))
        .filter(|mids| mids.is_empty() || mids.starts_with(char::is_whitespace))
        .map(|mids| mids.split_whitespace().collect())
        .collect()
}

fn resolve_group(session: &SessionDescription, index: usize, mids: &[&str]) -> Result<Bundle> {
    let mut transports = mids.iter().map(|mid| {
        let media = session
            .media_by_mid(mid)
            .ok_or_else(|| Error::BundleResolution(format!("MID is not found: {}", mid)))?;
        Ok::<_, Error>((*mid, media_transport(media)?))
    });

    let (_, canonical) = transports
        .next()
        .ok_or_else(|| Error::BundleResolution(format!("BUNDLE group {} is empty", index)))??;

    for item in transports {
        let (mid, transport) = item?;
        if !canonical.same_identity(&transport) {
            warn!(group = index, mid, "BUNDLE member disagrees on transport");
            return Err(Error::BundleConsistency { group: index, mid: mid.to_string() });
        }
    }

    Ok(Bundle {
        mids: mids.iter().map(|mid| mid.to_string()).collect(),
        ice: canonical.ice,
        dtls: canonical.dtls,
    })
}

/// Extracts one [`Bundle`] per BUNDLE group, in group order.
///
/// Fails when a group is empty, names a MID that no media carries, when a
/// transport attribute has no value, or when members of a group disagree on
/// ufrag, pwd, ICE options, setup role or fingerprint.
pub fn extract_bundles(session: &SessionDescription) -> Result<Vec<Bundle>> {
    let bundles = bundle_groups(session)
        .iter()
        .enumerate()
        .map(|(index, mids)| resolve_group(session, index, mids))
        .collect::<Result<Vec<_>>>()?;
    debug!(bundles = bundles.len(), "BUNDLE groups resolved");
    Ok(bundles)
}

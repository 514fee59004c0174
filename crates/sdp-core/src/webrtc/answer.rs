//! Answer generation
//!
//! The answer mirrors the offer: same media in the same order with the same
//! attributes, except that the origin and session name are our own, the
//! offer's connection and bandwidth lines are dropped and each DTLS setup role
//! is answered with its counterpart.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::sdp::{MediaDescriptor, Origin, SessionDescription};

/// DTLS setup role (`a=setup:<role>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupRole {
    /// Offerer accepts either role
    ActPass,
    /// Initiates the DTLS handshake
    Active,
    /// Waits for the DTLS handshake
    Passive,
}

impl SetupRole {
    /// Role to answer with when the offer carries `self`.
    pub fn answer(self) -> SetupRole {
        match self {
            SetupRole::ActPass => SetupRole::Passive,
            SetupRole::Passive => SetupRole::Active,
            SetupRole::Active => SetupRole::Passive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SetupRole::ActPass => "actpass",
            SetupRole::Active => "active",
            SetupRole::Passive => "passive",
        }
    }
}

impl fmt::Display for SetupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetupRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "actpass" => Ok(SetupRole::ActPass),
            "active" => Ok(SetupRole::Active),
            "passive" => Ok(SetupRole::Passive),
            other => Err(format!("unknown setup role: {}", other)),
        }
    }
}

/// Rewrites a `setup:<role>` attribute for the answer.
///
/// Unknown roles and every other attribute are returned unchanged.
pub fn invert_setup(attr: &str) -> String {
    attr.strip_prefix("setup:")
        .and_then(|role| role.parse::<SetupRole>().ok())
        .map(|role| format!("setup:{}", role.answer()))
        .unwrap_or_else(|| attr.to_string())
}

/// Local identity placed in generated answers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnswerConfig {
    pub origin: Origin,
    pub session_name: String,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            origin: Origin {
                username: "-".to_string(),
                session_id: "0".to_string(),
                session_version: "0".to_string(),
                net_type: "IN".to_string(),
                addr_type: "IP4".to_string(),
                unicast_address: "127.0.0.1".to_string(),
            },
            session_name: "-".to_string(),
        }
    }
}

fn answer_media(offer: &MediaDescriptor) -> MediaDescriptor {
    MediaDescriptor {
        connections: Vec::new(),
        bandwidths: Vec::new(),
        attributes: offer.attributes.iter().map(|a| invert_setup(a)).collect(),
        ..offer.clone()
    }
}

/// Builds the answer to `offer`. The offer is left untouched.
pub fn generate_answer(offer: &SessionDescription, config: &AnswerConfig) -> SessionDescription {
    let answer = SessionDescription {
        origin: config.origin.clone(),
        session_name: config.session_name.clone(),
        connection: None,
        bandwidths: Vec::new(),
        media: offer.media.iter().map(answer_media).collect(),
        ..offer.clone()
    };
    debug!(media = answer.media.len(), "answer generated");
    answer
}

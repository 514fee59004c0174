//! SDP offer/answer core for the WebRTC echo backend
//!
//! This crate parses SDP text into an immutable [`SessionDescription`],
//! renders it back, resolves the ICE/DTLS transport of every BUNDLE group and
//! builds the answer sent back to the browser.
//!
//! ```
//! use echo_sdp_core::prelude::*;
//!
//! let offer = parse_sdp(
//!     "v=0\r\n\
//!      o=- 0 0 IN IP4 127.0.0.1\r\n\
//!      s=-\r\n\
//!      t=0 0\r\n\
//!      a=group:BUNDLE 0\r\n\
//!      m=audio 9 UDP/TLS/RTP/SAVPF 0\r\n\
//!      a=mid:0\r\n\
//!      a=ice-ufrag:abc\r\n\
//!      a=setup:actpass\r\n",
//! )?;
//!
//! let bundles = extract_bundles(&offer)?;
//! assert_eq!(bundles[0].ice.ufrag.as_deref(), Some("abc"));
//!
//! let answer = generate_answer(&offer, &AnswerConfig::default());
//! assert!(serialize_sdp(&answer).contains("a=setup:passive\r\n"));
//! # Ok::<(), echo_sdp_core::Error>(())
//! ```
//!
//! Nothing here performs I/O or keeps state between calls; every operation is
//! a pure function of its arguments.

// Declare modules
pub mod config;
pub mod error;
pub mod sdp;
pub mod signaling;
pub mod types;
pub mod webrtc;

// Re-export key public items
pub use config::EchoConfig;
pub use error::{Error, Result};
pub use sdp::{parse_sdp, parse_sdp_bytes, serialize_sdp};
pub use types::{Bandwidth, ConnectionData, MediaDescriptor, Origin, SessionDescription};
pub use webrtc::{AnswerConfig, Bundle, SetupRole, extract_bundles, generate_answer};

/// Re-export of common types and functions
pub mod prelude {
    pub use crate::config::{CandidateConfig, EchoConfig, LoggingSettings};
    pub use crate::error::{Error, Result};
    pub use crate::sdp::{parse_sdp, parse_sdp_bytes, serialize_sdp};
    pub use crate::signaling::{AnswerResponse, ErrorResponse, OfferRequest, process_offer};
    pub use crate::types::{Bandwidth, ConnectionData, MediaDescriptor, Origin, SessionDescription};
    pub use crate::webrtc::{
        AnswerConfig, Bundle, DtlsParameters, IceParameters, SetupRole, extract_bundles, generate_answer,
        host_candidate,
    };
}
